//! # Core Domain Entities
//!
//! The chain model as seen by the wire protocol.
//!
//! ## Clusters
//!
//! - **Primitives**: `Hash`, `Address`, `U256`, `Location`
//! - **Chain**: `Header`, `Transaction`, `Block`, `BlockManifest`
//! - **Execution**: `Receipt`, `Log`
//! - **Cross-shard**: `PendingEtxs`, `PendingEtxsRollup`
//! - **Networking**: `ForkId`

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::errors::BlockError;

pub use primitive_types::{H160, H256, U256};

// =============================================================================
// CLUSTER A: PRIMITIVES
// =============================================================================

/// A 32-byte Keccak-256 hash.
pub type Hash = H256;

/// A 20-byte account address.
pub type Address = H160;

/// Position of a chain segment in the hierarchy.
///
/// Empty for the prime chain, `[region]` for a region chain and
/// `[region, zone]` for a zone chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location(pub Vec<u8>);

impl Location {
    pub fn new(levels: &[u8]) -> Self {
        Self(levels.to_vec())
    }

    /// Number of hierarchy levels below prime.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Compute Keccak256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_slice(&hasher.finalize())
}

// =============================================================================
// CLUSTER B: THE CHAIN
// =============================================================================

/// Maximum bit length of a header difficulty that passes the sanity check.
pub const MAX_DIFFICULTY_BITS: usize = 80;

/// Maximum size of header extra data that passes the sanity check.
pub const MAX_EXTRA_DATA_SIZE: usize = 100 * 1024;

/// The header of a block containing metadata and root hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Hash of the parent block (creates the chain linkage).
    pub parent_hash: Hash,
    /// Hash of the uncle list.
    pub uncle_hash: Hash,
    /// Beneficiary of the block reward.
    pub coinbase: Address,
    /// Root hash of the state trie after applying this block.
    pub state_root: Hash,
    /// Root of the transaction trie.
    pub tx_hash: Hash,
    /// Root of the external (cross-shard) transaction trie.
    pub etx_hash: Hash,
    /// Root of the receipt trie.
    pub receipt_hash: Hash,
    /// Proof-of-work difficulty.
    pub difficulty: U256,
    /// Block height in the chain.
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    /// Unix timestamp when the block was sealed.
    pub time: u64,
    pub extra: Vec<u8>,
    /// Chain segment this header belongs to.
    pub location: Location,
    pub nonce: u64,
}

impl Header {
    /// Keccak-256 of the RLP encoding.
    pub fn hash(&self) -> Hash {
        keccak256(&rlp::encode(self))
    }

    /// Cheap structural check run before a header is processed further.
    pub fn sanity_check(&self) -> Result<(), BlockError> {
        let bits = self.difficulty.bits();
        if bits > MAX_DIFFICULTY_BITS {
            return Err(BlockError::DifficultyTooLarge {
                bits,
                max: MAX_DIFFICULTY_BITS,
            });
        }
        if self.extra.len() > MAX_EXTRA_DATA_SIZE {
            return Err(BlockError::ExtraDataTooLarge {
                size: self.extra.len(),
                max: MAX_EXTRA_DATA_SIZE,
            });
        }
        Ok(())
    }
}

/// A signed transaction as carried on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: u64,
    /// Recipient (None for contract creation).
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    /// ECDSA signature (v, r, s).
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

impl Transaction {
    /// Compute the transaction hash.
    pub fn hash(&self) -> Hash {
        keccak256(&rlp::encode(self))
    }
}

/// Ordered references to the sub-blocks coincident with a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockManifest(pub Vec<Hash>);

impl BlockManifest {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Hash>> for BlockManifest {
    fn from(hashes: Vec<Hash>) -> Self {
        Self(hashes)
    }
}

/// A full block: header plus body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
    pub uncles: Vec<Header>,
    /// Transactions originating in another chain segment.
    pub ext_transactions: Vec<Transaction>,
    pub sub_manifest: BlockManifest,
}

impl Block {
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Structural validity of the block as a DoS guard.
    ///
    /// Delegates to the header check; body contents are validated by
    /// consensus.
    pub fn sanity_check(&self) -> Result<(), BlockError> {
        self.header.sanity_check()
    }
}

// =============================================================================
// CLUSTER C: EXECUTION
// =============================================================================

/// A log entry emitted during execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: Vec<u8>,
}

/// Consensus fields of a transaction receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// 1 on success, 0 on failure.
    pub status: u64,
    pub cumulative_gas_used: u64,
    pub logs: Vec<Log>,
}

// =============================================================================
// CLUSTER D: CROSS-SHARD
// =============================================================================

/// External transactions emitted by a block and not yet included in the
/// destination chain segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEtxs {
    pub header: Header,
    pub etxs: Vec<Transaction>,
}

/// Rollup of the manifest covering a set of pending external transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEtxsRollup {
    pub header: Header,
    pub manifest: BlockManifest,
}

// =============================================================================
// CLUSTER E: NETWORKING
// =============================================================================

/// Fork identifier (EIP-2124): checksum of genesis and past forks plus the
/// next scheduled fork block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForkId {
    /// CRC32 checksum of genesis hash and passed fork block numbers.
    pub hash: [u8; 4],
    /// Block number of the next expected fork (0 if none).
    pub next: u64,
}

impl ForkId {
    pub fn new(hash: [u8; 4], next: u64) -> Self {
        Self { hash, next }
    }
}
