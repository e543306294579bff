//! Header, body and block payloads.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use shared_types::codec::expect_list_len;
use shared_types::{Block, BlockManifest, Hash, Header, Transaction};

use super::raw::RawList;
use super::{impl_list_codec, impl_packet};
use crate::domain::errors::{OriginError, WireError};
use crate::domain::origin::HashOrNumber;
use crate::domain::registry::MessageKind;

// =============================================================================
// ANNOUNCEMENTS
// =============================================================================

/// One candidate block in an announcement batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHashNumber {
    pub hash: Hash,
    pub number: u64,
}

impl Encodable for BlockHashNumber {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.hash);
        s.append(&self.number);
    }
}

impl Decodable for BlockHashNumber {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 2)?;
        Ok(Self {
            hash: rlp.val_at(0)?,
            number: rlp.val_at(1)?,
        })
    }
}

/// Batch of new-block announcements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBlockHashesPacket(pub Vec<BlockHashNumber>);

impl_list_codec!(NewBlockHashesPacket, BlockHashNumber);

impl NewBlockHashesPacket {
    /// Split the batch into parallel hash and number sequences.
    pub fn unpack(&self) -> (Vec<Hash>, Vec<u64>) {
        self.0.iter().map(|entry| (entry.hash, entry.number)).unzip()
    }
}

/// Full block propagated to a subset of peers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBlockPacket {
    pub block: Block,
}

impl NewBlockPacket {
    /// Structural check run before the block leaves the protocol layer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::SanityCheck`] carrying the block model's reason.
    pub fn sanity_check(&self) -> Result<(), WireError> {
        self.block.sanity_check().map_err(WireError::from)
    }
}

impl Encodable for NewBlockPacket {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(1);
        s.append(&self.block);
    }
}

impl Decodable for NewBlockPacket {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 1)?;
        Ok(Self {
            block: rlp.val_at(0)?,
        })
    }
}

// =============================================================================
// HEADERS
// =============================================================================

/// Header query starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetBlockHeadersPacket {
    pub origin: HashOrNumber,
    /// Maximum number of headers to retrieve.
    pub amount: u64,
    /// Whether the query walks the dominant chain.
    pub dom: bool,
    /// Query direction (false = rising towards latest, true = falling towards genesis).
    pub reverse: bool,
    /// Block number at which the walk stops.
    pub to: u64,
    /// Blocks to skip between consecutive headers.
    pub skip: u64,
}

impl Default for GetBlockHeadersPacket {
    fn default() -> Self {
        Self {
            origin: HashOrNumber::Number(0),
            amount: 0,
            dom: false,
            reverse: false,
            to: 0,
            skip: 0,
        }
    }
}

impl GetBlockHeadersPacket {
    /// Decode from the wire, keeping the origin's size failure distinct
    /// from generic malformed input.
    pub fn decode_wire(rlp: &Rlp<'_>) -> Result<Self, WireError> {
        let malformed = |source| WireError::Decode {
            kind: MessageKind::GetBlockHeaders,
            source,
        };

        expect_list_len(rlp, 6).map_err(malformed)?;
        let origin = rlp.at(0).map_err(malformed)?;
        let origin = HashOrNumber::decode_origin(&origin).map_err(|err| match err {
            OriginError::Malformed(source) => malformed(source),
            other => WireError::Origin(other),
        })?;

        Ok(Self {
            origin,
            amount: rlp.val_at(1).map_err(malformed)?,
            dom: rlp.val_at(2).map_err(malformed)?,
            reverse: rlp.val_at(3).map_err(malformed)?,
            to: rlp.val_at(4).map_err(malformed)?,
            skip: rlp.val_at(5).map_err(malformed)?,
        })
    }
}

impl Encodable for GetBlockHeadersPacket {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(6);
        s.append(&self.origin);
        s.append(&self.amount);
        s.append(&self.dom);
        s.append(&self.reverse);
        s.append(&self.to);
        s.append(&self.skip);
    }
}

impl Decodable for GetBlockHeadersPacket {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 6)?;
        Ok(Self {
            origin: rlp.val_at(0)?,
            amount: rlp.val_at(1)?,
            dom: rlp.val_at(2)?,
            reverse: rlp.val_at(3)?,
            to: rlp.val_at(4)?,
            skip: rlp.val_at(5)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHeadersPacket(pub Vec<Header>);

impl_list_codec!(BlockHeadersPacket, Header);

// =============================================================================
// BODIES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetBlockBodiesPacket(pub Vec<Hash>);

impl_list_codec!(GetBlockBodiesPacket, Hash);

/// Block contents without the header. All four parts are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockBody {
    pub transactions: Vec<Transaction>,
    pub uncles: Vec<Header>,
    pub ext_transactions: Vec<Transaction>,
    pub sub_manifest: BlockManifest,
}

impl From<Block> for BlockBody {
    fn from(block: Block) -> Self {
        Self {
            transactions: block.transactions,
            uncles: block.uncles,
            ext_transactions: block.ext_transactions,
            sub_manifest: block.sub_manifest,
        }
    }
}

impl Encodable for BlockBody {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        s.append_list::<Transaction, _>(&self.transactions);
        s.append_list::<Header, _>(&self.uncles);
        s.append_list::<Transaction, _>(&self.ext_transactions);
        s.append(&self.sub_manifest);
    }
}

impl Decodable for BlockBody {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 4)?;
        Ok(Self {
            transactions: rlp.list_at(0)?,
            uncles: rlp.list_at(1)?,
            ext_transactions: rlp.list_at(2)?,
            sub_manifest: rlp.val_at(3)?,
        })
    }
}

/// Four parallel sequences, one element per body.
pub type UnpackedBodies = (
    Vec<Vec<Transaction>>,
    Vec<Vec<Header>>,
    Vec<Vec<Transaction>>,
    Vec<BlockManifest>,
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockBodiesPacket(pub Vec<BlockBody>);

impl_list_codec!(BlockBodiesPacket, BlockBody);

impl BlockBodiesPacket {
    /// Split the bodies into transactions, uncles, external transactions
    /// and manifests, preserving order.
    pub fn unpack(self) -> UnpackedBodies {
        let count = self.0.len();
        let mut unpacked: UnpackedBodies = (
            Vec::with_capacity(count),
            Vec::with_capacity(count),
            Vec::with_capacity(count),
            Vec::with_capacity(count),
        );
        for body in self.0 {
            unpacked.0.push(body.transactions);
            unpacked.1.push(body.uncles);
            unpacked.2.push(body.ext_transactions);
            unpacked.3.push(body.sub_manifest);
        }
        unpacked
    }
}

/// Bodies served from bytes already held in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockBodiesRlpPacket(pub RawList<BlockBody>);

impl Encodable for BlockBodiesRlpPacket {
    fn rlp_append(&self, s: &mut RlpStream) {
        self.0.rlp_append(s);
    }
}

impl Decodable for BlockBodiesRlpPacket {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        RawList::decode(rlp).map(Self)
    }
}

// =============================================================================
// SINGLE BLOCK
// =============================================================================

/// Fetch one block by hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetBlockPacket {
    pub hash: Hash,
}

impl Encodable for GetBlockPacket {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(1);
        s.append(&self.hash);
    }
}

impl Decodable for GetBlockPacket {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 1)?;
        Ok(Self {
            hash: rlp.val_at(0)?,
        })
    }
}

impl_packet!(
    NewBlockHashesPacket => NewBlockHashes,
    NewBlockPacket => NewBlock,
    GetBlockHeadersPacket => GetBlockHeaders,
    BlockHeadersPacket => BlockHeaders,
    GetBlockBodiesPacket => GetBlockBodies,
    BlockBodiesPacket => BlockBodies,
    BlockBodiesRlpPacket => BlockBodies,
    GetBlockPacket => GetBlock,
);
