//! Shared builders for realistic protocol payloads.

use primitive_types::U256;
use rand::Rng;
use shared_types::{Address, BlockManifest, ForkId, Hash, Header, Location, Transaction};

use qc_wire_protocol::{BlockBody, ChainInfoProvider, ForkFilter, StatusPacket};

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn random_hash<R: Rng>(rng: &mut R) -> Hash {
    Hash::from(rng.gen::<[u8; 32]>())
}

/// A signed-looking transfer with `data_len` bytes of calldata.
pub fn random_transaction<R: Rng>(rng: &mut R, data_len: usize) -> Transaction {
    Transaction {
        nonce: rng.gen_range(0..1_000_000),
        gas_price: U256::from(rng.gen_range(1_000_000_000u64..100_000_000_000)),
        gas: 21_000 + data_len as u64 * 16,
        to: Some(Address::from(rng.gen::<[u8; 20]>())),
        value: U256::from(rng.gen::<u64>()),
        data: (0..data_len).map(|_| rng.gen()).collect(),
        v: 27 + rng.gen_range(0..2),
        r: U256::from_big_endian(&rng.gen::<[u8; 32]>()),
        s: U256::from_big_endian(&rng.gen::<[u8; 32]>()),
    }
}

pub fn header(number: u64, location: &Location) -> Header {
    Header {
        parent_hash: Hash::from_low_u64_be(number.saturating_sub(1)),
        number,
        gas_limit: 30_000_000,
        difficulty: U256::from(1_000_000u64),
        time: 1_700_000_000 + number * 12,
        location: location.clone(),
        ..Default::default()
    }
}

pub fn random_body<R: Rng>(rng: &mut R, txs: usize, etxs: usize, manifest: usize) -> BlockBody {
    BlockBody {
        transactions: (0..txs).map(|_| random_transaction(rng, 128)).collect(),
        uncles: vec![],
        ext_transactions: (0..etxs).map(|_| random_transaction(rng, 32)).collect(),
        sub_manifest: BlockManifest::from(
            (0..manifest).map(|_| random_hash(rng)).collect::<Vec<_>>(),
        ),
    }
}

/// In-memory chain view for a fixed genesis and head.
#[derive(Debug, Clone)]
pub struct StaticChain {
    pub genesis: Hash,
    pub head: Hash,
    pub entropy: U256,
    pub fork_id: ForkId,
}

impl Default for StaticChain {
    fn default() -> Self {
        Self {
            genesis: Hash::repeat_byte(0x01),
            head: Hash::repeat_byte(0x02),
            entropy: U256::from(1u64) << 64,
            fork_id: ForkId::new([0xfc, 0x64, 0xec, 0x04], 0),
        }
    }
}

impl ChainInfoProvider for StaticChain {
    fn head_hash(&self) -> Hash {
        self.head
    }

    fn genesis_hash(&self) -> Hash {
        self.genesis
    }

    fn head_entropy(&self) -> U256 {
        self.entropy
    }

    fn fork_id(&self) -> ForkId {
        self.fork_id
    }
}

/// Accepts fork ids with a matching checksum.
#[derive(Debug, Clone, Copy)]
pub struct ChecksumFilter(pub [u8; 4]);

impl ForkFilter for ChecksumFilter {
    fn accepts(&self, fork_id: &ForkId) -> bool {
        fork_id.hash == self.0
    }
}

/// Status a peer on the same network would send.
pub fn peer_status(chain: &StaticChain, version: u32, network_id: u64) -> StatusPacket {
    StatusPacket {
        protocol_version: version,
        network_id,
        location: Location::default(),
        entropy: chain.entropy,
        head: Hash::repeat_byte(0x03),
        genesis: chain.genesis,
        fork_id: chain.fork_id,
    }
}
