//! # Message Registry
//!
//! Static tables mapping protocol versions to the number of message kinds
//! they implement, and message kinds to their one-byte wire codes.
//!
//! A code is valid for a version when it belongs to a catalogued kind and is
//! below that version's message count:
//!
//! ```text
//! version | count | valid codes
//! --------+-------+--------------------------------
//!    65   |  19   | 0x00..=0x0b, 0x0d..=0x12
//!    66   |  21   | 0x00..=0x0b, 0x0d..=0x14
//! ```
//!
//! Code `0x0c` is unassigned and never valid.

use std::fmt;

use super::errors::WireError;

/// Official short name of the protocol used during capability negotiation.
pub const PROTOCOL_NAME: &str = "quai";

/// Older protocol version (bare requests and responses).
pub const ETH65: u32 = 65;

/// Newer protocol version (requests and responses carry a request id).
pub const ETH66: u32 = 66;

/// Maximum cap on the size of a protocol message (10 MiB).
pub const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Number of implemented messages per protocol version, newest first.
const PROTOCOL_LENGTHS: [(u32, u64); 2] = [(ETH66, 21), (ETH65, 19)];

/// Number of message codes implemented by `version`.
///
/// # Errors
///
/// Returns [`WireError::UnsupportedVersion`] for any version not in the table.
pub fn protocol_length(version: u32) -> Result<u64, WireError> {
    PROTOCOL_LENGTHS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, len)| *len)
        .ok_or(WireError::UnsupportedVersion(version))
}

/// A supported protocol dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProtocolVersion {
    Eth65,
    Eth66,
}

impl ProtocolVersion {
    /// Supported versions in preference order (first is primary).
    pub const SUPPORTED: [ProtocolVersion; 2] = [ProtocolVersion::Eth66, ProtocolVersion::Eth65];

    /// Numeric value advertised on the wire.
    pub const fn number(self) -> u32 {
        match self {
            Self::Eth65 => ETH65,
            Self::Eth66 => ETH66,
        }
    }

    /// Number of message codes this version implements.
    pub const fn message_count(self) -> u64 {
        match self {
            Self::Eth65 => 19,
            Self::Eth66 => 21,
        }
    }

    /// Whether request/response packets carry a request id.
    pub const fn uses_request_ids(self) -> bool {
        matches!(self, Self::Eth66)
    }

    /// Resolve a wire code to a message kind valid in this version.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidMessageCode`] if the code is unassigned or
    /// beyond this version's message count.
    pub fn kind_for_code(self, code: u64) -> Result<MessageKind, WireError> {
        MessageKind::from_code(code)
            .filter(|kind| kind.is_valid_for(self))
            .ok_or(WireError::InvalidMessageCode {
                code,
                version: self.number(),
            })
    }
}

impl TryFrom<u32> for ProtocolVersion {
    type Error = WireError;

    fn try_from(version: u32) -> Result<Self, Self::Error> {
        match version {
            ETH65 => Ok(Self::Eth65),
            ETH66 => Ok(Self::Eth66),
            other => Err(WireError::UnsupportedVersion(other)),
        }
    }
}

impl From<ProtocolVersion> for u32 {
    fn from(version: ProtocolVersion) -> Self {
        version.number()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eth/{}", self.number())
    }
}

/// Message kinds and their stable wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MessageKind {
    Status = 0x00,
    NewBlockHashes = 0x01,
    Transactions = 0x02,
    GetBlockHeaders = 0x03,
    BlockHeaders = 0x04,
    GetBlockBodies = 0x05,
    BlockBodies = 0x06,
    NewBlock = 0x07,
    NewPooledTransactionHashes = 0x08,
    GetPooledTransactions = 0x09,
    PooledTransactions = 0x0a,
    GetBlock = 0x0b,
    GetNodeData = 0x0d,
    NodeData = 0x0e,
    GetReceipts = 0x0f,
    Receipts = 0x10,
    PendingEtxs = 0x11,
    GetOnePendingEtxs = 0x12,
    PendingEtxsRollup = 0x13,
    GetOnePendingEtxsRollup = 0x14,
}

impl MessageKind {
    /// Every catalogued kind, in code order.
    pub const ALL: [MessageKind; 20] = [
        Self::Status,
        Self::NewBlockHashes,
        Self::Transactions,
        Self::GetBlockHeaders,
        Self::BlockHeaders,
        Self::GetBlockBodies,
        Self::BlockBodies,
        Self::NewBlock,
        Self::NewPooledTransactionHashes,
        Self::GetPooledTransactions,
        Self::PooledTransactions,
        Self::GetBlock,
        Self::GetNodeData,
        Self::NodeData,
        Self::GetReceipts,
        Self::Receipts,
        Self::PendingEtxs,
        Self::GetOnePendingEtxs,
        Self::PendingEtxsRollup,
        Self::GetOnePendingEtxsRollup,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up the kind assigned to a wire code.
    pub fn from_code(code: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| u64::from(kind.code()) == code)
    }

    /// Display name used for logging and metrics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::NewBlockHashes => "NewBlockHashes",
            Self::Transactions => "Transactions",
            Self::GetBlockHeaders => "GetBlockHeaders",
            Self::BlockHeaders => "BlockHeaders",
            Self::GetBlockBodies => "GetBlockBodies",
            Self::BlockBodies => "BlockBodies",
            Self::NewBlock => "NewBlock",
            Self::NewPooledTransactionHashes => "NewPooledTransactionHashes",
            Self::GetPooledTransactions => "GetPooledTransactions",
            Self::PooledTransactions => "PooledTransactions",
            Self::GetBlock => "GetBlock",
            Self::GetNodeData => "GetNodeData",
            Self::NodeData => "NodeData",
            Self::GetReceipts => "GetReceipts",
            Self::Receipts => "Receipts",
            Self::PendingEtxs => "PendingEtxs",
            Self::GetOnePendingEtxs => "GetOnePendingEtxs",
            Self::PendingEtxsRollup => "PendingEtxsManifest",
            Self::GetOnePendingEtxsRollup => "GetOnePendingEtxsRollup",
        }
    }

    /// Whether this kind is one half of a request/response exchange, and so
    /// carries a request id under [`ProtocolVersion::Eth66`].
    pub const fn is_exchange(self) -> bool {
        !matches!(
            self,
            Self::Status
                | Self::NewBlockHashes
                | Self::Transactions
                | Self::NewBlock
                | Self::NewPooledTransactionHashes
        )
    }

    pub const fn is_valid_for(self, version: ProtocolVersion) -> bool {
        (self.code() as u64) < version.message_count()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.code())
    }
}
