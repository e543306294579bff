//! # Error Types
//!
//! Every failure the protocol core can surface, one variant per kind so the
//! transport layer can tell them apart. Nothing here is retried or silently
//! coerced into a default value.

use rlp::DecoderError;
use shared_types::{BlockError, ForkId, Hash, Location};
use thiserror::Error;

use super::registry::{MessageKind, ProtocolVersion};

/// Failures of the hash-or-number origin selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginError {
    /// Both the hash and the number were set.
    #[error("both origin hash ({hash:?}) and number ({number}) provided")]
    Ambiguous { hash: Hash, number: u64 },

    /// Encoded value is neither a 32-byte hash nor an integer of at most 8 bytes.
    #[error("invalid input size {0} for origin")]
    InvalidSize(usize),

    /// Underlying RLP is malformed.
    #[error("malformed origin: {0}")]
    Malformed(DecoderError),
}

/// Protocol-level errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    /// First message on a negotiating connection was not Status.
    #[error("no status message")]
    NoStatusMsg,

    /// Status received after the handshake completed.
    #[error("extra status message")]
    ExtraStatusMsg,

    /// Message exceeds the maximum allowed size.
    #[error("message too long: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// Malformed bytes for the declared kind.
    #[error("invalid message {kind}: {source}")]
    Decode {
        kind: MessageKind,
        source: DecoderError,
    },

    /// Code unknown or not implemented by the active version.
    #[error("invalid message code {code:#04x} for version {version}")]
    InvalidMessageCode { code: u64, version: u32 },

    /// Version not present in the registry.
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u32),

    /// Capabilities were exchanged again on a session that already agreed
    /// on a version.
    #[error("protocol version already negotiated: {0}")]
    AlreadyNegotiated(ProtocolVersion),

    /// Advertised version sets do not intersect.
    #[error("no common protocol version")]
    NoCommonVersion,

    #[error("protocol version mismatch: {theirs} (!= {ours})")]
    ProtocolVersionMismatch { ours: u32, theirs: u32 },

    #[error("network ID mismatch: {theirs} (!= {ours})")]
    NetworkIdMismatch { ours: u64, theirs: u64 },

    #[error("genesis mismatch: {theirs:?} (!= {ours:?})")]
    GenesisMismatch { ours: Hash, theirs: Hash },

    #[error("fork ID rejected: {0:?}")]
    ForkIdRejected(ForkId),

    #[error("location mismatch: {theirs:?} (!= {ours:?})")]
    LocationMismatch { ours: Location, theirs: Location },

    #[error(transparent)]
    Origin(#[from] OriginError),

    /// Request id presence does not match the negotiated version.
    #[error("{kind} envelope does not match {version}")]
    EnvelopeMismatch {
        kind: MessageKind,
        version: ProtocolVersion,
    },

    /// Block propagation payload failed its structural check.
    #[error("sanity check failed: {0}")]
    SanityCheck(#[from] BlockError),
}

impl WireError {
    /// Whether the connection itself can no longer be used.
    ///
    /// Negotiation and handshake failures leave the connection without an
    /// agreed dialect. Everything else is terminal for the message only and
    /// the caller decides on the peer.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoStatusMsg
                | Self::ExtraStatusMsg
                | Self::AlreadyNegotiated(_)
                | Self::UnsupportedVersion(_)
                | Self::NoCommonVersion
                | Self::ProtocolVersionMismatch { .. }
                | Self::NetworkIdMismatch { .. }
                | Self::GenesisMismatch { .. }
                | Self::ForkIdRejected(_)
                | Self::LocationMismatch { .. }
        )
    }
}
