//! # Domain Layer for the Wire Protocol
//!
//! Pure protocol logic with no I/O. Every function is synchronous and
//! stateless apart from the read-only registry tables, so connection tasks
//! may call into it concurrently without synchronization.
//!
//! ## Contents
//!
//! - **registry**: versions, message counts and wire codes
//! - **origin**: the hash-or-number selector of header queries
//! - **packets**: typed payloads for every message kind
//! - **envelope**: request id wrapping under eth/66
//! - **message**: the kind-tagged blob codec
//! - **validation**: shallow checks before dispatch
//! - **handshake**: version negotiation and Status verification
//! - **errors**: `WireError` and `OriginError`

pub mod envelope;
pub mod errors;
pub mod handshake;
pub mod message;
pub mod origin;
pub mod packets;
pub mod registry;
pub mod validation;

pub use envelope::{RequestEnvelope, Versioned};
pub use errors::{OriginError, WireError};
pub use handshake::{negotiate, verify_status, ProtocolSession, SessionState};
pub use message::{Message, RawMessage};
pub use origin::{decode_origin, encode_origin, HashOrNumber};
pub use packets::*;
pub use registry::{
    protocol_length, MessageKind, ProtocolVersion, ETH65, ETH66, MAX_MESSAGE_SIZE, PROTOCOL_NAME,
};
pub use validation::sanity_check;
