//! # Shared Types Crate
//!
//! Chain model shared between the wire protocol and the subsystems that
//! ultimately consume its payloads (chain storage, txpool, sync).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every value type that crosses the wire is
//!   defined here, together with its RLP encoding.
//! - **Canonical Encoding**: `decode(encode(x)) == x` and re-encoding a
//!   decoded value yields the exact bytes received.
//! - **Shallow Validity Only**: The only validation living here is the
//!   block model's own structural [`Block::sanity_check`]. Consensus rules
//!   belong elsewhere.

pub mod codec;
pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
