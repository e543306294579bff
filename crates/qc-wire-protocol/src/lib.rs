//! # Wire Protocol (qc-wire-protocol)
//!
//! The versioned peer-to-peer message protocol spoken between Quantum-Chain
//! nodes: message kinds and their wire codes, RLP payloads, request id
//! envelopes and the Status handshake.
//!
//! ## Architecture Role
//!
//! ```text
//! [Transport] --RawMessage--> [Wire Protocol] --Message--> [Handlers]
//!      ^                            |
//!      +-------- RawMessage --------+ <-------- Message ---------+
//! ```
//!
//! The transport owns connections and framing. This crate turns a
//! kind-tagged blob into a typed [`Message`] and back, and reports every
//! protocol violation as a distinct [`WireError`]. Dropping peers is the
//! caller's decision.
//!
//! ## Versions
//!
//! | Version | Messages | Request ids |
//! |---------|----------|-------------|
//! | eth/66  | 21       | yes         |
//! | eth/65  | 19       | no          |

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::{ConfigError, WireConfig};
pub use domain::*;
pub use ports::inbound::WireProtocolApi;
pub use ports::outbound::{ChainInfoProvider, ForkFilter};
pub use service::WireProtocolService;
