//! # Quantum-Chain Wire Protocol Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Codec hot paths
//! │   └── qc_wire_codec.rs
//! │
//! └── integration/      # Cross-crate protocol flows
//!     └── wire_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # Integration flows only
//! cargo test -p qc-tests integration::
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod benchmarks;
pub mod fixtures;
