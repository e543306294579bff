//! # Quantum-Chain Benchmarks
//!
//! Performance benchmarks for the wire codec.
