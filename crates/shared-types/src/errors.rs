//! # Error Types
//!
//! Defines the structural failures of the chain model.

use thiserror::Error;

/// Reasons a block fails its structural sanity check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// Header difficulty does not fit the allowed bit width.
    #[error("too large block difficulty: bitlen {bits} (max {max})")]
    DifficultyTooLarge { bits: usize, max: usize },

    /// Header extra data exceeds the allowed size.
    #[error("too large block extradata: size {size} (max {max})")]
    ExtraDataTooLarge { size: usize, max: usize },
}
