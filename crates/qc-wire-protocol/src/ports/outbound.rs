//! Outbound ports (SPI) for the wire protocol.

use primitive_types::U256;
use shared_types::{ForkId, Hash};

/// Local chain view used to fill in our Status.
pub trait ChainInfoProvider: Send + Sync {
    /// Hash of the current head block.
    fn head_hash(&self) -> Hash;

    fn genesis_hash(&self) -> Hash;

    /// Accumulated entropy of the head.
    fn head_entropy(&self) -> U256;

    /// Fork identifier at the current head (EIP-2124).
    fn fork_id(&self) -> ForkId;
}

/// Decides whether a remote fork identifier is compatible with our chain.
///
/// Implemented by the fork schedule owner; the protocol only asks.
pub trait ForkFilter: Send + Sync {
    fn accepts(&self, fork_id: &ForkId) -> bool;
}
