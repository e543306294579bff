//! Hexagonal ports: the API this crate offers and the chain information it
//! needs from the rest of the node.

pub mod inbound;
pub mod outbound;
