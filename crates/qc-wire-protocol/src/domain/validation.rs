//! # Validation Hooks
//!
//! Shallow structural checks run on inbound payloads before they are handed
//! to message handlers. Consensus validation lives elsewhere; a failure here
//! only tells the transport to discard the message and penalize the peer.

use super::errors::WireError;
use super::message::Message;

/// Run the protocol-layer check for `message`, if its kind has one.
///
/// Only block propagation is checked, by delegating to the block model's
/// own sanity rule.
pub fn sanity_check(message: &Message) -> Result<(), WireError> {
    match message {
        Message::NewBlock(packet) => packet.sanity_check(),
        _ => Ok(()),
    }
}
