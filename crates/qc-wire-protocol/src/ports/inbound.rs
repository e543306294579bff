//! Inbound ports (API) for the wire protocol.

use crate::domain::{Message, ProtocolVersion, RawMessage, StatusPacket, WireError};

/// Primary API used by the transport layer.
pub trait WireProtocolApi: Send + Sync {
    /// Decode and validate a blob received on a connection running `version`.
    fn decode_message(
        &self,
        version: ProtocolVersion,
        raw: &RawMessage,
    ) -> Result<Message, WireError>;

    /// Encode a message for a connection running `version`.
    fn encode_message(
        &self,
        version: ProtocolVersion,
        message: &Message,
    ) -> Result<RawMessage, WireError>;

    /// Build the Status we send after negotiating `version`.
    fn local_status(&self, version: ProtocolVersion) -> StatusPacket;

    /// Verify the Status a peer sent after negotiating `version`.
    fn accept_status(
        &self,
        version: ProtocolVersion,
        theirs: &StatusPacket,
    ) -> Result<(), WireError>;
}
