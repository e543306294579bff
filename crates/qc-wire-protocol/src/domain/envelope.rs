//! # Request Envelope
//!
//! Under [`ProtocolVersion::Eth66`] every request and response travels as
//! `[request_id, packet]`. The requester picks the id, the responder echoes
//! it verbatim, and the requester uses it to match concurrent outstanding
//! requests. Under older versions the packet travels bare.
//!
//! The active version fixes the layout for the whole connection, so a
//! payload is never seen both wrapped and bare once negotiation is done.

use rlp::{Encodable, Rlp, RlpStream};
use shared_types::codec::expect_list_len;

use super::errors::WireError;
use super::registry::{MessageKind, ProtocolVersion};

/// A packet paired with its correlation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope<T> {
    pub request_id: u64,
    pub packet: T,
}

impl<T> RequestEnvelope<T> {
    pub fn new(request_id: u64, packet: T) -> Self {
        Self { request_id, packet }
    }

    pub fn into_parts(self) -> (u64, T) {
        (self.request_id, self.packet)
    }
}

impl<T: Encodable> Encodable for RequestEnvelope<T> {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.request_id);
        s.append(&self.packet);
    }
}

/// An exchange packet in the layout the negotiated version dictates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Versioned<T> {
    /// Bare packet (eth/65).
    Untagged(T),
    /// Packet preceded by a request id (eth/66).
    Tagged(RequestEnvelope<T>),
}

impl<T> Versioned<T> {
    /// Lay out `packet` for `version`. The id is dropped on versions that
    /// do not carry one.
    pub fn new(version: ProtocolVersion, request_id: u64, packet: T) -> Self {
        if version.uses_request_ids() {
            Self::Tagged(RequestEnvelope::new(request_id, packet))
        } else {
            Self::Untagged(packet)
        }
    }

    pub fn packet(&self) -> &T {
        match self {
            Self::Untagged(packet) => packet,
            Self::Tagged(envelope) => &envelope.packet,
        }
    }

    pub fn into_packet(self) -> T {
        match self {
            Self::Untagged(packet) => packet,
            Self::Tagged(envelope) => envelope.packet,
        }
    }

    pub fn request_id(&self) -> Option<u64> {
        match self {
            Self::Untagged(_) => None,
            Self::Tagged(envelope) => Some(envelope.request_id),
        }
    }

    /// Whether the layout is the one `version` expects.
    pub fn matches(&self, version: ProtocolVersion) -> bool {
        self.request_id().is_some() == version.uses_request_ids()
    }

    /// Decode the layout `version` expects, handing the inner packet to
    /// `decode`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Decode`] if the envelope itself is malformed,
    /// otherwise whatever `decode` reports for the packet.
    pub fn decode_with<F>(
        version: ProtocolVersion,
        rlp: &Rlp<'_>,
        kind: MessageKind,
        decode: F,
    ) -> Result<Self, WireError>
    where
        F: FnOnce(&Rlp<'_>) -> Result<T, WireError>,
    {
        if !version.uses_request_ids() {
            return decode(rlp).map(Self::Untagged);
        }

        let malformed = |source| WireError::Decode { kind, source };
        expect_list_len(rlp, 2).map_err(malformed)?;
        let request_id = rlp.val_at(0).map_err(malformed)?;
        let packet = decode(&rlp.at(1).map_err(malformed)?)?;
        Ok(Self::Tagged(RequestEnvelope::new(request_id, packet)))
    }
}

impl<T: Encodable> Encodable for Versioned<T> {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            Self::Untagged(packet) => packet.rlp_append(s),
            Self::Tagged(envelope) => envelope.rlp_append(s),
        }
    }
}
