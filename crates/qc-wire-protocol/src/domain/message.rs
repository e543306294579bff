//! # Message Codec
//!
//! Translates between the transport's kind-tagged blobs and typed
//! [`Message`] values.
//!
//! ## Decode Order
//!
//! 1. Size limit (before any parsing)
//! 2. Code lookup for the negotiated version
//! 3. Payload must be exactly one RLP item
//! 4. Envelope and packet decode for the version's layout
//!
//! Encoding is symmetric: the kind must be valid for the version, the
//! envelope must match the version, and the result must fit the limit.

use rlp::{Decodable, Encodable, Rlp, RlpStream};
use tracing::warn;

use super::envelope::Versioned;
use super::errors::WireError;
use super::packets::*;
use super::registry::{MessageKind, ProtocolVersion, MAX_MESSAGE_SIZE};

/// A kind-tagged blob as read from or written to the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub code: u64,
    pub payload: Vec<u8>,
}

impl RawMessage {
    pub fn new(code: u64, payload: Vec<u8>) -> Self {
        Self { code, payload }
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Declares [`Message`] from its broadcast and exchange variants, along
/// with the per-variant dispatch that does not depend on decoding.
macro_rules! messages {
    (
        broadcast { $($(#[$bmeta:meta])* $bvar:ident($bty:ty) => $bkind:ident,)+ }
        exchange { $($(#[$xmeta:meta])* $xvar:ident($xty:ty) => $xkind:ident,)+ }
    ) => {
        /// Every typed protocol message.
        ///
        /// Exchange variants carry a [`Versioned`] packet so the request id
        /// travels with it under eth/66. The `*Rlp` variants hold
        /// pre-encoded responses and are produced by serving code only;
        /// decoding always yields the structured form.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Message {
            $($(#[$bmeta])* $bvar($bty),)+
            $($(#[$xmeta])* $xvar(Versioned<$xty>),)+
        }

        impl Message {
            pub fn kind(&self) -> MessageKind {
                match self {
                    $(Self::$bvar(_) => MessageKind::$bkind,)+
                    $(Self::$xvar(_) => MessageKind::$xkind,)+
                }
            }

            /// Correlation id, present only on tagged exchange packets.
            pub fn request_id(&self) -> Option<u64> {
                match self {
                    $(Self::$bvar(_) => None,)+
                    $(Self::$xvar(packet) => packet.request_id(),)+
                }
            }

            /// Whether the envelope layout is the one `version` expects.
            pub fn matches_version(&self, version: ProtocolVersion) -> bool {
                match self {
                    $(Self::$bvar(_) => true,)+
                    $(Self::$xvar(packet) => packet.matches(version),)+
                }
            }
        }

        impl Encodable for Message {
            fn rlp_append(&self, s: &mut RlpStream) {
                match self {
                    $(Self::$bvar(packet) => packet.rlp_append(s),)+
                    $(Self::$xvar(packet) => packet.rlp_append(s),)+
                }
            }
        }
    };
}

messages! {
    broadcast {
        /// Handshake, first message on every connection.
        Status(StatusPacket) => Status,
        NewBlockHashes(NewBlockHashesPacket) => NewBlockHashes,
        Transactions(TransactionsPacket) => Transactions,
        NewBlock(NewBlockPacket) => NewBlock,
        NewPooledTransactionHashes(NewPooledTransactionHashesPacket) => NewPooledTransactionHashes,
    }
    exchange {
        GetBlockHeaders(GetBlockHeadersPacket) => GetBlockHeaders,
        BlockHeaders(BlockHeadersPacket) => BlockHeaders,
        GetBlockBodies(GetBlockBodiesPacket) => GetBlockBodies,
        BlockBodies(BlockBodiesPacket) => BlockBodies,
        BlockBodiesRlp(BlockBodiesRlpPacket) => BlockBodies,
        GetPooledTransactions(GetPooledTransactionsPacket) => GetPooledTransactions,
        PooledTransactions(PooledTransactionsPacket) => PooledTransactions,
        PooledTransactionsRlp(PooledTransactionsRlpPacket) => PooledTransactions,
        GetBlock(GetBlockPacket) => GetBlock,
        GetNodeData(GetNodeDataPacket) => GetNodeData,
        NodeData(NodeDataPacket) => NodeData,
        GetReceipts(GetReceiptsPacket) => GetReceipts,
        Receipts(ReceiptsPacket) => Receipts,
        ReceiptsRlp(ReceiptsRlpPacket) => Receipts,
        PendingEtxs(PendingEtxsPacket) => PendingEtxs,
        GetOnePendingEtxs(GetOnePendingEtxsPacket) => GetOnePendingEtxs,
        /// Sent under the name `PendingEtxsManifest`.
        PendingEtxsRollup(PendingEtxsRollupPacket) => PendingEtxsRollup,
        GetOnePendingEtxsRollup(GetOnePendingEtxsRollupPacket) => GetOnePendingEtxsRollup,
    }
}

/// Decoder for `T` reporting failures against `kind`.
fn typed<T: Decodable>(kind: MessageKind) -> impl Fn(&Rlp<'_>) -> Result<T, WireError> {
    move |rlp: &Rlp<'_>| rlp.as_val().map_err(|source| WireError::Decode { kind, source })
}

fn exchange<T: Decodable>(
    version: ProtocolVersion,
    rlp: &Rlp<'_>,
    kind: MessageKind,
) -> Result<Versioned<T>, WireError> {
    Versioned::decode_with(version, rlp, kind, typed(kind))
}

impl Message {
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Decode under the protocol-wide size cap.
    ///
    /// # Errors
    ///
    /// See [`Message::decode_with_limit`].
    pub fn decode(version: ProtocolVersion, raw: &RawMessage) -> Result<Self, WireError> {
        Self::decode_with_limit(version, raw, MAX_MESSAGE_SIZE)
    }

    /// Decode a blob received on a connection running `version`.
    ///
    /// # Errors
    ///
    /// - [`WireError::MessageTooLarge`] if the payload exceeds `limit`, or
    ///   [`MAX_MESSAGE_SIZE`] when `limit` is larger
    /// - [`WireError::InvalidMessageCode`] if the code is invalid for `version`
    /// - [`WireError::Decode`] if the bytes are malformed for the kind
    /// - [`WireError::Origin`] for an out-of-range header query origin
    pub fn decode_with_limit(
        version: ProtocolVersion,
        raw: &RawMessage,
        limit: usize,
    ) -> Result<Self, WireError> {
        let limit = limit.min(MAX_MESSAGE_SIZE);
        if raw.size() > limit {
            return Err(WireError::MessageTooLarge {
                size: raw.size(),
                max: limit,
            });
        }
        let kind = version.kind_for_code(raw.code)?;

        let rlp = Rlp::new(&raw.payload);
        let malformed = |source| WireError::Decode { kind, source };
        let info = rlp.payload_info().map_err(malformed)?;
        if info.header_len + info.value_len != raw.size() {
            return Err(malformed(rlp::DecoderError::RlpInconsistentLengthAndData));
        }

        let message = match kind {
            MessageKind::Status => Self::Status(typed(kind)(&rlp)?),
            MessageKind::NewBlockHashes => Self::NewBlockHashes(typed(kind)(&rlp)?),
            MessageKind::Transactions => Self::Transactions(typed(kind)(&rlp)?),
            MessageKind::NewBlock => Self::NewBlock(typed(kind)(&rlp)?),
            MessageKind::NewPooledTransactionHashes => {
                Self::NewPooledTransactionHashes(typed(kind)(&rlp)?)
            }
            MessageKind::GetBlockHeaders => Self::GetBlockHeaders(Versioned::decode_with(
                version,
                &rlp,
                kind,
                GetBlockHeadersPacket::decode_wire,
            )?),
            MessageKind::BlockHeaders => Self::BlockHeaders(exchange(version, &rlp, kind)?),
            MessageKind::GetBlockBodies => Self::GetBlockBodies(exchange(version, &rlp, kind)?),
            MessageKind::BlockBodies => Self::BlockBodies(exchange(version, &rlp, kind)?),
            MessageKind::GetPooledTransactions => {
                Self::GetPooledTransactions(exchange(version, &rlp, kind)?)
            }
            MessageKind::PooledTransactions => {
                Self::PooledTransactions(exchange(version, &rlp, kind)?)
            }
            MessageKind::GetBlock => Self::GetBlock(exchange(version, &rlp, kind)?),
            MessageKind::GetNodeData => Self::GetNodeData(exchange(version, &rlp, kind)?),
            MessageKind::NodeData => Self::NodeData(exchange(version, &rlp, kind)?),
            MessageKind::GetReceipts => Self::GetReceipts(exchange(version, &rlp, kind)?),
            MessageKind::Receipts => Self::Receipts(exchange(version, &rlp, kind)?),
            MessageKind::PendingEtxs => Self::PendingEtxs(exchange(version, &rlp, kind)?),
            MessageKind::GetOnePendingEtxs => {
                Self::GetOnePendingEtxs(exchange(version, &rlp, kind)?)
            }
            MessageKind::PendingEtxsRollup => {
                Self::PendingEtxsRollup(exchange(version, &rlp, kind)?)
            }
            MessageKind::GetOnePendingEtxsRollup => {
                Self::GetOnePendingEtxsRollup(exchange(version, &rlp, kind)?)
            }
        };
        Ok(message)
    }

    /// Encode under the protocol-wide size cap.
    ///
    /// # Errors
    ///
    /// See [`Message::encode_with_limit`].
    pub fn encode(&self, version: ProtocolVersion) -> Result<RawMessage, WireError> {
        self.encode_with_limit(version, MAX_MESSAGE_SIZE)
    }

    /// Encode for a connection running `version`.
    ///
    /// # Errors
    ///
    /// - [`WireError::InvalidMessageCode`] if the kind is not part of `version`
    /// - [`WireError::EnvelopeMismatch`] if the request id presence is wrong for `version`
    /// - [`WireError::MessageTooLarge`] if the encoding exceeds `limit`, or
    ///   [`MAX_MESSAGE_SIZE`] when `limit` is larger
    pub fn encode_with_limit(
        &self,
        version: ProtocolVersion,
        limit: usize,
    ) -> Result<RawMessage, WireError> {
        let limit = limit.min(MAX_MESSAGE_SIZE);
        let kind = self.kind();
        let code = u64::from(kind.code());
        if !kind.is_valid_for(version) {
            return Err(WireError::InvalidMessageCode {
                code,
                version: version.number(),
            });
        }
        if !self.matches_version(version) {
            warn!(
                kind = kind.name(),
                version = %version,
                request_id = ?self.request_id(),
                "Envelope layout does not match negotiated version"
            );
            return Err(WireError::EnvelopeMismatch { kind, version });
        }

        let payload = rlp::encode(self).to_vec();
        if payload.len() > limit {
            return Err(WireError::MessageTooLarge {
                size: payload.len(),
                max: limit,
            });
        }
        Ok(RawMessage::new(code, payload))
    }
}
