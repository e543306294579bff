//! # Packet Catalogue
//!
//! Typed payloads for every message kind. Each payload is an immutable
//! record exposing its display name and wire kind through [`Packet`].
//!
//! ## Groups
//!
//! - **status**: handshake `StatusPacket`
//! - **chain**: header, body and single-block exchange, block propagation
//! - **txpool**: transaction broadcast and pooled-transaction exchange
//! - **state**: trie node data and receipts
//! - **etx**: pending cross-shard transaction sets and their rollups
//! - **raw**: pre-encoded response items

mod chain;
mod etx;
mod raw;
mod state;
mod status;
mod txpool;

pub use chain::*;
pub use etx::*;
pub use raw::RawList;
pub use state::*;
pub use status::StatusPacket;
pub use txpool::*;

use super::registry::MessageKind;

/// A typed protocol message payload.
pub trait Packet {
    /// Wire kind this payload travels under.
    const KIND: MessageKind;

    /// Name used for logging and metrics.
    fn name(&self) -> &'static str {
        Self::KIND.name()
    }

    fn kind(&self) -> MessageKind {
        Self::KIND
    }
}

/// Implements [`Packet`] for payload types sharing one kind.
macro_rules! impl_packet {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl $crate::domain::packets::Packet for $ty {
                const KIND: $crate::domain::registry::MessageKind =
                    $crate::domain::registry::MessageKind::$kind;
            }
        )+
    };
}

/// RLP codec for a newtype over `Vec<Item>`, encoded as a flat list.
macro_rules! impl_list_codec {
    ($ty:ident, $item:ty) => {
        impl rlp::Encodable for $ty {
            fn rlp_append(&self, s: &mut rlp::RlpStream) {
                s.append_list::<$item, _>(&self.0);
            }
        }

        impl rlp::Decodable for $ty {
            fn decode(rlp: &rlp::Rlp<'_>) -> Result<Self, rlp::DecoderError> {
                Ok(Self(rlp.as_list()?))
            }
        }

        impl From<Vec<$item>> for $ty {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl $ty {
            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }
    };
}

pub(crate) use impl_list_codec;
pub(crate) use impl_packet;
