//! Pending external transactions and their rollups.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use shared_types::codec::expect_list_len;
use shared_types::{Hash, PendingEtxs, PendingEtxsRollup};

use super::impl_packet;

/// External transactions a block emitted that are still pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEtxsPacket {
    pub pending_etxs: PendingEtxs,
}

/// Request for the pending external transactions of one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOnePendingEtxsPacket {
    pub hash: Hash,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEtxsRollupPacket {
    pub rollup: PendingEtxsRollup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOnePendingEtxsRollupPacket {
    pub hash: Hash,
}

/// Codec for a single-field record encoded as a one-item list.
macro_rules! impl_single_field_codec {
    ($($ty:ident { $field:ident }),+ $(,)?) => {
        $(
            impl Encodable for $ty {
                fn rlp_append(&self, s: &mut RlpStream) {
                    s.begin_list(1);
                    s.append(&self.$field);
                }
            }

            impl Decodable for $ty {
                fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
                    expect_list_len(rlp, 1)?;
                    Ok(Self {
                        $field: rlp.val_at(0)?,
                    })
                }
            }
        )+
    };
}

impl_single_field_codec!(
    PendingEtxsPacket { pending_etxs },
    GetOnePendingEtxsPacket { hash },
    PendingEtxsRollupPacket { rollup },
    GetOnePendingEtxsRollupPacket { hash },
);

impl_packet!(
    PendingEtxsPacket => PendingEtxs,
    GetOnePendingEtxsPacket => GetOnePendingEtxs,
    PendingEtxsRollupPacket => PendingEtxsRollup,
    GetOnePendingEtxsRollupPacket => GetOnePendingEtxsRollup,
);
