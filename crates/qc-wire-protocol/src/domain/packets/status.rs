//! Handshake status payload.

use primitive_types::U256;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use shared_types::codec::expect_list_len;
use shared_types::{ForkId, Hash, Location};

use super::impl_packet;

/// Chain information exchanged once per connection, before any other
/// message. All seven fields are mandatory and order-significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPacket {
    pub protocol_version: u32,
    /// Network identifier (mainnet=1, testnets otherwise).
    pub network_id: u64,
    /// Chain segment the sender serves.
    pub location: Location,
    /// Accumulated entropy of the sender's head.
    pub entropy: U256,
    pub head: Hash,
    /// MUST match for peers on the same network.
    pub genesis: Hash,
    pub fork_id: ForkId,
}

impl_packet!(StatusPacket => Status);

impl Encodable for StatusPacket {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(7);
        s.append(&self.protocol_version);
        s.append(&self.network_id);
        s.append(&self.location);
        s.append(&self.entropy);
        s.append(&self.head);
        s.append(&self.genesis);
        s.append(&self.fork_id);
    }
}

impl Decodable for StatusPacket {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 7)?;
        Ok(Self {
            protocol_version: rlp.val_at(0)?,
            network_id: rlp.val_at(1)?,
            location: rlp.val_at(2)?,
            entropy: rlp.val_at(3)?,
            head: rlp.val_at(4)?,
            genesis: rlp.val_at(5)?,
            fork_id: rlp.val_at(6)?,
        })
    }
}
