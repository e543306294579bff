//! Trie node data and receipts.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use shared_types::{Hash, Receipt};

use super::raw::RawList;
use super::{impl_list_codec, impl_packet};

/// Request for trie nodes by hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetNodeDataPacket(pub Vec<Hash>);

/// Opaque trie node blobs, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDataPacket(pub Vec<Vec<u8>>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetReceiptsPacket(pub Vec<Hash>);

/// All receipts of one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockReceipts(pub Vec<Receipt>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptsPacket(pub Vec<BlockReceipts>);

/// Receipts served from bytes already held in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptsRlpPacket(pub RawList<BlockReceipts>);

impl_list_codec!(GetNodeDataPacket, Hash);
impl_list_codec!(NodeDataPacket, Vec<u8>);
impl_list_codec!(GetReceiptsPacket, Hash);
impl_list_codec!(BlockReceipts, Receipt);
impl_list_codec!(ReceiptsPacket, BlockReceipts);

impl Encodable for ReceiptsRlpPacket {
    fn rlp_append(&self, s: &mut RlpStream) {
        self.0.rlp_append(s);
    }
}

impl Decodable for ReceiptsRlpPacket {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        RawList::decode(rlp).map(Self)
    }
}

impl_packet!(
    GetNodeDataPacket => GetNodeData,
    NodeDataPacket => NodeData,
    GetReceiptsPacket => GetReceipts,
    ReceiptsPacket => Receipts,
    ReceiptsRlpPacket => Receipts,
);
