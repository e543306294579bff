//! Transaction broadcast and pooled-transaction exchange.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use shared_types::{Hash, Transaction};

use super::raw::RawList;
use super::{impl_list_codec, impl_packet};

/// Transactions broadcast to a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionsPacket(pub Vec<Transaction>);

/// Hashes of transactions newly entered into the sender's pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPooledTransactionHashesPacket(pub Vec<Hash>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPooledTransactionsPacket(pub Vec<Hash>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PooledTransactionsPacket(pub Vec<Transaction>);

/// Pooled transactions served without re-encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PooledTransactionsRlpPacket(pub RawList<Transaction>);

impl_list_codec!(TransactionsPacket, Transaction);
impl_list_codec!(NewPooledTransactionHashesPacket, Hash);
impl_list_codec!(GetPooledTransactionsPacket, Hash);
impl_list_codec!(PooledTransactionsPacket, Transaction);

impl Encodable for PooledTransactionsRlpPacket {
    fn rlp_append(&self, s: &mut RlpStream) {
        self.0.rlp_append(s);
    }
}

impl Decodable for PooledTransactionsRlpPacket {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        RawList::decode(rlp).map(Self)
    }
}

impl_packet!(
    TransactionsPacket => Transactions,
    NewPooledTransactionHashesPacket => NewPooledTransactionHashes,
    GetPooledTransactionsPacket => GetPooledTransactions,
    PooledTransactionsPacket => PooledTransactions,
    PooledTransactionsRlpPacket => PooledTransactions,
);
