//! # RLP Encoding
//!
//! Canonical RLP encodings of the chain model. Every record encodes as a
//! list of its fields in declaration order; decoding rejects lists with the
//! wrong number of items.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::entities::{
    Block, BlockManifest, ForkId, Hash, Header, Location, Log, PendingEtxs, PendingEtxsRollup,
    Receipt, Transaction,
};

/// Fail unless `rlp` is a list of exactly `expected` items.
pub fn expect_list_len(rlp: &Rlp<'_>, expected: usize) -> Result<(), DecoderError> {
    if rlp.item_count()? != expected {
        return Err(DecoderError::RlpIncorrectListLen);
    }
    Ok(())
}

impl Encodable for Location {
    fn rlp_append(&self, s: &mut RlpStream) {
        // Writes in place; the enclosing `append` counts the item.
        self.0.rlp_append(s);
    }
}

impl Decodable for Location {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        Ok(Self(rlp.as_val()?))
    }
}

impl Encodable for Header {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(15);
        s.append(&self.parent_hash);
        s.append(&self.uncle_hash);
        s.append(&self.coinbase);
        s.append(&self.state_root);
        s.append(&self.tx_hash);
        s.append(&self.etx_hash);
        s.append(&self.receipt_hash);
        s.append(&self.difficulty);
        s.append(&self.number);
        s.append(&self.gas_limit);
        s.append(&self.gas_used);
        s.append(&self.time);
        s.append(&self.extra);
        s.append(&self.location);
        s.append(&self.nonce);
    }
}

impl Decodable for Header {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 15)?;
        Ok(Self {
            parent_hash: rlp.val_at(0)?,
            uncle_hash: rlp.val_at(1)?,
            coinbase: rlp.val_at(2)?,
            state_root: rlp.val_at(3)?,
            tx_hash: rlp.val_at(4)?,
            etx_hash: rlp.val_at(5)?,
            receipt_hash: rlp.val_at(6)?,
            difficulty: rlp.val_at(7)?,
            number: rlp.val_at(8)?,
            gas_limit: rlp.val_at(9)?,
            gas_used: rlp.val_at(10)?,
            time: rlp.val_at(11)?,
            extra: rlp.val_at(12)?,
            location: rlp.val_at(13)?,
            nonce: rlp.val_at(14)?,
        })
    }
}

impl Encodable for Transaction {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(9);
        s.append(&self.nonce);
        s.append(&self.gas_price);
        s.append(&self.gas);
        match &self.to {
            Some(to) => s.append(to),
            // Contract creation
            None => s.append_empty_data(),
        };
        s.append(&self.value);
        s.append(&self.data);
        s.append(&self.v);
        s.append(&self.r);
        s.append(&self.s);
    }
}

impl Decodable for Transaction {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 9)?;
        let to = rlp.at(3)?;
        let to = if to.is_data() && to.is_empty() {
            None
        } else {
            Some(to.as_val()?)
        };
        Ok(Self {
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas: rlp.val_at(2)?,
            to,
            value: rlp.val_at(4)?,
            data: rlp.val_at(5)?,
            v: rlp.val_at(6)?,
            r: rlp.val_at(7)?,
            s: rlp.val_at(8)?,
        })
    }
}

impl Encodable for BlockManifest {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append_list::<Hash, _>(&self.0);
    }
}

impl Decodable for BlockManifest {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        Ok(Self(rlp.as_list()?))
    }
}

impl Encodable for Block {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(5);
        s.append(&self.header);
        s.append_list::<Transaction, _>(&self.transactions);
        s.append_list::<Header, _>(&self.uncles);
        s.append_list::<Transaction, _>(&self.ext_transactions);
        s.append(&self.sub_manifest);
    }
}

impl Decodable for Block {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 5)?;
        Ok(Self {
            header: rlp.val_at(0)?,
            transactions: rlp.list_at(1)?,
            uncles: rlp.list_at(2)?,
            ext_transactions: rlp.list_at(3)?,
            sub_manifest: rlp.val_at(4)?,
        })
    }
}

impl Encodable for Log {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.address);
        s.append_list::<Hash, _>(&self.topics);
        s.append(&self.data);
    }
}

impl Decodable for Log {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 3)?;
        Ok(Self {
            address: rlp.val_at(0)?,
            topics: rlp.list_at(1)?,
            data: rlp.val_at(2)?,
        })
    }
}

impl Encodable for Receipt {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.status);
        s.append(&self.cumulative_gas_used);
        s.append_list::<Log, _>(&self.logs);
    }
}

impl Decodable for Receipt {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 3)?;
        Ok(Self {
            status: rlp.val_at(0)?,
            cumulative_gas_used: rlp.val_at(1)?,
            logs: rlp.list_at(2)?,
        })
    }
}

impl Encodable for PendingEtxs {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.header);
        s.append_list::<Transaction, _>(&self.etxs);
    }
}

impl Decodable for PendingEtxs {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 2)?;
        Ok(Self {
            header: rlp.val_at(0)?,
            etxs: rlp.list_at(1)?,
        })
    }
}

impl Encodable for PendingEtxsRollup {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.header);
        s.append(&self.manifest);
    }
}

impl Decodable for PendingEtxsRollup {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 2)?;
        Ok(Self {
            header: rlp.val_at(0)?,
            manifest: rlp.val_at(1)?,
        })
    }
}

impl Encodable for ForkId {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.hash.to_vec());
        s.append(&self.next);
    }
}

impl Decodable for ForkId {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        expect_list_len(rlp, 2)?;
        let hash: Vec<u8> = rlp.val_at(0)?;
        let hash: [u8; 4] = hash
            .as_slice()
            .try_into()
            .map_err(|_| DecoderError::Custom("fork hash must be 4 bytes"))?;
        Ok(Self {
            hash,
            next: rlp.val_at(1)?,
        })
    }
}
