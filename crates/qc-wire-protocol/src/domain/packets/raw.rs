//! Pre-encoded response lists.
//!
//! A serving node usually reads bodies, receipts and pooled transactions
//! straight out of storage as RLP. `RawList` carries those bytes through
//! to the wire unchanged, and produces output identical to the structured
//! form of the same items.

use std::fmt;
use std::marker::PhantomData;

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// A list whose items are already RLP encoded.
pub struct RawList<T> {
    items: Vec<Vec<u8>>,
    _item: PhantomData<fn() -> T>,
}

impl<T> RawList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _item: PhantomData,
        }
    }

    /// Append an item that is already encoded.
    ///
    /// # Errors
    ///
    /// Rejects bytes that are not exactly one well-formed RLP item.
    pub fn push_raw(&mut self, bytes: Vec<u8>) -> Result<(), DecoderError> {
        let info = Rlp::new(&bytes).payload_info()?;
        if info.header_len + info.value_len != bytes.len() {
            return Err(DecoderError::RlpInconsistentLengthAndData);
        }
        self.items.push(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.items.iter().map(Vec::as_slice)
    }
}

impl<T: Encodable> RawList<T> {
    /// Encode and append a structured item.
    pub fn push(&mut self, item: &T) {
        self.items.push(rlp::encode(item).to_vec());
    }
}

impl<T: Decodable> RawList<T> {
    /// Decode every item into its structured form.
    pub fn decode_items(&self) -> Result<Vec<T>, DecoderError> {
        self.items.iter().map(|item| rlp::decode(item)).collect()
    }
}

impl<T> Default for RawList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RawList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> PartialEq for RawList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T> Eq for RawList<T> {}

impl<T> fmt::Debug for RawList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawList")
            .field("items", &self.items.len())
            .field("bytes", &self.items.iter().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl<T> Encodable for RawList<T> {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(self.items.len());
        for item in &self.items {
            s.append_raw(item, 1);
        }
    }
}

impl<T> Decodable for RawList<T> {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        if !rlp.is_list() {
            return Err(DecoderError::RlpExpectedToBeList);
        }
        // The iterator stops at the first malformed item, so the kept bytes
        // must cover the whole list payload.
        let items: Vec<Vec<u8>> = rlp.iter().map(|item| item.as_raw().to_vec()).collect();
        let consumed: usize = items.iter().map(Vec::len).sum();
        if consumed != rlp.payload_info()?.value_len {
            return Err(DecoderError::RlpInconsistentLengthAndData);
        }
        Ok(Self {
            items,
            _item: PhantomData,
        })
    }
}

impl<T: Encodable> From<&[T]> for RawList<T> {
    fn from(items: &[T]) -> Self {
        let mut list = Self::new();
        for item in items {
            list.push(item);
        }
        list
    }
}
