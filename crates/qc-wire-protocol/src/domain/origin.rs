//! # Origin Selector
//!
//! The starting block of a header query: either an exact block hash or a
//! block height. The wire form carries no type tag; the decoder picks the
//! variant from the encoded size.
//!
//! ```text
//! size == 32  -> Hash
//! size <= 8   -> Number
//! otherwise   -> InvalidSize
//! ```

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use shared_types::Hash;

use super::errors::OriginError;

/// Width of an encoded block hash.
pub const HASH_SIZE: usize = 32;

/// Maximum width of an encoded block number.
pub const MAX_NUMBER_SIZE: usize = 8;

/// Reported through [`DecoderError::Custom`] when the generic RLP path
/// meets an origin of the wrong width.
pub const INVALID_ORIGIN_SIZE: &str = "invalid input size for origin";

/// Block from which to retrieve headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashOrNumber {
    Hash(Hash),
    Number(u64),
}

impl HashOrNumber {
    /// Build a selector from the flat (hash, number) pair, where a zero
    /// value marks the unset half.
    ///
    /// # Errors
    ///
    /// Returns [`OriginError::Ambiguous`] when both halves are set.
    pub fn from_parts(hash: Hash, number: u64) -> Result<Self, OriginError> {
        if hash.is_zero() {
            return Ok(Self::Number(number));
        }
        if number != 0 {
            return Err(OriginError::Ambiguous { hash, number });
        }
        Ok(Self::Hash(hash))
    }

    /// Flatten into (hash, number) with the unset half zeroed.
    pub fn into_parts(self) -> (Hash, u64) {
        match self {
            Self::Hash(hash) => (hash, 0),
            Self::Number(number) => (Hash::zero(), number),
        }
    }

    /// Decode with a precise error for out-of-range sizes.
    pub fn decode_origin(rlp: &Rlp<'_>) -> Result<Self, OriginError> {
        if !rlp.is_data() {
            return Err(OriginError::Malformed(DecoderError::RlpExpectedToBeData));
        }
        let size = rlp.payload_info().map_err(OriginError::Malformed)?.value_len;
        match size {
            HASH_SIZE => rlp.as_val().map(Self::Hash).map_err(OriginError::Malformed),
            s if s <= MAX_NUMBER_SIZE => {
                rlp.as_val().map(Self::Number).map_err(OriginError::Malformed)
            }
            other => Err(OriginError::InvalidSize(other)),
        }
    }
}

impl From<Hash> for HashOrNumber {
    fn from(hash: Hash) -> Self {
        Self::Hash(hash)
    }
}

impl From<u64> for HashOrNumber {
    fn from(number: u64) -> Self {
        Self::Number(number)
    }
}

impl Encodable for HashOrNumber {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            // A zero hash is the unset marker, so it travels as number 0.
            Self::Hash(hash) if hash.is_zero() => 0u64.rlp_append(s),
            Self::Hash(hash) => hash.rlp_append(s),
            Self::Number(number) => number.rlp_append(s),
        }
    }
}

impl Decodable for HashOrNumber {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        Self::decode_origin(rlp).map_err(|err| match err {
            OriginError::Malformed(inner) => inner,
            _ => DecoderError::Custom(INVALID_ORIGIN_SIZE),
        })
    }
}

/// Encode a flat (hash, number) pair as an origin selector.
///
/// # Errors
///
/// Returns [`OriginError::Ambiguous`] when both halves are non-zero.
pub fn encode_origin(hash: Hash, number: u64) -> Result<Vec<u8>, OriginError> {
    let origin = HashOrNumber::from_parts(hash, number)?;
    Ok(rlp::encode(&origin).to_vec())
}

/// Decode an origin selector into the flat (hash, number) pair.
pub fn decode_origin(bytes: &[u8]) -> Result<(Hash, u64), OriginError> {
    HashOrNumber::decode_origin(&Rlp::new(bytes)).map(HashOrNumber::into_parts)
}
