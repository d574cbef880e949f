// ## src/sdnv.rs

//! sdnv.rs
//! Self-Delimiting Numeric Values: the variable-length integer encoding
//! used for correlators, flags and length prefixes on the wire.
//!
//! Layout: 7 data bits per byte, most significant group first; the high
//! bit of every byte except the last is set. A `u64` fits in 10 bytes.

use std::fmt;

/// Largest encoded size of a `u64`.
pub const MAX_LEN: usize = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum SdnvError {
    /// Input ended before a byte with the continuation bit clear.
    Truncated,

    /// Encoded value does not fit in 64 bits.
    Overflow,
}

impl fmt::Display for SdnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdnvError::Truncated => write!(f, "truncated SDNV"),
            SdnvError::Overflow => write!(f, "SDNV value exceeds 64 bits"),
        }
    }
}

impl std::error::Error for SdnvError {}

/// Number of bytes `value` occupies once encoded.
#[inline]
pub fn len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    core::cmp::max(1, bits.div_ceil(7))
}

/// Append the encoding of `value` to `out`.
pub fn encode_into(value: u64, out: &mut Vec<u8>) {
    let n = len(value);
    for i in (0..n).rev() {
        let group = ((value >> (7 * i)) & 0x7F) as u8;
        if i == 0 {
            out.push(group);
        } else {
            out.push(group | 0x80);
        }
    }
}

/// Encode `value` into a fresh buffer.
#[inline]
pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(len(value));
    encode_into(value, &mut out);
    out
}

/// Decode one SDNV from the front of `input`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(input: &[u8]) -> Result<(u64, usize), SdnvError> {
    let mut value: u64 = 0;
    for (i, &byte) in input.iter().enumerate() {
        if i >= MAX_LEN {
            return Err(SdnvError::Overflow);
        }
        if value >> 57 != 0 {
            return Err(SdnvError::Overflow);
        }
        value = (value << 7) | (byte & 0x7F) as u64;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(SdnvError::Truncated)
}
