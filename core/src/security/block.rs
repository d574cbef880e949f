// ## src/security/block.rs

//! security/block.rs
//! Shared security-block shape and its byte-exact body codec.
//!
//! Every field after the ciphersuite id is optional and gated by a
//! presence bit in the ciphersuite flags. The setters keep flags and
//! fields in sync, so "present iff flag set" holds by construction and
//! the decoder only has to reject inconsistent input.

use std::fmt;

use num_enum::TryFromPrimitive;

use crate::bundle::EndpointId;
use crate::constants::{ciphersuite_ids, cs_flags, result_kinds};
use crate::sdnv::{self, SdnvError};
use crate::security::mac::MacAlgorithm;

/// Registered ciphersuites (wire registry).
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum CiphersuiteId {
    BabHmac = ciphersuite_ids::BAB_HMAC,
    BabHmacSha256 = ciphersuite_ids::BAB_HMAC_SHA256,
}

impl CiphersuiteId {
    pub fn verify(raw: u16) -> Result<(), BlockError> {
        match raw {
            x if x == CiphersuiteId::BabHmac as u16 => Ok(()),
            x if x == CiphersuiteId::BabHmacSha256 as u16 => Ok(()),
            _ => Err(BlockError::UnknownCiphersuite { raw }),
        }
    }

    /// Digest algorithm this suite MACs with.
    #[inline]
    pub fn mac_algorithm(self) -> MacAlgorithm {
        match self {
            CiphersuiteId::BabHmac => MacAlgorithm::HmacSha1,
            CiphersuiteId::BabHmacSha256 => MacAlgorithm::HmacSha256,
        }
    }
}

/// Result-kind tags inside a security result TLV sequence.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum ResultKind {
    IntegritySignature = result_kinds::INTEGRITY_SIGNATURE,
}

impl ResultKind {
    pub fn verify(raw: u8) -> Result<(), BlockError> {
        match raw {
            x if x == ResultKind::IntegritySignature as u8 => Ok(()),
            _ => Err(BlockError::UnknownResultKind { raw }),
        }
    }
}

/// Kind → opaque bytes mapping carried by result-bearing blocks.
///
/// Wire form is a TLV sequence: 1-byte kind tag, SDNV value length,
/// value bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecurityResult {
    entries: Vec<(ResultKind, Vec<u8>)>,
}

impl SecurityResult {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, kind: ResultKind) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v.as_slice())
    }

    /// Insert or replace the entry for `kind`.
    pub fn set(&mut self, kind: ResultKind, value: impl Into<Vec<u8>>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, v)) => *v = value,
            None => self.entries.push((kind, value)),
        }
    }

    /// Encoded length of the TLV sequence.
    pub fn encoded_len(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, v)| 1 + sdnv::len(v.len() as u64) + v.len())
            .sum()
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        for (kind, value) in &self.entries {
            out.push(*kind as u8);
            sdnv::encode_into(value.len() as u64, out);
            out.extend_from_slice(value);
        }
    }

    pub fn decode(mut input: &[u8]) -> Result<Self, BlockError> {
        let mut result = SecurityResult::default();
        while let [tag, rest @ ..] = input {
            let kind = ResultKind::try_from(*tag)
                .map_err(|_| BlockError::UnknownResultKind { raw: *tag })?;
            let (value, next) = take_field(rest)?;
            result.set(kind, value);
            input = next;
        }
        Ok(result)
    }
}

/// Fields common to every security block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityBlock {
    pub ciphersuite_id: u16,
    pub ciphersuite_flags: u64,
    pub correlator: Option<u64>,
    pub security_source: Option<EndpointId>,
    pub security_result: SecurityResult,
}

impl SecurityBlock {
    pub fn new(ciphersuite: CiphersuiteId) -> Self {
        Self {
            ciphersuite_id: ciphersuite as u16,
            ciphersuite_flags: 0,
            correlator: None,
            security_source: None,
            security_result: SecurityResult::default(),
        }
    }

    #[inline]
    pub fn has_flag(&self, bit: u64) -> bool {
        self.ciphersuite_flags & bit != 0
    }

    /// Sets the correlator and its presence flag.
    pub fn set_correlator(&mut self, correlator: u64) {
        self.correlator = Some(correlator);
        self.ciphersuite_flags |= cs_flags::CONTAINS_CORRELATOR;
    }

    /// Sets an explicit security source and its presence flag.
    pub fn set_security_source(&mut self, source: EndpointId) {
        self.security_source = Some(source);
        self.ciphersuite_flags |= cs_flags::CONTAINS_SECURITY_SOURCE;
    }

    /// Stores a security result entry and marks the block as carrying one.
    pub fn set_security_result(&mut self, kind: ResultKind, value: impl Into<Vec<u8>>) {
        self.security_result.set(kind, value);
        self.ciphersuite_flags |= cs_flags::CONTAINS_SECURITY_RESULT;
    }

    /// The identity that vouches for this block: the explicit security
    /// source if present, else the bundle's own source.
    pub fn effective_security_source<'a>(&'a self, bundle_source: &'a EndpointId) -> &'a EndpointId {
        self.security_source.as_ref().unwrap_or(bundle_source)
    }

    // -------------------------------------------------------------------
    // Wire codec
    // -------------------------------------------------------------------

    /// Encode the block body (everything after the generic block header).
    pub fn encode_body(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.security_result.encoded_len());
        sdnv::encode_into(self.ciphersuite_id as u64, &mut out);
        sdnv::encode_into(self.ciphersuite_flags, &mut out);
        if let Some(correlator) = self.correlator {
            sdnv::encode_into(correlator, &mut out);
        }
        if let Some(source) = &self.security_source {
            sdnv::encode_into(source.as_bytes().len() as u64, &mut out);
            out.extend_from_slice(source.as_bytes());
        }
        if self.has_flag(cs_flags::CONTAINS_SECURITY_RESULT) {
            sdnv::encode_into(self.security_result.encoded_len() as u64, &mut out);
            self.security_result.encode_into(&mut out);
        }
        out
    }

    /// Decode a block body, rejecting unknown ciphersuites, truncation
    /// and flag/field inconsistencies.
    pub fn decode_body(input: &[u8]) -> Result<Self, BlockError> {
        let (raw_id, used) = sdnv::decode(input)?;
        let raw_id = u16::try_from(raw_id)
            .map_err(|_| BlockError::UnknownCiphersuite { raw: u16::MAX })?;
        CiphersuiteId::verify(raw_id)?;
        let mut rest = &input[used..];

        let (flags, used) = sdnv::decode(rest)?;
        rest = &rest[used..];

        let mut block = SecurityBlock {
            ciphersuite_id: raw_id,
            ciphersuite_flags: flags,
            correlator: None,
            security_source: None,
            security_result: SecurityResult::default(),
        };

        if flags & cs_flags::CONTAINS_CORRELATOR != 0 {
            let (correlator, used) = sdnv::decode(rest)?;
            block.correlator = Some(correlator);
            rest = &rest[used..];
        }

        if flags & cs_flags::CONTAINS_SECURITY_SOURCE != 0 {
            let (bytes, next) = take_field(rest)?;
            let uri = std::str::from_utf8(bytes).map_err(|_| BlockError::InvalidEndpoint)?;
            block.security_source = Some(EndpointId::new(uri));
            rest = next;
        }

        if flags & cs_flags::CONTAINS_SECURITY_RESULT != 0 {
            let (bytes, next) = take_field(rest)?;
            block.security_result = SecurityResult::decode(bytes)?;
            if block.security_result.is_empty() {
                return Err(BlockError::MissingField { field: "security result" });
            }
            rest = next;
        }

        if !rest.is_empty() {
            return Err(BlockError::TrailingBytes { count: rest.len() });
        }
        Ok(block)
    }
}

/// Split a length-prefixed field off the front of `input`.
///
/// A length claiming more bytes than remain is truncation, never a
/// panic — the prefix is attacker-controlled.
fn take_field(input: &[u8]) -> Result<(&[u8], &[u8]), BlockError> {
    let (len, used) = sdnv::decode(input)?;
    let len = usize::try_from(len).map_err(|_| BlockError::Truncated)?;
    let tail = &input[used..];
    let field = tail.get(..len).ok_or(BlockError::Truncated)?;
    Ok((field, &tail[len..]))
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum BlockError {
    /// Input ended inside a field.
    Truncated,

    /// Unknown or unsupported ciphersuite.
    UnknownCiphersuite { raw: u16 },

    /// Unknown result-kind tag inside a security result.
    UnknownResultKind { raw: u8 },

    /// A presence flag was set but the field was empty or absent.
    MissingField { field: &'static str },

    /// Bytes left over after the last field.
    TrailingBytes { count: usize },

    /// Security source is not valid UTF-8.
    InvalidEndpoint,

    /// A numeric field's SDNV encoding exceeds 64 bits.
    SdnvOverflow,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BlockError::*;
        match self {
            Truncated => write!(f, "security block truncated"),
            UnknownCiphersuite { raw } => write!(
                f,
                "unknown ciphersuite: {}",
                enum_name_or_hex::<CiphersuiteId>(*raw)
            ),
            UnknownResultKind { raw } => write!(
                f,
                "unknown security result kind: 0x{:02x}",
                raw
            ),
            MissingField { field } => write!(f, "flagged field missing: {}", field),
            TrailingBytes { count } => write!(f, "{} trailing bytes after block body", count),
            InvalidEndpoint => write!(f, "security source is not valid UTF-8"),
            SdnvOverflow => write!(f, "SDNV in block body exceeds 64 bits"),
        }
    }
}

impl std::error::Error for BlockError {}

impl From<SdnvError> for BlockError {
    fn from(e: SdnvError) -> Self {
        match e {
            SdnvError::Truncated => BlockError::Truncated,
            SdnvError::Overflow => BlockError::SdnvOverflow,
        }
    }
}
