// ## src/security/mac.rs

//! security/mac.rs
//! Keyed digests backing the BAB ciphersuites.
//!
//! HMAC-SHA1 is what the mandatory BAB-HMAC suite prescribes; HMAC-SHA256
//! backs the extension suite. The digest output is opaque — it is stored
//! and compared as bytes, never parsed.

use hmac::{Hmac, Mac};
use num_enum::TryFromPrimitive;
use sha1::Sha1;
use sha2::Sha256;

/// Digest algorithms the MAC layer supports (extensible).
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum MacAlgorithm {
    HmacSha1 = 0x0001,
    HmacSha256 = 0x0002,
}

impl MacAlgorithm {
    /// Digest output length in bytes.
    #[inline]
    pub fn digest_len(self) -> usize {
        match self {
            MacAlgorithm::HmacSha1 => 20,
            MacAlgorithm::HmacSha256 => 32,
        }
    }
}

/// Internal keyed-hash state.
enum DigestState {
    Sha1(Hmac<Sha1>),
    Sha256(Hmac<Sha256>),
}

/// Streaming keyed digest.
pub struct KeyedDigest {
    state: DigestState,
}

impl KeyedDigest {
    /// Create a digest keyed with `key` (HMAC accepts any key length).
    pub fn new(algorithm: MacAlgorithm, key: &[u8]) -> Self {
        let state = match algorithm {
            MacAlgorithm::HmacSha1 => {
                DigestState::Sha1(Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts keys of any length"))
            }
            MacAlgorithm::HmacSha256 => {
                DigestState::Sha256(Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length"))
            }
        };
        Self { state }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            DigestState::Sha1(h) => h.update(data),
            DigestState::Sha256(h) => h.update(data),
        }
    }

    /// Finalize and return the digest bytes.
    #[inline]
    pub fn finalize(self) -> Vec<u8> {
        match self.state {
            DigestState::Sha1(h) => h.finalize().into_bytes().to_vec(),
            DigestState::Sha256(h) => h.finalize().into_bytes().to_vec(),
        }
    }
}
