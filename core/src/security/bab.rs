// ## src/security/bab.rs

//! security/bab.rs
//! The Bundle Authentication Block: hop-by-hop symmetric authentication.
//!
//! One `authenticate` call wraps a bundle in a begin/end BAB pair tied
//! together by a correlator; the end block carries an HMAC over the
//! bundle's canonical form. A receiving hop verifies against its copy of
//! the shared key and strips the pair before forwarding. Pairs from
//! other keys may coexist in the same bundle and are never disturbed.

use std::collections::HashSet;
use std::fmt;

use subtle::ConstantTimeEq;
use tracing::{debug, trace};

use crate::bundle::{Block, Bundle};
use crate::constants::cs_flags;
use crate::sdnv;
use crate::security::block::{CiphersuiteId, ResultKind, SecurityBlock};
use crate::security::key::SecurityKey;
use crate::security::mac::KeyedDigest;
use crate::security::serializer::StrictSerializer;

/// A BAB block instance: the shared security-block shape plus block
/// processing flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleAuthenticationBlock {
    pub proc_flags: u64,
    pub security: SecurityBlock,
}

impl Default for BundleAuthenticationBlock {
    fn default() -> Self {
        Self {
            proc_flags: 0,
            security: SecurityBlock::new(CiphersuiteId::BabHmac),
        }
    }
}

impl BundleAuthenticationBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ciphersuite, if it is one this implementation knows.
    #[inline]
    pub fn ciphersuite(&self) -> Option<CiphersuiteId> {
        CiphersuiteId::try_from(self.security.ciphersuite_id).ok()
    }

    /// Encoded size of this block's security result TLV: a 1-byte kind
    /// tag, an SDNV length prefix sized for the digest, and the digest
    /// itself. Falls back to the mandatory suite's digest when the
    /// ciphersuite is foreign.
    pub fn security_result_encoded_size(&self) -> usize {
        let digest_len = self
            .ciphersuite()
            .unwrap_or(CiphersuiteId::BabHmac)
            .mac_algorithm()
            .digest_len();
        1 + sdnv::len(digest_len as u64) + digest_len
    }

    // -------------------------------------------------------------------
    // Lifecycle operations
    // -------------------------------------------------------------------

    /// Attach a fresh begin/end BAB pair authenticating `bundle` with
    /// `key`. Returns the pair's correlator. Block count grows by two.
    pub fn authenticate(bundle: &mut Bundle, key: &SecurityKey) -> u64 {
        let correlator = create_correlator(bundle);

        // The canonical form ignores BAB blocks, so the MAC over the
        // wrapped bundle equals the MAC over the bundle as it stands.
        let mac = Self::compute_mac(bundle, key, false, 0);

        let mut begin = BundleAuthenticationBlock::new();
        begin.security.set_correlator(correlator);
        if key.reference() != &bundle.source {
            begin.security.set_security_source(key.reference().clone());
        }
        let mut begin = Block::Authentication(begin);
        begin.set_discard_if_not_processed(true);
        bundle.push_front(begin);

        let mut end = BundleAuthenticationBlock::new();
        end.security.set_correlator(correlator);
        end.security
            .set_security_result(ResultKind::IntegritySignature, mac);
        let mut end = Block::Authentication(end);
        end.set_discard_if_not_processed(true);
        bundle.push_back(end);

        correlator
    }

    /// Verify `bundle` against `key`.
    ///
    /// Front-to-back scan: begin blocks whose effective security source
    /// matches the key feed the candidate-correlator set; result-bearing
    /// blocks only count when their correlator is already a candidate,
    /// so a forged end block without a legitimately-sourced begin block
    /// can never match. Foreign ciphersuites and other keys' pairs are
    /// skipped, not errors. Returns the first matching correlator.
    pub fn verify(bundle: &Bundle, key: &SecurityKey) -> Result<u64, SecurityError> {
        let mut candidates: HashSet<u64> = HashSet::new();
        let expected = Self::compute_mac(bundle, key, false, 0);

        for bab in bundle.babs() {
            if bab.security.has_flag(cs_flags::CONTAINS_SECURITY_RESULT) {
                let Some(correlator) = bab.security.correlator else {
                    trace!("skipping result-bearing BAB without correlator");
                    continue;
                };
                if !candidates.contains(&correlator) {
                    trace!(correlator, "skipping BAB result with unmatched correlator");
                    continue;
                }
                let stored = bab
                    .security
                    .security_result
                    .get(ResultKind::IntegritySignature)
                    .unwrap_or(&[]);
                if stored.ct_eq(&expected).into() {
                    return Ok(correlator);
                }
                debug!(
                    correlator,
                    stored = %hex::encode(stored),
                    "security mac does not match"
                );
            } else if bab.security.has_flag(cs_flags::CONTAINS_CORRELATOR) {
                // Only the mandatory suite matches the expected MAC
                // computed above; everything else is another node's
                // business.
                if bab.ciphersuite() != Some(CiphersuiteId::BabHmac) {
                    trace!(
                        ciphersuite = bab.security.ciphersuite_id,
                        "skipping BAB with unsupported ciphersuite"
                    );
                    continue;
                }
                if bab.security.effective_security_source(&bundle.source) != key.reference() {
                    continue;
                }
                if let Some(correlator) = bab.security.correlator {
                    candidates.insert(correlator);
                }
            }
        }

        Err(SecurityError::AuthenticationFailed)
    }

    /// Compute the MAC over `bundle`'s canonical form with `key`.
    ///
    /// The canonical form excludes every BAB security result, so the
    /// output does not depend on which block triggered the computation.
    /// `include_correlator` pins `correlator` into the canonical form
    /// for MACs bound to a planned pair before it is attached.
    pub fn compute_mac(
        bundle: &Bundle,
        key: &SecurityKey,
        include_correlator: bool,
        correlator: u64,
    ) -> Vec<u8> {
        let canonical = StrictSerializer::serialize(bundle, include_correlator, correlator);
        let mut digest = KeyedDigest::new(
            CiphersuiteId::BabHmac.mac_algorithm(),
            key.material(),
        );
        digest.update(&canonical);
        digest.finalize()
    }

    /// Verify, then remove the matched pair.
    ///
    /// Verification failure propagates unchanged and nothing is removed.
    /// Both blocks of the matched correlator go; other pairs stay.
    /// Returns the stripped correlator.
    pub fn strip(bundle: &mut Bundle, key: &SecurityKey) -> Result<u64, SecurityError> {
        let correlator = Self::verify(bundle, key)?;
        bundle.retain(|block| match block.as_bab() {
            Some(bab) => {
                !(bab.security.has_flag(cs_flags::CONTAINS_CORRELATOR)
                    && bab.security.correlator == Some(correlator))
            }
            None => true,
        });
        Ok(correlator)
    }

    /// Remove every BAB block unconditionally, valid or not.
    ///
    /// Returns the number of blocks removed. Never fails; meant for
    /// policies that drop hop-by-hop authentication regardless of trust.
    pub fn strip_all(bundle: &mut Bundle) -> usize {
        let before = bundle.len();
        bundle.retain(|block| !block.is_bab());
        before - bundle.len()
    }
}

/// Allocate a correlator unused by any BAB already in `bundle`.
fn create_correlator(bundle: &Bundle) -> u64 {
    let taken: HashSet<u64> = bundle.babs().filter_map(|b| b.security.correlator).collect();
    loop {
        let candidate: u64 = rand::random();
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SecurityError {
    /// No BAB in the bundle matched a candidate correlator for the key
    /// and carried a byte-exact MAC.
    AuthenticationFailed,
}

impl fmt::Display for SecurityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityError::AuthenticationFailed => write!(f, "bundle authentication failed"),
        }
    }
}

impl std::error::Error for SecurityError {}
