// ## src/security/serializer.rs

//! security/serializer.rs
//! Canonical ("strict") byte form of a bundle — the MAC input.
//!
//! The rule: the pinned correlator (when requested), the source and
//! destination endpoints, then every non-BAB block in sequence order as
//! type byte, processing flags and length-prefixed body. BAB-typed
//! blocks contribute nothing, so the canonical bytes are invariant under
//! attaching or stripping authentication pairs — a stored MAC stays
//! checkable after another key adds its own pair.

use crate::bundle::{Block, Bundle};
use crate::sdnv;

/// Domain tag: canonical forms of other serializers never collide.
const DOMAIN_TAG: &[u8; 4] = b"BAB1";

/// Canonical serializer for MAC computation.
pub struct StrictSerializer;

impl StrictSerializer {
    /// Produce the canonical bytes of `bundle`.
    ///
    /// `correlator` is pinned into the output iff `include_correlator` —
    /// used to bind a MAC to one planned pair before it is attached.
    pub fn serialize(bundle: &Bundle, include_correlator: bool, correlator: u64) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        out.extend_from_slice(DOMAIN_TAG);
        if include_correlator {
            sdnv::encode_into(correlator, &mut out);
        }

        Self::put_bytes(&mut out, bundle.source.as_bytes());
        Self::put_bytes(&mut out, bundle.destination.as_bytes());

        for block in bundle.blocks() {
            let body = match block {
                Block::Payload(b) => &b.data,
                Block::Extension(b) => &b.data,
                Block::Authentication(_) => continue,
            };
            out.push(block.block_type());
            sdnv::encode_into(block.proc_flags(), &mut out);
            Self::put_bytes(&mut out, body);
        }
        out
    }

    #[inline]
    fn put_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
        sdnv::encode_into(bytes.len() as u64, out);
        out.extend_from_slice(bytes);
    }
}
