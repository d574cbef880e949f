//! constants.rs
//! Wire-level registries shared across the crate.
//!
//! Block type codes and ciphersuite numbers follow the Bundle Security
//! Protocol registry; flag bit positions are mirrored in `security::block`.

/// Block type code of the payload block.
pub const PAYLOAD_BLOCK: u8 = 0x01;

/// Block type code of the Bundle Authentication Block.
pub const BUNDLE_AUTHENTICATION_BLOCK: u8 = 0x02;

/// Ciphersuite identifiers (mirrored in `security::CiphersuiteId`).
pub mod ciphersuite_ids {
    /// BAB-HMAC (HMAC-SHA1), the mandatory hop-by-hop suite.
    pub const BAB_HMAC: u16 = 0x001;
    /// HMAC-SHA256 extension suite.
    pub const BAB_HMAC_SHA256: u16 = 0x005;
}

/// Ciphersuite flags: presence bits for the optional security-block fields.
pub mod cs_flags {
    pub const CONTAINS_SECURITY_RESULT: u64 = 0x01;
    pub const CONTAINS_CORRELATOR: u64 = 0x02;
    pub const CONTAINS_CIPHERSUITE_PARAMS: u64 = 0x04;
    pub const CONTAINS_SECURITY_DESTINATION: u64 = 0x08;
    pub const CONTAINS_SECURITY_SOURCE: u64 = 0x10;
}

/// Block processing flags (per-block, not per-bundle).
pub mod proc_flags {
    pub const REPLICATE_IN_EVERY_FRAGMENT: u64 = 0x01;
    pub const TRANSMIT_STATUS_IF_UNPROCESSABLE: u64 = 0x02;
    pub const DELETE_BUNDLE_IF_UNPROCESSABLE: u64 = 0x04;
    pub const LAST_BLOCK: u64 = 0x08;
    pub const DISCARD_IF_NOT_PROCESSED: u64 = 0x10;
    pub const FORWARDED_WITHOUT_PROCESSING: u64 = 0x20;
}

/// Result-kind tags carried inside a security result TLV sequence.
pub mod result_kinds {
    pub const INTEGRITY_SIGNATURE: u8 = 0x01;
}
