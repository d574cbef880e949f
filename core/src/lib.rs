//! bab-core
//!
//! Pure Rust hop-by-hop bundle authentication (BAB-HMAC).
//! No daemon, no transport, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod sdnv;

// Data model
pub mod bundle;

// Security blocks and the BAB lifecycle
pub mod security;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::bundle::{Block, Bundle, EndpointId, ExtensionBlock, PayloadBlock};
    pub use crate::security::{
        BundleAuthenticationBlock, CiphersuiteId, MacAlgorithm, ResultKind, SecurityError,
        SecurityKey,
    };
}
