//! key.rs
//! Symmetric key material bound to an endpoint identity.

use crate::bundle::EndpointId;

/// A shared key and the identity it is bound to.
///
/// Two keys act for the same principal iff their references are equal;
/// MAC correctness depends only on the raw material.
#[derive(Clone)]
pub struct SecurityKey {
    reference: EndpointId,
    material: Vec<u8>,
}

impl SecurityKey {
    pub fn new(reference: EndpointId, material: impl Into<Vec<u8>>) -> Self {
        Self {
            reference,
            material: material.into(),
        }
    }

    /// Identity this key is bound to.
    #[inline]
    pub fn reference(&self) -> &EndpointId {
        &self.reference
    }

    /// Raw key bytes.
    #[inline]
    pub fn material(&self) -> &[u8] {
        &self.material
    }
}

/// Key material never lands in logs or panics.
impl std::fmt::Debug for SecurityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityKey")
            .field("reference", &self.reference)
            .field("material", &format_args!("[{} bytes]", self.material.len()))
            .finish()
    }
}
