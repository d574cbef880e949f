// ## src/bundle/mod.rs

//! bundle
//! Minimal bundle container the security layer operates on.
//!
//! A bundle is an ordered, mutable sequence of typed blocks plus the
//! source and destination endpoints. Blocks are a closed enum, so a
//! type-filtered scan yields the right shape statically — there is no
//! runtime downcast to go wrong.

use std::fmt;

use crate::constants::{proc_flags, BUNDLE_AUTHENTICATION_BLOCK, PAYLOAD_BLOCK};
use crate::security::BundleAuthenticationBlock;

/// Endpoint identifier, e.g. `dtn://node-a`.
///
/// Compared byte-wise; two endpoints name the same principal iff their
/// URIs are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointId(String);

impl EndpointId {
    pub fn new(uri: impl Into<String>) -> Self {
        EndpointId(uri.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload block: application data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadBlock {
    pub proc_flags: u64,
    pub data: Vec<u8>,
}

impl PayloadBlock {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            proc_flags: 0,
            data: data.into(),
        }
    }
}

/// Opaque extension block of an arbitrary (non-security) type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionBlock {
    pub block_type: u8,
    pub proc_flags: u64,
    pub data: Vec<u8>,
}

impl ExtensionBlock {
    pub fn new(block_type: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            block_type,
            proc_flags: 0,
            data: data.into(),
        }
    }
}

/// One slot of a bundle's block sequence.
#[derive(Clone, Debug)]
pub enum Block {
    Payload(PayloadBlock),
    Extension(ExtensionBlock),
    Authentication(BundleAuthenticationBlock),
}

impl Block {
    /// Wire block type code.
    #[inline]
    pub fn block_type(&self) -> u8 {
        match self {
            Block::Payload(_) => PAYLOAD_BLOCK,
            Block::Extension(b) => b.block_type,
            Block::Authentication(_) => BUNDLE_AUTHENTICATION_BLOCK,
        }
    }

    /// Block processing flags.
    #[inline]
    pub fn proc_flags(&self) -> u64 {
        match self {
            Block::Payload(b) => b.proc_flags,
            Block::Extension(b) => b.proc_flags,
            Block::Authentication(b) => b.proc_flags,
        }
    }

    #[inline]
    pub fn is_bab(&self) -> bool {
        matches!(self, Block::Authentication(_))
    }

    /// Typed view, if this block is a BAB.
    #[inline]
    pub fn as_bab(&self) -> Option<&BundleAuthenticationBlock> {
        match self {
            Block::Authentication(bab) => Some(bab),
            _ => None,
        }
    }

    /// Mutable typed view, if this block is a BAB.
    #[inline]
    pub fn as_bab_mut(&mut self) -> Option<&mut BundleAuthenticationBlock> {
        match self {
            Block::Authentication(bab) => Some(bab),
            _ => None,
        }
    }

    /// Mark a block as "discard if this node cannot process it".
    pub fn set_discard_if_not_processed(&mut self, on: bool) {
        let flags = match self {
            Block::Payload(b) => &mut b.proc_flags,
            Block::Extension(b) => &mut b.proc_flags,
            Block::Authentication(b) => &mut b.proc_flags,
        };
        if on {
            *flags |= proc_flags::DISCARD_IF_NOT_PROCESSED;
        } else {
            *flags &= !proc_flags::DISCARD_IF_NOT_PROCESSED;
        }
    }
}

/// Ordered block sequence with a source identity.
#[derive(Clone, Debug)]
pub struct Bundle {
    pub source: EndpointId,
    pub destination: EndpointId,
    blocks: Vec<Block>,
}

impl Bundle {
    pub fn new(source: EndpointId, destination: EndpointId) -> Self {
        Self {
            source,
            destination,
            blocks: Vec::new(),
        }
    }

    /// Insert a block at the front of the sequence.
    pub fn push_front(&mut self, block: Block) {
        self.blocks.insert(0, block);
    }

    /// Append a block at the back of the sequence.
    pub fn push_back(&mut self, block: Block) {
        self.blocks.push(block);
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Front-to-back iterator over the BAB blocks.
    pub fn babs(&self) -> impl Iterator<Item = &BundleAuthenticationBlock> {
        self.blocks.iter().filter_map(Block::as_bab)
    }

    /// Keep only the blocks matching `pred`.
    ///
    /// This is the one removal primitive: callers decide what to drop
    /// first, then remove in a single pass, so there is no
    /// erase-while-iterating hazard.
    pub fn retain(&mut self, pred: impl FnMut(&Block) -> bool) {
        self.blocks.retain(pred);
    }
}
