// # Test suite for `security/serializer.rs`

// The canonical form must be deterministic, sensitive to every byte of
// the protected content, and blind to BAB blocks.

use bab_core::bundle::{Block, Bundle, EndpointId, ExtensionBlock, PayloadBlock};
use bab_core::security::{BundleAuthenticationBlock, SecurityKey, StrictSerializer};

fn sample_bundle() -> Bundle {
    let mut bundle = Bundle::new(
        EndpointId::new("dtn://node-a"),
        EndpointId::new("dtn://node-b"),
    );
    bundle.push_back(Block::Payload(PayloadBlock::new(b"hello moving world".to_vec())));
    bundle.push_back(Block::Extension(ExtensionBlock::new(0x0A, b"meta".to_vec())));
    bundle
}

// ## 1. Determinism

#[test]
fn same_bundle_same_bytes() {
    let bundle = sample_bundle();
    let a = StrictSerializer::serialize(&bundle, false, 0);
    let b = StrictSerializer::serialize(&bundle, false, 0);
    assert_eq!(a, b);
}

// ## 2. BAB blocks are invisible

#[test]
fn attaching_a_pair_leaves_canonical_bytes_unchanged() {
    let mut bundle = sample_bundle();
    let before = StrictSerializer::serialize(&bundle, false, 0);

    let key = SecurityKey::new(EndpointId::new("dtn://node-a"), b"k".to_vec());
    BundleAuthenticationBlock::authenticate(&mut bundle, &key);
    let after = StrictSerializer::serialize(&bundle, false, 0);

    assert_eq!(before, after);
}

// ## 3. Protected content is covered

#[test]
fn payload_change_changes_bytes() {
    let bundle = sample_bundle();
    let baseline = StrictSerializer::serialize(&bundle, false, 0);

    let mut tampered = sample_bundle();
    if let Block::Payload(payload) = &mut tampered.blocks_mut()[0] {
        payload.data[0] ^= 0x01;
    }
    assert_ne!(baseline, StrictSerializer::serialize(&tampered, false, 0));
}

#[test]
fn block_flags_and_endpoints_are_covered() {
    let baseline = StrictSerializer::serialize(&sample_bundle(), false, 0);

    let mut reflagged = sample_bundle();
    reflagged.blocks_mut()[1].set_discard_if_not_processed(true);
    assert_ne!(baseline, StrictSerializer::serialize(&reflagged, false, 0));

    let mut resourced = sample_bundle();
    resourced.source = EndpointId::new("dtn://node-c");
    assert_ne!(baseline, StrictSerializer::serialize(&resourced, false, 0));
}

#[test]
fn block_order_is_covered() {
    let mut swapped = Bundle::new(
        EndpointId::new("dtn://node-a"),
        EndpointId::new("dtn://node-b"),
    );
    swapped.push_back(Block::Extension(ExtensionBlock::new(0x0A, b"meta".to_vec())));
    swapped.push_back(Block::Payload(PayloadBlock::new(b"hello moving world".to_vec())));

    assert_ne!(
        StrictSerializer::serialize(&sample_bundle(), false, 0),
        StrictSerializer::serialize(&swapped, false, 0)
    );
}

// ## 4. Correlator pinning

#[test]
fn pinned_correlator_changes_bytes() {
    let bundle = sample_bundle();
    let unpinned = StrictSerializer::serialize(&bundle, false, 0);
    let pinned = StrictSerializer::serialize(&bundle, true, 7);
    assert_ne!(unpinned, pinned);

    // Deterministic per pin, distinct across pins.
    assert_eq!(pinned, StrictSerializer::serialize(&bundle, true, 7));
    assert_ne!(pinned, StrictSerializer::serialize(&bundle, true, 8));
}
