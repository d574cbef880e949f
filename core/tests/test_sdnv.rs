// # Test suite for `sdnv.rs`

// Known vectors, boundary values, malformed input, and a round-trip
// property over the full u64 range.

use bab_core::sdnv::{self, SdnvError};

use proptest::prelude::*;

// ## 1. Known vectors

#[test]
fn encodes_known_vectors() {
    assert_eq!(sdnv::encode(0), vec![0x00]);
    assert_eq!(sdnv::encode(127), vec![0x7F]);
    assert_eq!(sdnv::encode(128), vec![0x81, 0x00]);
    assert_eq!(sdnv::encode(300), vec![0x82, 0x2C]);
}

#[test]
fn decodes_known_vectors() {
    assert_eq!(sdnv::decode(&[0x00]).unwrap(), (0, 1));
    assert_eq!(sdnv::decode(&[0x7F]).unwrap(), (127, 1));
    assert_eq!(sdnv::decode(&[0x81, 0x00]).unwrap(), (128, 2));
    assert_eq!(sdnv::decode(&[0x82, 0x2C]).unwrap(), (300, 2));
}

// ## 2. Boundary values

#[test]
fn u64_max_round_trips_in_ten_bytes() {
    let encoded = sdnv::encode(u64::MAX);
    assert_eq!(encoded.len(), sdnv::MAX_LEN);
    assert_eq!(sdnv::decode(&encoded).unwrap(), (u64::MAX, sdnv::MAX_LEN));
}

#[test]
fn len_matches_encoded_size() {
    for value in [0, 1, 127, 128, 16383, 16384, u64::MAX / 2, u64::MAX] {
        assert_eq!(sdnv::len(value), sdnv::encode(value).len(), "value {}", value);
    }
}

// ## 3. Malformed input

#[test]
fn truncated_input_rejected() {
    assert_eq!(sdnv::decode(&[]), Err(SdnvError::Truncated));
    assert_eq!(sdnv::decode(&[0x81]), Err(SdnvError::Truncated));
    assert_eq!(sdnv::decode(&[0xFF, 0xFF]), Err(SdnvError::Truncated));
}

#[test]
fn oversized_value_rejected() {
    // Eleven continuation groups can never fit in 64 bits.
    let overlong = [0xFFu8; 11];
    assert_eq!(sdnv::decode(&overlong), Err(SdnvError::Overflow));

    // Ten groups whose leading bits spill past bit 63.
    let mut spill = vec![0xFFu8; 9];
    spill.push(0x7F);
    assert_eq!(sdnv::decode(&spill), Err(SdnvError::Overflow));
}

// ## 4. Decode consumes exactly one value

#[test]
fn decode_reports_consumed_bytes() {
    let mut buf = sdnv::encode(300);
    buf.extend_from_slice(&[0xAA, 0xBB]);
    let (value, used) = sdnv::decode(&buf).unwrap();
    assert_eq!(value, 300);
    assert_eq!(used, 2);
}

// ## 5. Property: encode/decode round trip

proptest! {
    #[test]
    fn round_trips_any_u64(value in any::<u64>()) {
        let encoded = sdnv::encode(value);
        prop_assert_eq!(sdnv::decode(&encoded).unwrap(), (value, encoded.len()));
    }
}
