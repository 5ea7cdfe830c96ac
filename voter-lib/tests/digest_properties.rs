//! Tests for the chained CRC-32 digest

mod common;

use common::*;

#[test]
fn test_known_good_vector() {
    // Frozen once against zlib's CRC-32 of "1234567890chuckpass"
    assert_eq!(digest(b"1234567890", b"chuckpass"), 0xA995_F7E2);
}

#[test]
fn test_deterministic() {
    let a = digest(b"433463776", b"bloodhound");
    let b = digest(b"433463776", b"bloodhound");
    assert_eq!(a, b);
    assert_eq!(a, 0x9283_1FF1);
}

#[test]
fn test_order_sensitive() {
    let pairs: &[(&[u8], &[u8])] = &[
        (b"1234567890", b"chuckpass"),
        (b"433463776", b"bloodhound"),
        (b"test", b"teensyvoter"),
    ];
    for (a, b) in pairs {
        assert_ne!(digest(a, b), digest(b, a), "digest should depend on order for {:?}/{:?}", a, b);
    }
}

#[test]
fn test_truncation_law_first_buffer() {
    let buffers: &[&[u8]] = &[b"433463776\0", b"4334\0junk!", b"\0abcdefghi", b"a\0\0\0\0\0\0\0\0\0"];
    for buf in buffers {
        let k = buf.iter().position(|&b| b == 0).unwrap();
        assert_eq!(
            digest(buf, b"bloodhound"),
            digest(&buf[..k], b"bloodhound"),
            "truncation at {} for {:02x?}",
            k,
            buf
        );
    }
}

#[test]
fn test_truncation_law_second_buffer() {
    assert_eq!(digest(b"1234567890", b"chuckpass\0"), digest(b"1234567890", b"chuckpass"));
    assert_eq!(digest(b"1234567890", b"\0chuckpass"), digest(b"1234567890", b""));
}

#[test]
fn test_truncation_to_empty() {
    // A zero-filled challenge behaves exactly like an empty one
    assert_eq!(digest(&[0u8; 10], b"chuckpass"), digest(b"", b"chuckpass"));
    assert_eq!(digest(b"", b"chuckpass"), 0xB10F_DDDD);
    assert_eq!(digest(&[0u8; 10], &[0u8; 10]), 0);
}
