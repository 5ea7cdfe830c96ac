//! Chained CRC-32 digest used by the voter protocol.
//!
//! The embedded firmware runs a software CRC-32 table over two C strings
//! back to back, carrying the register from the first into the second. The
//! result is the IEEE 802.3 CRC-32 of the concatenation, which is exactly what
//! `crc32fast` produces when the second pass is seeded with the first result.
//!
//! Both buffers are cut at their first NUL byte before hashing, since the
//! firmware only ever sees the string portion of its fixed-size arrays.

use crc32fast::Hasher;

/// Compute the voter digest over `first` followed by `second`.
pub fn digest(first: &[u8], second: &[u8]) -> u32 {
    let intermediate = crc32(c_str(first), 0);
    crc32(c_str(second), intermediate)
}

/// Truncate a buffer at its first NUL byte, if any.
pub fn c_str(buf: &[u8]) -> &[u8] {
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..len]
}

fn crc32(data: &[u8], initial: u32) -> u32 {
    let mut hasher = Hasher::new_with_initial(initial);
    hasher.update(data);
    hasher.finalize()
}
