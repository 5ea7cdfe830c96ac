//! Offline search for the hypothesis behind one observed digest.
//!
//! Devices have been seen writing the digest in host byte order, so the
//! target is searched both as logged and with its bytes swapped.

use crate::matcher::{ForensicMatcher, Match};
use std::fmt;
use strum_macros::Display;

/// How the observed digest was interpreted when it matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DigestEndian {
    #[strum(to_string = "Direct")]
    Direct,
    #[strum(to_string = "Byte-swapped")]
    Swapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackHit {
    pub endian: DigestEndian,
    /// Digest value that the hypothesis reproduces
    pub value: u32,
    pub hit: Match,
}

impl fmt::Display for CrackHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {:08X}): {}", self.endian, self.value, self.hit)
    }
}

/// Every hypothesis reproducing `target`, direct hits first
pub fn crack(matcher: &ForensicMatcher, target: u32, raw_challenge: &[u8]) -> Vec<CrackHit> {
    let mut hits = Vec::new();
    for (endian, value) in [
        (DigestEndian::Direct, target),
        (DigestEndian::Swapped, target.swap_bytes()),
    ] {
        // A palindromic digest would otherwise be reported twice
        if endian == DigestEndian::Swapped && value == target {
            continue;
        }
        hits.extend(
            matcher
                .find_all(value, raw_challenge)
                .into_iter()
                .map(|hit| CrackHit { endian, value, hit }),
        );
    }
    hits
}
