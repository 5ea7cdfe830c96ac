//! Forensic digest matcher.
//!
//! The device's password and the order in which it chains challenge and
//! password are both unknown, and an embedded client may fall back to some
//! default challenge when its own is unset. The matcher brute-forces the small
//! space of (password, challenge, ordering) hypotheses against an observed
//! digest.
//!
//! # Search order
//!
//! Passwords form the outer loop (known clients in declaration order, then the
//! host password), challenges the inner loop:
//!
//! 1. `ServerChall`: the session's own challenge
//! 2. `ClientChall`: the raw challenge field of the received frame
//! 3. `ZeroChall`: ten zero bytes
//! 4. `EmptyChall`: an empty string
//! 5. `SpaceChall`: ten spaces
//!
//! Extra challenges added with [`ForensicMatcher::with_extra_challenges`] (a
//! device's previous challenge, say) follow the built-in five.
//!
//! For each pair the normal order `digest(challenge, password)` is tried before
//! the swapped order `digest(password, challenge)`.
//!
//! # Ambiguity
//!
//! CRC-32 is not collision-free, and several hypotheses are equivalent after
//! NUL truncation (`ZeroChall` and `EmptyChall` both hash as empty). A match is
//! therefore a plausible explanation of the digest, never proof of the
//! password. [`ForensicMatcher::find_all`] lists every collision when that
//! matters.

use crate::constants::{CHALLENGE_LEN, HOST_PASSWORD_LABEL, KNOWN_CLIENTS, REFERENCE_CLIENT};
use crate::digest::digest;
use bytes::Bytes;
use std::fmt;
use strum_macros::Display;

const ZERO_CHALLENGE: [u8; CHALLENGE_LEN] = [0; CHALLENGE_LEN];
const SPACE_CHALLENGE: [u8; CHALLENGE_LEN] = [b' '; CHALLENGE_LEN];

/// A named password hypothesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePassword {
    pub name: String,
    pub password: Bytes,
}

impl CandidatePassword {
    pub fn new(name: impl Into<String>, password: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            password: Bytes::copy_from_slice(password.as_ref()),
        }
    }

    /// This password followed by its mistyped forms: lowercase, uppercase,
    /// capitalized, and with a trailing or leading space. Forms identical to
    /// an earlier one are left out.
    pub fn variants(&self) -> Vec<CandidatePassword> {
        let base = self.password.as_ref();
        let mut capitalized = base.to_ascii_lowercase();
        if let Some(first) = capitalized.first_mut() {
            first.make_ascii_uppercase();
        }
        let forms: [(&str, Vec<u8>); 5] = [
            ("lower", base.to_ascii_lowercase()),
            ("upper", base.to_ascii_uppercase()),
            ("capitalized", capitalized),
            ("trailing space", [base, &b" "[..]].concat()),
            ("leading space", [&b" "[..], base].concat()),
        ];

        let mut out = vec![self.clone()];
        for (form, password) in forms {
            if out.iter().any(|c| c.password.as_ref() == password.as_slice()) {
                continue;
            }
            out.push(CandidatePassword::new(format!("{} ({})", self.name, form), password));
        }
        out
    }
}

/// A named challenge hypothesis, borrowed for the duration of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateChallenge<'a> {
    pub name: &'a str,
    pub bytes: &'a [u8],
}

/// A caller-supplied challenge hypothesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraChallenge {
    pub name: String,
    pub bytes: Bytes,
}

impl ExtraChallenge {
    pub fn new(name: impl Into<String>, bytes: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            bytes: Bytes::copy_from_slice(bytes.as_ref()),
        }
    }
}

/// Which buffer the checksum was chained over first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DigestOrder {
    /// `digest(challenge, password)`
    #[strum(to_string = "Normal Order")]
    Normal,
    /// `digest(password, challenge)`
    #[strum(to_string = "Swapped Order")]
    Swapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub client_name: String,
    pub challenge_name: String,
    pub ordering: DigestOrder,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordering {
            DigestOrder::Normal => write!(
                f,
                "Client '{}' using {} + Pwd ({})",
                self.client_name, self.challenge_name, self.ordering
            ),
            DigestOrder::Swapped => write!(
                f,
                "Client '{}' using Pwd + {} ({})",
                self.client_name, self.challenge_name, self.ordering
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Found(Match),
    NotFound,
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found(_))
    }
}

/// Read-only candidate tables plus the session's server challenge
#[derive(Debug, Clone)]
pub struct ForensicMatcher {
    passwords: Vec<CandidatePassword>,
    server_challenge: Bytes,
    extra_challenges: Vec<ExtraChallenge>,
}

impl ForensicMatcher {
    /// Build a matcher over `clients` followed by the host password
    pub fn new(clients: Vec<CandidatePassword>, host_password: &[u8], server_challenge: &[u8]) -> Self {
        let mut passwords = clients;
        passwords.push(CandidatePassword::new(HOST_PASSWORD_LABEL, host_password));
        Self {
            passwords,
            server_challenge: Bytes::copy_from_slice(server_challenge),
            extra_challenges: Vec::new(),
        }
    }

    /// Search `extras` after the built-in challenges
    pub fn with_extra_challenges(mut self, extras: Vec<ExtraChallenge>) -> Self {
        self.extra_challenges.extend(extras);
        self
    }

    /// Replace every password with itself followed by its variants
    pub fn with_password_variants(mut self) -> Self {
        self.passwords = self.passwords.iter().flat_map(CandidatePassword::variants).collect();
        self
    }

    /// Build a matcher over the built-in known-client table
    pub fn with_known_clients(host_password: &[u8], server_challenge: &[u8]) -> Self {
        Self::new(known_clients(), host_password, server_challenge)
    }

    pub fn passwords(&self) -> &[CandidatePassword] {
        &self.passwords
    }

    pub fn server_challenge(&self) -> &[u8] {
        &self.server_challenge
    }

    /// Challenge hypotheses for a frame carrying `raw_challenge`
    pub fn challenges<'a>(&'a self, raw_challenge: &'a [u8]) -> Vec<CandidateChallenge<'a>> {
        let builtin = [
            CandidateChallenge {
                name: "ServerChall",
                bytes: &self.server_challenge,
            },
            CandidateChallenge {
                name: "ClientChall",
                bytes: raw_challenge,
            },
            CandidateChallenge {
                name: "ZeroChall",
                bytes: &ZERO_CHALLENGE,
            },
            CandidateChallenge {
                name: "EmptyChall",
                bytes: &[],
            },
            CandidateChallenge {
                name: "SpaceChall",
                bytes: &SPACE_CHALLENGE,
            },
        ];
        let extras = self.extra_challenges.iter().map(|extra| CandidateChallenge {
            name: &extra.name,
            bytes: &extra.bytes,
        });
        builtin.into_iter().chain(extras).collect()
    }

    /// First hypothesis reproducing `received`, in search order
    pub fn find_match(&self, received: u32, raw_challenge: &[u8]) -> MatchResult {
        match self.matches(received, raw_challenge).next() {
            Some(m) => MatchResult::Found(m),
            None => MatchResult::NotFound,
        }
    }

    /// Every hypothesis reproducing `received`, in search order
    pub fn find_all(&self, received: u32, raw_challenge: &[u8]) -> Vec<Match> {
        self.matches(received, raw_challenge).collect()
    }

    fn matches<'a>(&'a self, received: u32, raw_challenge: &'a [u8]) -> impl Iterator<Item = Match> + 'a {
        self.passwords.iter().flat_map(move |candidate| {
            self.challenges(raw_challenge).into_iter().flat_map(move |challenge| {
                let password = candidate.password.as_ref();
                let normal = (digest(challenge.bytes, password) == received).then_some(DigestOrder::Normal);
                let swapped = (digest(password, challenge.bytes) == received).then_some(DigestOrder::Swapped);
                normal.into_iter().chain(swapped).map(move |ordering| Match {
                    client_name: candidate.name.clone(),
                    challenge_name: challenge.name.to_string(),
                    ordering,
                })
            })
        })
    }

    /// Expected normal-order digests of the reference client, for display
    /// when nothing matched. Empty if the reference client is not loaded.
    pub fn reference_digests(&self, raw_challenge: &[u8]) -> Vec<(&'static str, u32)> {
        let Some(reference) = self.passwords.iter().find(|c| c.name == REFERENCE_CLIENT) else {
            return Vec::new();
        };
        let password = reference.password.as_ref();
        vec![
            ("SvrChall", digest(&self.server_challenge, password)),
            ("Empty", digest(&[], password)),
            ("Zero", digest(&ZERO_CHALLENGE, password)),
            ("CliChall", digest(raw_challenge, password)),
        ]
    }
}

/// The built-in known-client table
pub fn known_clients() -> Vec<CandidatePassword> {
    KNOWN_CLIENTS
        .iter()
        .map(|(name, password)| CandidatePassword::new(*name, *password))
        .collect()
}
