// src/error.rs

use thiserror::Error;

/// Errors from parsing command-line values.
#[derive(Error, Debug, PartialEq)]
pub enum ArgError {
    #[error("Invalid digest '{0}': expected up to 8 hex digits, optionally prefixed with 0x")]
    InvalidDigest(String),

    #[error("Invalid candidate '{0}': expected NAME=PASSWORD")]
    InvalidCandidate(String),

    #[error("Invalid extra challenge '{0}': expected NAME=TEXT or NAME=hex:DIGITS")]
    InvalidChallenge(String),

    #[error("Invalid hex challenge: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
