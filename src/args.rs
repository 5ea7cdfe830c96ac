use crate::error::ArgError;
use voter_lib::matcher::{CandidatePassword, ExtraChallenge};

/// Parse a digest as printed by the host, e.g. `FCCA02CA` or `0xfcca02ca`
pub fn parse_digest(s: &str) -> Result<u32, ArgError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || digits.len() > 8 {
        return Err(ArgError::InvalidDigest(s.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| ArgError::InvalidDigest(s.to_string()))
}

/// Parse an extra password hypothesis given as `NAME=PASSWORD`
pub fn parse_candidate(s: &str) -> Result<CandidatePassword, ArgError> {
    match s.split_once('=') {
        Some((name, password)) if !name.is_empty() => Ok(CandidatePassword::new(name, password)),
        _ => Err(ArgError::InvalidCandidate(s.to_string())),
    }
}

/// Parse an extra challenge hypothesis given as `NAME=TEXT` or `NAME=hex:DIGITS`
pub fn parse_extra_challenge(s: &str) -> Result<ExtraChallenge, ArgError> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => match value.strip_prefix("hex:") {
            Some(digits) => Ok(ExtraChallenge::new(name, hex::decode(digits)?)),
            None => Ok(ExtraChallenge::new(name, value)),
        },
        _ => Err(ArgError::InvalidChallenge(s.to_string())),
    }
}

/// Challenge bytes from either plain text or a hex dump of the raw field
pub fn parse_challenge(text: Option<&str>, hex_dump: Option<&str>) -> Result<Vec<u8>, ArgError> {
    match (text, hex_dump) {
        (_, Some(h)) => Ok(hex::decode(h)?),
        (Some(t), None) => Ok(t.as_bytes().to_vec()),
        (None, None) => Ok(Vec::new()),
    }
}
