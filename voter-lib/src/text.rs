use crate::digest::c_str;
use std::fmt;

/// Best-effort rendering of challenge bytes.
///
/// Challenges are nominally ASCII, but nothing on the wire enforces that. The
/// string portion (up to the first NUL) is shown as text when every byte is
/// printable ASCII; otherwise the full raw field is shown as hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChallengeText {
    Text(String),
    Hex(String),
}

impl ChallengeText {
    pub fn decode(raw: &[u8]) -> Self {
        let s = c_str(raw);
        if s.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            ChallengeText::Text(String::from_utf8_lossy(s).into_owned())
        } else {
            ChallengeText::Hex(hex::encode(raw))
        }
    }

    /// The decoded text, if the bytes were printable
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ChallengeText::Text(s) => Some(s),
            ChallengeText::Hex(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ChallengeText::Text(_))
    }
}

impl fmt::Display for ChallengeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeText::Text(s) => write!(f, "{}", s),
            ChallengeText::Hex(h) => write!(f, "HEX:{}", h),
        }
    }
}
