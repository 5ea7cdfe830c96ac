//! Voter frame codec.
//!
//! Every datagram starts with a fixed 24-byte big-endian header:
//!
//! | offset | size | field        |
//! |--------|------|--------------|
//! | 0      | 4    | vtime_sec    |
//! | 4      | 4    | vtime_nsec   |
//! | 8      | 10   | challenge    |
//! | 18     | 4    | digest       |
//! | 22     | 2    | payload_type |
//!
//! Anything after the header is payload whose meaning depends on the type.
//! The codec never validates field values; that is left to the responder.

use crate::constants::{CHALLENGE_LEN, HEADER_SIZE};
use crate::error::VoterError;
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::{FromPrimitive, IntoPrimitive};
use strum_macros::Display;
use zerocopy::byteorder::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Frame payload type.
///
/// Equality compares wire codes, so `Unknown(0)` equals `Auth`. Decoding
/// always yields the named variant; use [`PayloadType::new`] or
/// [`PayloadType::canonical`] before matching on a hand-built value.
#[derive(Debug, Clone, Copy, Display, IntoPrimitive, FromPrimitive)]
#[repr(u16)]
pub enum PayloadType {
    #[strum(to_string = "AUTH")]
    Auth = 0,
    /// u-law audio, led by a single RSSI byte
    #[strum(to_string = "AUDIO")]
    Audio = 1,
    #[strum(to_string = "GPS/KEEPALIVE")]
    GpsKeepalive = 2,

    #[num_enum(catch_all)]
    #[strum(to_string = "UNKNOWN")]
    Unknown(u16),
}

impl PayloadType {
    pub fn new(code: u16) -> Self {
        Self::from_primitive(code)
    }

    /// Named variant for codes 0..=2, `Unknown` otherwise
    pub fn canonical(self) -> Self {
        Self::new(self.into())
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        u16::from(*self) == u16::from(*other)
    }
}

impl Eq for PayloadType {}

/// Wire layout of the header
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct FrameHeaderRaw {
    pub vtime_sec: U32,
    pub vtime_nsec: U32,
    pub challenge: [u8; CHALLENGE_LEN],
    pub digest: U32,
    pub payload_type: U16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub vtime_sec: u32,
    pub vtime_nsec: u32,
    pub challenge: [u8; CHALLENGE_LEN],
    pub digest: u32,
    pub payload_type: PayloadType,
    pub payload: Bytes,
}

impl Frame {
    /// Serialize header and payload into a datagram
    pub fn encode(&self) -> Bytes {
        let header = FrameHeaderRaw::from(self);
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.payload.len());
        buf.put_slice(header.as_bytes());
        buf.put_slice(&self.payload);
        buf.freeze()
    }

    /// First payload byte of an AUDIO frame
    pub fn rssi(&self) -> Option<u8> {
        match self.payload_type.canonical() {
            PayloadType::Audio => self.payload.first().copied(),
            _ => None,
        }
    }
}

impl From<&Frame> for FrameHeaderRaw {
    fn from(frame: &Frame) -> Self {
        Self {
            vtime_sec: U32::new(frame.vtime_sec),
            vtime_nsec: U32::new(frame.vtime_nsec),
            challenge: frame.challenge,
            digest: U32::new(frame.digest),
            payload_type: U16::new(frame.payload_type.into()),
        }
    }
}

impl TryFrom<Bytes> for Frame {
    type Error = VoterError;

    fn try_from(mut bytes: Bytes) -> Result<Self, Self::Error> {
        if bytes.len() < HEADER_SIZE {
            return Err(VoterError::ShortFrame {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let header_bytes = bytes.split_to(HEADER_SIZE);
        let header = FrameHeaderRaw::read_from_bytes(header_bytes.as_ref()).map_err(|_| VoterError::ShortFrame {
            expected: HEADER_SIZE,
            actual: header_bytes.len(),
        })?;

        Ok(Frame {
            vtime_sec: header.vtime_sec.get(),
            vtime_nsec: header.vtime_nsec.get(),
            challenge: header.challenge,
            digest: header.digest.get(),
            payload_type: PayloadType::new(header.payload_type.get()),
            payload: bytes,
        })
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = VoterError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Frame::try_from(Bytes::copy_from_slice(bytes))
    }
}

impl From<Frame> for Bytes {
    fn from(frame: Frame) -> Self {
        frame.encode()
    }
}

/// Truncate or zero-pad a challenge to exactly 10 bytes
pub fn pad_challenge(challenge: &[u8]) -> [u8; CHALLENGE_LEN] {
    let mut out = [0u8; CHALLENGE_LEN];
    let len = challenge.len().min(CHALLENGE_LEN);
    out[..len].copy_from_slice(&challenge[..len]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout_size() {
        assert_eq!(std::mem::size_of::<FrameHeaderRaw>(), HEADER_SIZE);
    }

    #[test]
    fn test_decode_auth_frame() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&1u32.to_be_bytes());
        raw.extend_from_slice(&2u32.to_be_bytes());
        raw.extend_from_slice(b"433463776\0");
        raw.extend_from_slice(&0xFCCA_02CAu32.to_be_bytes());
        raw.extend_from_slice(&0u16.to_be_bytes());

        let frame = Frame::try_from(raw.as_slice()).unwrap();
        assert_eq!(frame.vtime_sec, 1);
        assert_eq!(frame.vtime_nsec, 2);
        assert_eq!(&frame.challenge, b"433463776\0");
        assert_eq!(frame.digest, 0xFCCA_02CA);
        assert_eq!(frame.payload_type, PayloadType::Auth);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_unknown_payload_type_keeps_value() {
        assert_eq!(PayloadType::from_primitive(5), PayloadType::Unknown(5));
        assert_eq!(u16::from(PayloadType::Unknown(0x1234)), 0x1234);
        assert_eq!(PayloadType::GpsKeepalive.to_string(), "GPS/KEEPALIVE");
    }

    #[test]
    fn test_unknown_with_known_code_is_canonicalized() {
        assert!(matches!(PayloadType::new(1), PayloadType::Audio));
        assert!(matches!(PayloadType::Unknown(2).canonical(), PayloadType::GpsKeepalive));
        assert!(matches!(PayloadType::Unknown(9).canonical(), PayloadType::Unknown(9)));
        assert_eq!(PayloadType::Unknown(0), PayloadType::Auth);
        assert_ne!(PayloadType::Unknown(3), PayloadType::Auth);
    }

    #[test]
    fn test_rssi_from_unknown_audio_code() {
        let frame = Frame {
            vtime_sec: 0,
            vtime_nsec: 0,
            challenge: [0; CHALLENGE_LEN],
            digest: 0,
            payload_type: PayloadType::Unknown(1),
            payload: Bytes::from_static(&[0x2A]),
        };
        assert_eq!(frame.rssi(), Some(42));
    }

    #[test]
    fn test_pad_challenge() {
        assert_eq!(&pad_challenge(b"1234567890"), b"1234567890");
        assert_eq!(&pad_challenge(b"12345"), b"12345\0\0\0\0\0");
        assert_eq!(&pad_challenge(b"1234567890abc"), b"1234567890");
        assert_eq!(pad_challenge(b""), [0u8; 10]);
    }

    #[test]
    fn test_rssi_only_for_audio() {
        let mut frame = Frame {
            vtime_sec: 0,
            vtime_nsec: 0,
            challenge: [0; CHALLENGE_LEN],
            digest: 0,
            payload_type: PayloadType::Audio,
            payload: Bytes::from_static(&[0x2A, 0xFF]),
        };
        assert_eq!(frame.rssi(), Some(42));
        frame.payload_type = PayloadType::GpsKeepalive;
        assert_eq!(frame.rssi(), None);
    }
}
