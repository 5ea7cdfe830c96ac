//! Session responder: per-datagram handling for the mock host.
//!
//! Each datagram is handled on its own. The only state that spans frames is
//! the session constant (the server challenge) and the candidate tables, both
//! fixed when the responder is built.
//!
//! Only `AUTH` frames get a reply. The reply digest is always
//! `digest(client_challenge, host_password)` in normal order; that is the
//! host's own signing convention and is independent of whatever the matcher
//! concluded about the client.

use crate::constants::REFERENCE_CLIENT;
use crate::digest::digest;
use crate::error::VoterError;
use crate::frame::{Frame, PayloadType, pad_challenge};
use crate::matcher::{ForensicMatcher, MatchResult};
use crate::text::ChallengeText;
use bytes::Bytes;
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// What the responder learned from the payload section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadDetail {
    /// An AUTH reply was built with this digest
    AuthReply { digest: u32 },
    /// AUDIO frame with its leading RSSI byte
    Rssi(u8),
    /// AUDIO frame with nothing after the header
    NoRssi,
    /// GPS/keepalive payload; its layout is not decoded
    GpsPresent { len: usize },
    /// Unrecognized payload type
    Unknown(u16),
}

/// Diagnostic summary of one handled frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub peer: SocketAddr,
    pub payload_type: PayloadType,
    pub len: usize,
    pub challenge_hex: String,
    pub challenge_text: ChallengeText,
    pub digest: u32,
    pub outcome: MatchResult,
    /// Reference-client digests, only filled in when nothing matched
    pub reference: Vec<(&'static str, u32)>,
    pub detail: PayloadDetail,
}

#[derive(Debug, Clone)]
pub struct Handled {
    pub report: FrameReport,
    /// Datagram to send back to the peer, if any
    pub reply: Option<Bytes>,
}

pub struct Responder {
    matcher: ForensicMatcher,
    host_password: Bytes,
}

impl Responder {
    /// Create a responder over the built-in known-client table
    pub fn new(host_password: &[u8], server_challenge: &[u8]) -> Self {
        Self::with_matcher(ForensicMatcher::with_known_clients(host_password, server_challenge), host_password)
    }

    pub fn with_matcher(matcher: ForensicMatcher, host_password: &[u8]) -> Self {
        Self {
            matcher,
            host_password: Bytes::copy_from_slice(host_password),
        }
    }

    pub fn matcher(&self) -> &ForensicMatcher {
        &self.matcher
    }

    /// Decode, diagnose and answer a single datagram.
    ///
    /// Fails only with `ShortFrame`; everything else about the frame is
    /// reported, not rejected.
    pub fn handle(&self, datagram: Bytes, peer: SocketAddr) -> Result<Handled, VoterError> {
        let len = datagram.len();
        let frame = Frame::try_from(datagram)?;

        let challenge_text = ChallengeText::decode(&frame.challenge);
        let challenge_hex = hex::encode(frame.challenge);

        info!("----------------------------------------------------------------");
        info!(
            "RX from {} | Type: {} ({}) | Len: {}",
            peer,
            frame.payload_type,
            u16::from(frame.payload_type),
            len
        );
        match challenge_text.as_text() {
            Some(text) => info!("    Raw Challenge: {} ('{}')", challenge_hex, text),
            None => info!("    Raw Challenge: {} (not printable)", challenge_hex),
        }
        info!("    Rx Digest:     {:08X}", frame.digest);

        let outcome = self.matcher.find_match(frame.digest, &frame.challenge);
        let reference = match &outcome {
            MatchResult::Found(hit) => {
                info!("    [+] FORENSIC MATCH: {}", hit);
                Vec::new()
            }
            MatchResult::NotFound => {
                warn!("    [!] DIGEST MISMATCH! Rx: {:08X}", frame.digest);
                let reference = self.matcher.reference_digests(&frame.challenge);
                for (label, expected) in &reference {
                    info!("        {}", reference_line(label, *expected));
                }
                reference
            }
        };

        let (detail, reply) = match frame.payload_type.canonical() {
            PayloadType::Auth => {
                let reply = self.build_auth_reply(&frame);
                info!(
                    "    Built AUTH Reply (Digest: {:08X}) w/ Challenge '{}'",
                    reply.digest,
                    ChallengeText::decode(&reply.challenge)
                );
                (PayloadDetail::AuthReply { digest: reply.digest }, Some(reply.encode()))
            }
            PayloadType::Audio => match frame.rssi() {
                Some(rssi) => {
                    info!("    RSSI: {}", rssi);
                    (PayloadDetail::Rssi(rssi), None)
                }
                None => {
                    debug!("    AUDIO frame without payload");
                    (PayloadDetail::NoRssi, None)
                }
            },
            PayloadType::GpsKeepalive => {
                info!("    GPS/Keepalive Payload Present");
                (PayloadDetail::GpsPresent { len: frame.payload.len() }, None)
            }
            PayloadType::Unknown(raw) => {
                info!("    Unknown payload type {}", raw);
                (PayloadDetail::Unknown(raw), None)
            }
        };

        Ok(Handled {
            report: FrameReport {
                peer,
                payload_type: frame.payload_type,
                len,
                challenge_hex,
                challenge_text,
                digest: frame.digest,
                outcome,
                reference,
                detail,
            },
            reply,
        })
    }

    /// Host-signed reply to an AUTH frame
    pub fn build_auth_reply(&self, frame: &Frame) -> Frame {
        Frame {
            vtime_sec: frame.vtime_sec,
            vtime_nsec: frame.vtime_nsec,
            challenge: pad_challenge(self.matcher.server_challenge()),
            digest: digest(&frame.challenge, &self.host_password),
            payload_type: PayloadType::Auth,
            payload: Bytes::new(),
        }
    }
}

/// One line of the expected-digest listing shown on a mismatch
pub fn reference_line(label: &str, expected: u32) -> String {
    format!("Expected ({} + {}): {:08X}", REFERENCE_CLIENT, label, expected)
}
