//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use voter_lib::constants::{CHALLENGE_LEN, HEADER_SIZE};
#[allow(unused_imports)]
pub use voter_lib::digest::digest;
#[allow(unused_imports)]
pub use voter_lib::error::VoterError;
#[allow(unused_imports)]
pub use voter_lib::frame::{Frame, PayloadType, pad_challenge};
#[allow(unused_imports)]
pub use voter_lib::matcher::{DigestOrder, ForensicMatcher, Match, MatchResult};
#[allow(unused_imports)]
pub use voter_lib::responder::{PayloadDetail, Responder};

use std::net::SocketAddr;

/// Build a frame with fixed timestamps
#[allow(dead_code)]
pub fn make_frame(payload_type: PayloadType, challenge: &[u8], digest: u32, payload: &[u8]) -> Frame {
    Frame {
        vtime_sec: 0x6543_2100,
        vtime_nsec: 123_456_789,
        challenge: pad_challenge(challenge),
        digest,
        payload_type,
        payload: Bytes::copy_from_slice(payload),
    }
}

#[allow(dead_code)]
pub fn test_peer() -> SocketAddr {
    "198.51.100.7:1667".parse().expect("valid socket address")
}

/// Responder with the stock tables, host password "bloodhound"
#[allow(dead_code)]
pub fn stock_responder() -> Responder {
    Responder::new(b"bloodhound", b"1234567890")
}

/// Wrap UDP payloads into a legacy little-endian pcap file with Ethernet framing
#[allow(dead_code)]
pub fn build_pcap(packets: &[([u8; 4], u16, Vec<u8>)]) -> Vec<u8> {
    let mut file = Vec::new();
    file.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    file.extend_from_slice(&2u16.to_le_bytes());
    file.extend_from_slice(&4u16.to_le_bytes());
    file.extend_from_slice(&0i32.to_le_bytes());
    file.extend_from_slice(&0u32.to_le_bytes());
    file.extend_from_slice(&65535u32.to_le_bytes());
    file.extend_from_slice(&1u32.to_le_bytes()); // LINKTYPE_ETHERNET

    for (i, (source, dest_port, payload)) in packets.iter().enumerate() {
        let builder = etherparse::PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
            .ipv4(*source, [192, 168, 1, 100], 64)
            .udp(40000, *dest_port);
        let mut frame = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut frame, payload).expect("Failed to build packet");

        file.extend_from_slice(&(i as u32).to_le_bytes());
        file.extend_from_slice(&0u32.to_le_bytes());
        file.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        file.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        file.extend_from_slice(&frame);
    }
    file
}
