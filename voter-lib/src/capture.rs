//! Offline challenge statistics from packet captures.
//!
//! Reads legacy pcap or pcapng files (Ethernet link type), keeps UDP datagrams
//! sent to the voter port, and counts which challenge strings each source
//! address used. Repeated or frozen challenges from a single device are the
//! first hint that its challenge generator is broken.

use crate::constants::{CHALLENGE_LEN, CHALLENGE_OFFSET, MIN_CAPTURE_PAYLOAD};
use crate::error::VoterError;
use crate::text::ChallengeText;
use etherparse::{InternetSlice, SlicedPacket, TransportSlice};
use pcap_parser::{Block, PcapBlockOwned, PcapError, create_reader};
use std::io::Read;
use std::net::IpAddr;
use tracing::{debug, trace};

const READER_BUFFER_SIZE: usize = 65536;

/// Challenge counts for one source address, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub source: IpAddr,
    pub challenges: Vec<(ChallengeText, usize)>,
}

impl SourceStats {
    pub fn count(&self, challenge: &ChallengeText) -> usize {
        self.challenges
            .iter()
            .find(|(c, _)| c == challenge)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct ChallengeStats {
    port: u16,
    packets_scanned: usize,
    matched: usize,
    sources: Vec<SourceStats>,
}

impl ChallengeStats {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            packets_scanned: 0,
            matched: 0,
            sources: Vec::new(),
        }
    }

    /// Account for one captured Ethernet frame
    pub fn record_frame(&mut self, link_data: &[u8]) {
        self.packets_scanned += 1;

        let sliced = match SlicedPacket::from_ethernet(link_data) {
            Ok(sliced) => sliced,
            Err(e) => {
                trace!("Skipping undecodable frame: {:?}", e);
                return;
            }
        };
        let source = match &sliced.ip {
            Some(InternetSlice::Ipv4(header, _)) => IpAddr::V4(header.source_addr()),
            Some(InternetSlice::Ipv6(header, _)) => IpAddr::V6(header.source_addr()),
            None => return,
        };
        if let Some(TransportSlice::Udp(udp)) = &sliced.transport {
            self.record(source, udp.destination_port(), sliced.payload);
        }
    }

    /// Account for one UDP payload. Returns true if it was counted.
    pub fn record(&mut self, source: IpAddr, dest_port: u16, payload: &[u8]) -> bool {
        if dest_port != self.port || payload.len() < MIN_CAPTURE_PAYLOAD {
            return false;
        }
        let challenge = ChallengeText::decode(&payload[CHALLENGE_OFFSET..CHALLENGE_OFFSET + CHALLENGE_LEN]);
        self.matched += 1;

        let entry = match self.sources.iter().position(|s| s.source == source) {
            Some(idx) => &mut self.sources[idx],
            None => {
                self.sources.push(SourceStats {
                    source,
                    challenges: Vec::new(),
                });
                let last = self.sources.len() - 1;
                &mut self.sources[last]
            }
        };
        match entry.challenges.iter_mut().find(|(c, _)| *c == challenge) {
            Some((_, count)) => *count += 1,
            None => entry.challenges.push((challenge, 1)),
        }
        true
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Every captured frame seen, whether or not it was counted
    pub fn packets_scanned(&self) -> usize {
        self.packets_scanned
    }

    /// Frames that carried a voter payload to the configured port
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn sources(&self) -> &[SourceStats] {
        &self.sources
    }

    pub fn source(&self, addr: IpAddr) -> Option<&SourceStats> {
        self.sources.iter().find(|s| s.source == addr)
    }
}

/// Read a pcap or pcapng stream and gather challenge statistics for `port`
pub fn read_capture<R>(input: R, port: u16) -> Result<ChallengeStats, VoterError>
where
    R: Read + Send + 'static,
{
    let mut reader =
        create_reader(READER_BUFFER_SIZE, input).map_err(|e| VoterError::Capture(format!("{:?}", e)))?;
    let mut stats = ChallengeStats::new(port);

    loop {
        match reader.next() {
            Ok((offset, block)) => {
                match block {
                    PcapBlockOwned::Legacy(packet) => stats.record_frame(packet.data),
                    PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => {
                        let caplen = (epb.caplen as usize).min(epb.data.len());
                        stats.record_frame(&epb.data[..caplen]);
                    }
                    _ => (),
                }
                reader.consume(offset);
            }
            Err(PcapError::Eof) => break,
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| VoterError::Capture(format!("{:?}", e)))?;
            }
            Err(e) => return Err(VoterError::Capture(format!("{:?}", e))),
        }
    }

    debug!(
        scanned = stats.packets_scanned(),
        matched = stats.matched(),
        "Capture read complete"
    );
    Ok(stats)
}
