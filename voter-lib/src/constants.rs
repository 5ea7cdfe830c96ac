// Protocol constants for the voter protocol

/// Default UDP port the host listens on
pub const DEFAULT_PORT: u16 = 1667;

/// Default host password used to sign AUTH replies
pub const DEFAULT_HOST_PASSWORD: &str = "bloodhound";

/// Server challenge held constant for the life of the process
pub const DEFAULT_SERVER_CHALLENGE: &str = "1234567890";

/// Length of the challenge field (10 bytes, zero-padded ASCII)
pub const CHALLENGE_LEN: usize = 10;

/// Size of the fixed frame header: sec(4) + nsec(4) + challenge(10) + digest(4) + type(2)
pub const HEADER_SIZE: usize = 24;

/// Offset of the challenge field inside a UDP payload
pub const CHALLENGE_OFFSET: usize = 8;

/// Minimum payload length for challenge extraction from captures
pub const MIN_CAPTURE_PAYLOAD: usize = 20;

/// Largest datagram the transport loop will read
pub const MAX_DATAGRAM_SIZE: usize = 4096;

/// Label of the ad-hoc host password in the candidate table
pub const HOST_PASSWORD_LABEL: &str = "HOST_PWD";

/// Client whose expected digests are shown when no candidate matches
pub const REFERENCE_CLIENT: &str = "Chuck_Voter";

/// Known device identities (label, password) in declaration order
pub const KNOWN_CLIENTS: &[(&str, &str)] = &[
    ("teensyvoter", "teensyvoter"),
    ("Teensy_test", "teensyvoter"),
    ("test", "test"),
    ("Chuck_Voter", "chuckpass"),
];
