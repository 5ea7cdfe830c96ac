use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// The primary error type for the `voter-lib` library.
#[derive(Error, Debug)]
pub enum VoterError {
    #[error("Failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Short frame: expected at least {expected} bytes, got {actual}")]
    ShortFrame { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Capture error: {0}")]
    Capture(String),
}
