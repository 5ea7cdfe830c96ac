pub mod capture;
pub mod constants;
pub mod cracker;
pub mod digest;
pub mod error;
pub mod frame;
pub mod matcher;
pub mod responder;
pub mod text;
pub mod transport;


// Re-export the main entry points for easy access
pub use digest::digest;
pub use frame::{Frame, PayloadType};
pub use matcher::{ForensicMatcher, MatchResult};
pub use responder::Responder;
