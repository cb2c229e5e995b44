//! Audio output module.
//!
//! Provides the WAVE container codec and the byte-level stream it is
//! built on.

pub mod bytes;
pub mod wav;

// Re-export commonly used items
pub use bytes::ByteStream;
pub use wav::{append, create, read_header, verify_header, WavHeader};
