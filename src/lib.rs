//! wavetone: waveform synthesis and WAVE container I/O.
//!
//! Mixes one or more frequencies (plus overtones) through one of six wave
//! shapes into 16-bit mono PCM, then writes a complete WAVE file or appends
//! to an existing one after verifying its header.
//!
//! # Modules
//!
//! - [`generation`]: Wave functions, sample synthesis and the render pipeline
//! - [`audio`]: WAVE header codec and checked byte I/O
//! - [`config`]: The validated synthesis configuration (SoundConfig)
//! - [`cli`]: Command-line parsing into a SoundConfig
//! - [`error`]: Error types and codes (SoundError, ErrorCode)
//!
//! # Example
//!
//! ```rust,ignore
//! use wavetone::{render, OutputTarget, SoundConfig, WaveKind};
//!
//! let mut config = SoundConfig::new(vec![440.0, 660.0], OutputTarget::Create("chord.wav".into()));
//! config.wave = WaveKind::Triangle;
//! config.overtones = 2;
//! render(&config)?;
//!
//! // Extend the same file with another second of audio
//! config.output = OutputTarget::Append("chord.wav".into());
//! render(&config)?;
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;

// Re-export commonly used types at crate root for convenience
pub use config::{OutputTarget, SoundConfig};
pub use error::{ErrorCode, Result, SoundError};
pub use generation::{num_samples, render, synthesize, WaveKind};
