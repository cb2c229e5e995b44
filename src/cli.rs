//! CLI argument parser.
//!
//! Parses flags with clap and resolves them, together with any
//! `WAVETONE_*` environment defaults, into a validated [`SoundConfig`].

use std::path::PathBuf;

use clap::Parser;

use crate::config::{OutputTarget, SoundConfig, MAX_OVERTONES};
use crate::error::Result;
use crate::generation::WaveKind;

/// wavetone: synthesize tones into 16-bit PCM WAVE files
#[derive(Parser, Debug)]
#[command(name = "wavetone")]
#[command(about = "Synthesize tones into 16-bit mono PCM WAVE files")]
#[command(version)]
pub struct Cli {
    /// Write a new WAVE file here instead of standard output
    #[arg(short, long, value_name = "FILE", conflicts_with = "append")]
    pub file: Option<PathBuf>,

    /// Append to an existing WAVE file written at the same sample rate
    #[arg(short = 'A', long, value_name = "FILE")]
    pub append: Option<PathBuf>,

    /// Duration of the tone in milliseconds [default: 1000]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub duration: Option<u32>,

    /// Volume in percent of full scale, 100/32767 to 100 [default: 33.333333]
    #[arg(short, long, value_parser = parse_number)]
    pub amplitude: Option<f64>,

    /// Samples per second [default: 44100]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_rate: Option<u32>,

    /// Shape of the wave [default: sine]
    #[arg(short, long, value_enum)]
    pub wave_function: Option<WaveKind>,

    /// Overtones added above each frequency, 0 to 127 [default: 0]
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=MAX_OVERTONES as i64))]
    pub overtones: Option<u8>,

    /// Print the resolved configuration as JSON and write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Fundamental frequencies in Hz, 1 to 30000
    #[arg(required = true, num_args = 1.., value_name = "FREQUENCY", value_parser = parse_number)]
    pub frequencies: Vec<f64>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Returns the output target selected by `--file` / `--append`.
    ///
    /// Defaults to standard output if neither is given.
    pub fn output_target(&self) -> OutputTarget {
        match (&self.file, &self.append) {
            (_, Some(path)) => OutputTarget::Append(path.clone()),
            (Some(path), None) => OutputTarget::Create(path.clone()),
            (None, None) => OutputTarget::Stdout,
        }
    }

    /// Resolves flags over `defaults` into a validated configuration.
    pub fn into_config_with(self, defaults: SoundConfig) -> Result<SoundConfig> {
        let config = SoundConfig {
            output: self.output_target(),
            duration_ms: self.duration.unwrap_or(defaults.duration_ms),
            amplitude: self.amplitude.unwrap_or(defaults.amplitude),
            sample_rate: self.sample_rate.unwrap_or(defaults.sample_rate),
            overtones: self.overtones.unwrap_or(defaults.overtones),
            wave: self.wave_function.unwrap_or(defaults.wave),
            frequencies: self.frequencies,
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolves flags over the environment defaults.
    pub fn into_config(self) -> Result<SoundConfig> {
        self.into_config_with(SoundConfig::from_env())
    }
}

/// Parses a decimal number, leaving range checks to validation.
fn parse_number(s: &str) -> std::result::Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("'{}' must be a number", s))
}
