//! Synthesis configuration.
//!
//! [`SoundConfig`] is the validated, immutable record the CLI hands to the
//! generation pipeline. It carries every parameter explicitly; nothing in
//! the library reads global state.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SoundError};
use crate::generation::WaveKind;

/// Default tone length in milliseconds.
pub const DEFAULT_DURATION_MS: u32 = 1000;

/// Default volume, in percent of full scale.
pub const DEFAULT_AMPLITUDE: f64 = 33.333333;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default number of overtones above each fundamental.
pub const DEFAULT_OVERTONES: u8 = 0;

/// Smallest amplitude that still moves a sample by one step.
pub const MIN_AMPLITUDE: f64 = 100.0 / i16::MAX as f64;

/// Full-scale amplitude.
pub const MAX_AMPLITUDE: f64 = 100.0;

/// Lowest accepted fundamental, in Hz.
pub const MIN_FREQUENCY: f64 = 1.0;

/// Highest accepted fundamental, in Hz.
pub const MAX_FREQUENCY: f64 = 30000.0;

/// Highest accepted overtone count.
pub const MAX_OVERTONES: u8 = 127;

/// Where the synthesized audio goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "path", rename_all = "lowercase")]
pub enum OutputTarget {
    /// Write a complete file to standard output.
    #[default]
    Stdout,
    /// Create (or truncate) a file and write a complete WAVE file to it.
    Create(PathBuf),
    /// Extend an existing WAVE file in place.
    Append(PathBuf),
}

impl OutputTarget {
    /// Returns true if the target is an existing file to extend.
    pub fn is_append(&self) -> bool {
        matches!(self, OutputTarget::Append(_))
    }

    /// Name used for the target in messages.
    pub fn display_name(&self) -> String {
        match self {
            OutputTarget::Stdout => "stdout".to_string(),
            OutputTarget::Create(path) | OutputTarget::Append(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Everything needed to synthesize and write one tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Length of the tone in milliseconds.
    pub duration_ms: u32,

    /// Volume in percent of full scale.
    pub amplitude: f64,

    /// Samples per second.
    pub sample_rate: u32,

    /// Overtones generated above each fundamental.
    pub overtones: u8,

    /// Wave shape used for every frequency.
    pub wave: WaveKind,

    /// Fundamental frequencies in Hz, in the order given.
    pub frequencies: Vec<f64>,

    /// Destination of the audio.
    pub output: OutputTarget,
}

impl SoundConfig {
    /// Creates a configuration with default settings for the given tones.
    pub fn new(frequencies: Vec<f64>, output: OutputTarget) -> Self {
        Self {
            frequencies,
            output,
            ..Default::default()
        }
    }

    /// Creates a default configuration overlaid with environment variables.
    ///
    /// Reads the following environment variables:
    /// - `WAVETONE_DURATION` - Duration in milliseconds
    /// - `WAVETONE_AMPLITUDE` - Volume in percent
    /// - `WAVETONE_SAMPLE_RATE` - Sample rate in Hz
    /// - `WAVETONE_WAVE` - Wave function name
    ///
    /// Unset or unparsable variables leave the default in place; range
    /// checks happen in [`SoundConfig::validate`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SoundConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(duration) = lookup("WAVETONE_DURATION").and_then(|s| s.parse::<u32>().ok()) {
            config.duration_ms = duration;
        }

        if let Some(amplitude) = lookup("WAVETONE_AMPLITUDE").and_then(|s| s.parse::<f64>().ok())
        {
            config.amplitude = amplitude;
        }

        if let Some(rate) = lookup("WAVETONE_SAMPLE_RATE").and_then(|s| s.parse::<u32>().ok()) {
            config.sample_rate = rate;
        }

        if let Some(wave) = lookup("WAVETONE_WAVE").and_then(|s| WaveKind::parse(&s)) {
            config.wave = wave;
        }

        config
    }

    /// Validates every field against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if self.duration_ms == 0 {
            return Err(SoundError::out_of_range("Duration", self.duration_ms, 1, u32::MAX));
        }

        if !(MIN_AMPLITUDE..=MAX_AMPLITUDE).contains(&self.amplitude) {
            return Err(SoundError::out_of_range(
                "Amplitude",
                self.amplitude,
                MIN_AMPLITUDE,
                MAX_AMPLITUDE,
            ));
        }

        if self.sample_rate == 0 {
            return Err(SoundError::out_of_range("Sample rate", self.sample_rate, 1, u32::MAX));
        }

        if self.overtones > MAX_OVERTONES {
            return Err(SoundError::out_of_range("Overtones", self.overtones, 0, MAX_OVERTONES));
        }

        if self.frequencies.is_empty() {
            return Err(SoundError::invalid_config("At least one frequency required"));
        }

        // NaN fails the range check as well.
        if let Some(bad) = self
            .frequencies
            .iter()
            .find(|f| !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(*f))
        {
            return Err(SoundError::out_of_range(
                "Frequency",
                bad,
                MIN_FREQUENCY,
                MAX_FREQUENCY,
            ));
        }

        Ok(())
    }

    /// Expands the fundamentals into the frequencies actually mixed.
    ///
    /// Each fundamental is followed by its overtones in ascending order:
    /// `f, 2f, ..., (overtones + 1) f`.
    pub fn frequency_set(&self) -> Vec<f64> {
        let partials = usize::from(self.overtones) + 1;
        let mut set = Vec::with_capacity(self.frequencies.len() * partials);
        for &fundamental in &self.frequencies {
            for multiple in 1..=partials {
                set.push(multiple as f64 * fundamental);
            }
        }
        set
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            amplitude: DEFAULT_AMPLITUDE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            overtones: DEFAULT_OVERTONES,
            wave: WaveKind::default(),
            frequencies: Vec::new(),
            output: OutputTarget::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::collections::HashMap;

    fn tone(frequencies: &[f64]) -> SoundConfig {
        SoundConfig::new(frequencies.to_vec(), OutputTarget::Stdout)
    }

    #[test]
    fn defaults() {
        let config = SoundConfig::default();
        assert_eq!(config.duration_ms, 1000);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.overtones, 0);
        assert_eq!(config.wave, WaveKind::Sine);
        assert_eq!(config.output, OutputTarget::Stdout);
        assert!((config.amplitude - 33.333333).abs() < 1e-9);
    }

    #[test]
    fn overtones_follow_their_fundamental() {
        let mut config = tone(&[440.0, 880.0]);
        config.overtones = 1;
        assert_eq!(config.frequency_set(), vec![440.0, 880.0, 880.0, 1760.0]);
    }

    #[test]
    fn frequency_set_is_not_capped_at_255() {
        let mut config = tone(&[100.0, 200.0, 300.0]);
        config.overtones = MAX_OVERTONES;
        assert_eq!(config.frequency_set().len(), 3 * 128);
    }

    #[test]
    fn validation_accepts_defaults_with_a_tone() {
        assert!(tone(&[440.0]).validate().is_ok());
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = tone(&[440.0]);
        config.duration_ms = 0;
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::InvalidConfig);

        let mut config = tone(&[440.0]);
        config.sample_rate = 0;
        assert!(config.validate().unwrap_err().message.contains("Sample rate"));

        let mut config = tone(&[440.0]);
        config.amplitude = 100.5;
        assert!(config.validate().unwrap_err().message.contains("Amplitude"));

        let mut config = tone(&[440.0]);
        config.amplitude = 0.0;
        assert!(config.validate().is_err());

        let mut config = tone(&[440.0]);
        config.overtones = 128;
        assert!(config.validate().unwrap_err().message.contains("Overtones"));

        assert!(tone(&[]).validate().is_err());
        assert!(tone(&[0.5]).validate().is_err());
        assert!(tone(&[440.0, 30000.5]).validate().is_err());
        assert!(tone(&[f64::NAN]).validate().is_err());
    }

    #[test]
    fn amplitude_bounds_are_inclusive() {
        let mut config = tone(&[1.0, 30000.0]);
        config.amplitude = MIN_AMPLITUDE;
        assert!(config.validate().is_ok());
        config.amplitude = MAX_AMPLITUDE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn output_target_modes() {
        assert!(!OutputTarget::Stdout.is_append());
        assert!(!OutputTarget::Create(PathBuf::from("a.wav")).is_append());
        assert!(OutputTarget::Append(PathBuf::from("a.wav")).is_append());
        assert_eq!(OutputTarget::Stdout.to_string(), "stdout");
        assert_eq!(OutputTarget::Append(PathBuf::from("a.wav")).to_string(), "a.wav");
    }

    #[test]
    fn config_serializes_to_json() {
        let config = SoundConfig::new(vec![440.0], OutputTarget::Append(PathBuf::from("tone.wav")));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["wave"], "sine");
        assert_eq!(json["output"]["mode"], "append");
        assert_eq!(json["output"]["path"], "tone.wav");

        let back: SoundConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn from_lookup_without_variables_keeps_defaults() {
        let config = SoundConfig::from_lookup(|_| None);
        assert_eq!(config.duration_ms, DEFAULT_DURATION_MS);
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(config.wave, WaveKind::Sine);
    }

    #[test]
    fn from_lookup_overlays_set_variables() {
        let vars = HashMap::from([
            ("WAVETONE_DURATION", "250"),
            ("WAVETONE_AMPLITUDE", "50"),
            ("WAVETONE_SAMPLE_RATE", "8000"),
            ("WAVETONE_WAVE", "square"),
        ]);
        let config = SoundConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.duration_ms, 250);
        assert_eq!(config.amplitude, 50.0);
        assert_eq!(config.sample_rate, 8000);
        assert_eq!(config.wave, WaveKind::Square);
    }

    #[test]
    fn from_lookup_ignores_unparsable_values() {
        let vars = HashMap::from([
            ("WAVETONE_DURATION", "-5"),
            ("WAVETONE_AMPLITUDE", "loud"),
            ("WAVETONE_SAMPLE_RATE", "44.1k"),
            ("WAVETONE_WAVE", "noise"),
        ]);
        let config = SoundConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.duration_ms, DEFAULT_DURATION_MS);
        assert_eq!(config.amplitude, DEFAULT_AMPLITUDE);
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(config.wave, WaveKind::Sine);
    }
}
