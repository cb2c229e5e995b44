//! Generation pipeline.
//!
//! Turns a [`SoundConfig`] into samples and hands them to the WAVE codec,
//! either creating a new file or appending to an existing one.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::waveform::WaveKind;
use crate::audio::wav::{self, data_size_for};
use crate::audio::ByteStream;
use crate::config::{OutputTarget, SoundConfig};
use crate::error::{Result, SoundError};

/// Returns the number of samples covering `duration_ms` at `sample_rate`,
/// rounded up to a whole sample.
///
/// The product of two `u32` values always fits in a `u64`, so the
/// computation itself cannot overflow. Fails with `SAMPLE_OVERFLOW` if the
/// count is too large for a WAVE file's 32-bit size fields.
pub fn num_samples(duration_ms: u32, sample_rate: u32) -> Result<u32> {
    let samples = (u64::from(duration_ms) * u64::from(sample_rate)).div_ceil(1000);
    u32::try_from(samples)
        .ok()
        .filter(|&n| data_size_for(n as usize).is_some())
        .ok_or_else(|| SoundError::too_many_samples(duration_ms, sample_rate))
}

/// Mixes `frequencies` through `wave` into `num_samples` 16-bit samples.
///
/// Every frequency contributes `amplitude / 100 * 32767 / n` of full
/// scale, so the mix stays in range for amplitudes up to 100. An empty
/// frequency list yields silence.
pub fn synthesize(
    frequencies: &[f64],
    amplitude: f64,
    num_samples: u32,
    wave: WaveKind,
    sample_rate: u32,
) -> Vec<i16> {
    if frequencies.is_empty() {
        return vec![0; num_samples as usize];
    }

    let count = frequencies.len() as f64;
    let scale = amplitude / 100.0 * f64::from(i16::MAX);

    (0..num_samples)
        .map(|t| {
            let mut sample = 0.0;
            for &frequency in frequencies {
                sample += scale * wave.sample(frequency, t, sample_rate) / count;
            }
            truncate_to_i16(sample)
        })
        .collect()
}

/// Truncates toward zero and keeps the low 16 bits, so out-of-range values
/// wrap rather than saturate.
fn truncate_to_i16(sample: f64) -> i16 {
    sample.trunc() as i64 as i16
}

/// What a render will do, resolved from its configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan {
    /// The configuration the plan was made from.
    pub config: SoundConfig,
    /// Every frequency mixed, overtones included.
    pub frequencies: Vec<f64>,
    /// Samples to synthesize.
    pub num_samples: u32,
    /// Bytes of sample data the render adds.
    pub data_bytes: u32,
}

/// Outcome of a completed render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    /// Display name of the output.
    pub target: String,
    /// Samples written by this render.
    pub samples_written: u32,
    /// Size of the data sub-chunk after the write.
    pub data_size: u32,
    /// Whether the samples were appended to an existing file.
    pub appended: bool,
}

/// Validates `config` and computes the sample count and frequency set.
pub fn plan(config: &SoundConfig) -> Result<RenderPlan> {
    config.validate()?;
    let num_samples = num_samples(config.duration_ms, config.sample_rate)?;

    Ok(RenderPlan {
        config: config.clone(),
        frequencies: config.frequency_set(),
        num_samples,
        // num_samples already guarantees this fits
        data_bytes: num_samples * 2,
    })
}

/// Synthesizes the configured tone and writes it to the configured output.
///
/// # Arguments
///
/// * `config` - Tone parameters and output target; validated before any I/O
///
/// # Returns
///
/// A [`RenderSummary`] naming the output, the samples written and the
/// resulting data sub-chunk size. In append mode a mismatched or damaged
/// file is left untouched and reported as `HEADER_CORRUPT`.
///
/// # Example
///
/// ```ignore
/// use wavetone::config::{OutputTarget, SoundConfig};
/// use wavetone::generation::render;
///
/// let config = SoundConfig::new(vec![440.0], OutputTarget::Create("a4.wav".into()));
/// let summary = render(&config)?;
/// ```
pub fn render(config: &SoundConfig) -> Result<RenderSummary> {
    let plan = plan(config)?;

    info!(
        wave = %config.wave,
        sample_rate = config.sample_rate,
        frequencies = plan.frequencies.len(),
        samples = plan.num_samples,
        "Synthesizing"
    );

    let start_time = Instant::now();
    let samples = synthesize(
        &plan.frequencies,
        config.amplitude,
        plan.num_samples,
        config.wave,
        config.sample_rate,
    );
    debug!(elapsed = ?start_time.elapsed(), "Synthesis complete");

    let target = config.output.display_name();
    let data_size = write_output(&config.output, &target, &samples, config.sample_rate)?;

    Ok(RenderSummary {
        target,
        samples_written: plan.num_samples,
        data_size,
        appended: config.output.is_append(),
    })
}

/// Writes `samples` to `output`; the handle is closed when this returns.
fn write_output(
    output: &OutputTarget,
    name: &str,
    samples: &[i16],
    sample_rate: u32,
) -> Result<u32> {
    match output {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            let mut stream = ByteStream::new(BufWriter::new(stdout.lock()), name);
            wav::create(&mut stream, samples, sample_rate)
        }
        OutputTarget::Create(path) => {
            let file = File::create(path).map_err(|e| SoundError::write_failed(name, e))?;
            let mut stream = ByteStream::new(BufWriter::new(file), name);
            wav::create(&mut stream, samples, sample_rate)
        }
        OutputTarget::Append(path) => {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .open(path)
                .map_err(|e| SoundError::read_failed(name, e))?;
            let mut stream = ByteStream::new(file, name);
            wav::append(&mut stream, samples, sample_rate)
        }
    }
}
