//! Audio generation module.
//!
//! Provides the wave functions and the pipeline that mixes them into
//! samples and writes the result.

pub mod pipeline;
pub mod waveform;

// Re-export commonly used items
pub use pipeline::{num_samples, plan, render, synthesize, RenderPlan, RenderSummary};
pub use waveform::WaveKind;
