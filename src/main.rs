//! wavetone: synthesize tones into 16-bit PCM WAVE files.
//!
//! Writes a new file (or standard output), or appends to a file written
//! earlier at the same sample rate.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wavetone::cli::Cli;
use wavetone::generation::{plan, render};
use wavetone::SoundError;

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("{}", diagnostic(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr so standard output can carry WAVE data.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WAVETONE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// One-line report for a failed run, led by the error class when known.
fn diagnostic(e: &anyhow::Error) -> String {
    match e.downcast_ref::<SoundError>() {
        Some(err) => format!("wavetone: {}: {:#}", err.code.description(), e),
        None => format!("wavetone: {:#}", e),
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let dry_run = cli.dry_run;
    let config = cli.into_config().context("invalid configuration")?;

    if dry_run {
        let plan = plan(&config)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let summary = render(&config).with_context(|| format!("failed to write {}", config.output))?;
    info!(
        output = %summary.target,
        samples = summary.samples_written,
        data_size = summary.data_size,
        appended = summary.appended,
        "Done"
    );

    Ok(())
}
