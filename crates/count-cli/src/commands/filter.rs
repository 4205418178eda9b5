//! The counting filter itself: stdin to stdout with a status line on stderr

use crate::stdio;
use anyhow::Result;
use clap::Args;
use count_core::{
    parse_bounded_size, parse_size, pipeline, CountConfig, CountMode, Error, FinalStatus,
    Settings, MAX_BLOCK_SIZE,
};
use std::time::Duration;

/// Options of the counting filter
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Count blocks of SIZE bytes instead of lines (0 counts bytes)
    #[arg(short, long, value_name = "SIZE")]
    pub block_size: Option<String>,

    /// Read in chunks of SIZE bytes (default: block size, else 8K)
    #[arg(short, long, value_name = "SIZE")]
    pub input_block: Option<String>,

    /// Write in blocks of SIZE bytes (default: block size in block mode)
    #[arg(short, long, value_name = "SIZE")]
    pub output_block: Option<String>,

    /// Expected final count, shown as a percentage
    #[arg(short, long, value_name = "N")]
    pub max: Option<String>,

    /// Show current rates next to the averages
    #[arg(short, long)]
    pub current: bool,

    /// Count NUL-terminated records instead of lines
    #[arg(short = 'z', long = "null", conflicts_with = "block_size")]
    pub null: bool,

    /// Print a final status line: never, success or always
    #[arg(
        short = 'f',
        long = "final",
        value_name = "WHEN",
        num_args = 0..=1,
        default_missing_value = "success"
    )]
    pub final_status: Option<String>,

    /// Milliseconds between status updates
    #[arg(long, value_name = "MS")]
    pub interval: Option<u64>,

    /// No status line and no log output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Resolve command-line options over persistent settings
pub fn build_config(args: &FilterArgs, settings: &Settings) -> count_core::Result<CountConfig> {
    let block_size = args.block_size.as_deref().map(parse_block).transpose()?;
    let mode = CountMode::from_block_size(block_size, args.null)?;

    let input_chunk = match args.input_block.as_deref() {
        Some(s) => parse_block(s)?,
        None => settings.io.input_block_size()?,
    };
    let output_block = match args.output_block.as_deref() {
        Some(s) => parse_block(s)?,
        None => settings.io.output_block_size()?,
    };
    let max = args.max.as_deref().map(parse_size).transpose()?.unwrap_or(0);
    let final_status = match args.final_status.as_deref() {
        Some(s) => s.parse::<FinalStatus>()?,
        None => settings.display.final_status()?,
    };
    let interval = args
        .interval
        .map(Duration::from_millis)
        .unwrap_or_else(|| settings.display.interval());

    let config = CountConfig::new(mode)
        .input_chunk(input_chunk)
        .output_block(output_block)
        .max(max)
        .show_current(args.current || settings.display.current)
        .final_status(final_status)
        .quiet(args.quiet || settings.display.quiet)
        .tick_interval(interval);
    config.validate()?;
    Ok(config)
}

fn parse_block(s: &str) -> count_core::Result<usize> {
    parse_bounded_size(s, MAX_BLOCK_SIZE as u64).map(|n| n as usize)
}

/// Execute the filter on the process's standard streams
pub fn execute(args: &FilterArgs, settings: &Settings) -> Result<()> {
    let config = build_config(args, settings)?;

    let input = stdio::stdin().map_err(Error::Read)?;
    let output = stdio::stdout().map_err(Error::Write)?;
    let summary = pipeline::run(&config, input, output, std::io::stderr())?;

    tracing::debug!(
        "copied {} bytes ({} {}) in {:.2?} at {}",
        summary.total,
        summary.count,
        config.mode.unit_label(),
        summary.elapsed,
        summary.speed_display()
    );
    Ok(())
}
