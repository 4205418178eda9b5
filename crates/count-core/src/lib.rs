//! # Count Core
//!
//! Core library for `count`, a pipe filter in between `cat` and `wc -l`:
//! it copies its input to its output unchanged while counting lines,
//! NUL-terminated records, fixed-size blocks or bytes, and keeps a status
//! line up to date on the terminal.
//!
//! ## Modules
//!
//! - `engine`: The counting copy loop with output block reshaping
//! - `scanner`: Record terminator scanning
//! - `counters`: Counters shared between the copy loop and the status line
//! - `rate`: Instantaneous and smoothed rate estimation
//! - `progress`: Status line formatting and in-place drawing
//! - `ticker`: Periodic timer thread for status updates
//! - `pipeline`: One complete run wiring all of the above
//! - `buffer`: Growable buffer between input and output
//! - `config`: Runtime configuration
//! - `settings`: Persistent user settings from configuration file
//! - `size`: Size parsing and human-readable formatting
//! - `error`: Error types and result aliases
//!
//! ## Example
//!
//! ```ignore
//! use count_core::{pipeline, CountConfig, CountMode};
//! use std::num::NonZeroUsize;
//!
//! let mode = CountMode::Blocks(NonZeroUsize::new(1024 * 1024).unwrap());
//! let config = CountConfig::new(mode).max(4096).show_current(true);
//!
//! let summary = pipeline::run(&config, std::io::stdin(), std::io::stdout(), std::io::stderr())?;
//! eprintln!("{} blocks, {}", summary.count, summary.speed_display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod config;
pub mod counters;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod rate;
pub mod scanner;
pub mod settings;
pub mod size;
pub mod ticker;

pub use buffer::StreamBuffer;
pub use config::{
    CountConfig, CountMode, FinalStatus, DEFAULT_INPUT_CHUNK, DEFAULT_TICK_INTERVAL,
    MAX_BLOCK_SIZE,
};
pub use counters::{CounterSnapshot, Counters};
pub use engine::CopyEngine;
pub use error::{Error, Result, EXIT_CONFIG, EXIT_IO, EXIT_SUCCESS};
pub use pipeline::CopySummary;
pub use progress::{percentage, ProgressRenderer};
pub use rate::{RateEstimator, RateReading, RATE_WINDOW};
pub use scanner::{count_records, RecordScanner};
pub use settings::{DisplaySettings, IoSettings, Settings, SettingsError};
pub use size::{format_byte_rate, format_elapsed, format_unit_rate, parse_bounded_size, parse_size};
pub use ticker::Ticker;
