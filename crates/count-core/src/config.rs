//! Runtime configuration for a counting run
//!
//! Everything here is fixed before the first byte is read: the counting
//! mode, the reshape parameters and the display options.

use crate::error::{Error, Result};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

/// Default input chunk size when no block size is given
pub const DEFAULT_INPUT_CHUNK: usize = 8192;

/// Largest accepted block, chunk or output size
pub const MAX_BLOCK_SIZE: usize = 0x3fff_ffff;

/// Default interval between status updates
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the `count` counter counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMode {
    /// Newline-terminated records
    Lines,
    /// NUL-terminated records
    NulRecords,
    /// Fixed-size blocks of the given size
    Blocks(NonZeroUsize),
    /// Raw bytes
    Bytes,
}

impl CountMode {
    /// Select the mode from the `-b` block size and the NUL flag
    ///
    /// No block size means records; `0` means bytes; anything else blocks.
    pub fn from_block_size(block_size: Option<usize>, nul_records: bool) -> Result<Self> {
        match (block_size, nul_records) {
            (Some(_), true) => Err(Error::InvalidConfig(
                "NUL records cannot be combined with a block size".to_string(),
            )),
            (None, true) => Ok(Self::NulRecords),
            (None, false) => Ok(Self::Lines),
            (Some(size), false) if size > MAX_BLOCK_SIZE => Err(Error::InvalidConfig(format!(
                "block size {} exceeds the maximum of {}",
                size, MAX_BLOCK_SIZE
            ))),
            (Some(size), false) => Ok(NonZeroUsize::new(size).map_or(Self::Bytes, Self::Blocks)),
        }
    }

    /// Terminator byte for record modes
    pub fn terminator(&self) -> Option<u8> {
        match self {
            Self::Lines => Some(b'\n'),
            Self::NulRecords => Some(0),
            Self::Blocks(_) | Self::Bytes => None,
        }
    }

    /// Divisor applied to `total` for block and byte modes
    pub fn divisor(&self) -> Option<u64> {
        match self {
            Self::Blocks(size) => Some(size.get() as u64),
            Self::Bytes => Some(1),
            Self::Lines | Self::NulRecords => None,
        }
    }

    /// Configured block size, block mode only
    pub fn block_size(&self) -> Option<usize> {
        match self {
            Self::Blocks(size) => Some(size.get()),
            _ => None,
        }
    }

    /// Label shown after the counter in the status line
    pub fn unit_label(&self) -> &'static str {
        match self {
            Self::Lines => "Lines",
            Self::NulRecords => "Records",
            Self::Blocks(_) => "Blocks",
            Self::Bytes => "Byte",
        }
    }
}

/// When to render the final status line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FinalStatus {
    /// Never render a final line
    #[default]
    Never,
    /// Render it on clean end-of-stream only
    OnSuccess,
    /// Render it on clean end-of-stream and before reporting a fatal error
    Always,
}

impl FinalStatus {
    /// Whether the final line renders for a run that ended this way
    pub fn renders(&self, failed: bool) -> bool {
        match self {
            Self::Never => false,
            Self::OnSuccess => !failed,
            Self::Always => true,
        }
    }

    /// Name as accepted by the command line and settings file
    pub fn name(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::OnSuccess => "success",
            Self::Always => "always",
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FinalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "never" | "no" | "off" => Ok(Self::Never),
            "success" | "on-success" | "yes" | "on" => Ok(Self::OnSuccess),
            "always" => Ok(Self::Always),
            other => Err(Error::InvalidConfig(format!(
                "unknown final status '{}', expected never, success or always",
                other
            ))),
        }
    }
}

/// Configuration for one counting run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountConfig {
    /// Counting mode, fixed for the run
    pub mode: CountMode,

    /// Bytes requested per read
    pub input_chunk: usize,

    /// Bytes per write; 0 writes whatever was read, unsplit
    pub output_block: usize,

    /// Expected final count; 0 disables the percentage
    pub max: u64,

    /// Show smoothed and instantaneous rates
    pub show_current: bool,

    /// Final status line policy
    pub final_status: FinalStatus,

    /// Suppress all status output
    pub quiet: bool,

    /// Interval between status updates
    pub tick_interval: Duration,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self::new(CountMode::Lines)
    }
}

impl CountConfig {
    /// Create a config for `mode` with I/O sizes derived from it
    ///
    /// In block mode both the input chunk and the output block default to
    /// the block size. Otherwise reads use [`DEFAULT_INPUT_CHUNK`] and writes
    /// are not reshaped.
    pub fn new(mode: CountMode) -> Self {
        Self {
            mode,
            input_chunk: mode.block_size().unwrap_or(DEFAULT_INPUT_CHUNK),
            output_block: mode.block_size().unwrap_or(0),
            max: 0,
            show_current: false,
            final_status: FinalStatus::Never,
            quiet: false,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Set the input chunk size; 0 keeps the mode default
    pub fn input_chunk(mut self, size: usize) -> Self {
        if size > 0 {
            self.input_chunk = size;
        }
        self
    }

    /// Set the output block size; 0 keeps the mode default
    pub fn output_block(mut self, size: usize) -> Self {
        if size > 0 {
            self.output_block = size;
        }
        self
    }

    /// Set the expected maximum count
    pub fn max(mut self, max: u64) -> Self {
        self.max = max;
        self
    }

    /// Show current rates
    pub fn show_current(mut self, show: bool) -> Self {
        self.show_current = show;
        self
    }

    /// Set the final status policy
    pub fn final_status(mut self, policy: FinalStatus) -> Self {
        self.final_status = policy;
        self
    }

    /// Suppress status output
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the status update interval
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Whether short remainders are held back until more input arrives
    pub fn withholds_remainder(&self) -> bool {
        self.output_block > 0
    }

    /// Check ranges before any I/O happens
    pub fn validate(&self) -> Result<()> {
        if self.input_chunk == 0 || self.input_chunk > MAX_BLOCK_SIZE {
            return Err(Error::InvalidConfig(format!(
                "input block size must be between 1 and {}, got {}",
                MAX_BLOCK_SIZE, self.input_chunk
            )));
        }
        if self.output_block > MAX_BLOCK_SIZE {
            return Err(Error::InvalidConfig(format!(
                "output block size must be at most {}, got {}",
                MAX_BLOCK_SIZE, self.output_block
            )));
        }
        if let Some(size) = self.mode.block_size() {
            if size > MAX_BLOCK_SIZE {
                return Err(Error::InvalidConfig(format!(
                    "block size must be at most {}, got {}",
                    MAX_BLOCK_SIZE, size
                )));
            }
        }
        if self.tick_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "status interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(size: usize) -> CountMode {
        CountMode::Blocks(NonZeroUsize::new(size).unwrap())
    }

    // -------------------------------------------------------------------------
    // CountMode tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_mode_from_block_size() {
        assert_eq!(
            CountMode::from_block_size(None, false).unwrap(),
            CountMode::Lines
        );
        assert_eq!(
            CountMode::from_block_size(None, true).unwrap(),
            CountMode::NulRecords
        );
        assert_eq!(
            CountMode::from_block_size(Some(0), false).unwrap(),
            CountMode::Bytes
        );
        assert_eq!(
            CountMode::from_block_size(Some(1024), false).unwrap(),
            blocks(1024)
        );
    }

    #[test]
    fn test_mode_rejects_invalid_combinations() {
        assert!(CountMode::from_block_size(Some(512), true).is_err());
        assert!(CountMode::from_block_size(Some(MAX_BLOCK_SIZE + 1), false).is_err());
        assert!(CountMode::from_block_size(Some(MAX_BLOCK_SIZE), false).is_ok());
    }

    #[test]
    fn test_mode_terminator_and_labels() {
        assert_eq!(CountMode::Lines.terminator(), Some(b'\n'));
        assert_eq!(CountMode::NulRecords.terminator(), Some(0));
        assert_eq!(CountMode::Bytes.terminator(), None);
        assert_eq!(blocks(4).terminator(), None);

        assert_eq!(CountMode::Lines.unit_label(), "Lines");
        assert_eq!(CountMode::NulRecords.unit_label(), "Records");
        assert_eq!(blocks(4).unit_label(), "Blocks");
        assert_eq!(CountMode::Bytes.unit_label(), "Byte");
    }

    #[test]
    fn test_divisor() {
        assert_eq!(blocks(1024).divisor(), Some(1024));
        assert_eq!(CountMode::Bytes.divisor(), Some(1));
        assert_eq!(CountMode::Lines.divisor(), None);
    }

    // -------------------------------------------------------------------------
    // FinalStatus tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_final_status_parse() {
        assert_eq!("never".parse::<FinalStatus>().unwrap(), FinalStatus::Never);
        assert_eq!(
            "success".parse::<FinalStatus>().unwrap(),
            FinalStatus::OnSuccess
        );
        assert_eq!(
            " ALWAYS ".parse::<FinalStatus>().unwrap(),
            FinalStatus::Always
        );
        assert!("sometimes".parse::<FinalStatus>().is_err());
    }

    #[test]
    fn test_final_status_renders() {
        assert!(!FinalStatus::Never.renders(false));
        assert!(!FinalStatus::Never.renders(true));
        assert!(FinalStatus::OnSuccess.renders(false));
        assert!(!FinalStatus::OnSuccess.renders(true));
        assert!(FinalStatus::Always.renders(false));
        assert!(FinalStatus::Always.renders(true));
    }

    #[test]
    fn test_final_status_display_roundtrip() {
        for policy in [FinalStatus::Never, FinalStatus::OnSuccess, FinalStatus::Always] {
            assert_eq!(policy.to_string().parse::<FinalStatus>().unwrap(), policy);
        }
    }

    // -------------------------------------------------------------------------
    // CountConfig tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_defaults_for_lines() {
        let config = CountConfig::new(CountMode::Lines);
        assert_eq!(config.input_chunk, DEFAULT_INPUT_CHUNK);
        assert_eq!(config.output_block, 0);
        assert_eq!(config.max, 0);
        assert!(!config.withholds_remainder());
        assert_eq!(config.tick_interval, DEFAULT_TICK_INTERVAL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_defaults_for_blocks() {
        let config = CountConfig::new(blocks(1024 * 1024));
        assert_eq!(config.input_chunk, 1024 * 1024);
        assert_eq!(config.output_block, 1024 * 1024);
        assert!(config.withholds_remainder());
    }

    #[test]
    fn test_config_builder() {
        let config = CountConfig::new(CountMode::Bytes)
            .input_chunk(4096)
            .output_block(512)
            .max(100)
            .show_current(true)
            .final_status(FinalStatus::Always)
            .quiet(true)
            .tick_interval(Duration::from_millis(250));

        assert_eq!(config.input_chunk, 4096);
        assert_eq!(config.output_block, 512);
        assert_eq!(config.max, 100);
        assert!(config.show_current);
        assert_eq!(config.final_status, FinalStatus::Always);
        assert!(config.quiet);
        assert_eq!(config.tick_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_config_zero_sizes_keep_defaults() {
        let config = CountConfig::new(blocks(64)).input_chunk(0).output_block(0);
        assert_eq!(config.input_chunk, 64);
        assert_eq!(config.output_block, 64);
    }

    #[test]
    fn test_config_validate_rejects_out_of_range() {
        let config = CountConfig::new(CountMode::Lines).input_chunk(MAX_BLOCK_SIZE + 1);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = CountConfig::new(CountMode::Lines).output_block(MAX_BLOCK_SIZE + 1);
        assert!(config.validate().is_err());

        let config = CountConfig::new(CountMode::Lines).tick_interval(Duration::ZERO);
        assert!(config.validate().is_err());

        let mut config = CountConfig::new(CountMode::Lines);
        config.input_chunk = 0;
        assert!(config.validate().is_err());
    }
}
