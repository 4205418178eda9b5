//! Stream copy engine
//!
//! This module provides the counting copy loop:
//! - Reads input in chunks of the configured size
//! - Updates the shared byte and record/block counters per chunk
//! - Reshapes output into blocks of the configured size
//! - Flushes any short remainder once the input ends

use crate::buffer::StreamBuffer;
use crate::config::CountConfig;
use crate::counters::{CounterSnapshot, Counters};
use crate::error::{Error, Result};
use crate::scanner::count_records;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Copies input to output while counting
pub struct CopyEngine {
    config: CountConfig,
    counters: Arc<Counters>,
}

impl CopyEngine {
    /// Create an engine with fresh counters
    ///
    /// Fails with [`Error::InvalidConfig`] before any I/O if the
    /// configuration is out of range.
    pub fn new(config: CountConfig) -> Result<Self> {
        Self::with_counters(config, Arc::new(Counters::new()))
    }

    /// Create an engine updating the given counters
    pub fn with_counters(config: CountConfig, counters: Arc<Counters>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, counters })
    }

    /// Shared handle to the run counters
    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }

    /// Copy `input` to `output` until end-of-stream
    ///
    /// # Returns
    /// * `Ok(CounterSnapshot)` - Final counters after a clean end-of-stream
    /// * `Err(Error::Write)` - The output failed; nothing more was written
    /// * `Err(Error::Read)` - The input failed with a hard fault
    pub fn run<R, W>(&mut self, mut input: R, mut output: W) -> Result<CounterSnapshot>
    where
        R: Read,
        W: Write,
    {
        let chunk = self.config.input_chunk;
        let divisor = self.config.mode.divisor();
        let terminator = self.config.mode.terminator();

        tracing::debug!(
            mode = ?self.config.mode,
            input_chunk = chunk,
            output_block = self.config.output_block,
            "starting copy"
        );

        let mut buffer = StreamBuffer::new();
        let mut previous = 0usize;

        loop {
            let got = match buffer.fill_from(&mut input, chunk) {
                Ok(n) => n,
                Err(e) if ends_stream(&e) => {
                    tracing::debug!("input closed: {}", e);
                    0
                }
                Err(e) => return Err(Error::Read(e)),
            };
            if got == 0 {
                break;
            }

            let len = buffer.len();
            let records = terminator.map_or(0, |t| count_records(buffer.as_slice(), previous, t));
            self.counters.record((len - previous) as u64, records, divisor);

            self.drain(&mut buffer, &mut output)?;
            previous = buffer.len();
        }

        if !buffer.is_empty() {
            tracing::debug!("flushing {} byte remainder", buffer.len());
            let remainder = buffer.len();
            buffer
                .drain_to(&mut output, remainder)
                .map_err(Error::Write)?;
        }
        output.flush().map_err(Error::Write)?;

        let snapshot = self.counters.snapshot();
        tracing::debug!(total = snapshot.total, count = snapshot.count, "copy finished");
        Ok(snapshot)
    }

    /// Write out every full output block, holding back a short remainder
    fn drain<W: Write>(&self, buffer: &mut StreamBuffer, output: &mut W) -> Result<()> {
        let block = self.config.output_block;

        while !buffer.is_empty() {
            let mut n = buffer.len();
            if self.config.withholds_remainder() {
                if n > block {
                    n = block;
                } else if n < block {
                    break;
                }
            }
            buffer.drain_to(output, n).map_err(Error::Write)?;
        }
        Ok(())
    }
}

/// Read errors that mean the producer went away rather than a fault
fn ends_stream(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset
    )
}

// ============================================================================
// UNIT TESTS
// ============================================================================
