//! Status line rendering
//!
//! The status line is rewritten in place: every render after the first
//! starts with a carriage return, and only the final render ends the line.
//!
//! ```text
//! 1m 05s 50% 50/100 Blocks at 0.8/s (1.0/s) 812.3 KiB/s (now 1.0 MiB/s)
//! ```

use crate::config::{CountConfig, CountMode};
use crate::counters::CounterSnapshot;
use crate::rate::RateEstimator;
use crate::size::{format_byte_rate, format_elapsed, format_unit_rate};
use std::io::{self, Write};
use std::time::Duration;

/// Percentage of `count` against `max`, truncated; `None` when `max` is 0
pub fn percentage(count: u64, max: u64) -> Option<u64> {
    if max == 0 {
        return None;
    }
    let pct = u128::from(count) * 100 / u128::from(max);
    Some(u64::try_from(pct).unwrap_or(u64::MAX))
}

/// Renders the status line from counters and rate estimates
pub struct ProgressRenderer<S: Write> {
    status: S,
    mode: CountMode,
    max: u64,
    show_current: bool,
    count_rate: RateEstimator,
    byte_rate: RateEstimator,
    rendered: bool,
    on_screen: bool,
    last_width: usize,
}

impl<S: Write> ProgressRenderer<S> {
    /// Create a renderer writing to `status`
    pub fn new(status: S, config: &CountConfig) -> Self {
        Self {
            status,
            mode: config.mode,
            max: config.max,
            show_current: config.show_current,
            count_rate: RateEstimator::new(),
            byte_rate: RateEstimator::new(),
            rendered: false,
            on_screen: false,
            last_width: 0,
        }
    }

    /// Sample both rate estimators and redraw the line
    pub fn tick(&mut self, snapshot: CounterSnapshot, elapsed: Duration) -> io::Result<()> {
        self.count_rate.update(snapshot.count, elapsed);
        self.byte_rate.update(snapshot.total, elapsed);
        self.draw(snapshot, elapsed, false)
    }

    /// Draw the last line of the run and end it with a newline
    pub fn finish(&mut self, snapshot: CounterSnapshot, elapsed: Duration) -> io::Result<()> {
        self.draw(snapshot, elapsed, true)
    }

    /// End a line left on screen without drawing a final status
    pub fn abandon(&mut self) -> io::Result<()> {
        if self.on_screen {
            self.status.write_all(b"\n")?;
            self.status.flush()?;
            self.on_screen = false;
        }
        Ok(())
    }

    /// Whether a line has been drawn and not yet terminated
    pub fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    /// Format the status line without drawing it
    pub fn format_line(&self, snapshot: CounterSnapshot, elapsed: Duration) -> String {
        let mut line = format_elapsed(elapsed.as_secs());

        if let Some(pct) = percentage(snapshot.count, self.max) {
            line.push_str(&format!(" {}%", pct));
        }

        line.push_str(&format!(" {}", snapshot.count));
        if self.max > 0 {
            line.push_str(&format!("/{}", self.max));
        }
        line.push(' ');
        line.push_str(self.mode.unit_label());

        let count_rate = self.count_rate.reading();
        if self.show_current {
            if let Some(smoothed) = count_rate.smoothed {
                line.push_str(&format!(" at {}", format_unit_rate(smoothed)));
                if let Some(instant) = count_rate.instant {
                    line.push_str(&format!(" ({})", format_unit_rate(instant)));
                }
            }
        }

        let byte_rate = self.byte_rate.reading();
        let average = elapsed_secs(elapsed).map(|secs| snapshot.total as f64 / secs);
        if let Some(rate) = byte_rate.smoothed.or(average) {
            line.push(' ');
            line.push_str(&format_byte_rate(rate));
        }
        if self.show_current {
            if let Some(instant) = byte_rate.instant {
                line.push_str(&format!(" (now {})", format_byte_rate(instant)));
            }
        }

        line
    }

    /// Consume the renderer and return the status stream
    pub fn into_inner(self) -> S {
        self.status
    }

    fn draw(&mut self, snapshot: CounterSnapshot, elapsed: Duration, last: bool) -> io::Result<()> {
        let line = self.format_line(snapshot, elapsed);
        let width = line.chars().count();

        let mut out = String::with_capacity(line.len() + self.last_width + 2);
        if self.rendered {
            out.push('\r');
        }
        out.push_str(&line);
        // Blank out the tail of a longer previous line
        if self.on_screen && self.last_width > width {
            out.push_str(&" ".repeat(self.last_width - width));
        }
        if last {
            out.push('\n');
        }

        self.status.write_all(out.as_bytes())?;
        self.status.flush()?;

        self.rendered = true;
        self.on_screen = !last;
        self.last_width = if last { 0 } else { width };
        Ok(())
    }
}

fn elapsed_secs(elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    (secs > 0.0).then_some(secs)
}
