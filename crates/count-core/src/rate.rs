//! Rate estimation with smoothing
//!
//! Ticks arrive roughly once per interval but can be late when the copy
//! loop sits in a blocking read or write. The instantaneous rate follows the
//! last tick only; the smoothed rate is the slope across a short window of
//! ticks, which is the time-weighted mean of the instantaneous rates in it.

use std::collections::VecDeque;
use std::time::Duration;

/// Number of samples kept for the smoothed rate
pub const RATE_WINDOW: usize = 5;

/// Rates derived from the samples seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateReading {
    /// Rate between the last two ticks, per second
    pub instant: Option<f64>,

    /// Rate across the sample window, per second
    pub smoothed: Option<f64>,
}

impl RateReading {
    /// Whether any rate is available yet
    pub fn is_empty(&self) -> bool {
        self.instant.is_none() && self.smoothed.is_none()
    }
}

/// Tracks one cumulative counter sampled at irregular times
#[derive(Debug, Clone)]
pub struct RateEstimator {
    samples: VecDeque<(Duration, u64)>,
    window: usize,
    reading: RateReading,
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl RateEstimator {
    /// Create an estimator with the default window
    pub fn new() -> Self {
        Self::with_window(RATE_WINDOW)
    }

    /// Create an estimator keeping `window` samples (at least 2)
    pub fn with_window(window: usize) -> Self {
        let window = window.max(2);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            reading: RateReading::default(),
        }
    }

    /// Record `value` observed at `elapsed` run time and return new rates
    ///
    /// A tick at the same (or an earlier) time as the previous one replaces
    /// that sample's value and suppresses the instantaneous rate.
    pub fn update(&mut self, value: u64, elapsed: Duration) -> RateReading {
        let repeated = match self.samples.back_mut() {
            Some(last) if elapsed <= last.0 => {
                last.1 = last.1.max(value);
                true
            }
            _ => false,
        };

        if !repeated {
            if self.samples.len() == self.window {
                self.samples.pop_front();
            }
            self.samples.push_back((elapsed, value));
        }

        let instant = if repeated {
            None
        } else {
            self.last_pair_rate()
        };
        self.reading = RateReading {
            instant,
            smoothed: self.window_rate(),
        };
        self.reading
    }

    /// Rates from the latest update
    pub fn reading(&self) -> RateReading {
        self.reading
    }

    /// Number of samples currently held
    pub fn samples(&self) -> usize {
        self.samples.len()
    }

    fn last_pair_rate(&self) -> Option<f64> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        slope(self.samples[n - 2], self.samples[n - 1])
    }

    fn window_rate(&self) -> Option<f64> {
        match (self.samples.front(), self.samples.back()) {
            (Some(&first), Some(&last)) if self.samples.len() >= 2 => slope(first, last),
            _ => None,
        }
    }
}

fn slope(from: (Duration, u64), to: (Duration, u64)) -> Option<f64> {
    let dt = to.0.checked_sub(from.0)?.as_secs_f64();
    if dt <= 0.0 {
        return None;
    }
    let rate = to.1.saturating_sub(from.1) as f64 / dt;
    rate.is_finite().then_some(rate)
}
