//! Counters shared between the copy engine and the status renderer

use std::sync::{Mutex, PoisonError};

/// Consistent view of the counters at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Bytes transferred so far
    pub total: u64,

    /// Records, blocks or bytes counted so far
    pub count: u64,
}

/// Run counters, written by the engine and read by the renderer
///
/// `total` and `count` change together under one lock, so a reader never
/// sees a `count` that was not derived from the `total` next to it.
#[derive(Debug, Default)]
pub struct Counters {
    inner: Mutex<CounterSnapshot>,
}

impl Counters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `bytes` new bytes containing `records` terminators
    ///
    /// With a `divisor` (block and byte modes) `count` is recomputed from
    /// the new `total`; otherwise `records` is added to it.
    pub fn record(&self, bytes: u64, records: u64, divisor: Option<u64>) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.total += bytes;
        state.count = match divisor {
            Some(d) => state.total / d,
            None => state.count + records,
        };
    }

    /// Read both counters at once
    pub fn snapshot(&self) -> CounterSnapshot {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_block_mode_derives_count_from_total() {
        let counters = Counters::new();
        counters.record(1000, 0, Some(1024));
        assert_eq!(counters.snapshot(), CounterSnapshot { total: 1000, count: 0 });

        counters.record(9000, 0, Some(1024));
        assert_eq!(counters.snapshot(), CounterSnapshot { total: 10_000, count: 9 });
    }

    #[test]
    fn test_byte_mode_count_equals_total() {
        let counters = Counters::new();
        counters.record(7, 0, Some(1));
        counters.record(5, 0, Some(1));
        let snap = counters.snapshot();
        assert_eq!(snap.count, snap.total);
        assert_eq!(snap.total, 12);
    }

    #[test]
    fn test_record_mode_adds_records() {
        let counters = Counters::new();
        counters.record(6, 3, None);
        counters.record(4, 0, None);
        counters.record(2, 1, None);
        assert_eq!(counters.snapshot(), CounterSnapshot { total: 12, count: 4 });
    }

    #[test]
    fn test_concurrent_reader_sees_consistent_snapshots() {
        let counters = Arc::new(Counters::new());
        let writer = {
            let counters = Arc::clone(&counters);
            thread::spawn(move || {
                for _ in 0..10_000 {
                    counters.record(3, 0, Some(4));
                }
            })
        };

        for _ in 0..1_000 {
            let snap = counters.snapshot();
            assert_eq!(snap.count, snap.total / 4);
        }

        writer.join().unwrap();
        assert_eq!(counters.snapshot().total, 30_000);
    }
}
