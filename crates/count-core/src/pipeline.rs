//! One complete filter run: copy, periodic status and final status

use crate::config::CountConfig;
use crate::counters::CounterSnapshot;
use crate::engine::CopyEngine;
use crate::error::Result;
use crate::progress::ProgressRenderer;
use crate::size::format_byte_rate;
use crate::ticker::Ticker;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySummary {
    /// Bytes copied
    pub total: u64,

    /// Final value of the counter
    pub count: u64,

    /// Total time elapsed
    pub elapsed: Duration,

    /// Average speed in bytes per second
    pub average_speed: u64,
}

impl CopySummary {
    fn new(snapshot: CounterSnapshot, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let average_speed = if secs > 0.0 {
            (snapshot.total as f64 / secs) as u64
        } else {
            snapshot.total
        };
        Self {
            total: snapshot.total,
            count: snapshot.count,
            elapsed,
            average_speed,
        }
    }

    /// Format average speed for display
    pub fn speed_display(&self) -> String {
        format_byte_rate(self.average_speed as f64)
    }
}

/// Copy `input` to `output`, drawing status lines on `status`
///
/// The status timer runs for the duration of the copy and is stopped before
/// this returns. The final line is drawn according to
/// [`CountConfig::final_status`]; otherwise a line left on screen is ended
/// with a newline so later messages start on a fresh line.
pub fn run<R, W, S>(config: &CountConfig, input: R, output: W, status: S) -> Result<CopySummary>
where
    R: Read,
    W: Write,
    S: Write + Send + 'static,
{
    let mut engine = CopyEngine::new(config.clone())?;
    let started = Instant::now();

    if config.quiet {
        let snapshot = engine.run(input, output)?;
        return Ok(CopySummary::new(snapshot, started.elapsed()));
    }

    let counters = engine.counters();
    let renderer = Arc::new(Mutex::new(ProgressRenderer::new(status, config)));

    let ticker = {
        let renderer = Arc::clone(&renderer);
        let counters = Arc::clone(&counters);
        Ticker::start(config.tick_interval, started, move |elapsed| {
            let snapshot = counters.snapshot();
            let mut renderer = renderer.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = renderer.tick(snapshot, elapsed) {
                tracing::debug!("status update failed: {}", e);
            }
        })
    };
    let ticker = match ticker {
        Ok(ticker) => Some(ticker),
        Err(e) => {
            tracing::warn!("cannot start status timer, continuing without updates: {}", e);
            None
        }
    };

    let result = engine.run(input, output);
    if let Some(ticker) = ticker {
        ticker.stop();
    }

    let elapsed = started.elapsed();
    let snapshot = counters.snapshot();
    let failed = result.is_err();

    let mut renderer = renderer.lock().unwrap_or_else(PoisonError::into_inner);
    let drawn = if config.final_status.renders(failed) {
        renderer.finish(snapshot, elapsed)
    } else {
        renderer.abandon()
    };
    if let Err(e) = drawn {
        tracing::warn!("failed to write final status: {}", e);
    }

    result?;
    Ok(CopySummary::new(snapshot, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountMode, FinalStatus};
    use crate::error::Error;
    use std::io::{self, Cursor};
    use std::num::NonZeroUsize;

    /// Status stream that can be inspected after the run
    #[derive(Clone, Default)]
    struct SharedStatus(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedStatus {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedStatus {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn blocks(size: usize) -> CountMode {
        CountMode::Blocks(NonZeroUsize::new(size).unwrap())
    }

    #[test]
    fn test_copy_summary_speed() {
        let summary = CopySummary::new(
            CounterSnapshot {
                total: 2048,
                count: 2,
            },
            Duration::from_secs(2),
        );
        assert_eq!(summary.average_speed, 1024);
        assert_eq!(summary.speed_display(), "1.0 KiB/s");
    }

    #[test]
    fn test_final_status_on_success() {
        let status = SharedStatus::default();
        let config = CountConfig::new(blocks(1024)).final_status(FinalStatus::OnSuccess);
        let mut out = Vec::new();

        let summary = run(&config, Cursor::new(vec![7u8; 10_000]), &mut out, status.clone())
            .unwrap();

        assert_eq!(summary.total, 10_000);
        assert_eq!(summary.count, 9);
        assert_eq!(out.len(), 10_000);
        let text = status.text();
        assert!(text.contains("9 Blocks"), "status was {:?}", text);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_no_status_without_final_on_fast_run() {
        let status = SharedStatus::default();
        let config = CountConfig::new(CountMode::Lines).tick_interval(Duration::from_secs(60));

        run(&config, Cursor::new(b"a\nb\n".to_vec()), io::sink(), status.clone()).unwrap();

        assert_eq!(status.text(), "");
    }

    #[test]
    fn test_quiet_writes_nothing() {
        let status = SharedStatus::default();
        let config = CountConfig::new(CountMode::Lines)
            .quiet(true)
            .final_status(FinalStatus::Always);

        let summary = run(&config, Cursor::new(b"x\n".to_vec()), io::sink(), status.clone())
            .unwrap();

        assert_eq!(summary.count, 1);
        assert_eq!(status.text(), "");
    }

    #[test]
    fn test_write_error_skips_final_on_success_policy() {
        let status = SharedStatus::default();
        let config = CountConfig::new(blocks(16)).final_status(FinalStatus::OnSuccess);

        let err = run(&config, Cursor::new(vec![1u8; 64]), BrokenSink, status.clone())
            .unwrap_err();

        assert!(matches!(err, Error::Write(_)));
        assert_eq!(status.text(), "");
    }

    #[test]
    fn test_write_error_renders_final_with_always_policy() {
        let status = SharedStatus::default();
        let config = CountConfig::new(blocks(16)).final_status(FinalStatus::Always);

        let err = run(&config, Cursor::new(vec![1u8; 64]), BrokenSink, status.clone())
            .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        let text = status.text();
        assert!(text.contains("1 Blocks"), "status was {:?}", text);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_invalid_config_fails_before_reading() {
        struct MustNotRead;
        impl Read for MustNotRead {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                panic!("input read despite invalid configuration");
            }
        }

        let config = CountConfig::new(CountMode::Lines).tick_interval(Duration::ZERO);
        let err = run(&config, MustNotRead, io::sink(), io::sink()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
