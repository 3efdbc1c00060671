//! Minimal logger.
//!
//! Prints `[elapsed LEVEL thread] message` to stderr. The pipeline runs a
//! capture thread next to the caller's tick loop, so every line carries the
//! name of the thread that emitted it. Use `init_with_level` once at startup.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let thread = std::thread::current();
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            thread.name(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// One log line without the trailing newline. Unnamed threads show as `unnamed`.
fn format_line(elapsed_s: f64, level: Level, thread: Option<&str>, args: &std::fmt::Arguments) -> String {
    format!(
        "[{:8.3}s {:>5} {}] {}",
        elapsed_s,
        level,
        thread.unwrap_or("unnamed"),
        args
    )
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber instead of the stderr logger.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Span close events
/// carry timings for the instrumented stages (segmentation, both classifiers,
/// the Hough passes and `tick`), and every event is tagged with its thread so
/// capture-side records can be told apart from tick-side ones. With `json`
/// set, events are flattened one JSON object per line; otherwise they are
/// human-readable with an uptime timestamp. `log` records are forwarded by
/// the subscriber's `tracing-log` bridge.
///
/// Does nothing if a global subscriber is already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_thread_names(true)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_thread_names(true)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_elapsed_level_and_thread() {
        let line = format_line(1.5, Level::Warn, Some("frame-capture"), &format_args!("reconnect {}", 2));
        assert_eq!(line, "[   1.500s  WARN frame-capture] reconnect 2");
    }

    #[test]
    fn unnamed_thread_is_labelled() {
        let line = format_line(0.0, Level::Debug, None, &format_args!("tick"));
        assert!(line.contains("DEBUG unnamed] tick"), "{line}");
    }

    #[test]
    fn repeated_init_is_ok() -> Result<(), Box<dyn std::error::Error>> {
        init_with_level(LevelFilter::Warn)?;
        init_with_level(LevelFilter::Trace)?;
        Ok(())
    }
}
