//! Stderr logging for the highway tools.
//!
//! Records from the `highway_*` crates are printed at the configured level.
//! Dependencies are capped at `warn` so that `--log-level debug` shows the
//! mapping and tracking output without third-party chatter. Lines look like
//! `[elapsed LEVEL] target: message`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Targets of the workspace crates, as they appear in `log` records.
const HIGHWAY_TARGETS: [&str; 3] = ["highway_core", "highway_tracking", "highway_track"];

/// Level cap for targets outside the workspace.
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Warn;

fn is_highway_target(target: &str) -> bool {
    HIGHWAY_TARGETS.iter().any(|t| {
        target
            .strip_prefix(t)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Effective level for records from `target`.
fn target_level(target: &str, level: LevelFilter) -> LevelFilter {
    if is_highway_target(target) {
        level
    } else {
        level.min(DEPENDENCY_LEVEL)
    }
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= target_level(metadata.target(), self.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5}] {}: {}",
            elapsed,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger; `level` applies to the `highway_*` crates.
///
/// Only the first call installs the logger; later calls are no-ops.
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

/// `EnvFilter` directives equivalent to the stderr logger's filtering.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn default_directives(level: LevelFilter) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = DEPENDENCY_LEVEL.as_str().to_ascii_lowercase();
    for target in HIGHWAY_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Install a `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the workspace crates log at `level`
/// and dependencies at `warn`, as with [`init_with_level`].
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn meta(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with_level(LevelFilter::Warn).expect("first init");
        init_with_level(LevelFilter::Debug).expect("second init");
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }

    #[test]
    fn workspace_targets_follow_the_configured_level() {
        let logger = StderrLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert!(logger.enabled(&meta(Level::Debug, "highway_core::mapper")));
        assert!(logger.enabled(&meta(Level::Debug, "highway_tracking")));
        assert!(logger.enabled(&meta(Level::Info, "highway_track")));
        assert!(!logger.enabled(&meta(Level::Trace, "highway_core")));

        assert!(!logger.enabled(&meta(Level::Debug, "nalgebra")));
        assert!(!logger.enabled(&meta(Level::Info, "highway_core_extra")));
        assert!(logger.enabled(&meta(Level::Warn, "serde_json")));
    }

    #[test]
    fn quiet_level_also_quiets_dependencies() {
        assert_eq!(target_level("clap", LevelFilter::Error), LevelFilter::Error);
        assert_eq!(target_level("clap", LevelFilter::Off), LevelFilter::Off);
        assert_eq!(target_level("clap", LevelFilter::Trace), LevelFilter::Warn);
        assert_eq!(
            target_level("highway_track::report", LevelFilter::Trace),
            LevelFilter::Trace
        );
    }

    #[test]
    fn tracing_directives_scope_level_to_workspace() {
        assert_eq!(
            default_directives(LevelFilter::Debug),
            "warn,highway_core=debug,highway_tracking=debug,highway_track=debug"
        );
    }
}
