//! Process-wide log sink for the position engine.
//!
//! # Responsibility
//! - Start one rolling file logger per process from a validated [`LogConfig`].
//! - Route panics into the same sink before the default hook runs.
//!
//! # Invariants
//! - Engine events are `key=value` metadata: ids, positions, counts and
//!   durations. Board names and task titles never reach the log, and panic
//!   payloads are cut to their first line.
//! - Once a sink is running, only the identical config is accepted again.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "taskboard";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 7;
const PANIC_PAYLOAD_CHAR_LIMIT: usize = 120;

static ACTIVE_SINK: OnceCell<ActiveSink> = OnceCell::new();

struct ActiveSink {
    config: LogConfig,
    _handle: LoggerHandle,
}

/// Verbosity of the engine log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `debug` in debug builds, `info` in release builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::Trace,
            Self::Debug => LevelFilter::Debug,
            Self::Info => LevelFilter::Info,
            Self::Warn => LevelFilter::Warn,
            Self::Error => LevelFilter::Error,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected `--log-level` / `TASKBOARD_LOG_LEVEL` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogLevel(pub String);

impl Display for UnknownLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown log level `{}`; expected trace|debug|info|warn|error",
            self.0
        )
    }
}

impl std::error::Error for UnknownLogLevel {}

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(UnknownLogLevel(value.trim().to_string())),
        }
    }
}

/// Level and directory of the engine log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    level: LogLevel,
    dir: PathBuf,
}

impl LogConfig {
    /// Builds a config; `dir` must be absolute.
    pub fn new(level: LogLevel, dir: impl Into<PathBuf>) -> Result<Self, LoggingError> {
        let dir = dir.into();
        if !dir.is_absolute() {
            return Err(LoggingError::RelativeDir(dir));
        }
        Ok(Self { level, dir })
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Log sink setup failures.
#[derive(Debug)]
pub enum LoggingError {
    RelativeDir(PathBuf),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    /// A sink with a different config is already running.
    AlreadyActive { active: LogConfig },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateDir { dir, source } => write!(
                f,
                "cannot create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(err) => write!(f, "log backend failed to start: {err}"),
            Self::AlreadyActive { active } => write!(
                f,
                "logging already active at `{}` with level `{}`",
                active.dir.display(),
                active.level
            ),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::RelativeDir(_) | Self::AlreadyActive { .. } => None,
        }
    }
}

/// Starts the engine log sink, or confirms the running one matches `config`.
///
/// # Errors
/// - [`LoggingError::AlreadyActive`] when a sink with another level or
///   directory is running.
/// - [`LoggingError::CreateDir`] / [`LoggingError::Backend`] when the sink
///   cannot start; no panic hook is installed in that case.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let sink = ACTIVE_SINK.get_or_try_init(|| start_sink(config))?;
    if sink.config != *config {
        return Err(LoggingError::AlreadyActive {
            active: sink.config.clone(),
        });
    }
    Ok(())
}

/// Config of the running sink, if one was started.
pub fn active_config() -> Option<LogConfig> {
    ACTIVE_SINK.get().map(|sink| sink.config.clone())
}

fn start_sink(config: &LogConfig) -> Result<ActiveSink, LoggingError> {
    std::fs::create_dir_all(&config.dir).map_err(|source| LoggingError::CreateDir {
        dir: config.dir.clone(),
        source,
    })?;

    let handle = Logger::with(config.level.filter())
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    forward_panics_to_log();

    info!(
        "event=engine_init module=core status=ok level={} schema_version={} version={}",
        config.level,
        crate::db::migrations::latest_version(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveSink {
        config: config.clone(),
        _handle: handle,
    })
}

fn forward_panics_to_log() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!(
            "event=panic module=core status=error location={} payload={}",
            location,
            panic_summary(info.payload())
        );
        previous(info);
    }));
}

fn panic_summary(payload: &(dyn Any + Send)) -> String {
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string payload>");
    first_line_capped(text, PANIC_PAYLOAD_CHAR_LIMIT)
}

fn first_line_capped(text: &str, limit: usize) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("");
    let mut summary: String = first.chars().take(limit).collect();
    if first.chars().count() > limit || lines.next().is_some() {
        summary.push_str("...");
    }
    summary
}
