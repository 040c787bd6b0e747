//! Process-wide file logging.
//!
//! # Invariants
//! - The logger starts at most once per process. Repeating the call with the
//!   same level and directory is a no-op; any other combination is refused.
//! - Starting the logger never panics.
//! - Events are `key=value` metadata lines. Names, phone numbers, note text
//!   and other record content are never logged.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "pocketbook";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_SUMMARY_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    RelativeDir(PathBuf),
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// Logger already runs with a different level or directory.
    AlreadyStarted {
        level: LevelFilter,
        log_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeDir(path) => {
                write!(f, "log directory must be absolute, got `{}`", path.display())
            }
            Self::CreateDir { path, source } => {
                write!(f, "cannot create log directory `{}`: {source}", path.display())
            }
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::AlreadyStarted { level, log_dir } => write!(
                f,
                "logging already started at level `{level}` in `{}`",
                log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parses a level name; `warning` is accepted as `warn`.
pub fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        _ => Err(LoggingError::UnknownLevel(raw.trim().to_string())),
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Starts rotating file logs under `log_dir`.
///
/// # Errors
/// - Unknown `level`, relative `log_dir`, or an uncreatable directory.
/// - `AlreadyStarted` when called again with a different configuration.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    if !log_dir.is_absolute() {
        return Err(LoggingError::RelativeDir(log_dir.to_path_buf()));
    }

    let active = ACTIVE.get_or_try_init(|| start(level, log_dir))?;
    if active.level != level || active.log_dir != log_dir {
        return Err(LoggingError::AlreadyStarted {
            level: active.level,
            log_dir: active.log_dir.clone(),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` of the running logger.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

fn start(level: LevelFilter, log_dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level.to_string().to_ascii_lowercase())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=app_start module=core status=ok version={} os={} level={level}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string payload".to_string());
        error!(
            "event=panic module=core status=error location={location} payload={}",
            one_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(panic);
    }));
}

/// Flattens line breaks and caps the length; payloads may echo user input.
fn one_line(value: &str, max_chars: usize) -> String {
    let mut flat: String = value
        .chars()
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        flat.push_str("...");
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::{
        default_log_level, init_logging, logging_status, one_line, parse_level, LoggingError,
    };
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn parse_level_is_case_insensitive() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level(" warning ").unwrap(), LevelFilter::Warn);
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::UnknownLevel(level)) if level == "verbose"
        ));
        assert!(parse_level(default_log_level()).is_ok());
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("a\nb\rc", 10), "a b c");
        assert_eq!(one_line("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        assert!(matches!(
            init_logging("info", Path::new("logs/dev")),
            Err(LoggingError::RelativeDir(_))
        ));
    }

    #[test]
    fn second_init_must_match_first() {
        let log_dir = tempfile::tempdir().expect("temp dir");
        let other_dir = tempfile::tempdir().expect("temp dir");

        init_logging("info", log_dir.path()).expect("first init");
        init_logging("INFO", log_dir.path()).expect("same config is a no-op");

        assert!(matches!(
            init_logging("debug", log_dir.path()),
            Err(LoggingError::AlreadyStarted { .. })
        ));
        assert!(matches!(
            init_logging("info", other_dir.path()),
            Err(LoggingError::AlreadyStarted { .. })
        ));

        let (level, dir) = logging_status().expect("logger running");
        assert_eq!(level, LevelFilter::Info);
        assert_eq!(dir, log_dir.path());
    }
}
