//! File logging.
//!
//! The terminal belongs to the UI, so records only ever go to rotating files under
//! `<home>/logs`. The logger starts once per process; later calls leave it as it is.

use crate::error::{DiaryError, Result};
use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "diary";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_MESSAGE_CHARS: usize = 160;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Starts file logging at `level` (`off`, `error`, `warn`, `info`, `debug` or `trace`) into
/// `log_dir`, creating the directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    let level = parse_level(level)?;
    LOGGER.get_or_try_init(|| start(level, log_dir))?;
    Ok(())
}

fn start(level: LevelFilter, log_dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        DiaryError::Logging(format!("creating {}: {}", log_dir.display(), err))
    })?;

    let handle = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| DiaryError::Logging(format!("starting logger: {}", err)))?;

    log_panics();
    info!(
        "started version={} level={} dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        log_dir.display()
    );
    Ok(handle)
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse()
        .map_err(|_| DiaryError::Logging(format!("unknown log level `{}`", level.trim())))
}

fn log_panics() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("panic at {}: {}", location, panic_message(info.payload()));
        previous(info);
    }));
}

/// One line of at most [`MAX_PANIC_MESSAGE_CHARS`] chars. Diary text can end up in a panic
/// message, so it is never logged whole.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string payload"
    };

    let mut line: String = message
        .chars()
        .take(MAX_PANIC_MESSAGE_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if message.chars().count() > MAX_PANIC_MESSAGE_CHARS {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_level_accepts_known_values() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level(" off ").unwrap(), LevelFilter::Off);
        assert!(matches!(parse_level("chatty"), Err(DiaryError::Logging(_))));
    }

    #[test]
    fn panic_message_is_one_short_line() {
        let payload: Box<dyn Any + Send> = Box::new("line1\nline2\rline3");
        assert_eq!(panic_message(payload.as_ref()), "line1 line2 line3");

        let payload: Box<dyn Any + Send> = Box::new("x".repeat(200));
        let message = panic_message(payload.as_ref());
        assert_eq!(message.len(), MAX_PANIC_MESSAGE_CHARS + 3);
        assert!(message.ends_with("..."));

        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string payload");
    }

    // The logger is process-global, so every init case lives in one test.
    #[test]
    fn init_starts_once() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        let other_dir = dir.path().join("other");

        init_logging("info", &log_dir).unwrap();
        assert!(log_dir.is_dir());

        init_logging("debug", &other_dir).unwrap();
        assert!(!other_dir.exists());

        assert!(init_logging("loud", &log_dir).is_err());
    }
}
