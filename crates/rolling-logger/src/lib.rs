//! Rolling Logger
//!
//! File logger for deckboard. Daily rotation and pruning of old files are
//! left to `tracing-appender`; on top of that the most recent lines are kept
//! in a circular buffer so they can be shown without reading the file back.
//!
//! `log` records are bridged into the same subscriber, so library code can
//! keep using `log::info!` and friends.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing_appender::rolling::{Builder, InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Lines kept in memory by default
pub const DEFAULT_CAPACITY: usize = 500;

/// Daily files kept on disk by default
pub const DEFAULT_MAX_FILES: usize = 7;

static WRITER: OnceLock<RollingWriter> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to prepare log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file in {path}: {source}")]
    Appender {
        path: PathBuf,
        #[source]
        source: InitError,
    },

    #[error("logger already initialized")]
    AlreadyInitialized,

    #[error("logger not initialized")]
    NotInitialized,
}

struct Inner {
    appender: RollingFileAppender,
    capacity: usize,
    recent: VecDeque<String>,
    /// Bytes of a line that has not seen its newline yet
    partial: String,
}

impl Inner {
    fn remember(&mut self, buf: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(idx) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=idx).collect();
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line);
        }
    }
}

/// Writer handed to the fmt layer. Cloning shares the same file and buffer.
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<Inner>>,
}

impl RollingWriter {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str) -> Result<Self, LoggerError> {
        Self::with_limits(dir, app_name, DEFAULT_CAPACITY, DEFAULT_MAX_FILES)
    }

    /// Files are named `<app_name>.<YYYY-MM-DD>.log`; at most `max_files`
    /// of them are kept.
    pub fn with_limits(
        dir: impl Into<PathBuf>,
        app_name: &str,
        capacity: usize,
        max_files: usize,
    ) -> Result<Self, LoggerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| LoggerError::Directory {
            path: dir.clone(),
            source,
        })?;

        let appender = Builder::new()
            .rotation(Rotation::DAILY)
            .filename_prefix(app_name)
            .filename_suffix("log")
            .max_log_files(max_files.max(1))
            .build(&dir)
            .map_err(|source| LoggerError::Appender {
                path: dir.clone(),
                source,
            })?;

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                appender,
                capacity: capacity.max(1),
                recent: VecDeque::new(),
                partial: String::new(),
            })),
        })
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock_inner().recent.iter().cloned().collect()
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock_inner();
        inner.appender.write_all(buf)?;
        inner.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock_inner().appender.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber at INFO level
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<RollingWriter, LoggerError> {
    init_logger_with_level(log_dir, app_name, LevelFilter::INFO)
}

pub fn init_logger_with_level(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    level: LevelFilter,
) -> Result<RollingWriter, LoggerError> {
    let writer = RollingWriter::new(log_dir.as_ref(), app_name)?;
    if WRITER.set(writer.clone()).is_err() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(level)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    Ok(writer)
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    WRITER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    WRITER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::error!("{}", message);
    Ok(())
}

/// Recent lines from the global writer; empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    WRITER.get().map(|w| w.recent_lines()).unwrap_or_default()
}
