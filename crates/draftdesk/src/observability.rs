//! Logging setup: human-readable stderr plus optional JSONL file output.
//!
//! Stdout carries command output (and the MCP transport under `serve`), so
//! nothing here ever writes to it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_PATH_ENV: &str = "DRAFTDESK_LOG_PATH";
const LOG_DIR_ENV: &str = "DRAFTDESK_LOG_DIR";
const LOG_FILE_NAME: &str = "draftdesk.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file (`DRAFTDESK_LOG_PATH`).
    pub log_path: Option<PathBuf>,
    /// Directory for daily-rotated logs (`DRAFTDESK_LOG_DIR`, else config).
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to `config_log_dir` for the directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self {
            log_path: env_path(LOG_PATH_ENV),
            log_dir: env_path(LOG_DIR_ENV).or(config_log_dir),
        }
    }

    /// Whether any file output is configured.
    pub const fn writes_file(&self) -> bool {
        self.log_path.is_some() || self.log_dir.is_some()
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Global filter: `RUST_LOG` if set, else derived from the flags and config level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_directive(quiet, verbose, default_level))
}

fn level_directive(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Stderr verbosity. Warnings by default so routine info lines stay in the file log.
pub fn console_level(quiet: bool, verbose: u8) -> LevelFilter {
    if std::env::var_os("RUST_LOG").is_some() {
        return LevelFilter::TRACE;
    }
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file logs are flushed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
    console: LevelFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console);

    let (file_layer, guard) = match file_appender(config)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;
    Ok(guard)
}

fn file_appender(
    config: &ObservabilityConfig,
) -> anyhow::Result<Option<tracing_appender::rolling::RollingFileAppender>> {
    if let Some(ref path) = config.log_path {
        let (dir, name) = split_log_path(path)?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        return Ok(Some(tracing_appender::rolling::never(dir, name)));
    }
    if let Some(ref dir) = config.log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        return Ok(Some(tracing_appender::rolling::daily(dir, LOG_FILE_NAME)));
    }
    Ok(None)
}

fn split_log_path(path: &Path) -> anyhow::Result<(PathBuf, std::ffi::OsString)> {
    let name = path
        .file_name()
        .with_context(|| format!("{LOG_PATH_ENV} has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok((dir, name.to_os_string()))
}
