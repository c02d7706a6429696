//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use draftdesk_core::config::Config;
use draftdesk_core::keys::{ApiKeys, ModelChoices};
use draftdesk_core::providers::DispatchConfig;
use draftdesk_core::store::{FileStore, Storage};

pub mod classify;
pub mod count;
pub mod entities;
pub mod generate;
pub mod info;
pub mod keys;
pub mod models;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod settings;
pub mod shorten;
pub mod thread;
pub mod tones;

/// Where a command reads its draft from.
#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    /// File containing the draft (`-` or omitted reads stdin)
    pub file: Option<Utf8PathBuf>,

    /// Draft text given inline
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,
}

impl InputArgs {
    /// Read the draft from `--text`, the file, or stdin, enforcing the size limit.
    pub fn read(&self, max_bytes: Option<usize>) -> anyhow::Result<String> {
        if let Some(ref text) = self.text {
            check_size("--text", text.len(), max_bytes)?;
            return Ok(text.clone());
        }
        match self.file {
            Some(ref path) if path.as_str() != "-" => read_input_file(path, max_bytes),
            _ => read_stdin(max_bytes),
        }
    }

    /// A short label for logs and messages.
    pub fn label(&self) -> &str {
        match (&self.text, &self.file) {
            (Some(_), _) => "--text",
            (None, Some(path)) if path.as_str() != "-" => path.as_str(),
            _ => "stdin",
        }
    }
}

fn check_size(label: &str, size: usize, max_bytes: Option<usize>) -> anyhow::Result<()> {
    if let Some(max) = max_bytes
        && size > max
    {
        anyhow::bail!("input too large: {label} is {size} bytes (limit: {max} bytes)");
    }
    Ok(())
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    check_size(path.as_str(), usize::try_from(metadata.len()).unwrap_or(usize::MAX), max_bytes)?;

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut content = String::new();
    let stdin = std::io::stdin().lock();
    match max_bytes {
        Some(max) => {
            let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
            stdin
                .take(limit)
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            check_size("stdin", content.len(), max_bytes)?;
        }
        None => {
            let mut stdin = stdin;
            stdin
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
        }
    }
    Ok(content)
}

/// Open the file store named by the configuration.
pub fn open_storage(config: &Config) -> anyhow::Result<Storage<FileStore>> {
    let path = config
        .resolved_store_path()
        .context("cannot determine a store location; set store_path in the config")?;
    let store = FileStore::open(path.clone())
        .with_context(|| format!("failed to open store {path}"))?;
    Ok(Storage::new(store))
}

/// Saved keys and models with configuration overrides applied.
pub fn dispatch_config(
    config: &Config,
    storage: &Storage<FileStore>,
) -> anyhow::Result<DispatchConfig> {
    let keys = ApiKeys::load(storage).context("failed to read API keys")?;
    let models = ModelChoices::load(storage).context("failed to read model selections")?;
    Ok(config.apply_to(DispatchConfig::from_saved(&keys, &models), &keys))
}
