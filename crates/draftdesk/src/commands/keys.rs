//! Keys command: save, remove, list and validate provider API keys.

use std::io::BufRead;

use anyhow::{Context, bail};
use clap::Subcommand;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use draftdesk_core::config::Config;
use draftdesk_core::keys::{self, ApiKeys};
use draftdesk_core::providers::{Dispatcher, ProviderKind};

use super::generate::spinner;
use super::{dispatch_config, open_storage};

/// Subcommands of `keys`.
#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Show which providers have a key
    List,

    /// Save a key for a provider
    Set {
        /// Provider the key belongs to
        #[arg(value_enum)]
        provider: ProviderKind,

        /// The API key (read from stdin when omitted)
        key: Option<String>,

        /// Check the key with the provider before saving
        #[arg(long)]
        validate: bool,
    },

    /// Delete a provider's saved key
    Remove {
        /// Provider whose key to delete
        #[arg(value_enum)]
        provider: ProviderKind,
    },

    /// Check a key with the provider (defaults to the saved key)
    Validate {
        /// Provider to check against
        #[arg(value_enum)]
        provider: ProviderKind,

        /// Key to check instead of the saved one
        key: Option<String>,
    },
}

#[derive(Serialize)]
struct KeyStatus {
    provider: ProviderKind,
    name: &'static str,
    configured: bool,
}

/// Run a `keys` subcommand.
#[instrument(name = "cmd_keys", skip_all)]
pub async fn cmd_keys(
    command: KeysCommand,
    global_json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    match command {
        KeysCommand::List => list(global_json, config),
        KeysCommand::Set {
            provider,
            key,
            validate,
        } => {
            let key = match key {
                Some(key) => key,
                None => read_key_from_stdin()?,
            };
            if key.trim().is_empty() {
                bail!("refusing to save an empty key for {}", provider.name());
            }
            if validate && !check(config, provider, &key, global_json).await? {
                bail!("{} rejected the key; nothing saved", provider.name());
            }

            let mut storage = open_storage(config)?;
            keys::set_api_key(&mut storage, provider, &key).context("failed to save API key")?;
            report(global_json, provider, "saved", "Saved API key for")
        }
        KeysCommand::Remove { provider } => {
            let mut storage = open_storage(config)?;
            keys::remove_api_key(&mut storage, provider).context("failed to remove API key")?;
            report(global_json, provider, "removed", "Removed API key for")
        }
        KeysCommand::Validate { provider, key } => {
            let key = match key {
                Some(key) => key,
                None => {
                    let storage = open_storage(config)?;
                    let saved = ApiKeys::load(&storage).context("failed to read API keys")?;
                    match saved.get(provider) {
                        Some(key) => key.to_string(),
                        None => bail!("no API key saved for {}", provider.name()),
                    }
                }
            };
            let valid = check(config, provider, &key, global_json).await?;
            if global_json {
                let value = serde_json::json!({ "provider": provider, "valid": valid });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if valid {
                println!("{} {} accepted the key", "✓".green(), provider.name());
            }
            if !valid {
                bail!("{} rejected the key", provider.name());
            }
            Ok(())
        }
    }
}

fn list(global_json: bool, config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let saved = ApiKeys::load(&storage).context("failed to read API keys")?;
    let statuses: Vec<KeyStatus> = ProviderKind::ALL
        .into_iter()
        .map(|provider| KeyStatus {
            provider,
            name: provider.name(),
            configured: saved.is_configured(provider),
        })
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    for status in &statuses {
        let state = if status.configured {
            "configured".green().to_string()
        } else {
            "not set".dimmed().to_string()
        };
        println!("{} {:<14} {state}", status.provider.icon(), status.name);
    }
    if !saved.has_any() {
        eprintln!(
            "{}",
            "No keys saved. Add one with `draftdesk keys set <provider>`.".yellow()
        );
    }
    Ok(())
}

async fn check(
    config: &Config,
    provider: ProviderKind,
    key: &str,
    global_json: bool,
) -> anyhow::Result<bool> {
    let storage = open_storage(config)?;
    let dispatch = dispatch_config(config, &storage)?;
    let bar =
        (!global_json).then(|| spinner(format!("Checking key with {}...", provider.name())));
    let valid = Dispatcher::new().validate_key(&dispatch, provider, key).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    Ok(valid)
}

fn report(
    global_json: bool,
    provider: ProviderKind,
    action: &str,
    message: &str,
) -> anyhow::Result<()> {
    if global_json {
        let value = serde_json::json!({ "provider": provider, "action": action });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{} {message} {}", "✓".green(), provider.name());
    }
    Ok(())
}

fn read_key_from_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read key from stdin")?;
    Ok(line.trim().to_string())
}
