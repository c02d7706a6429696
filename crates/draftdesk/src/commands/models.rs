//! Models command: choose which model each provider uses.

use anyhow::{Context, bail};
use clap::Subcommand;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use draftdesk_core::config::Config;
use draftdesk_core::keys::{self, ModelChoices};
use draftdesk_core::providers::ProviderKind;

use super::open_storage;

/// Subcommands of `models`.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Show the selected model and known options for each provider
    List,

    /// Select a model for a provider
    Set {
        /// Provider to configure
        #[arg(value_enum)]
        provider: ProviderKind,

        /// Model name (any name the provider accepts)
        model: String,
    },

    /// Restore a provider's default model
    Reset {
        /// Provider to reset
        #[arg(value_enum)]
        provider: ProviderKind,
    },
}

#[derive(Serialize)]
struct ModelStatus {
    provider: ProviderKind,
    model: String,
    default: &'static str,
    options: &'static [&'static str],
}

/// Run a `models` subcommand.
#[instrument(name = "cmd_models", skip_all)]
pub fn cmd_models(
    command: ModelsCommand,
    global_json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let mut storage = open_storage(config)?;
    match command {
        ModelsCommand::List => {
            let choices =
                ModelChoices::load(&storage).context("failed to read model selections")?;
            let statuses: Vec<ModelStatus> = ProviderKind::ALL
                .into_iter()
                .map(|provider| ModelStatus {
                    provider,
                    model: choices.get(provider).to_string(),
                    default: provider.default_model(),
                    options: provider.model_options(),
                })
                .collect();

            if global_json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
                return Ok(());
            }
            for status in &statuses {
                let marker = if status.model == status.default {
                    "(default)".dimmed().to_string()
                } else {
                    "(custom)".cyan().to_string()
                };
                println!(
                    "{} {:<14} {} {marker}",
                    status.provider.icon(),
                    status.provider.name(),
                    status.model.bold()
                );
                println!("    options: {}", status.options.join(", ").dimmed());
            }
            Ok(())
        }
        ModelsCommand::Set { provider, model } => {
            if !keys::set_model(&mut storage, provider, &model).context("failed to save model")? {
                bail!("model name must not be empty");
            }
            if !provider.model_options().contains(&model.trim()) {
                tracing::warn!(
                    provider = %provider,
                    model = model.trim(),
                    "model is not in the known list; the provider may reject it"
                );
            }
            report(global_json, provider, model.trim())
        }
        ModelsCommand::Reset { provider } => {
            keys::reset_model(&mut storage, provider).context("failed to reset model")?;
            report(global_json, provider, provider.default_model())
        }
    }
}

fn report(global_json: bool, provider: ProviderKind, model: &str) -> anyhow::Result<()> {
    if global_json {
        let value = serde_json::json!({ "provider": provider, "model": model });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{} {} now uses {}", "✓".green(), provider.name(), model.bold());
    }
    Ok(())
}
