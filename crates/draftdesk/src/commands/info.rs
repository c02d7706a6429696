//! Info command: package metadata and effective configuration.

use clap::Args;
use draftdesk_core::config::{Config, ConfigSources};
use draftdesk_core::providers::ProviderKind;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ProviderInfo {
    provider: ProviderKind,
    endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_override: Option<String>,
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_path: Option<String>,
    request_timeout_secs: u64,
    providers: Vec<ProviderInfo>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let providers = ProviderKind::ALL
            .into_iter()
            .map(|provider| {
                let overrides = config.providers.get(provider);
                ProviderInfo {
                    provider,
                    endpoint: overrides
                        .endpoint
                        .clone()
                        .unwrap_or_else(|| provider.default_endpoint().to_string()),
                    model_override: overrides.model.clone(),
                }
            })
            .collect();
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            store_path: config.resolved_store_path().map(|p| p.to_string()),
            request_timeout_secs: config.request_timeout().as_secs(),
            providers,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let config_info = ConfigInfo::from_config(config, sources);
    let full_info = FullInfo {
        package: info,
        config: config_info,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
    } else {
        println!(
            "{} {}",
            full_info.package.name.bold(),
            full_info.package.version.green()
        );
        if !full_info.package.description.is_empty() {
            println!("{}", full_info.package.description);
        }
        if !full_info.package.license.is_empty() {
            println!("{}: {}", "License".dimmed(), full_info.package.license);
        }
        if !full_info.package.repository.is_empty() {
            println!(
                "{}: {}",
                "Repository".dimmed(),
                full_info.package.repository.cyan()
            );
        }
        if !full_info.package.homepage.is_empty() {
            println!(
                "{}: {}",
                "Homepage".dimmed(),
                full_info.package.homepage.cyan()
            );
        }

        // Configuration section
        println!();
        println!("{}", "Configuration".bold().underline());
        if let Some(ref path) = full_info.config.config_file {
            println!("{}: {}", "Config file".dimmed(), path.cyan());
        } else {
            println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
        }
        println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
        if let Some(ref dir) = full_info.config.log_dir {
            println!("{}: {}", "Log directory".dimmed(), dir);
        }

        match full_info.config.store_path {
            Some(ref path) => println!("{}: {}", "Store".dimmed(), path.cyan()),
            None => println!("{}: {}", "Store".dimmed(), "no location".yellow()),
        }
        println!(
            "{}: {}s",
            "Request timeout".dimmed(),
            full_info.config.request_timeout_secs
        );

        println!();
        println!("{}", "Providers".bold().underline());
        for info in &full_info.config.providers {
            println!("{}: {}", info.provider.name().dimmed(), info.endpoint);
            if let Some(ref model) = info.model_override {
                println!("  {}: {}", "model override".dimmed(), model);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::default()
    }

    fn test_sources() -> ConfigSources {
        ConfigSources::default()
    }

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(cmd_info(InfoArgs::default(), false, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(cmd_info(InfoArgs::default(), true, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let config = Config::default();
        let sources = ConfigSources::default();
        let info = ConfigInfo::from_config(&config, &sources);
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.request_timeout_secs, 60);
        assert_eq!(info.providers.len(), 3);
        assert!(info.providers.iter().all(|p| p.model_override.is_none()));
    }

    #[test]
    fn endpoint_override_is_reported() {
        let mut config = Config::default();
        config.providers.openai.endpoint = Some("http://localhost:9000/v1/chat".into());
        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        let openai = info
            .providers
            .iter()
            .find(|p| p.provider == ProviderKind::OpenAi)
            .unwrap();
        assert_eq!(openai.endpoint, "http://localhost:9000/v1/chat");
    }
}
