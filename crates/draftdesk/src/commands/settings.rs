//! Settings command: saved preferences.

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use tracing::instrument;

use draftdesk_core::config::Config;
use draftdesk_core::providers::ProviderTarget;
use draftdesk_core::settings::AppSettings;
use draftdesk_core::tone::TonePreset;

use super::open_storage;

/// Subcommands of `settings`.
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the saved settings
    Show,

    /// Change one or more settings
    Set(SetArgs),

    /// Restore every setting to its default
    Reset,
}

/// Values for `settings set`. Omitted flags keep their saved value.
#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// Default tone
    #[arg(long, value_enum)]
    pub tone: Option<TonePreset>,

    /// Default provider target: all, gemini, openai, deepseek
    #[arg(long)]
    pub provider: Option<ProviderTarget>,

    /// Default number of variations
    #[arg(long)]
    pub count: Option<usize>,

    /// Maximum number of variations per request
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_count: Option<u16>,

    /// Detect the content type before generating
    #[arg(long)]
    pub auto_detect: Option<bool>,

    /// Show hashtag suggestions
    #[arg(long)]
    pub hashtag_suggestions: Option<bool>,
}

impl SetArgs {
    fn is_empty(&self) -> bool {
        self.tone.is_none()
            && self.provider.is_none()
            && self.count.is_none()
            && self.max_count.is_none()
            && self.auto_detect.is_none()
            && self.hashtag_suggestions.is_none()
    }

    /// Apply the given values. The maximum is applied before the count so the
    /// count clamps against the new bound.
    fn apply(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(tone) = self.tone {
            settings = settings.with_default_tone(tone);
        }
        if let Some(target) = self.provider {
            settings = settings.with_default_provider(target);
        }
        if let Some(max) = self.max_count {
            settings = settings.with_max_variation_count(usize::from(max));
        }
        if let Some(count) = self.count {
            settings = settings.with_variation_count(count);
        }
        if let Some(enabled) = self.auto_detect {
            settings.auto_detect_content_type = enabled;
        }
        if let Some(enabled) = self.hashtag_suggestions {
            settings.show_hashtag_suggestions = enabled;
        }
        settings
    }
}

/// Run a `settings` subcommand.
#[instrument(name = "cmd_settings", skip_all)]
pub fn cmd_settings(
    command: SettingsCommand,
    global_json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let mut storage = open_storage(config)?;
    let settings = match command {
        SettingsCommand::Show => AppSettings::load(&storage).context("failed to read settings")?,
        SettingsCommand::Set(args) => {
            if args.is_empty() {
                bail!("nothing to change; pass at least one setting (see --help)");
            }
            let current = AppSettings::load(&storage).context("failed to read settings")?;
            let updated = args.apply(current);
            updated.save(&mut storage).context("failed to save settings")?;
            updated
        }
        SettingsCommand::Reset => {
            AppSettings::reset(&mut storage).context("failed to reset settings")?
        }
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print_settings(&settings);
    }
    Ok(())
}

fn print_settings(settings: &AppSettings) {
    let rows = [
        ("Default tone", settings.default_tone.label().to_string()),
        ("Default provider", settings.default_provider.to_string()),
        (
            "Variations",
            format!(
                "{} (range {}..={})",
                settings.default_variation_count,
                settings.min_variation_count,
                settings.max_variation_count
            ),
        ),
        ("Auto-detect type", on_off(settings.auto_detect_content_type)),
        ("Hashtag hints", on_off(settings.show_hashtag_suggestions)),
    ];
    for (label, value) in rows {
        println!("{:<18} {value}", format!("{label}:").bold());
    }
}

fn on_off(enabled: bool) -> String {
    (if enabled { "on" } else { "off" }).to_string()
}
