//! Tones command: list presets or print one preset's instructions.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::instrument;

use draftdesk_core::tone::{ToneConfig, TonePreset};

/// Arguments for the `tones` subcommand.
#[derive(Args, Debug, Default)]
pub struct TonesArgs {
    /// Print the full system prompt for this tone
    #[arg(long, value_enum, value_name = "TONE")]
    pub prompt: Option<TonePreset>,
}

/// List tone presets.
#[instrument(name = "cmd_tones", skip_all)]
pub fn cmd_tones(args: TonesArgs, global_json: bool) -> anyhow::Result<()> {
    if let Some(tone) = args.prompt {
        if global_json {
            println!("{}", serde_json::to_string_pretty(&tone.config())?);
        } else {
            println!("{}", tone.system_prompt());
        }
        return Ok(());
    }

    let configs: Vec<ToneConfig> = TonePreset::ALL.iter().map(TonePreset::config).collect();
    if global_json {
        println!("{}", serde_json::to_string_pretty(&configs)?);
        return Ok(());
    }

    for config in &configs {
        println!(
            "{:<14} {}",
            config.id.as_str().bold(),
            config.description.dimmed()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_tones() {
        assert!(cmd_tones(TonesArgs::default(), false).is_ok());
        assert!(cmd_tones(TonesArgs::default(), true).is_ok());
    }

    #[test]
    fn prints_single_prompt() {
        let args = TonesArgs {
            prompt: Some(TonePreset::Concise),
        };
        assert!(cmd_tones(args, false).is_ok());
    }
}
