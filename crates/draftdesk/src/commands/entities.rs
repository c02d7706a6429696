//! Entities command: hashtags and mentions.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use draftdesk_core::metrics;

use super::InputArgs;

/// Arguments for the `entities` subcommand.
#[derive(Args, Debug)]
pub struct EntitiesArgs {
    /// Draft source.
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
struct Entities {
    hashtags: Vec<String>,
    mentions: Vec<String>,
    starts_with_mention: bool,
}

/// List unique hashtags and mentions in order of appearance.
#[instrument(name = "cmd_entities", skip_all, fields(input = %args.input.label()))]
pub fn cmd_entities(
    args: EntitiesArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    let entities = Entities {
        hashtags: metrics::extract_hashtags(&content),
        mentions: metrics::extract_mentions(&content),
        starts_with_mention: metrics::starts_with_mention(&content),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&entities)?);
        return Ok(());
    }

    print_list("Hashtags", &entities.hashtags);
    print_list("Mentions", &entities.mentions);
    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("{}: {}", label.dimmed(), "none".dimmed());
    } else {
        println!("{}: {}", label.dimmed(), items.join(" ").cyan());
    }
}
