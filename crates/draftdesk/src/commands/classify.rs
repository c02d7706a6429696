//! Classify command: detect the content type of a draft.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use draftdesk_core::classifier;

use super::InputArgs;

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Draft source.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Classify a draft as a new post, reply, comment, or quote.
#[instrument(name = "cmd_classify", skip_all, fields(input = %args.input.label()))]
pub fn cmd_classify(
    args: ClassifyArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    let analysis = classifier::classify(&content);
    debug!(content_type = %analysis.content_type, confidence = analysis.confidence, "classified");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!(
        "{} {}",
        analysis.content_type.label().bold(),
        format!("({:.0}% confidence)", analysis.confidence * 100.0).dimmed()
    );
    for indicator in &analysis.indicators {
        println!("  {} {}", "-".dimmed(), indicator);
    }
    Ok(())
}
