//! Thread command: split a long draft into numbered posts.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument, warn};

use draftdesk_core::metrics::LengthBudget;

use super::InputArgs;

/// Arguments for the `thread` subcommand.
#[derive(Args, Debug)]
pub struct ThreadArgs {
    /// Draft source.
    #[command(flatten)]
    pub input: InputArgs,

    /// Maximum length of each post, numbering included
    #[arg(long, default_value_t = draftdesk_core::metrics::MAX_LENGTH)]
    pub max_length: usize,
}

/// Split a draft into a thread and print each part.
#[instrument(name = "cmd_thread", skip_all, fields(input = %args.input.label()))]
pub fn cmd_thread(
    args: ThreadArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    let preview = LengthBudget::default()
        .with_max_length(args.max_length)
        .preview_thread(&content);
    debug!(parts = preview.part_count, "split thread");

    if preview.exceeds_max_parts {
        warn!(
            parts = preview.part_count,
            max = draftdesk_core::metrics::MAX_THREAD_PARTS,
            "thread is longer than the service allows"
        );
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    for (i, part) in preview.parts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{part}");
    }
    if preview.exceeds_max_parts {
        eprintln!(
            "{} {} parts (max {})",
            "warning:".yellow(),
            preview.part_count,
            draftdesk_core::metrics::MAX_THREAD_PARTS
        );
    }
    Ok(())
}
