//! Count command: post length against the limit.

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use draftdesk_core::metrics::LengthBudget;

use super::InputArgs;

/// Arguments for the `count` subcommand.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Draft source.
    #[command(flatten)]
    pub input: InputArgs,

    /// Limit to measure against
    #[arg(long, default_value_t = draftdesk_core::metrics::MAX_LENGTH)]
    pub max_length: usize,

    /// Exit with an error when the draft is over the limit
    #[arg(long)]
    pub check: bool,
}

/// Measure a draft, URLs counted as 23 characters.
#[instrument(name = "cmd_count", skip_all, fields(input = %args.input.label()))]
pub fn cmd_count(
    args: CountArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    let report = LengthBudget::default()
        .with_max_length(args.max_length)
        .measure(&content);
    debug!(length = report.length, limit = report.limit, "measured");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.over_limit {
        println!(
            "{}/{} ({} over)",
            report.length.red(),
            report.limit,
            report.remaining.unsigned_abs()
        );
    } else if report.remaining <= 20 {
        println!(
            "{}/{} ({} left)",
            report.length.yellow(),
            report.limit,
            report.remaining
        );
    } else {
        println!("{}/{} ({} left)", report.length, report.limit, report.remaining);
    }

    if args.check && report.over_limit {
        bail!(
            "{} is {} characters over the {}-character limit. Shorten it or split it into a thread.",
            args.input.label(),
            report.remaining.unsigned_abs(),
            report.limit
        );
    }
    Ok(())
}
