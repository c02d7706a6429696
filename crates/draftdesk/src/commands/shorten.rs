//! Shorten command: rewrite a draft toward a target length.

use anyhow::{Context, bail};
use clap::Args;
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use draftdesk_core::classifier::ContentType;
use draftdesk_core::config::Config;
use draftdesk_core::metrics;
use draftdesk_core::providers::{Dispatcher, ProviderKind, ShortenRequest};
use draftdesk_core::settings::AppSettings;
use draftdesk_core::tone::TonePreset;
use draftdesk_core::variation::{DEFAULT_TARGET_LENGTH, clamp_target_length};

use super::generate::{cancel_on_ctrl_c, resolve_content_type, spinner};
use super::{InputArgs, dispatch_config, open_storage};

/// Arguments for the `shorten` subcommand.
#[derive(Args, Debug)]
pub struct ShortenArgs {
    /// Draft source.
    #[command(flatten)]
    pub input: InputArgs,

    /// Target length in characters (clamped to 80..=280)
    #[arg(long, default_value_t = DEFAULT_TARGET_LENGTH)]
    pub target: usize,

    /// Tone to keep (default: saved setting)
    #[arg(long, value_enum)]
    pub tone: Option<TonePreset>,

    /// Provider to use (default: first with a key)
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Content type to write for (default: detected)
    #[arg(long, value_enum)]
    pub content_type: Option<ContentType>,
}

/// Shorten a draft with one provider.
#[instrument(name = "cmd_shorten", skip_all, fields(input = %args.input.label(), target = args.target))]
pub async fn cmd_shorten(
    args: ShortenArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    if content.trim().is_empty() {
        bail!("nothing to shorten: {} is empty", args.input.label());
    }

    let storage = open_storage(config)?;
    let settings = AppSettings::load(&storage).context("failed to read settings")?;
    let dispatch = dispatch_config(config, &storage)?;
    if Dispatcher::available_providers(&dispatch).is_empty() {
        bail!("no API keys configured. Add one with `draftdesk keys set <provider>`.");
    }

    let request = ShortenRequest {
        content_type: resolve_content_type(args.content_type, &settings, &content),
        tone: args.tone.unwrap_or(settings.default_tone),
        target_length: clamp_target_length(args.target),
        content,
    };

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);
    let bar = (!global_json)
        .then(|| spinner(format!("Shortening to {} characters...", request.target_length)));
    let dispatcher = Dispatcher::new();
    let result = match args.provider {
        Some(kind) => dispatcher.shorten_with(&dispatch, kind, &request, &cancel).await,
        None => dispatcher.shorten(&dispatch, &request, &cancel).await,
    };
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let shortened = result.context("shorten request failed")?;

    let length = metrics::count_length(&shortened.variation);
    info!(
        provider = %shortened.provider,
        length,
        target = request.target_length,
        "shorten completed"
    );

    if global_json {
        println!("{}", serde_json::to_string_pretty(&shortened)?);
        return Ok(());
    }

    println!("{}", shortened.variation);
    let summary = format!(
        "{}: {length}/{} characters",
        shortened.provider.name(),
        request.target_length
    );
    if length > request.target_length {
        eprintln!("{}", summary.yellow());
    } else {
        eprintln!("{}", summary.dimmed());
    }
    Ok(())
}
