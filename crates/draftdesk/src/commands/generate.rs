//! Generate command: tone-adjusted rewrites from the configured providers.

use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use draftdesk_core::classifier::{self, ContentType};
use draftdesk_core::config::Config;
use draftdesk_core::providers::{Dispatcher, GenerateRequest, ProviderTarget};
use draftdesk_core::settings::AppSettings;
use draftdesk_core::tone::TonePreset;
use draftdesk_core::variation::Variation;

use super::{InputArgs, dispatch_config, open_storage};

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Draft source.
    #[command(flatten)]
    pub input: InputArgs,

    /// Tone to write in (default: saved setting)
    #[arg(long, value_enum)]
    pub tone: Option<TonePreset>,

    /// Number of variations (clamped to the saved min/max)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Provider to use: all, gemini, openai, deepseek (default: saved setting)
    #[arg(short, long)]
    pub provider: Option<ProviderTarget>,

    /// Content type to write for (default: detected)
    #[arg(long, value_enum)]
    pub content_type: Option<ContentType>,
}

/// Pick the content type: explicit, else detected when enabled, else a new post.
pub(crate) fn resolve_content_type(
    explicit: Option<ContentType>,
    settings: &AppSettings,
    content: &str,
) -> ContentType {
    explicit.unwrap_or_else(|| {
        if settings.auto_detect_content_type {
            classifier::classify(content).content_type
        } else {
            ContentType::NewPost
        }
    })
}

/// Cancel `token` on Ctrl-C.
pub(crate) fn cancel_on_ctrl_c(token: &CancellationToken) {
    let token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; cancelling provider requests");
            token.cancel();
        }
    });
}

/// A stderr spinner, hidden when stderr is not a terminal.
pub(crate) fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Generate variations of a draft.
#[instrument(name = "cmd_generate", skip_all, fields(input = %args.input.label()))]
pub async fn cmd_generate(
    args: GenerateArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    if content.trim().is_empty() {
        bail!("nothing to rewrite: {} is empty", args.input.label());
    }

    let storage = open_storage(config)?;
    let settings = AppSettings::load(&storage).context("failed to read settings")?;
    let dispatch = dispatch_config(config, &storage)?;

    let target = args.provider.unwrap_or(settings.default_provider);
    let providers = Dispatcher::target_providers(&dispatch, target);
    if providers.is_empty() {
        bail!(
            "no API key configured for provider target '{target}'. Add one with `draftdesk keys set <provider>`."
        );
    }

    let request = GenerateRequest {
        content_type: resolve_content_type(args.content_type, &settings, &content),
        tone: args.tone.unwrap_or(settings.default_tone),
        variation_count: settings
            .clamp_variation_count(args.count.unwrap_or(settings.default_variation_count)),
        content,
    };
    debug!(
        tone = %request.tone,
        content_type = %request.content_type,
        count = request.variation_count,
        providers = ?providers,
        "dispatching"
    );

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);
    let bar = (!global_json)
        .then(|| spinner(format!("Generating {} variations...", request.variation_count)));
    let batch = Dispatcher::new()
        .generate_variations(&dispatch, &request, target, &cancel)
        .await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if cancel.is_cancelled() {
        bail!("cancelled");
    }
    if batch.is_empty() {
        bail!("every provider request failed; run with -v for details");
    }

    let variations = Variation::from_batch(&request.content, batch);
    info!(
        requested = request.variation_count,
        received = variations.len(),
        "generate completed"
    );

    if global_json {
        println!("{}", serde_json::to_string_pretty(&variations)?);
        return Ok(());
    }

    for (i, variation) in variations.iter().enumerate() {
        print_variation(i + 1, variation);
    }
    Ok(())
}

pub(crate) fn print_variation(number: usize, variation: &Variation) {
    let count = if variation.is_over_limit {
        format!("{} chars", variation.character_count).red().to_string()
    } else {
        format!("{} chars", variation.character_count).green().to_string()
    };
    println!(
        "{} {} {} {}",
        format!("[{number}]").bold(),
        variation.provider.name().cyan(),
        variation.tone.label().dimmed(),
        count
    );
    println!("{}", variation.polished_content);
    if let Some(ref parts) = variation.thread_parts {
        println!("{}", format!("As a thread ({} parts):", parts.len()).dimmed());
        for part in parts {
            println!("  {part}");
        }
    }
    println!();
}
