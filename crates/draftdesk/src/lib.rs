//! Library interface for the `draftdesk` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                              Log filter (e.g., debug, draftdesk=trace)
    DRAFTDESK_LOG_PATH                    Explicit JSONL log file path
    DRAFTDESK_LOG_DIR                     JSONL log directory
    DRAFTDESK_STORE_PATH                  Store file for keys, models, and settings
    DRAFTDESK_REQUEST_TIMEOUT_SECS        Provider request timeout
    DRAFTDESK_PROVIDERS__<NAME>__ENDPOINT Provider endpoint override (GEMINI, OPENAI, DEEPSEEK)
";

/// Command-line interface definition for draftdesk.
#[derive(Parser)]
#[command(name = "draftdesk")]
#[command(about = "Draft, classify, measure and polish short social posts", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Detect whether a draft is a new post, reply, comment, or quote
    Classify(commands::classify::ClassifyArgs),

    /// Count post length against the 280-character limit
    Count(commands::count::CountArgs),

    /// Split a long draft into a numbered thread
    Thread(commands::thread::ThreadArgs),

    /// List hashtags and mentions in a draft
    Entities(commands::entities::EntitiesArgs),

    /// List tone presets
    Tones(commands::tones::TonesArgs),

    /// Rewrite a draft in a tone with the configured providers
    Generate(commands::generate::GenerateArgs),

    /// Shorten a draft to a target length
    Shorten(commands::shorten::ShortenArgs),

    /// Manage provider API keys
    #[command(subcommand)]
    Keys(commands::keys::KeysCommand),

    /// Manage provider model selections
    #[command(subcommand)]
    Models(commands::models::ModelsCommand),

    /// Show or change saved preferences
    #[command(subcommand)]
    Settings(commands::settings::SettingsCommand),

    /// Show package information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
