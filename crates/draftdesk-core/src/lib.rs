//! Core library for draftdesk.
//!
//! Text analysis for short social posts plus the plumbing to rewrite them with
//! an LLM. Used by the `draftdesk` CLI and MCP server.
//!
//! # Modules
//!
//! - [`classifier`] - Detect whether a draft is a new post, reply, comment, or quote
//! - [`metrics`] - Post length, limit checks, thread splitting, hashtags and mentions
//! - [`tone`] - Tone presets and their rewrite instructions
//! - [`providers`] - Gemini, OpenAI, and DeepSeek clients and the dispatcher
//! - [`store`] - Key/value persistence
//! - [`keys`] - Saved API keys and model selections
//! - [`settings`] - Saved preferences
//! - [`variation`] - Generated variations and shorten targets
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use draftdesk_core::{ContentType, classify, metrics};
//!
//! let analysis = classify("@alice totally agree");
//! assert_eq!(analysis.content_type, ContentType::Reply);
//! assert!(!metrics::is_over_limit("short and sweet"));
//! ```
#![deny(unsafe_code)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod keys;
pub mod metrics;
pub mod providers;
pub mod settings;
pub mod store;
pub mod tone;
pub mod variation;

pub use classifier::{ContentAnalysis, ContentType, classify};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{
    ConfigError, ConfigResult, ProviderError, ProviderResult, StoreError, StoreResult,
};
pub use keys::{ApiKeys, ModelChoices};
pub use metrics::{LengthBudget, LengthReport, ThreadPreview};
pub use providers::{
    DispatchConfig, Dispatcher, GenerateRequest, GeneratedText, ProviderKind, ProviderTarget,
    ShortenRequest,
};
pub use settings::AppSettings;
pub use store::{FileStore, KeyValueStore, MemoryStore, Storage};
pub use tone::{ToneConfig, TonePreset};
pub use variation::Variation;

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
