//! Generated variations ready for review.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classifier::ContentType;
use crate::metrics;
use crate::providers::{GeneratedText, ProviderKind, ShortenRequest};
use crate::tone::TonePreset;

/// Shortest target a shorten request may ask for.
pub const MIN_TARGET_LENGTH: usize = 80;

/// Longest target a shorten request may ask for.
pub const MAX_TARGET_LENGTH: usize = metrics::MAX_LENGTH;

/// Target used when none is given.
pub const DEFAULT_TARGET_LENGTH: usize = 180;

/// Clamp a shorten target to `[MIN_TARGET_LENGTH, MAX_TARGET_LENGTH]`.
pub fn clamp_target_length(target: usize) -> usize {
    target.clamp(MIN_TARGET_LENGTH, MAX_TARGET_LENGTH)
}

/// One provider's rewrite of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Variation {
    /// `<millis>-<index>`, unique within a batch.
    pub id: String,
    /// The draft that was rewritten.
    pub original_content: String,
    /// The rewrite.
    pub polished_content: String,
    /// Provider that produced it.
    pub provider: ProviderKind,
    /// Tone that was requested.
    pub tone: TonePreset,
    /// Character count of the rewrite.
    pub character_count: usize,
    /// Whether the rewrite exceeds the post limit.
    pub is_over_limit: bool,
    /// Thread split of the rewrite, present only when over the limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_parts: Option<Vec<String>>,
    /// When the provider answered.
    pub created_at: DateTime<Utc>,
    /// Whether the user picked this one.
    pub is_selected: bool,
}

impl Variation {
    /// Build the `index`-th variation of a batch from a provider response.
    pub fn from_generated(original: &str, generated: GeneratedText, index: usize) -> Self {
        let is_over_limit = metrics::is_over_limit(&generated.variation);
        let thread_parts = is_over_limit
            .then(|| metrics::split_into_thread(&generated.variation, metrics::MAX_LENGTH));
        Self {
            id: format!("{}-{index}", generated.generated_at.timestamp_millis()),
            original_content: original.to_string(),
            character_count: generated.character_count,
            is_over_limit,
            thread_parts,
            provider: generated.provider,
            tone: generated.tone,
            created_at: generated.generated_at,
            polished_content: generated.variation,
            is_selected: false,
        }
    }

    /// Build a batch, indexing in response order.
    pub fn from_batch(original: &str, batch: Vec<GeneratedText>) -> Vec<Self> {
        batch
            .into_iter()
            .enumerate()
            .map(|(index, generated)| Self::from_generated(original, generated, index))
            .collect()
    }

    /// A request to shorten this variation, with the target clamped.
    pub fn shorten_request(&self, content_type: ContentType, target_length: usize) -> ShortenRequest {
        ShortenRequest {
            content: self.polished_content.clone(),
            tone: self.tone,
            content_type,
            target_length: clamp_target_length(target_length),
        }
    }
}
