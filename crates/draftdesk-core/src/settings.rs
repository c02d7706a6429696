//! User preferences persisted in the store.

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::providers::ProviderTarget;
use crate::store::{KeyValueStore, Storage};
use crate::tone::TonePreset;

/// Storage key for [`AppSettings`].
pub const SETTINGS_KEY: &str = "app_settings";

/// Saved preferences.
///
/// Stored as camelCase JSON. Missing fields take their defaults, so a partial
/// record merges over [`AppSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// Variations requested when none is given.
    pub default_variation_count: usize,
    /// Upper bound for a variation request.
    pub max_variation_count: usize,
    /// Lower bound for a variation request.
    pub min_variation_count: usize,
    /// Tone used when none is given.
    pub default_tone: TonePreset,
    /// Provider target used when none is given.
    pub default_provider: ProviderTarget,
    /// Classify drafts automatically before generating.
    pub auto_detect_content_type: bool,
    /// Show hashtag suggestions alongside drafts.
    pub show_hashtag_suggestions: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_variation_count: 3,
            max_variation_count: 10,
            min_variation_count: 1,
            default_tone: TonePreset::Professional,
            default_provider: ProviderTarget::All,
            auto_detect_content_type: true,
            show_hashtag_suggestions: true,
        }
    }
}

impl AppSettings {
    /// Saved settings merged over defaults; defaults when nothing is saved.
    pub fn load<S: KeyValueStore>(storage: &Storage<S>) -> StoreResult<Self> {
        Ok(storage.get(SETTINGS_KEY)?.unwrap_or_default())
    }

    /// Write these settings.
    pub fn save<S: KeyValueStore>(&self, storage: &mut Storage<S>) -> StoreResult<()> {
        storage.set(SETTINGS_KEY, self)?;
        tracing::debug!(settings = ?self, "saved settings");
        Ok(())
    }

    /// Overwrite the saved settings with defaults and return them.
    pub fn reset<S: KeyValueStore>(storage: &mut Storage<S>) -> StoreResult<Self> {
        let defaults = Self::default();
        defaults.save(storage)?;
        Ok(defaults)
    }

    /// Clamp `count` to `[min_variation_count, max_variation_count]`.
    pub fn clamp_variation_count(&self, count: usize) -> usize {
        count.min(self.max_variation_count).max(self.min_variation_count)
    }

    /// Set the default variation count, clamped.
    #[must_use]
    pub fn with_variation_count(mut self, count: usize) -> Self {
        self.default_variation_count = self.clamp_variation_count(count);
        self
    }

    /// Set the maximum, lowering the default count if it now exceeds it.
    #[must_use]
    pub fn with_max_variation_count(mut self, max: usize) -> Self {
        self.max_variation_count = max;
        self.default_variation_count = self.default_variation_count.min(max);
        self
    }

    /// Set the default tone.
    #[must_use]
    pub const fn with_default_tone(mut self, tone: TonePreset) -> Self {
        self.default_tone = tone;
        self
    }

    /// Set the default provider target.
    #[must_use]
    pub const fn with_default_provider(mut self, target: ProviderTarget) -> Self {
        self.default_provider = target;
        self
    }
}
