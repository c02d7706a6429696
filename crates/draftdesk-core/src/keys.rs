//! Saved API keys and model selections.
//!
//! Both are loaded into immutable snapshots. Writes go straight to storage;
//! reload to observe them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::StoreResult;
use crate::providers::ProviderKind;
use crate::store::{KeyValueStore, Storage};

/// Snapshot of the saved API key for each provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    keys: BTreeMap<ProviderKind, String>,
}

impl ApiKeys {
    /// Read every provider's obscured key from `storage`. Blank keys are skipped.
    pub fn load<S: KeyValueStore>(storage: &Storage<S>) -> StoreResult<Self> {
        let mut keys = BTreeMap::new();
        for kind in ProviderKind::ALL {
            if let Some(key) = storage.get_obscured(kind.api_key_storage_key())?
                && !key.trim().is_empty()
            {
                keys.insert(kind, key);
            }
        }
        Ok(Self { keys })
    }

    /// The key for `kind`, if saved.
    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        self.keys.get(&kind).map(String::as_str)
    }

    /// Whether `kind` has a key.
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.keys.contains_key(&kind)
    }

    /// Providers with a key, in [`ProviderKind::ALL`] order.
    pub fn configured(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.is_configured(*kind))
            .collect()
    }

    /// Whether any provider has a key.
    pub fn has_any(&self) -> bool {
        !self.keys.is_empty()
    }
}

/// Save an API key for `kind`, obscured.
pub fn set_api_key<S: KeyValueStore>(
    storage: &mut Storage<S>,
    kind: ProviderKind,
    key: &str,
) -> StoreResult<()> {
    storage.set_obscured(kind.api_key_storage_key(), key.trim())?;
    tracing::info!(provider = %kind, "saved API key");
    Ok(())
}

/// Delete the saved API key for `kind`.
pub fn remove_api_key<S: KeyValueStore>(
    storage: &mut Storage<S>,
    kind: ProviderKind,
) -> StoreResult<()> {
    storage.remove(kind.api_key_storage_key())?;
    tracing::info!(provider = %kind, "removed API key");
    Ok(())
}

/// Snapshot of the selected model for each provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelChoices {
    models: BTreeMap<ProviderKind, String>,
}

impl Default for ModelChoices {
    fn default() -> Self {
        Self {
            models: ProviderKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_model().to_string()))
                .collect(),
        }
    }
}

impl ModelChoices {
    /// Saved non-blank models, falling back to each provider's default.
    pub fn load<S: KeyValueStore>(storage: &Storage<S>) -> StoreResult<Self> {
        let mut choices = Self::default();
        for kind in ProviderKind::ALL {
            if let Some(saved) = storage.get::<String>(kind.model_storage_key())?
                && !saved.trim().is_empty()
            {
                choices.models.insert(kind, saved.trim().to_string());
            }
        }
        Ok(choices)
    }

    /// The model for `kind`.
    pub fn get(&self, kind: ProviderKind) -> &str {
        self.models
            .get(&kind)
            .map_or_else(|| kind.default_model(), String::as_str)
    }

    /// Whether `kind` uses something other than its default model.
    pub fn is_custom(&self, kind: ProviderKind) -> bool {
        self.get(kind) != kind.default_model()
    }
}

/// Save a model for `kind`. Blank input is ignored and returns `false`.
pub fn set_model<S: KeyValueStore>(
    storage: &mut Storage<S>,
    kind: ProviderKind,
    model: &str,
) -> StoreResult<bool> {
    let trimmed = model.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }
    storage.set(kind.model_storage_key(), trimmed)?;
    tracing::info!(provider = %kind, model = trimmed, "saved model");
    Ok(true)
}

/// Forget the saved model for `kind`, restoring the default.
pub fn reset_model<S: KeyValueStore>(
    storage: &mut Storage<S>,
    kind: ProviderKind,
) -> StoreResult<()> {
    storage.remove(kind.model_storage_key())
}
