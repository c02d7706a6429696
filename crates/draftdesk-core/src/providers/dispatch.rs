//! Fan-out of requests across configured providers.

use futures::future::join_all;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::{
    DispatchConfig, GenerateRequest, GeneratedText, Provider, ProviderKind, ProviderTarget,
    ShortenRequest,
};
use crate::error::{ProviderError, ProviderResult};

/// Routes requests to providers using a [`DispatchConfig`] supplied per call.
///
/// Holds only the shared HTTP connection pool, so it is cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    /// A dispatcher with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher sharing an existing client.
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Providers with a non-empty key, in [`ProviderKind::ALL`] order.
    pub fn available_providers(config: &DispatchConfig) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| config.credential(*kind).is_some())
            .collect()
    }

    /// The providers a multi-variation request will rotate through.
    ///
    /// A single-provider target without a key yields nothing.
    pub fn target_providers(config: &DispatchConfig, target: ProviderTarget) -> Vec<ProviderKind> {
        let available = Self::available_providers(config);
        match target {
            ProviderTarget::All => available,
            ProviderTarget::Only(kind) if available.contains(&kind) => vec![kind],
            ProviderTarget::Only(_) => Vec::new(),
        }
    }

    fn provider(&self, config: &DispatchConfig, kind: ProviderKind) -> Provider {
        Provider::new(kind, config, self.client.clone())
    }

    /// Generate one variation with `kind`.
    pub async fn generate_one(
        &self,
        config: &DispatchConfig,
        kind: ProviderKind,
        request: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> ProviderResult<GeneratedText> {
        let credential = config
            .credential(kind)
            .ok_or(ProviderError::MissingKey(kind))?;
        let provider = self.provider(config, kind);
        tokio::select! {
            () = cancel.cancelled() => Err(ProviderError::Cancelled(kind)),
            result = provider.generate(request, &credential.api_key, &credential.model) => result,
        }
    }

    /// Generate `request.variation_count` variations concurrently.
    ///
    /// Variation `i` goes to `targets[i % targets.len()]`. All requests are
    /// awaited; failures are logged and dropped, and the successes come back in
    /// request order. Returns an empty list when no target has a key.
    #[tracing::instrument(skip_all, fields(count = request.variation_count, target = %target))]
    pub async fn generate_variations(
        &self,
        config: &DispatchConfig,
        request: &GenerateRequest,
        target: ProviderTarget,
        cancel: &CancellationToken,
    ) -> Vec<GeneratedText> {
        let targets = Self::target_providers(config, target);
        if targets.is_empty() {
            tracing::warn!("no provider with an API key for this target");
            return Vec::new();
        }

        let tasks = (0..request.variation_count).map(|i| {
            let kind = targets[i % targets.len()];
            self.generate_one(config, kind, request, cancel)
        });
        let results = join_all(tasks).await;

        let total = results.len();
        let generated: Vec<GeneratedText> = results
            .into_iter()
            .filter_map(|result| match result {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(error = %e, "variation failed");
                    None
                }
            })
            .collect();
        tracing::info!(requested = total, succeeded = generated.len(), "variations generated");
        generated
    }

    /// Shorten with the first available provider.
    ///
    /// Fails with [`ProviderError::NoProvider`] when no provider has a key.
    #[tracing::instrument(skip_all, fields(target = request.target_length))]
    pub async fn shorten(
        &self,
        config: &DispatchConfig,
        request: &ShortenRequest,
        cancel: &CancellationToken,
    ) -> ProviderResult<GeneratedText> {
        let kind = Self::available_providers(config)
            .into_iter()
            .next()
            .ok_or(ProviderError::NoProvider)?;
        self.shorten_with(config, kind, request, cancel).await
    }

    /// Shorten with a specific provider.
    pub async fn shorten_with(
        &self,
        config: &DispatchConfig,
        kind: ProviderKind,
        request: &ShortenRequest,
        cancel: &CancellationToken,
    ) -> ProviderResult<GeneratedText> {
        let credential = config
            .credential(kind)
            .ok_or(ProviderError::MissingKey(kind))?;
        let provider = self.provider(config, kind);
        tokio::select! {
            () = cancel.cancelled() => Err(ProviderError::Cancelled(kind)),
            result = provider.shorten(request, &credential.api_key, &credential.model) => result,
        }
    }

    /// Check `api_key` against `kind` using the configured model and endpoint.
    pub async fn validate_key(
        &self,
        config: &DispatchConfig,
        kind: ProviderKind,
        api_key: &str,
    ) -> bool {
        if api_key.trim().is_empty() {
            return false;
        }
        self.provider(config, kind)
            .validate_key(api_key, config.model(kind))
            .await
    }
}
