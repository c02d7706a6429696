//! Error types for draftdesk-core.
//!
//! Text analysis ([`crate::classifier`], [`crate::metrics`]) never fails, so
//! there is no error type for it. Errors only come from configuration,
//! storage, and provider I/O.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::providers::ProviderKind;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by a [`crate::store::KeyValueStore`] backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("store file {path}: {source}")]
    Io {
        /// Path of the store file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings, or a value failed to encode.
    #[error("store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by a single provider request.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key is configured for the provider.
    #[error("{0} API key not set")]
    MissingKey(ProviderKind),

    /// No provider has an API key configured.
    #[error("no provider configured; add an API key with `draftdesk keys set`")]
    NoProvider,

    /// The request could not be sent or the response body could not be read.
    #[error("{provider} request failed: {source}")]
    Http {
        /// Provider the request was sent to.
        provider: ProviderKind,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} returned {status}: {body}")]
    Status {
        /// Provider the request was sent to.
        provider: ProviderKind,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The provider answered successfully but with no text.
    #[error("{0} returned an empty completion")]
    EmptyCompletion(ProviderKind),

    /// The caller cancelled the request.
    #[error("{0} request cancelled")]
    Cancelled(ProviderKind),
}

/// Result type alias using [`ProviderError`].
pub type ProviderResult<T> = Result<T, ProviderError>;
