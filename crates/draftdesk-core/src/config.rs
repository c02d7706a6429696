//! Configuration loading and discovery.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `~/.config/draftdesk/config.<ext>` (user config)
//! 3. `.draftdesk.<ext>` then `draftdesk.<ext>` in the closest directory that
//!    has either, walking up from the search root to a `.git` boundary
//! 4. Files passed explicitly (`--config`)
//! 5. `DRAFTDESK_*` environment variables; nested keys use `__`, as in
//!    `DRAFTDESK_PROVIDERS__GEMINI__MODEL`
//!
//! `<ext>` is one of `toml`, `yaml`, `yml`, `json`. When several exist in one
//! directory they are all merged, later extensions winning.
//!
//! Configuration covers process concerns (logging, store location, limits,
//! endpoints). API keys are never read from config files; they live in the
//! store and are managed with `draftdesk keys`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use draftdesk_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::keys::ApiKeys;
use crate::providers::{DEFAULT_TIMEOUT, DispatchConfig, ProviderKind};
use crate::store::STORE_FILE_NAME;

/// Endpoint and model overrides for one provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderSettings {
    /// Replacement endpoint, e.g. a proxy or a local mock.
    pub endpoint: Option<String>,
    /// Model to use instead of the saved selection.
    pub model: Option<String>,
}

/// Per-provider overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Google Gemini.
    pub gemini: ProviderSettings,
    /// OpenAI.
    pub openai: ProviderSettings,
    /// DeepSeek.
    pub deepseek: ProviderSettings,
}

impl ProvidersConfig {
    /// Overrides for `kind`.
    pub const fn get(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::DeepSeek => &self.deepseek,
        }
    }
}

/// The configuration for draftdesk.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for daily JSONL log files. No file logging when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Store file for keys, models, and settings.
    ///
    /// Defaults to `store.json` in the user data directory.
    pub store_path: Option<Utf8PathBuf>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Applies to the CLI and the MCP server. Use `disable_input_limit` to
    /// remove the limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored. Default: `false`.
    pub disable_input_limit: bool,
    /// Per-request provider timeout in seconds (default: 60).
    pub request_timeout_secs: Option<u64>,
    /// Provider endpoint and model overrides.
    pub providers: ProvidersConfig,
}

impl Config {
    /// The store file: configured, else `store.json` in the user data directory.
    pub fn resolved_store_path(&self) -> Option<Utf8PathBuf> {
        self.store_path
            .clone()
            .or_else(|| user_data_dir().map(|dir| dir.join(STORE_FILE_NAME)))
    }

    /// Provider request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Apply timeout, endpoint, and model overrides to a dispatch config.
    ///
    /// A configured model replaces the saved selection.
    pub fn apply_to(&self, mut dispatch: DispatchConfig, keys: &ApiKeys) -> DispatchConfig {
        dispatch = dispatch.with_timeout(self.request_timeout());
        for kind in ProviderKind::ALL {
            let overrides = self.providers.get(kind);
            if let Some(endpoint) = overrides.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
                dispatch = dispatch.with_endpoint(kind, endpoint.trim());
            }
            if let Some(model) = overrides.model.as_deref()
                && let Some(key) = keys.get(kind)
            {
                dispatch = dispatch.with_credential(kind, key, model);
            }
        }
        dispatch
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which configuration files were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report them without re-discovering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from the XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files (e.g., from `--config`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "draftdesk";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "DRAFTDESK_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a loader that reads user config and stops project search at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for project config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/draftdesk/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward walk at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Search all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file. Later files take precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // DRAFTDESK_LOG_LEVEL=debug, DRAFTDESK_PROVIDERS__OPENAI__ENDPOINT=...
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Config files from the closest directory that has any, dotfiles first.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let found: Vec<Utf8PathBuf> = [format!(".{APP_NAME}"), APP_NAME.to_string()]
                .iter()
                .flat_map(|stem| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(|ext| dir.join(format!("{stem}.{ext}")))
                        .collect::<Vec<_>>()
                })
                .filter(|path| path.is_file())
                .collect();

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// The user config directory, e.g. `~/.config/draftdesk/` on Linux.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

/// The user data directory, e.g. `~/.local/share/draftdesk/` on Linux.
///
/// Holds the default store file.
pub fn user_data_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_dir().to_path_buf()).ok()
}
