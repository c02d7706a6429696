//! Persistent key/value storage for keys, models, and settings.
//!
//! [`KeyValueStore`] is the backend seam: [`FileStore`] keeps a JSON object
//! on disk and [`MemoryStore`] keeps everything in memory. [`Storage`] layers
//! the `draftdesk_` key prefix and JSON value encoding on top of any backend.
//!
//! # Obscured values are not secure
//!
//! [`Storage::set_obscured`] only base64-encodes the value so an API key is
//! not readable at a glance in the store file. Anyone who can read the file
//! can decode it. Protect the file with filesystem permissions.

use std::collections::BTreeMap;
use std::fs;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{StoreError, StoreResult};

/// Prefix applied to every key written through [`Storage`].
pub const KEY_PREFIX: &str = "draftdesk_";

/// File name of the default store inside the user data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// A string-to-string store.
pub trait KeyValueStore {
    /// Read a raw value.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a raw value, replacing any existing one.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// Every key currently stored, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// In-memory backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// JSON-file backend.
///
/// The whole file is read on open. Every write rewrites the file through a
/// temporary sibling and a rename, so a crash never leaves it half written.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Utf8PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<Utf8PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = %path, entries = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn persist(&self) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(&self.path, &content)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

fn write_atomic(path: &Utf8Path, content: &str) -> StoreResult<()> {
    let io_err = |path: &Utf8Path| {
        let path = path.to_path_buf();
        move |source| StoreError::Io { path, source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(io_err(&temp_path))?;

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(path)(source));
    }
    Ok(())
}

/// Prefixed, JSON-encoded access to a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct Storage<S> {
    backend: S,
}

impl<S: KeyValueStore> Storage<S> {
    /// Wrap a backend.
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Unwrap the backend.
    pub fn into_inner(self) -> S {
        self.backend
    }

    fn full_key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }

    /// Read and decode a value.
    ///
    /// A value that is not valid JSON for `T` is logged and reads as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.backend.get(&Self::full_key(key))? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring undecodable stored value");
                Ok(None)
            }
        }
    }

    /// Encode and write a value.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(&Self::full_key(key), &raw)
    }

    /// Delete a value.
    pub fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.backend.remove(&Self::full_key(key))
    }

    /// Delete every prefixed key, leaving foreign keys alone. Returns how many were removed.
    pub fn clear(&mut self) -> StoreResult<usize> {
        let ours: Vec<String> = self
            .backend
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(KEY_PREFIX))
            .collect();
        for key in &ours {
            self.backend.remove(key)?;
        }
        tracing::info!(removed = ours.len(), "cleared store");
        Ok(ours.len())
    }

    /// Write a base64-obscured string. Not encryption.
    pub fn set_obscured(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.set(key, &BASE64_STANDARD.encode(value))
    }

    /// Read a value written by [`set_obscured`](Self::set_obscured).
    ///
    /// Values that do not decode to UTF-8 read as absent.
    pub fn get_obscured(&self, key: &str) -> StoreResult<Option<String>> {
        let Some(encoded) = self.get::<String>(key)? else {
            return Ok(None);
        };
        if encoded.is_empty() {
            return Ok(None);
        }
        let decoded = BASE64_STANDARD
            .decode(encoded.as_bytes())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());
        if decoded.is_none() {
            tracing::warn!(key, "ignoring undecodable obscured value");
        }
        Ok(decoded)
    }
}
