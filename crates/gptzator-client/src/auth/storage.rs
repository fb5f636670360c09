//! Token storage backends.
//!
//! Storage is read synchronously on every outgoing request, so backends
//! keep the current value in memory and only touch their medium on `set`
//! or on the first `get`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::Tokens;

/// Default key under which tokens are persisted.
pub const DEFAULT_STORAGE_KEY: &str = "gptz_sdk_tokens";

// ============================================================================
// TokenStorage Trait
// ============================================================================

/// Holds the current credential pair.
pub trait TokenStorage: Send + Sync + std::fmt::Debug {
    /// The last value passed to [`set`](TokenStorage::set), the persisted
    /// value at startup, or `None`.
    fn get(&self) -> Option<Tokens>;

    /// Replace the stored pair. `None` clears storage.
    fn set(&self, tokens: Option<Tokens>);
}

/// Shared token storage.
pub type SharedTokenStorage = Arc<dyn TokenStorage>;

// ============================================================================
// InMemoryTokenStorage
// ============================================================================

/// Volatile in-process storage.
#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    tokens: RwLock<Option<Tokens>>,
}

impl InMemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: Tokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn get(&self) -> Option<Tokens> {
        self.tokens.read().clone()
    }

    fn set(&self, tokens: Option<Tokens>) {
        *self.tokens.write() = tokens;
    }
}

// ============================================================================
// FileTokenStorage
// ============================================================================

/// Directory-backed key/value storage, one JSON file per key.
///
/// The file is read lazily on the first `get` and cached afterwards.
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    cache: RwLock<Option<Option<Tokens>>>,
}

impl FileTokenStorage {
    /// Store tokens in `dir` under [`DEFAULT_STORAGE_KEY`].
    pub fn new(dir: &Path) -> Self {
        Self::with_key(dir, DEFAULT_STORAGE_KEY)
    }

    /// Store tokens in `dir` under a custom key.
    pub fn with_key(dir: &Path, key: &str) -> Self {
        Self::with_path(dir.join(format!("{}.json", key)))
    }

    /// Store tokens in an explicit file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cache: RwLock::new(None),
        }
    }

    /// Get the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Option<Tokens> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read token file");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to parse token file");
                None
            }
        }
    }

    fn persist(&self, tokens: Option<&Tokens>) -> std::io::Result<()> {
        match tokens {
            Some(tokens) => {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let json = serde_json::to_string_pretty(tokens)?;
                std::fs::write(&self.path, json)
            }
            None => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        }
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self) -> Option<Tokens> {
        if let Some(cached) = self.cache.read().as_ref() {
            return cached.clone();
        }

        let mut cache = self.cache.write();
        cache.get_or_insert_with(|| self.load()).clone()
    }

    fn set(&self, tokens: Option<Tokens>) {
        if let Err(e) = self.persist(tokens.as_ref()) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist tokens");
        }
        *self.cache.write() = Some(tokens);
    }
}
