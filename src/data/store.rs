//! Local persisted store
//!
//! String keys mapping to JSON-encoded text, mirrored to a single JSON file
//! on every write. Values are never schema-checked on write; reads that fail
//! to decode are logged and reported as absent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::metrics::{STORE_DECODE_FAILURES_TOTAL, STORE_OPERATIONS_TOTAL};

/// Locally created posts
pub const POSTS_KEY: &str = "posts";
/// Marker for the logged-in user
pub const LOGGED_IN_USER_KEY: &str = "loggedInUser";
/// Locally registered accounts
pub const ACCOUNTS_KEY: &str = "accounts";

/// File-backed key/value store
pub struct LocalStore {
    /// Backing file, `None` for an in-memory store
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Open the store at `path`
    ///
    /// A missing file yields an empty store. A file that is not a JSON
    /// object of strings is logged and ignored; it is overwritten by the
    /// next write.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let entries = match tokio::fs::read_to_string(path).await {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!(
                        %error,
                        path = %path.display(),
                        "Store file is malformed; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Store opened");

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries: RwLock::new(entries),
        })
    }

    /// Create a store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Raw text stored under `key`
    pub async fn get_item(&self, key: &str) -> Option<String> {
        STORE_OPERATIONS_TOTAL.with_label_values(&["get", key]).inc();
        self.entries.read().await.get(key).cloned()
    }

    /// Store raw text under `key`
    pub async fn set_item(&self, key: &str, value: String) -> Result<(), AppError> {
        STORE_OPERATIONS_TOTAL.with_label_values(&["set", key]).inc();
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        self.persist(&entries).await
    }

    /// Remove `key`; removing a missing key is a no-op
    pub async fn remove_item(&self, key: &str) -> Result<(), AppError> {
        STORE_OPERATIONS_TOTAL
            .with_label_values(&["remove", key])
            .inc();
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    /// Decode the JSON value under `key`
    ///
    /// Absent and malformed values both yield `None`.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key).await?;
        decode(key, &raw)
    }

    /// Encode `value` as JSON under `key`
    pub async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value).map_err(|e| AppError::Store(e.to_string()))?;
        self.set_item(key, raw).await
    }

    /// Read-modify-write the JSON value under `key` while holding the
    /// write lock
    ///
    /// A missing or malformed value starts from `T::default()`.
    pub async fn update_json<T, R, F>(&self, key: &str, update: F) -> Result<R, AppError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R, AppError>,
    {
        STORE_OPERATIONS_TOTAL
            .with_label_values(&["update", key])
            .inc();
        let mut entries = self.entries.write().await;
        let mut value: T = entries
            .get(key)
            .and_then(|raw| decode(key, raw))
            .unwrap_or_default();

        let result = update(&mut value)?;

        let raw = serde_json::to_string(&value).map_err(|e| AppError::Store(e.to_string()))?;
        entries.insert(key.to_string(), raw);
        self.persist(&entries).await?;
        Ok(result)
    }

    /// Write all entries to the backing file atomically
    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        let bytes =
            serde_json::to_vec_pretty(entries).map_err(|e| AppError::Store(e.to_string()))?;

        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| AppError::Internal(e.into()))?
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            STORE_DECODE_FAILURES_TOTAL.with_label_values(&[key]).inc();
            tracing::warn!(%error, key, "Stored value is malformed; treating as absent");
            None
        }
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    use std::io::Write;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut file = tempfile::NamedTempFile::new_in(&dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)
        .map_err(|e| AppError::Store(e.error.to_string()))?;
    Ok(())
}
