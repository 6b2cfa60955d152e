use crate::ports::outbound::KeyValueStore;
use crate::shared::error::ScopeGraphError;
use crate::shared::security::{validate_file_size, validate_regular_file, MAX_CACHE_FILE_SIZE};
use crate::shared::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const CACHE_DIR_NAME: &str = "scope-graph";
const CACHE_FILE_NAME: &str = "cache.json";

/// FileKeyValueStore adapter persisting the cache as one JSON document
///
/// The whole document is loaded on open and rewritten on every mutation.
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a crash never leaves a half-written cache behind.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl FileKeyValueStore {
    /// Opens (or lazily creates) the store at `path`
    ///
    /// A document that is not valid JSON is discarded with a warning and the
    /// store starts empty.
    ///
    /// # Errors
    /// Returns an error if the path is a symbolic link, not a regular file,
    /// larger than the allowed size, or unreadable
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            Self::load(&path)?
        } else {
            debug!(path = %path.display(), "cache file does not exist yet");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Opens the store at `<dir>/scope-graph/cache.json`
    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open(dir.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME))
    }

    /// `<user cache dir>/scope-graph/cache.json`, if the platform has a cache dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, Value>> {
        validate_regular_file(path, "cache file")?;

        let metadata = fs::metadata(path).map_err(|e| ScopeGraphError::CacheStoreError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        validate_file_size(metadata.len(), path, MAX_CACHE_FILE_SIZE)?;

        let content = fs::read_to_string(path).map_err(|e| ScopeGraphError::CacheStoreError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache file is corrupt, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Value>>> {
        self.entries.lock().map_err(|_| {
            ScopeGraphError::CacheStoreError {
                path: self.path.clone(),
                details: "cache lock poisoned".to_string(),
            }
            .into()
        })
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        let to_store_error = |details: String| ScopeGraphError::CacheStoreError {
            path: self.path.clone(),
            details,
        };

        let dir = match self.path.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| to_store_error(e.to_string()))?;

        if self.path.exists() {
            validate_regular_file(&self.path, "cache file")?;
        }

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| to_store_error(e.to_string()))?;
        serde_json::to_writer(&mut temp, entries).map_err(|e| to_store_error(e.to_string()))?;
        temp.flush().map_err(|e| to_store_error(e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| to_store_error(e.error.to_string()))?;

        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .lock()?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
