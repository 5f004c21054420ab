//! Storage for the available index

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

/// Abstract storage interface for the last used available index
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Load the stored index, `None` when nothing has been stored yet
    ///
    /// # Errors
    ///
    /// Returns error if the store exists but cannot be read or parsed
    async fn load(&self) -> Result<Option<u32>, StorageError>;

    /// Store the index
    ///
    /// # Errors
    ///
    /// Returns error if storage fails
    async fn save(&mut self, index: u32) -> Result<(), StorageError>;
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content is not a decimal `u32`.
    #[error("invalid stored index: {0:?}")]
    Parse(String),

    /// Backing store cannot be used.
    #[error("storage not available")]
    NotAvailable,
}

/// In-memory index storage (non-persistent)
///
/// Clones share the stored value, so a test can keep a handle and
/// simulate a restart by handing another clone to a fresh entity.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndexStore {
    value: Arc<Mutex<Option<u32>>>,
}

impl MemoryIndexStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `index`
    #[must_use]
    pub fn with_index(index: u32) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(index))),
        }
    }

    /// Currently stored value
    #[must_use]
    pub fn stored(&self) -> Option<u32> {
        self.value.lock().ok().and_then(|v| *v)
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn load(&self) -> Result<Option<u32>, StorageError> {
        self.value
            .lock()
            .map(|v| *v)
            .map_err(|_| StorageError::NotAvailable)
    }

    async fn save(&mut self, index: u32) -> Result<(), StorageError> {
        let mut value = self.value.lock().map_err(|_| StorageError::NotAvailable)?;
        *value = Some(index);
        Ok(())
    }
}

/// File-based index storage
///
/// The file holds the index as a decimal integer followed by a newline.
#[derive(Debug, Clone)]
pub struct FileIndexStore {
    path: PathBuf,
}

impl FileIndexStore {
    /// Create file storage at the given path
    ///
    /// Nothing is touched until the first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the index file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl IndexStore for FileIndexStore {
    async fn load(&self) -> Result<Option<u32>, StorageError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let text = tokio::fs::read_to_string(&self.path).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        trimmed
            .parse::<u32>()
            .map(Some)
            .map_err(|_| StorageError::Parse(trimmed.to_string()))
    }

    async fn save(&mut self, index: u32) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // The index file is only ever replaced whole.
        let temp = self.temp_path();
        tokio::fs::write(&temp, format!("{index}\n")).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}
