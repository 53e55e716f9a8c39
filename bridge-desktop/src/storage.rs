//! Persistent byte store backed by files in the platform cache directory.
//!
//! Layout: `<root>/<name>/v<schema_version>/<store_name>/<hex(key)>`.
//! Keys are hex encoded so any string maps to a valid file name. Writes go
//! to a temporary sibling first and are renamed into place, so a reader
//! never observes a partially written payload.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{ByteStore, StoreConfig},
};
use bytes::Bytes;
use parking_lot::RwLock;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const TEMP_SUFFIX: &str = ".tmp";

pub struct FileByteStore {
    root: PathBuf,
    config: RwLock<StoreConfig>,
    opened: AtomicBool,
}

impl FileByteStore {
    /// Store rooted at the user's cache directory (the system temp directory
    /// when there is none).
    pub fn new() -> Self {
        let root = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        Self::with_root(root)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: RwLock::new(StoreConfig::default()),
            opened: AtomicBool::new(false),
        }
    }

    /// Directory holding the payload files for the current configuration.
    pub fn directory(&self) -> PathBuf {
        let config = self.config.read();
        self.root
            .join(&config.name)
            .join(format!("v{}", config.schema_version()))
            .join(&config.store_name)
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.directory().join(hex::encode(key.as_bytes()))
    }

    fn mark_opened(&self) {
        self.opened.store(true, Ordering::SeqCst);
    }
}

impl Default for FileByteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ByteStore for FileByteStore {
    fn configure(&self, config: StoreConfig) -> Result<()> {
        if self.opened.load(Ordering::SeqCst) {
            return Err(BridgeError::Storage(format!(
                "store {} is already in use and cannot be reconfigured",
                self.config.read().name
            )));
        }
        debug!(name = %config.name, version = config.version, "Configured file byte store");
        *self.config.write() = config;
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<Bytes>> {
        self.mark_opened();
        let path = self.item_path(key);

        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BridgeError::Storage(format!(
                "reading {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set_item(&self, key: &str, value: Bytes) -> Result<()> {
        self.mark_opened();
        let path = self.item_path(key);
        let dir = self.directory();

        fs::create_dir_all(&dir).await?;
        write_atomically(&path, &value).await?;

        debug!(key, bytes = value.len(), path = ?path, "Stored payload");
        Ok(())
    }
}

async fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);

    let mut file = fs::File::create(&temp).await?;
    file.write_all(data).await?;
    file.flush().await?;
    drop(file);

    if let Err(e) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e.into());
    }
    Ok(())
}
