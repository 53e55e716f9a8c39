//! Persistent cache of raw asset bytes backed by the host `ByteStore`.

use bridge_traits::storage::{ByteStore, StoreConfig};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Thin wrapper over the host store that never lets storage failures reach
/// the player: failed reads count as misses, failed writes are logged.
#[derive(Clone)]
pub struct PersistentByteCache {
    store: Arc<dyn ByteStore>,
}

impl PersistentByteCache {
    pub fn new(store: Arc<dyn ByteStore>) -> Self {
        Self { store }
    }

    /// Configure the underlying store. Failures are logged; the store then
    /// keeps whatever configuration it already had.
    pub fn configure(&self, config: StoreConfig) {
        let name = config.name.clone();
        match self.store.configure(config) {
            Ok(()) => debug!(store = %name, "Persistent byte store configured"),
            Err(e) => warn!(store = %name, error = %e, "Persistent byte store configuration ignored"),
        }
    }

    /// Read the bytes stored under `key`.
    pub async fn read(&self, key: &str) -> Option<Bytes> {
        match self.store.get_item(key).await {
            Ok(hit) => hit,
            Err(e) => {
                error!(key, error = %e, "Persistent cache read failed, treating as miss");
                None
            }
        }
    }

    /// Write `bytes` under `key` on a detached task. The caller never waits
    /// for the write and never sees its outcome. Without an executor to run
    /// the task the write is skipped.
    pub fn persist_detached(&self, key: String, bytes: Bytes) {
        let store = Arc::clone(&self.store);
        let task_key = key.clone();
        let spawned = core_async::spawn(async move {
            let len = bytes.len();
            match store.set_item(&task_key, bytes).await {
                Ok(()) => debug!(key = %task_key, bytes = len, "Persisted audio bytes"),
                Err(e) => warn!(key = %task_key, error = %e, "Failed to persist audio bytes"),
            }
        });
        if let Err(e) = spawned {
            warn!(key = %key, error = %e, "Skipped persisting audio bytes");
        }
    }
}
