//! Persistent Byte Storage Abstraction
//!
//! A durable key-value store holding raw (undecoded) asset bytes across
//! sessions:
//! - Web: IndexedDB
//! - Desktop: files under the platform cache directory
//!
//! Stores are configured once, before first use, with a [`StoreConfig`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{error::Result, platform::PlatformSendSync};

/// One-time configuration of a persistent byte store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Database name.
    #[serde(default = "default_store_name")]
    pub name: String,
    /// Capacity hint in bytes. Stores may use it to request quota; it is
    /// never enforced as an eviction limit.
    #[serde(default = "default_store_size")]
    pub size: u64,
    /// Schema version.
    #[serde(default = "default_store_version")]
    pub version: f64,
    /// Table/object-store name inside the database.
    #[serde(default = "default_store_table")]
    pub store_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            size: default_store_size(),
            version: default_store_version(),
            store_name: default_store_table(),
        }
    }
}

impl StoreConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    /// Version as an integer schema number (IndexedDB only accepts whole
    /// numbers >= 1).
    pub fn schema_version(&self) -> u32 {
        if self.version.is_finite() && self.version >= 1.0 {
            self.version as u32
        } else {
            1
        }
    }
}

fn default_store_name() -> String {
    "audioSound".to_string()
}

fn default_store_size() -> u64 {
    4_980_736
}

fn default_store_version() -> f64 {
    1.0
}

fn default_store_table() -> String {
    "keyvaluepairs".to_string()
}

/// Persistent key-value store for binary payloads.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::ByteStore;
///
/// async fn remember(store: &dyn ByteStore, key: &str, data: Bytes) -> Result<()> {
///     if store.get_item(key).await?.is_none() {
///         store.set_item(key, data).await?;
///     }
///     Ok(())
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ByteStore: PlatformSendSync {
    /// Apply the store configuration.
    ///
    /// Must be called before the first read or write; implementations return
    /// an error when the store has already been opened.
    fn configure(&self, config: StoreConfig) -> Result<()>;

    /// Read the payload stored under `key`. Returns `Ok(None)` on a miss.
    async fn get_item(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store `value` under `key`, replacing any previous payload.
    async fn set_item(&self, key: &str, value: Bytes) -> Result<()>;
}
