//! Convenience helpers for wiring the wasm bridge implementations together.
//!
//! [`build_wasm_bridges`] constructs the HTTP client and persistent byte
//! store the player needs, mirroring the role `bridge-desktop` plays for
//! native targets. The audio graph is opened separately because its absence
//! is reported as an unsupported player rather than a bootstrap error.

use std::sync::Arc;

use bridge_traits::{
    error::Result as BridgeResult,
    http::HttpClient,
    storage::{ByteStore, StoreConfig},
};

use crate::{http::WasmHttpClient, storage::IndexedDbByteStore};

/// Fully constructed wasm bridge objects ready for injection into the core.
pub struct WasmBridgeSet {
    /// HTTP client powered by browser `fetch`.
    pub http_client: Arc<dyn HttpClient>,
    /// IndexedDB-backed persistent byte store.
    pub byte_store: Arc<dyn ByteStore>,
}

impl WasmBridgeSet {
    /// Convenience accessor to clone the HTTP client.
    pub fn http(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http_client)
    }

    /// Convenience accessor to clone the byte store.
    pub fn byte_store(&self) -> Arc<dyn ByteStore> {
        Arc::clone(&self.byte_store)
    }
}

/// Build the default wasm bridge stack.
///
/// The byte store is created with `store_config` but not opened; the first
/// read or write opens the database.
pub fn build_wasm_bridges(store_config: StoreConfig) -> BridgeResult<WasmBridgeSet> {
    let http_client: Arc<dyn HttpClient> = Arc::new(WasmHttpClient::new()?);
    let byte_store: Arc<dyn ByteStore> = Arc::new(IndexedDbByteStore::with_config(store_config));

    Ok(WasmBridgeSet {
        http_client,
        byte_store,
    })
}
