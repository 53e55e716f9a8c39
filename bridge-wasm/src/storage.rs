//! IndexedDB-backed persistent byte store.
//!
//! # Layout
//!
//! - **Database name**: [`StoreConfig::name`] (`audioSound` by default)
//! - **Version**: [`StoreConfig::schema_version`]
//! - **Object store**: [`StoreConfig::store_name`] (`keyvaluepairs`), with
//!   out-of-line string keys and `ArrayBuffer` values
//!
//! This is the layout localForage's IndexedDB driver uses, so assets written
//! by earlier JavaScript builds of the player are read back as cache hits.
//!
//! The database is opened lazily on first access; `configure` is only
//! accepted before that.

use std::cell::RefCell;

use async_trait::async_trait;
use bridge_traits::{
    error::Result as BridgeResult,
    storage::{ByteStore, StoreConfig},
};
use bytes::Bytes;
use js_sys::{ArrayBuffer, Promise, Uint8Array};
use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    IdbDatabase, IdbOpenDbRequest, IdbRequest, IdbTransactionMode, IdbVersionChangeEvent,
};

use crate::error::{js_message, WasmError, WasmResult};

/// Persistent byte store over IndexedDB.
pub struct IndexedDbByteStore {
    config: RefCell<StoreConfig>,
    db: RefCell<Option<IdbDatabase>>,
}

impl IndexedDbByteStore {
    /// Create a store with the default configuration. Nothing is opened yet.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with an explicit configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config: RefCell::new(config),
            db: RefCell::new(None),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> StoreConfig {
        self.config.borrow().clone()
    }

    async fn database(&self) -> WasmResult<IdbDatabase> {
        if let Some(db) = self.db.borrow().as_ref() {
            return Ok(db.clone());
        }

        let config = self.config();
        let db = open_database(&config).await?;
        info!(
            name = %config.name,
            version = config.schema_version(),
            store = %config.store_name,
            "IndexedDB byte store opened"
        );

        // Two first accesses may race to open; either connection works.
        *self.db.borrow_mut() = Some(db.clone());
        Ok(db)
    }

    async fn read(&self, key: &str) -> WasmResult<Option<Bytes>> {
        let db = self.database().await?;
        let store_name = self.config.borrow().store_name.clone();

        let transaction = db.transaction_with_str_and_mode(&store_name, IdbTransactionMode::Readonly)?;
        let store = transaction.object_store(&store_name)?;
        let request = store.get(&JsValue::from_str(key))?;
        let value = JsFuture::from(request_to_promise(&request)).await?;

        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }

        let bytes = if let Some(buffer) = value.dyn_ref::<ArrayBuffer>() {
            Uint8Array::new(buffer).to_vec()
        } else if let Some(array) = value.dyn_ref::<Uint8Array>() {
            array.to_vec()
        } else {
            return Err(WasmError::IndexedDb(format!(
                "unexpected value type stored under {}",
                key
            )));
        };

        Ok(Some(Bytes::from(bytes)))
    }

    async fn write(&self, key: &str, value: &[u8]) -> WasmResult<()> {
        let db = self.database().await?;
        let store_name = self.config.borrow().store_name.clone();

        let transaction =
            db.transaction_with_str_and_mode(&store_name, IdbTransactionMode::Readwrite)?;
        let store = transaction.object_store(&store_name)?;
        let buffer = Uint8Array::from(value).buffer();
        let request = store.put_with_key(&buffer, &JsValue::from_str(key))?;
        JsFuture::from(request_to_promise(&request)).await?;

        debug!(key, bytes = value.len(), "IndexedDB put completed");
        Ok(())
    }
}

impl Default for IndexedDbByteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ByteStore for IndexedDbByteStore {
    fn configure(&self, config: StoreConfig) -> BridgeResult<()> {
        if self.db.borrow().is_some() {
            return Err(WasmError::AlreadyOpened(self.config.borrow().name.clone()).into());
        }
        *self.config.borrow_mut() = config;
        Ok(())
    }

    async fn get_item(&self, key: &str) -> BridgeResult<Option<Bytes>> {
        Ok(self.read(key).await?)
    }

    async fn set_item(&self, key: &str, value: Bytes) -> BridgeResult<()> {
        Ok(self.write(key, &value).await?)
    }
}

/// Open (creating or upgrading as needed) the configured database.
async fn open_database(config: &StoreConfig) -> WasmResult<IdbDatabase> {
    let window = web_sys::window()
        .ok_or_else(|| WasmError::Unsupported("No window object available".to_string()))?;

    let factory = window
        .indexed_db()?
        .ok_or_else(|| WasmError::Unsupported("IndexedDB not available".to_string()))?;

    let open_request: IdbOpenDbRequest =
        factory.open_with_u32(&config.name, config.schema_version())?;

    let store_name = config.store_name.clone();
    let onupgradeneeded = Closure::once(move |event: IdbVersionChangeEvent| {
        let db = event
            .target()
            .and_then(|target| target.dyn_into::<IdbOpenDbRequest>().ok())
            .and_then(|request| request.result().ok())
            .and_then(|result| result.dyn_into::<IdbDatabase>().ok());

        if let Some(db) = db {
            if !db.object_store_names().contains(&store_name) {
                if let Err(err) = db.create_object_store(&store_name) {
                    tracing::error!(
                        store = %store_name,
                        error = %js_message(&err),
                        "Failed to create object store"
                    );
                }
            }
        }
    });
    open_request.set_onupgradeneeded(Some(onupgradeneeded.as_ref().unchecked_ref()));
    onupgradeneeded.forget();

    let result = JsFuture::from(request_to_promise(&open_request)).await?;
    result
        .dyn_into::<IdbDatabase>()
        .map_err(|_| WasmError::IndexedDb("Failed to cast result to IdbDatabase".to_string()))
}

/// Adapt an IDB request's success/error callbacks into a Promise.
fn request_to_promise(request: &IdbRequest) -> Promise {
    Promise::new(&mut |resolve, reject| {
        let request_clone = request.clone();
        let reject_on_result = reject.clone();
        let onsuccess = Closure::once_into_js(move || match request_clone.result() {
            Ok(result) => {
                let _ = resolve.call1(&JsValue::NULL, &result);
            }
            Err(err) => {
                let _ = reject_on_result.call1(&JsValue::NULL, &err);
            }
        });
        request.set_onsuccess(Some(onsuccess.unchecked_ref()));

        let request_clone = request.clone();
        let onerror = Closure::once_into_js(move || {
            let error = request_clone
                .error()
                .ok()
                .flatten()
                .map(JsValue::from)
                .unwrap_or_else(|| JsValue::from_str("IndexedDB request failed"));
            let _ = reject.call1(&JsValue::NULL, &error);
        });
        request.set_onerror(Some(onerror.unchecked_ref()));
    })
}
