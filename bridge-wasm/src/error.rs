//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// IndexedDB operation failed
    #[error("IndexedDB error: {0}")]
    IndexedDb(String),

    /// JavaScript error from web-sys
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// A browser API is missing
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Store was configured after it had been opened
    #[error("Store already opened: {0}")]
    AlreadyOpened(String),
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::IndexedDb(_) | WasmError::AlreadyOpened(_) => {
                BridgeError::Storage(err.to_string())
            }
            WasmError::Unsupported(what) => BridgeError::NotAvailable(what),
            WasmError::JavaScript(_) => BridgeError::OperationFailed(err.to_string()),
        }
    }
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::JavaScript(js_message(&js_value))
    }
}

/// Best-effort message extraction from a thrown JavaScript value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        text
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        format!("{}: {}", exception.name(), exception.message())
    } else {
        format!("{:?}", value)
    }
}
