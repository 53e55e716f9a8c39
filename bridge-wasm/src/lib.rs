//! WebAssembly Bridge Implementations
//!
//! Browser implementations of the `bridge-traits` capabilities used by the
//! audio player, built on `web-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It compiles to an empty crate on native targets.
//!
//! # Implementations
//!
//! - `WasmHttpClient`: buffered `fetch` requests
//! - `IndexedDbByteStore`: IndexedDB key-value store for raw asset bytes
//! - `WebAudioGraph`: Web Audio API `AudioContext` (with the prefixed
//!   `webkitAudioContext` fallback)
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::{build_wasm_bridges, WebAudioGraph};
//!
//! let bridges = build_wasm_bridges(StoreConfig::default())?;
//! let graph = WebAudioGraph::open()?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod audio;
pub mod bootstrap;
pub mod error;
pub mod http;
pub mod storage;

// Re-export commonly used types
pub use audio::{WebAudioBuffer, WebAudioGraph, WebAudioSource, WebGainNode};
pub use bootstrap::{build_wasm_bridges, WasmBridgeSet};
pub use error::{WasmError, WasmResult};
pub use http::WasmHttpClient;
pub use storage::IndexedDbByteStore;
