//! # Host Bridge Traits
//!
//! Capability traits the audio player core requires from its host platform.
//!
//! ## Overview
//!
//! The player never talks to a browser or an OS directly. Every capability it
//! needs is expressed here and implemented per platform:
//!
//! | Trait | Web (`bridge-wasm`) | Desktop (`bridge-desktop`) |
//! |-------|---------------------|----------------------------|
//! | [`HttpClient`](http::HttpClient) | `fetch` | `reqwest` |
//! | [`ByteStore`](storage::ByteStore) | IndexedDB | cache directory files |
//! | [`AudioGraph`](audio::AudioGraph) | Web Audio `AudioContext` | host supplied |
//! | [`Clock`](time::Clock) | `SystemClock` | `SystemClock` |
//! | [`LoggerSink`](time::LoggerSink) | optional | optional |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it with enough context (key, URL,
//! operation) to be actionable.
//!
//! ## Thread Safety
//!
//! Traits are bounded by [`PlatformSendSync`](platform::PlatformSendSync):
//! `Send + Sync` natively, unconstrained on `wasm32` where browser handles are
//! single-threaded.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//!
//! pub struct StaticHttpClient;
//!
//! #[async_trait::async_trait]
//! impl HttpClient for StaticHttpClient {
//!     async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
//!         Ok(HttpResponse::ok(&b"RIFF"[..]))
//!     }
//! }
//! ```

pub mod audio;
pub mod error;
pub mod http;
pub mod platform;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use audio::{AudioGraph, BufferSource, DecodedAudio, GainControl};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use platform::{EndedCallback, PlatformSendSync};
pub use storage::{ByteStore, StoreConfig};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
