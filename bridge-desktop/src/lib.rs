//! # Desktop Bridge Implementations
//!
//! Native implementations of the host capabilities the player needs:
//! - `HttpClient` using `reqwest`
//! - `ByteStore` using files under the platform cache directory (`tokio::fs`)
//!
//! There is no native `AudioGraph` here; desktop hosts supply their own
//! audio engine binding.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use bridge_desktop::{FileByteStore, ReqwestHttpClient};
//! use core_playback::{PlayerBuilder, PlayerOptions};
//!
//! let availability = PlayerBuilder::new(PlayerOptions::default().with_base_url("https://cdn.example.com/sfx"))
//!     .with_http_client(Arc::new(ReqwestHttpClient::try_new()?))
//!     .with_byte_store(Arc::new(FileByteStore::new()))
//!     .build(|| MyEngineGraph::open())?;
//! ```

mod http;
mod storage;

pub use http::ReqwestHttpClient;
pub use storage::FileByteStore;
