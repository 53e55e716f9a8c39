//! # Audio Playback Module
//!
//! Fetches short audio assets, decodes them through the host audio graph and
//! plays them with a per-sound gain node.
//!
//! ## Overview
//!
//! This module handles:
//! - Loading with a decoded-buffer memory cache, a persistent raw-byte cache
//!   and de-duplication of concurrent loads
//! - Preloading single files or all-or-nothing batches
//! - Fire-and-forget playback with an observable stop handle
//! - Gain-node volume control
//! - JavaScript bindings (`wasm` feature on `wasm32`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_playback::{PlayerBuilder, PlayerCell, PlayerOptions, PlayOptions};
//!
//! static PLAYER: PlayerCell<MyGraph> = PlayerCell::new();
//!
//! let availability = PLAYER.get_or_init(|| {
//!     PlayerBuilder::new(PlayerOptions::default().with_base_url("https://cdn.example.com/sfx"))
//!         .with_http_client(http)
//!         .with_byte_store(store)
//!         .build(MyGraph::open)
//! })?;
//!
//! if let Some(player) = availability.player() {
//!     player.preload_audios(vec!["click.mp3", "pop.mp3"]).await?;
//!     let handle = player.play("click.mp3", PlayOptions::default().with_volumn(0.5));
//!     handle.stop();
//! }
//! ```

pub mod builder;
pub mod cache;
pub mod cell;
pub mod config;
pub mod error;
pub mod handle;
pub mod player;
pub mod preload;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod wasm;

pub use builder::{PlayerAvailability, PlayerBuilder};
pub use cache::{cache_key, CACHE_NAMESPACE};
pub use cell::PlayerCell;
pub use config::{PlayOptions, PlayerOptions};
pub use error::{PlaybackError, Result};
pub use handle::{PlaybackHandle, PlaybackOutcome, PlaybackState, StopHandle};
pub use player::AudioPlayer;
pub use preload::{PreloadRequest, Preloaded};
