//! # Player Construction
//!
//! `PlayerBuilder` gathers the host capabilities, configures the persistent
//! store once and opens the audio graph. A host without audio support still
//! gets a value back: [`PlayerAvailability::Unsupported`].

use std::sync::Arc;

use bridge_traits::{
    audio::AudioGraph,
    error::Result as BridgeResult,
    http::HttpClient,
    storage::{ByteStore, StoreConfig},
    time::{Clock, SystemClock},
};
use tracing::{info, warn};

use crate::cache::PersistentByteCache;
use crate::config::PlayerOptions;
use crate::error::{PlaybackError, Result};
use crate::player::AudioPlayer;

/// Result of building a player on a given host.
pub enum PlayerAvailability<G: AudioGraph> {
    Supported(AudioPlayer<G>),
    /// The host has no usable audio graph. Operations are unavailable.
    Unsupported { reason: String },
}

impl<G: AudioGraph> Clone for PlayerAvailability<G> {
    fn clone(&self) -> Self {
        match self {
            Self::Supported(player) => Self::Supported(player.clone()),
            Self::Unsupported { reason } => Self::Unsupported {
                reason: reason.clone(),
            },
        }
    }
}

impl<G: AudioGraph> PlayerAvailability<G> {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }

    pub fn player(&self) -> Option<&AudioPlayer<G>> {
        match self {
            Self::Supported(player) => Some(player),
            Self::Unsupported { .. } => None,
        }
    }

    pub fn into_player(self) -> Option<AudioPlayer<G>> {
        match self {
            Self::Supported(player) => Some(player),
            Self::Unsupported { .. } => None,
        }
    }
}

/// Builder for [`AudioPlayer`].
///
/// # Example
///
/// ```rust,ignore
/// let availability = PlayerBuilder::new(PlayerOptions::default().with_base_url("/sounds"))
///     .with_http_client(http)
///     .with_byte_store(store)
///     .build(WebAudioGraph::open)?;
/// ```
pub struct PlayerBuilder {
    options: PlayerOptions,
    http_client: Option<Arc<dyn HttpClient>>,
    byte_store: Option<Arc<dyn ByteStore>>,
    store_config: StoreConfig,
    clock: Arc<dyn Clock>,
}

impl PlayerBuilder {
    pub fn new(options: PlayerOptions) -> Self {
        Self {
            options,
            http_client: None,
            byte_store: None,
            store_config: StoreConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_byte_store(mut self, store: Arc<dyn ByteStore>) -> Self {
        self.byte_store = Some(store);
        self
    }

    /// Override the persistent store configuration (defaults to the
    /// `audioSound` database).
    pub fn with_store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Clock used for load timing logs.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the player, opening the audio graph with `open_graph`.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::Config`] if the options fail validation
    /// - [`PlaybackError::CapabilityMissing`] if no HTTP client or byte store
    ///   was supplied
    ///
    /// A graph that fails to open is not an error; it yields
    /// [`PlayerAvailability::Unsupported`].
    pub fn build<G, F>(self, open_graph: F) -> Result<PlayerAvailability<G>>
    where
        G: AudioGraph,
        F: FnOnce() -> BridgeResult<G>,
    {
        self.options.validate().map_err(PlaybackError::Config)?;

        let http = self
            .http_client
            .ok_or_else(|| PlaybackError::CapabilityMissing {
                capability: "HttpClient".to_string(),
                message: "an HTTP client is required to fetch audio assets".to_string(),
            })?;
        let store = self
            .byte_store
            .ok_or_else(|| PlaybackError::CapabilityMissing {
                capability: "ByteStore".to_string(),
                message: "a persistent byte store is required for the audio cache".to_string(),
            })?;

        let persistent = PersistentByteCache::new(store);
        persistent.configure(self.store_config);

        let graph = match open_graph() {
            Ok(graph) => graph,
            Err(e) => {
                warn!(error = %e, "Audio graph unavailable, player disabled");
                return Ok(PlayerAvailability::Unsupported {
                    reason: e.to_string(),
                });
            }
        };

        info!(
            base_url = %self.options.base_url,
            volumn = self.options.volumn,
            "Audio player created"
        );

        Ok(PlayerAvailability::Supported(AudioPlayer::new(
            self.options,
            graph,
            http,
            persistent,
            self.clock,
        )))
    }
}
