//! # Audio Player
//!
//! Loads assets through the cache layers and plays them on the host audio
//! graph.
//!
//! ## Load pipeline
//!
//! ```text
//! load_audio(filename)
//!   ├─ memory hit ─────────────────────────────────────────> buffer
//!   └─ join or start the in-flight load
//!        ├─ persistent hit ──> decode ──> memory insert ───> buffer
//!        └─ miss ──> GET {baseUrl}/{filename} ──> decode
//!                      ├─ detached persistent write
//!                      └─ memory insert ───────────────────> buffer
//! ```

use std::sync::Arc;

use bridge_traits::{
    audio::{AudioGraph, BufferSource, GainControl},
    http::{HttpClient, HttpRequest},
    time::Clock,
};
use bytes::Bytes;
use tracing::{debug, info, instrument, warn};

use crate::cache::{cache_key, DecodedBufferCache, InFlightLoads, PersistentByteCache};
use crate::config::{PlayOptions, PlayerOptions};
use crate::error::{PlaybackError, Result};
use crate::handle::{PlaybackControl, PlaybackHandle, PlaybackOutcome};

/// Where a load found its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadSource {
    Persistent,
    Network,
}

pub(crate) struct PlayerInner<G: AudioGraph> {
    options: PlayerOptions,
    graph: G,
    http: Arc<dyn HttpClient>,
    persistent: PersistentByteCache,
    buffers: DecodedBufferCache<G::Buffer>,
    in_flight: InFlightLoads<G::Buffer>,
    clock: Arc<dyn Clock>,
}

/// Audio player bound to one audio graph.
///
/// Cloning is cheap; clones share caches and the graph.
pub struct AudioPlayer<G: AudioGraph> {
    inner: Arc<PlayerInner<G>>,
}

impl<G: AudioGraph> Clone for AudioPlayer<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: AudioGraph> AudioPlayer<G> {
    pub(crate) fn new(
        options: PlayerOptions,
        graph: G,
        http: Arc<dyn HttpClient>,
        persistent: PersistentByteCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(PlayerInner {
                options,
                graph,
                http,
                persistent,
                buffers: DecodedBufferCache::new(),
                in_flight: InFlightLoads::new(),
                clock,
            }),
        }
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.inner.options
    }

    pub fn graph(&self) -> &G {
        &self.inner.graph
    }

    /// Returns `true` if a decoded buffer for `filename` is in memory.
    pub fn is_cached(&self, filename: &str) -> bool {
        self.inner.buffers.contains(&cache_key(filename))
    }

    /// Decoded buffer for `filename`.
    ///
    /// Concurrent calls for the same file share one load. A failed load is
    /// not remembered; the next call starts over.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::RequestFailed`] when the fetch fails (or returns a
    ///   non-2xx status while `reject_http_errors` is set)
    /// - [`PlaybackError::DecodeFailed`] when the bytes do not decode
    #[instrument(skip(self), fields(player.base_url = %self.inner.options.base_url))]
    pub async fn load_audio(&self, filename: &str) -> Result<G::Buffer> {
        let key = cache_key(filename);

        if let Some(buffer) = self.inner.buffers.get(&key) {
            debug!("Memory cache hit");
            return Ok(buffer);
        }

        let (load, started) = self.inner.in_flight.join_or_start(&key, || {
            let inner = Arc::clone(&self.inner);
            let filename = filename.to_string();
            let key = key.clone();
            core_async::boxed(async move {
                let result = inner.fetch_and_decode(&filename, &key).await;
                inner.in_flight.finish(&key);
                result
            })
        });

        if !started {
            debug!("Joining in-flight load");
        }

        load.await
    }

    /// Create a gain node set to `value`, connected to the destination.
    ///
    /// The value is applied as-is. Every call returns a new node.
    pub fn set_volume(&self, value: f32) -> Result<G::Gain> {
        let graph = &self.inner.graph;
        let gain = graph.create_gain().map_err(PlaybackError::graph)?;

        if gain.supports_smoothing() {
            gain.set_target_at_time(value, graph.current_time(), 0.0)
                .map_err(PlaybackError::graph)?;
        } else {
            gain.set_gain(value);
        }

        graph
            .connect_to_destination(&gain)
            .map_err(PlaybackError::graph)?;

        Ok(gain)
    }

    /// Start playing `filename`.
    ///
    /// Returns at once; loading and starting happen on a spawned task. The
    /// handle stops the sound and reports how the attempt ended.
    #[instrument(skip(self, options), fields(looping = options.looping))]
    pub fn play(&self, filename: &str, options: PlayOptions) -> PlaybackHandle<G::Source> {
        let control = Arc::new(PlaybackControl::new());
        let (tx, rx) = futures::channel::oneshot::channel();

        let player = self.clone();
        let task_control = Arc::clone(&control);
        let filename = filename.to_string();

        let spawned = core_async::spawn(async move {
            let outcome = player.start_playback(&filename, &options, &task_control).await;
            match &outcome {
                Ok(PlaybackOutcome::Started) => debug!(filename = %filename, "Playback started"),
                Ok(PlaybackOutcome::StoppedBeforeStart) => {
                    debug!(filename = %filename, "Stopped before playback started")
                }
                Err(e) => warn!(filename = %filename, error = %e, "Playback failed"),
            }
            let _ = tx.send(outcome);
        });

        if let Err(e) = spawned {
            // The task and its sender were dropped unpolled; report through a fresh channel.
            warn!(error = %e, "Playback task could not be spawned");
            let (tx, rx) = futures::channel::oneshot::channel();
            let _ = tx.send(Err(PlaybackError::from(e)));
            return PlaybackHandle::new(control, rx);
        }

        PlaybackHandle::new(control, rx)
    }

    async fn start_playback(
        &self,
        filename: &str,
        options: &PlayOptions,
        control: &Arc<PlaybackControl<G::Source>>,
    ) -> Result<PlaybackOutcome> {
        let buffer = self.load_audio(filename).await?;

        if control.is_stopped() {
            return Ok(PlaybackOutcome::StoppedBeforeStart);
        }

        let graph = &self.inner.graph;
        let source = graph.create_buffer_source().map_err(PlaybackError::graph)?;
        source.set_buffer(&buffer);
        source.set_loop(options.looping);

        let gain = self.set_volume(options.resolve_volumn(self.inner.options.volumn))?;
        source.connect(&gain).map_err(PlaybackError::graph)?;

        let weak = Arc::downgrade(control);
        let ended_name = filename.to_string();
        source.set_on_ended(Some(Box::new(move || {
            if let Some(control) = weak.upgrade() {
                control.finish();
            }
            debug!(filename = %ended_name, "Playback ended");
        })));

        control.start(source)
    }
}

impl<G: AudioGraph> PlayerInner<G> {
    async fn fetch_and_decode(&self, filename: &str, key: &str) -> Result<G::Buffer> {
        let started = self.clock.unix_timestamp_millis();

        let (bytes, source) = match self.persistent.read(key).await {
            Some(bytes) => {
                debug!(
                    filename,
                    bytes = bytes.len(),
                    elapsed_ms = self.clock.millis_since(started),
                    "Persistent cache hit"
                );
                (bytes, LoadSource::Persistent)
            }
            None => (self.fetch(filename).await?, LoadSource::Network),
        };

        let decode_started = self.clock.unix_timestamp_millis();
        let decoded = self.decode(filename, bytes.clone()).await;

        // Fetched bytes are kept even when they fail to decode.
        if source == LoadSource::Network {
            self.persistent.persist_detached(key.to_string(), bytes);
        }

        let buffer = decoded?;
        debug!(
            filename,
            elapsed_ms = self.clock.millis_since(decode_started),
            "Decoded audio"
        );

        self.buffers.insert(key, buffer.clone());

        info!(
            filename,
            source = ?source,
            elapsed_ms = self.clock.millis_since(started),
            "Audio loaded"
        );
        Ok(buffer)
    }

    async fn fetch(&self, filename: &str) -> Result<Bytes> {
        let url = self.options.asset_url(filename);
        let started = self.clock.unix_timestamp_millis();

        let response = match self.http.execute(HttpRequest::get(url.as_str())).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Audio request failed");
                return Err(PlaybackError::RequestFailed {
                    filename: filename.to_string(),
                });
            }
        };

        if self.options.reject_http_errors && !response.is_success() {
            warn!(url = %url, status = response.status, "Audio request returned error status");
            return Err(PlaybackError::RequestFailed {
                filename: filename.to_string(),
            });
        }

        debug!(
            url = %url,
            status = response.status,
            bytes = response.body.len(),
            elapsed_ms = self.clock.millis_since(started),
            "Fetched audio"
        );
        Ok(response.body)
    }

    async fn decode(&self, filename: &str, bytes: Bytes) -> Result<G::Buffer> {
        match self.graph.decode_audio_data(bytes).await {
            Ok(Some(buffer)) => Ok(buffer),
            Ok(None) => Err(PlaybackError::DecodeFailed {
                filename: filename.to_string(),
                reason: "decoder produced no buffer".to_string(),
            }),
            Err(e) => Err(PlaybackError::DecodeFailed {
                filename: filename.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
