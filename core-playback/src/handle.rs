//! # Playback Handles
//!
//! `play` returns before the asset is loaded, so the caller gets a handle
//! with two halves: a stop control usable at any time, and an outcome that
//! resolves once the sound started, was stopped first, or failed.

use std::sync::Arc;

use bridge_traits::audio::BufferSource;
use futures::channel::oneshot;
use parking_lot::Mutex;
use tracing::warn;

use crate::error::{PlaybackError, Result};

/// How a `play` call ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The source node was started.
    Started,
    /// `stop` was called before the asset finished loading; nothing played.
    StoppedBeforeStart,
}

/// Observable state of a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Waiting for the asset to load.
    Pending,
    Playing,
    /// Stopped by the caller, before or after starting.
    Stopped,
    /// Played to the end.
    Finished,
}

enum ControlState<S> {
    Pending,
    Playing(S),
    Stopped,
    Finished,
}

/// Shared stop control for one playback.
pub struct PlaybackControl<S: BufferSource> {
    state: Mutex<ControlState<S>>,
}

impl<S: BufferSource> PlaybackControl<S> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(ControlState::Pending),
        }
    }

    pub fn state(&self) -> PlaybackState {
        match &*self.state.lock() {
            ControlState::Pending => PlaybackState::Pending,
            ControlState::Playing(_) => PlaybackState::Playing,
            ControlState::Stopped => PlaybackState::Stopped,
            ControlState::Finished => PlaybackState::Finished,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(&*self.state.lock(), ControlState::Stopped)
    }

    /// Start `source` unless the playback was stopped in the meantime.
    ///
    /// The host must not fire the ended callback from inside `start`.
    pub(crate) fn start(&self, source: S) -> Result<PlaybackOutcome> {
        let mut state = self.state.lock();
        if matches!(&*state, ControlState::Stopped) {
            source.set_on_ended(None);
            if let Err(e) = source.disconnect() {
                warn!(error = %e, "Failed to disconnect unstarted source");
            }
            return Ok(PlaybackOutcome::StoppedBeforeStart);
        }

        if let Err(e) = source.start(0.0) {
            source.set_on_ended(None);
            if let Err(e) = source.disconnect() {
                warn!(error = %e, "Failed to disconnect source after start failed");
            }
            return Err(PlaybackError::graph(e));
        }
        *state = ControlState::Playing(source);
        Ok(PlaybackOutcome::Started)
    }

    /// Natural end of playback.
    pub(crate) fn finish(&self) {
        let mut state = self.state.lock();
        if matches!(&*state, ControlState::Playing(_)) {
            *state = ControlState::Finished;
        }
    }

    /// Stop immediately. Idempotent; a no-op once playback finished.
    pub fn stop(&self) {
        let source = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, ControlState::Stopped) {
                ControlState::Playing(source) => Some(source),
                ControlState::Pending | ControlState::Stopped => None,
                ControlState::Finished => {
                    *state = ControlState::Finished;
                    None
                }
            }
        };

        let Some(source) = source else {
            return;
        };

        source.set_on_ended(None);
        if let Err(e) = source.stop(0.0) {
            warn!(error = %e, "Failed to stop source");
        }
        if let Err(e) = source.disconnect() {
            warn!(error = %e, "Failed to disconnect source");
        }
    }
}

/// Cloneable stop half of a [`PlaybackHandle`].
pub struct StopHandle<S: BufferSource> {
    control: Arc<PlaybackControl<S>>,
}

impl<S: BufferSource> Clone for StopHandle<S> {
    fn clone(&self) -> Self {
        Self {
            control: Arc::clone(&self.control),
        }
    }
}

impl<S: BufferSource> StopHandle<S> {
    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn state(&self) -> PlaybackState {
        self.control.state()
    }
}

/// Returned synchronously by `AudioPlayer::play`.
pub struct PlaybackHandle<S: BufferSource> {
    control: Arc<PlaybackControl<S>>,
    outcome: oneshot::Receiver<Result<PlaybackOutcome>>,
}

impl<S: BufferSource> PlaybackHandle<S> {
    pub(crate) fn new(
        control: Arc<PlaybackControl<S>>,
        outcome: oneshot::Receiver<Result<PlaybackOutcome>>,
    ) -> Self {
        Self { control, outcome }
    }

    /// Stop the sound. Before the asset loads this prevents it from ever
    /// starting.
    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn state(&self) -> PlaybackState {
        self.control.state()
    }

    pub fn stop_handle(&self) -> StopHandle<S> {
        StopHandle {
            control: Arc::clone(&self.control),
        }
    }

    /// Wait for the playback attempt to resolve.
    pub async fn outcome(self) -> Result<PlaybackOutcome> {
        self.outcome
            .await
            .map_err(|_| PlaybackError::Internal("playback task dropped".to_string()))?
    }
}
