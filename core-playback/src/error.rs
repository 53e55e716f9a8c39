//! # Playback Error Types
//!
//! Error types for loading, preloading and playing audio assets.
//!
//! `PlaybackError` is `Clone` because one in-flight load can be awaited by
//! several callers, and each of them receives its own copy of the outcome.

use thiserror::Error;

/// Errors that can occur during player operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    // ========================================================================
    // Loading Errors
    // ========================================================================
    /// The network fetch for an asset failed. Transport details are logged,
    /// not carried.
    #[error("loadAudio request error")]
    RequestFailed { filename: String },

    /// Fetched or cached bytes could not be decoded into a buffer.
    #[error("decodeAudioData error for {filename}: {reason}")]
    DecodeFailed { filename: String, reason: String },

    // ========================================================================
    // Preload Errors
    // ========================================================================
    /// Loading a file during preload failed.
    #[error("preLoad {filename} error: {message}")]
    PreloadFailed { filename: String, message: String },

    /// A preloaded file decoded to an empty buffer.
    #[error("preLoad {filename} response no data")]
    PreloadEmpty { filename: String },

    /// Preload input was neither a filename nor a list of filenames.
    #[error("{0}")]
    InvalidArgument(String),

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// The audio graph rejected a node operation.
    #[error("Playback operation failed: {0}")]
    PlaybackFailed(String),

    // ========================================================================
    // Bootstrap Errors
    // ========================================================================
    /// A required host capability was not supplied.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// No executor was available to run a playback task.
    #[error("Could not schedule playback: {0}")]
    Spawn(#[from] core_async::SpawnError),

    /// Player options failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Returns `true` if the error came from the network fetch.
    pub fn is_network_error(&self) -> bool {
        matches!(self, PlaybackError::RequestFailed { .. })
    }

    /// Returns `true` if the asset bytes could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, PlaybackError::DecodeFailed { .. })
    }

    /// Returns `true` for the errors produced by `preload_audios`.
    pub fn is_preload_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::PreloadFailed { .. }
                | PlaybackError::PreloadEmpty { .. }
                | PlaybackError::InvalidArgument(_)
        )
    }

    pub(crate) fn graph(err: bridge_traits::BridgeError) -> Self {
        PlaybackError::PlaybackFailed(err.to_string())
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_message_is_generic() {
        let err = PlaybackError::RequestFailed {
            filename: "click.mp3".to_string(),
        };
        assert_eq!(err.to_string(), "loadAudio request error");
        assert!(err.is_network_error());
        assert!(!err.is_decode_error());
    }

    #[test]
    fn test_preload_messages() {
        let failed = PlaybackError::PreloadFailed {
            filename: "a.mp3".to_string(),
            message: "loadAudio request error".to_string(),
        };
        assert_eq!(failed.to_string(), "preLoad a.mp3 error: loadAudio request error");

        let empty = PlaybackError::PreloadEmpty {
            filename: "b.mp3".to_string(),
        };
        assert_eq!(empty.to_string(), "preLoad b.mp3 response no data");
        assert!(empty.is_preload_error());
    }

    #[test]
    fn test_spawn_error_converts() {
        let err: PlaybackError = core_async::SpawnError::NoRuntime.into();
        assert!(matches!(err, PlaybackError::Spawn(_)));
        assert!(err.to_string().starts_with("Could not schedule playback"));
    }
}
