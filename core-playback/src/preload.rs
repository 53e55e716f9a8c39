//! # Preloading
//!
//! Warm the caches for one file or a batch of files ahead of playback.
//! A batch is all-or-nothing: the first failing file rejects the whole call.

use bridge_traits::audio::{AudioGraph, DecodedAudio};
use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{PlaybackError, Result};
use crate::player::AudioPlayer;

const INVALID_ARGS_MESSAGE: &str = "preLoad args error";

/// Input accepted by [`AudioPlayer::preload_audios`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadRequest {
    Single(String),
    Batch(Vec<String>),
    /// Any other shape; carries a short description for logging.
    Invalid(String),
}

impl From<&str> for PreloadRequest {
    fn from(filename: &str) -> Self {
        PreloadRequest::Single(filename.to_string())
    }
}

impl From<String> for PreloadRequest {
    fn from(filename: String) -> Self {
        PreloadRequest::Single(filename)
    }
}

impl From<Vec<String>> for PreloadRequest {
    fn from(filenames: Vec<String>) -> Self {
        PreloadRequest::Batch(filenames)
    }
}

impl From<Vec<&str>> for PreloadRequest {
    fn from(filenames: Vec<&str>) -> Self {
        PreloadRequest::Batch(filenames.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for PreloadRequest {
    fn from(filenames: &[&str]) -> Self {
        PreloadRequest::Batch(filenames.iter().map(|f| f.to_string()).collect())
    }
}

impl From<Value> for PreloadRequest {
    /// Strings and arrays of strings are accepted; everything else,
    /// including arrays with non-string members, is invalid.
    fn from(value: Value) -> Self {
        match value {
            Value::String(filename) => PreloadRequest::Single(filename),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(filename) => Ok(filename),
                    other => Err(other),
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(PreloadRequest::Batch)
                .unwrap_or_else(|other| {
                    PreloadRequest::Invalid(format!("array member {}", json_kind(&other)))
                }),
            other => PreloadRequest::Invalid(json_kind(&other).to_string()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Buffers produced by a preload, shaped like the request.
#[derive(Debug, Clone)]
pub enum Preloaded<B> {
    One(B),
    Many(Vec<B>),
}

impl<B> Preloaded<B> {
    pub fn into_vec(self) -> Vec<B> {
        match self {
            Preloaded::One(buffer) => vec![buffer],
            Preloaded::Many(buffers) => buffers,
        }
    }
}

impl<G: AudioGraph> AudioPlayer<G> {
    /// Load and cache one file or a batch of files.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::InvalidArgument`] for an invalid request shape,
    ///   before any I/O
    /// - [`PlaybackError::PreloadFailed`] when a file fails to load
    /// - [`PlaybackError::PreloadEmpty`] when a file decodes to an empty
    ///   buffer
    #[instrument(skip(self, request))]
    pub async fn preload_audios(
        &self,
        request: impl Into<PreloadRequest>,
    ) -> Result<Preloaded<G::Buffer>> {
        match request.into() {
            PreloadRequest::Single(filename) => self.preload_one(&filename).await.map(Preloaded::One),
            PreloadRequest::Batch(filenames) => {
                debug!(count = filenames.len(), "Preloading batch");
                try_join_all(filenames.iter().map(|filename| self.preload_one(filename)))
                    .await
                    .map(Preloaded::Many)
            }
            PreloadRequest::Invalid(shape) => {
                debug!(shape = %shape, "Rejecting preload request");
                Err(PlaybackError::InvalidArgument(INVALID_ARGS_MESSAGE.to_string()))
            }
        }
    }

    async fn preload_one(&self, filename: &str) -> Result<G::Buffer> {
        match self.load_audio(filename).await {
            Ok(buffer) if buffer.is_empty() => Err(PlaybackError::PreloadEmpty {
                filename: filename.to_string(),
            }),
            Ok(buffer) => Ok(buffer),
            Err(e) => Err(PlaybackError::PreloadFailed {
                filename: filename.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
