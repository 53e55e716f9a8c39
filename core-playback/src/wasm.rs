//! WebAssembly bindings for core-playback
//!
//! JavaScript-facing API mirroring the helper's historical shape:
//! `getPlayer(options)` returns a player whose methods return promises (or
//! `undefined` when the browser has no Web Audio support).

use bridge_traits::storage::StoreConfig;
use bridge_wasm::{build_wasm_bridges, WebAudioBuffer, WebAudioGraph, WebAudioSource};
use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::builder::{PlayerAvailability, PlayerBuilder};
use crate::cell::PlayerCell;
use crate::config::{PlayOptions, PlayerOptions};
use crate::error::PlaybackError;
use crate::handle::{PlaybackOutcome, StopHandle};
use crate::preload::{PreloadRequest, Preloaded};

thread_local! {
    static PLAYER: PlayerCell<WebAudioGraph> = PlayerCell::new();
}

/// Enable Rust logging to browser console
/// Call this once at startup to see tracing logs in DevTools
#[wasm_bindgen(js_name = enableConsoleLogging)]
pub fn enable_console_logging() {
    use bridge_traits::time::LogLevel;
    use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    if let Err(e) = init_logging(config) {
        web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
    }
}

/// Return the page's audio player, creating it on the first call.
///
/// Options passed after the first call are ignored.
#[wasm_bindgen(js_name = getPlayer)]
pub fn get_player(options: JsValue) -> Result<JsAudioPlayer, JsValue> {
    PLAYER.with(|cell| {
        cell.get_or_init(|| build_player(options))
            .map(|availability| JsAudioPlayer {
                availability: availability.clone(),
            })
            .map_err(to_js_error)
    })
}

fn build_player(options: JsValue) -> Result<PlayerAvailability<WebAudioGraph>, PlaybackError> {
    let options: PlayerOptions = if options.is_undefined() || options.is_null() {
        PlayerOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| PlaybackError::Config(format!("invalid player options: {}", e)))?
    };

    let store_config = StoreConfig::default();
    let bridges = build_wasm_bridges(store_config.clone()).map_err(|e| {
        PlaybackError::CapabilityMissing {
            capability: "browser bridges".to_string(),
            message: e.to_string(),
        }
    })?;

    PlayerBuilder::new(options)
        .with_http_client(bridges.http())
        .with_byte_store(bridges.byte_store())
        .with_store_config(store_config)
        .build(WebAudioGraph::open)
}

/// JavaScript handle to the audio player.
#[wasm_bindgen]
pub struct JsAudioPlayer {
    availability: PlayerAvailability<WebAudioGraph>,
}

#[wasm_bindgen]
impl JsAudioPlayer {
    /// `false` when the browser lacks Web Audio; every method then returns
    /// `undefined`.
    #[wasm_bindgen(getter, js_name = isSupported)]
    pub fn is_supported(&self) -> bool {
        self.availability.is_supported()
    }

    /// Preload a filename or an array of filenames. Resolves to the decoded
    /// `AudioBuffer` (or an array of them).
    #[wasm_bindgen(js_name = preloadAudios)]
    pub fn preload_audios(&self, files: JsValue) -> JsValue {
        let Some(player) = self.availability.player().cloned() else {
            return JsValue::UNDEFINED;
        };
        let request = preload_request_from_js(&files);

        future_to_promise(async move {
            match player.preload_audios(request).await {
                Ok(Preloaded::One(buffer)) => Ok(buffer_to_js(&buffer)),
                Ok(Preloaded::Many(buffers)) => {
                    let array = Array::new();
                    for buffer in &buffers {
                        array.push(&buffer_to_js(buffer));
                    }
                    Ok(array.into())
                }
                Err(e) => Err(to_js_error(e)),
            }
        })
        .into()
    }

    /// Load one file. Resolves to the decoded `AudioBuffer`.
    #[wasm_bindgen(js_name = loadAudio)]
    pub fn load_audio(&self, filename: String) -> JsValue {
        let Some(player) = self.availability.player().cloned() else {
            return JsValue::UNDEFINED;
        };

        future_to_promise(async move {
            player
                .load_audio(&filename)
                .await
                .map(|buffer| buffer_to_js(&buffer))
                .map_err(to_js_error)
        })
        .into()
    }

    /// Play a file. Options: `{ loop?: boolean, volumn?: number }`.
    pub fn play(&self, filename: String, options: JsValue) -> Result<JsValue, JsValue> {
        let Some(player) = self.availability.player() else {
            return Ok(JsValue::UNDEFINED);
        };

        let options: PlayOptions = if options.is_undefined() || options.is_null() {
            PlayOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?
        };

        let handle = player.play(&filename, options);
        let stop = handle.stop_handle();
        let outcome = future_to_promise(async move {
            match handle.outcome().await {
                Ok(PlaybackOutcome::Started) => Ok(JsValue::from_str("started")),
                Ok(PlaybackOutcome::StoppedBeforeStart) => {
                    Ok(JsValue::from_str("stoppedBeforeStart"))
                }
                Err(e) => Err(to_js_error(e)),
            }
        });

        Ok(JsPlaybackHandle { stop, outcome }.into())
    }

    /// Create a gain node at `value`, connected to the output.
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, value: f32) -> Result<JsValue, JsValue> {
        let Some(player) = self.availability.player() else {
            return Ok(JsValue::UNDEFINED);
        };

        player
            .set_volume(value)
            .map(|gain| gain.as_web_sys().clone().into())
            .map_err(to_js_error)
    }
}

/// Stop control and outcome of one `play` call.
#[wasm_bindgen]
pub struct JsPlaybackHandle {
    stop: StopHandle<WebAudioSource>,
    outcome: Promise,
}

#[wasm_bindgen]
impl JsPlaybackHandle {
    /// Stop the sound; before it starts, prevents it from starting.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Resolves to `"started"` or `"stoppedBeforeStart"`, rejects with the
    /// load or playback error.
    #[wasm_bindgen(getter)]
    pub fn outcome(&self) -> Promise {
        self.outcome.clone()
    }
}

fn preload_request_from_js(value: &JsValue) -> PreloadRequest {
    if let Some(filename) = value.as_string() {
        return PreloadRequest::Single(filename);
    }

    if Array::is_array(value) {
        let items = Array::from(value);
        let mut filenames = Vec::with_capacity(items.length() as usize);
        for item in items.iter() {
            match item.as_string() {
                Some(filename) => filenames.push(filename),
                None => return PreloadRequest::Invalid("array with non-string member".to_string()),
            }
        }
        return PreloadRequest::Batch(filenames);
    }

    PreloadRequest::Invalid(format!("{:?}", value.js_typeof()))
}

fn buffer_to_js(buffer: &WebAudioBuffer) -> JsValue {
    buffer.as_web_sys().clone().into()
}

fn to_js_error(err: PlaybackError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

