//! Web Audio API implementation of the `AudioGraph` bridge traits.
//!
//! Every type here is a thin handle over the corresponding `web-sys`
//! object.

use async_trait::async_trait;
use bridge_traits::{
    audio::{AudioGraph, BufferSource, DecodedAudio, GainControl},
    error::{BridgeError, Result as BridgeResult},
    platform::EndedCallback,
};
use bytes::Bytes;
use js_sys::{Array, Function, Reflect, Uint8Array};
use tracing::{debug, info};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode};

use crate::error::js_message;

const PREFIXED_CONTEXT: &str = "webkitAudioContext";

/// Browser audio context.
pub struct WebAudioGraph {
    context: AudioContext,
}

impl WebAudioGraph {
    /// Create an audio context, falling back to `webkitAudioContext` on
    /// browsers that only ship the prefixed constructor.
    ///
    /// Returns [`BridgeError::NotAvailable`] when neither exists.
    pub fn open() -> BridgeResult<Self> {
        match AudioContext::new() {
            Ok(context) => Ok(Self { context }),
            Err(err) => {
                debug!(error = %js_message(&err), "AudioContext unavailable, trying prefixed constructor");
                Self::open_prefixed()
            }
        }
    }

    fn open_prefixed() -> BridgeResult<Self> {
        let constructor = Reflect::get(&js_sys::global(), &JsValue::from_str(PREFIXED_CONTEXT))
            .map_err(|err| graph_error("lookup webkitAudioContext", err))?;

        let constructor = constructor
            .dyn_into::<Function>()
            .map_err(|_| BridgeError::NotAvailable("Web Audio API".to_string()))?;

        let context = Reflect::construct(&constructor, &Array::new())
            .map_err(|err| graph_error("construct webkitAudioContext", err))?;

        info!("Using prefixed webkitAudioContext");
        Ok(Self {
            context: context.unchecked_into::<AudioContext>(),
        })
    }

    /// Underlying `AudioContext`.
    pub fn context(&self) -> &AudioContext {
        &self.context
    }
}

#[async_trait(?Send)]
impl AudioGraph for WebAudioGraph {
    type Buffer = WebAudioBuffer;
    type Gain = WebGainNode;
    type Source = WebAudioSource;

    fn current_time(&self) -> f64 {
        self.context.current_time()
    }

    fn create_gain(&self) -> BridgeResult<WebGainNode> {
        self.context
            .create_gain()
            .map(|node| WebGainNode { node })
            .map_err(|err| graph_error("createGain", err))
    }

    fn connect_to_destination(&self, gain: &WebGainNode) -> BridgeResult<()> {
        gain.node
            .connect_with_audio_node(&self.context.destination())
            .map(|_| ())
            .map_err(|err| graph_error("connect destination", err))
    }

    fn create_buffer_source(&self) -> BridgeResult<WebAudioSource> {
        self.context
            .create_buffer_source()
            .map(|node| WebAudioSource { node })
            .map_err(|err| graph_error("createBufferSource", err))
    }

    async fn decode_audio_data(&self, data: Bytes) -> BridgeResult<Option<WebAudioBuffer>> {
        let array_buffer = Uint8Array::from(data.as_ref()).buffer();
        let promise = self
            .context
            .decode_audio_data(&array_buffer)
            .map_err(|err| BridgeError::Decode(js_message(&err)))?;

        let decoded = JsFuture::from(promise)
            .await
            .map_err(|err| BridgeError::Decode(js_message(&err)))?;

        if decoded.is_undefined() || decoded.is_null() {
            return Ok(None);
        }

        decoded
            .dyn_into::<AudioBuffer>()
            .map(|buffer| Some(WebAudioBuffer { buffer }))
            .map_err(|_| BridgeError::Decode("decodeAudioData returned a non-AudioBuffer".into()))
    }
}

/// Decoded `AudioBuffer`.
#[derive(Clone, Debug)]
pub struct WebAudioBuffer {
    buffer: AudioBuffer,
}

impl WebAudioBuffer {
    /// Underlying `AudioBuffer`.
    pub fn as_web_sys(&self) -> &AudioBuffer {
        &self.buffer
    }
}

impl DecodedAudio for WebAudioBuffer {
    fn duration(&self) -> f64 {
        self.buffer.duration()
    }

    fn sample_rate(&self) -> f32 {
        self.buffer.sample_rate()
    }

    fn number_of_channels(&self) -> u32 {
        self.buffer.number_of_channels()
    }

    fn length(&self) -> u32 {
        self.buffer.length()
    }
}

/// `GainNode` handle.
pub struct WebGainNode {
    node: GainNode,
}

impl WebGainNode {
    /// Underlying `GainNode`.
    pub fn as_web_sys(&self) -> &GainNode {
        &self.node
    }
}

impl GainControl for WebGainNode {
    fn gain(&self) -> f32 {
        self.node.gain().value()
    }

    fn set_gain(&self, value: f32) {
        self.node.gain().set_value(value);
    }

    fn supports_smoothing(&self) -> bool {
        true
    }

    fn set_target_at_time(&self, target: f32, start_time: f64, time_constant: f64) -> BridgeResult<()> {
        self.node
            .gain()
            .set_target_at_time(target, start_time, time_constant as f32)
            .map(|_| ())
            .map_err(|err| graph_error("setTargetAtTime", err))
    }
}

/// `AudioBufferSourceNode` handle.
pub struct WebAudioSource {
    node: AudioBufferSourceNode,
}

impl BufferSource for WebAudioSource {
    type Buffer = WebAudioBuffer;
    type Gain = WebGainNode;

    fn set_buffer(&self, buffer: &WebAudioBuffer) {
        self.node.set_buffer(Some(&buffer.buffer));
    }

    fn set_loop(&self, looping: bool) {
        self.node.set_loop(looping);
    }

    fn connect(&self, gain: &WebGainNode) -> BridgeResult<()> {
        self.node
            .connect_with_audio_node(&gain.node)
            .map(|_| ())
            .map_err(|err| graph_error("connect gain", err))
    }

    fn start(&self, offset: f64) -> BridgeResult<()> {
        self.node
            .start_with_when_and_grain_offset(0.0, offset)
            .map_err(|err| graph_error("start", err))
    }

    fn stop(&self, when: f64) -> BridgeResult<()> {
        self.node
            .stop_with_when(when)
            .map_err(|err| graph_error("stop", err))
    }

    fn disconnect(&self) -> BridgeResult<()> {
        self.node
            .disconnect()
            .map_err(|err| graph_error("disconnect", err))
    }

    fn set_on_ended(&self, callback: Option<EndedCallback>) {
        match callback {
            Some(callback) => {
                let handler = Closure::once_into_js(move || callback());
                self.node.set_onended(Some(handler.unchecked_ref()));
            }
            None => self.node.set_onended(None),
        }
    }
}

fn graph_error(context: &str, err: JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!("WebAudioGraph {context}: {}", js_message(&err)))
}
