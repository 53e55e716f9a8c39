//! Audio graph bridge traits.
//!
//! These abstractions model the small slice of a Web Audio style processing
//! graph the player needs: decoding bytes into buffers, buffer source nodes,
//! gain nodes and the output destination. Hosts bind them to the browser's
//! `AudioContext` or to a native engine.
//!
//! ```text
//! BufferSource ──connect──> GainControl ──connect_to_destination──> output
//! ```

use bytes::Bytes;

use crate::{
    error::Result,
    platform::{EndedCallback, PlatformSendSync},
};

/// A decoded, playable audio buffer.
///
/// Buffers are cheap handles; cloning must not copy sample data.
pub trait DecodedAudio: Clone + PlatformSendSync + 'static {
    /// Duration in seconds.
    fn duration(&self) -> f64;

    /// Sample rate in hertz.
    fn sample_rate(&self) -> f32;

    /// Number of channels.
    fn number_of_channels(&self) -> u32;

    /// Length in sample frames.
    fn length(&self) -> u32;

    /// Returns `true` if the buffer holds no frames.
    fn is_empty(&self) -> bool {
        self.length() == 0
    }
}

/// Gain node controlling the volume of everything connected to it.
pub trait GainControl: PlatformSendSync + 'static {
    /// Current gain value.
    fn gain(&self) -> f32;

    /// Assign the gain value directly.
    fn set_gain(&self, value: f32);

    /// Whether the node supports scheduled (smoothed) gain changes.
    fn supports_smoothing(&self) -> bool {
        false
    }

    /// Start an exponential approach to `target` at `start_time` (graph
    /// time, seconds). A `time_constant` of zero applies the value at once.
    fn set_target_at_time(&self, target: f32, start_time: f64, time_constant: f64) -> Result<()> {
        let _ = (start_time, time_constant);
        self.set_gain(target);
        Ok(())
    }
}

/// One-shot source node that plays a decoded buffer.
pub trait BufferSource: PlatformSendSync + 'static {
    type Buffer: DecodedAudio;
    type Gain: GainControl;

    fn set_buffer(&self, buffer: &Self::Buffer);

    fn set_loop(&self, looping: bool);

    /// Connect this source's output to a gain node.
    fn connect(&self, gain: &Self::Gain) -> Result<()>;

    /// Start playback `offset` seconds into the buffer.
    fn start(&self, offset: f64) -> Result<()>;

    /// Stop playback at graph time `when` (zero means immediately).
    fn stop(&self, when: f64) -> Result<()>;

    /// Disconnect the source from every node it feeds.
    fn disconnect(&self) -> Result<()>;

    /// Install or clear the callback fired when playback ends naturally.
    fn set_on_ended(&self, callback: Option<EndedCallback>);
}

/// Host audio processing context.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AudioGraph: PlatformSendSync + 'static {
    type Buffer: DecodedAudio;
    type Gain: GainControl;
    type Source: BufferSource<Buffer = Self::Buffer, Gain = Self::Gain>;

    /// Current graph time in seconds.
    fn current_time(&self) -> f64;

    fn create_gain(&self) -> Result<Self::Gain>;

    /// Route a gain node to the output device.
    fn connect_to_destination(&self, gain: &Self::Gain) -> Result<()>;

    fn create_buffer_source(&self) -> Result<Self::Source>;

    /// Decode an encoded asset.
    ///
    /// Returns `Ok(None)` when the host reports success without producing a
    /// buffer, and `Err` when decoding fails outright.
    async fn decode_audio_data(&self, data: Bytes) -> Result<Option<Self::Buffer>>;
}
