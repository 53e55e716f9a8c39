//! Test doubles shared by the core-playback integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bridge_traits::{
    audio::{AudioGraph, BufferSource, DecodedAudio, GainControl},
    error::{BridgeError, Result as BridgeResult},
    http::{HttpClient, HttpRequest, HttpResponse},
    platform::EndedCallback,
    storage::{ByteStore, StoreConfig},
};
use bytes::Bytes;
use core_playback::{AudioPlayer, PlayerBuilder, PlayerOptions};
use mockall::mock;
use parking_lot::Mutex;

pub const BASE_URL: &str = "https://cdn.test/sfx";

/// Shared, ordered record of what the fakes were asked to do.
pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

mock! {
    pub Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

pub fn ok_response(body: &'static [u8]) -> HttpResponse {
    HttpResponse::ok(Bytes::from_static(body))
}

pub fn status_response(status: u16, body: &'static [u8]) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from_static(body),
    }
}

/// Mock expecting exactly one GET of `url`, answered with `body`.
pub fn http_expecting(url: &'static str, body: &'static [u8]) -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_execute()
        .withf(move |request| request.url == url)
        .times(1)
        .returning(move |_| Ok(ok_response(body)));
    http
}

/// Like [`http_expecting`], also logging `"fetch"` into `events`.
pub fn http_recording(url: &'static str, body: &'static [u8], events: EventLog) -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_execute()
        .withf(move |request| request.url == url)
        .times(1)
        .returning(move |_| {
            events.lock().push("fetch");
            Ok(ok_response(body))
        });
    http
}

/// Mock that fails the test if any request is made.
pub fn http_never() -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_execute().never();
    http
}

/// HTTP client whose responses wait until the test opens the gate.
pub struct GatedHttp {
    calls: AtomicUsize,
    gate: tokio::sync::Semaphore,
    body: Bytes,
}

impl GatedHttp {
    pub fn new(body: &'static [u8]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: tokio::sync::Semaphore::new(0),
            body: Bytes::from_static(body),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Let every pending and future request complete.
    pub fn open(&self) {
        self.gate.add_permits(1_000);
    }
}

#[async_trait]
impl HttpClient for GatedHttp {
    async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;
        permit.forget();
        Ok(HttpResponse::ok(self.body.clone()))
    }
}

/// In-memory persistent store with call counters and failure switches.
#[derive(Default)]
pub struct MemoryByteStore {
    items: Mutex<HashMap<String, Bytes>>,
    configs: Mutex<Vec<StoreConfig>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    events: Mutex<Option<EventLog>>,
}

impl MemoryByteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &'static [u8]) -> Self {
        let store = Self::default();
        store.items.lock().insert(key.to_string(), Bytes::from_static(value));
        store
    }

    pub fn item(&self, key: &str) -> Option<Bytes> {
        self.items.lock().get(key).cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn configs(&self) -> Vec<StoreConfig> {
        self.configs.lock().clone()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Log `"write"` into `events` on every `set_item`.
    pub fn record_into(&self, events: EventLog) {
        *self.events.lock() = Some(events);
    }
}

#[async_trait]
impl ByteStore for MemoryByteStore {
    fn configure(&self, config: StoreConfig) -> BridgeResult<()> {
        self.configs.lock().push(config);
        Ok(())
    }

    async fn get_item(&self, key: &str) -> BridgeResult<Option<Bytes>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BridgeError::Storage("disk on fire".to_string()));
        }
        Ok(self.items.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: Bytes) -> BridgeResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(events) = self.events.lock().as_ref() {
            events.lock().push("write");
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BridgeError::Storage("quota exceeded".to_string()));
        }
        self.items.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Decoded buffer remembering the bytes it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeBuffer {
    pub frames: u32,
    pub origin: Bytes,
}

impl DecodedAudio for FakeBuffer {
    fn duration(&self) -> f64 {
        self.frames as f64 / 48_000.0
    }

    fn sample_rate(&self) -> f32 {
        48_000.0
    }

    fn number_of_channels(&self) -> u32 {
        2
    }

    fn length(&self) -> u32 {
        self.frames
    }
}

pub struct GainState {
    pub id: usize,
    pub smoothing: bool,
    pub value: Mutex<f32>,
    pub scheduled: Mutex<Vec<(f32, f64, f64)>>,
    pub to_destination: AtomicBool,
}

pub struct FakeGain(pub Arc<GainState>);

impl GainControl for FakeGain {
    fn gain(&self) -> f32 {
        *self.0.value.lock()
    }

    fn set_gain(&self, value: f32) {
        *self.0.value.lock() = value;
    }

    fn supports_smoothing(&self) -> bool {
        self.0.smoothing
    }

    fn set_target_at_time(&self, target: f32, start_time: f64, time_constant: f64) -> BridgeResult<()> {
        self.0.scheduled.lock().push((target, start_time, time_constant));
        *self.0.value.lock() = target;
        Ok(())
    }
}

#[derive(Default)]
pub struct SourceState {
    pub buffer: Mutex<Option<FakeBuffer>>,
    pub looping: AtomicBool,
    pub connected_gain: Mutex<Option<usize>>,
    pub started_at: Mutex<Option<f64>>,
    pub stopped: AtomicBool,
    pub disconnected: AtomicBool,
    pub fail_start: AtomicBool,
    on_ended: Mutex<Option<EndedCallback>>,
}

impl SourceState {
    pub fn has_on_ended(&self) -> bool {
        self.on_ended.lock().is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    /// Simulate the host reaching the end of the buffer.
    pub fn finish_naturally(&self) {
        let callback = self.on_ended.lock().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

pub struct FakeSource(pub Arc<SourceState>);

impl BufferSource for FakeSource {
    type Buffer = FakeBuffer;
    type Gain = FakeGain;

    fn set_buffer(&self, buffer: &FakeBuffer) {
        *self.0.buffer.lock() = Some(buffer.clone());
    }

    fn set_loop(&self, looping: bool) {
        self.0.looping.store(looping, Ordering::SeqCst);
    }

    fn connect(&self, gain: &FakeGain) -> BridgeResult<()> {
        *self.0.connected_gain.lock() = Some(gain.0.id);
        Ok(())
    }

    fn start(&self, offset: f64) -> BridgeResult<()> {
        if self.0.fail_start.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("start rejected".to_string()));
        }
        *self.0.started_at.lock() = Some(offset);
        Ok(())
    }

    fn stop(&self, _when: f64) -> BridgeResult<()> {
        self.0.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) -> BridgeResult<()> {
        self.0.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn set_on_ended(&self, callback: Option<EndedCallback>) {
        *self.0.on_ended.lock() = callback;
    }
}

/// Scripted audio graph.
///
/// Decoding: empty input yields no buffer, `corrupt` fails, input starting
/// with `silence` yields an empty buffer, anything else yields ten frames
/// per byte.
pub struct FakeGraph {
    time: f64,
    smoothing: bool,
    failing_start: bool,
    events: Option<EventLog>,
    decode_calls: AtomicUsize,
    gains: Mutex<Vec<Arc<GainState>>>,
    sources: Mutex<Vec<Arc<SourceState>>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            smoothing: false,
            failing_start: false,
            events: None,
            decode_calls: AtomicUsize::new(0),
            gains: Mutex::new(Vec::new()),
            sources: Mutex::new(Vec::new()),
        }
    }

    /// Graph whose gain nodes support scheduled changes, at graph time `time`.
    pub fn with_smoothing(time: f64) -> Self {
        Self {
            time,
            smoothing: true,
            ..Self::new()
        }
    }

    /// Graph whose sources refuse to start.
    pub fn failing_start() -> Self {
        Self {
            failing_start: true,
            ..Self::new()
        }
    }

    /// Graph logging `"decode"` into `events` on every decode.
    pub fn recording(events: EventLog) -> Self {
        Self {
            events: Some(events),
            ..Self::new()
        }
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }

    pub fn gains(&self) -> Vec<Arc<GainState>> {
        self.gains.lock().clone()
    }

    pub fn sources(&self) -> Vec<Arc<SourceState>> {
        self.sources.lock().clone()
    }
}

#[async_trait]
impl AudioGraph for FakeGraph {
    type Buffer = FakeBuffer;
    type Gain = FakeGain;
    type Source = FakeSource;

    fn current_time(&self) -> f64 {
        self.time
    }

    fn create_gain(&self) -> BridgeResult<FakeGain> {
        let mut gains = self.gains.lock();
        let state = Arc::new(GainState {
            id: gains.len(),
            smoothing: self.smoothing,
            value: Mutex::new(1.0),
            scheduled: Mutex::new(Vec::new()),
            to_destination: AtomicBool::new(false),
        });
        gains.push(Arc::clone(&state));
        Ok(FakeGain(state))
    }

    fn connect_to_destination(&self, gain: &FakeGain) -> BridgeResult<()> {
        gain.0.to_destination.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn create_buffer_source(&self) -> BridgeResult<FakeSource> {
        let state = Arc::new(SourceState::default());
        state.fail_start.store(self.failing_start, Ordering::SeqCst);
        self.sources.lock().push(Arc::clone(&state));
        Ok(FakeSource(state))
    }

    async fn decode_audio_data(&self, data: Bytes) -> BridgeResult<Option<FakeBuffer>> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(events) = &self.events {
            events.lock().push("decode");
        }

        if data.is_empty() {
            return Ok(None);
        }
        if data.as_ref() == b"corrupt" {
            return Err(BridgeError::Decode("unknown container".to_string()));
        }

        let frames = if data.starts_with(b"silence") {
            0
        } else {
            data.len() as u32 * 10
        };
        Ok(Some(FakeBuffer {
            frames,
            origin: data,
        }))
    }
}

/// Build a supported player on a fresh [`FakeGraph`].
pub fn build_player(
    http: Arc<dyn HttpClient>,
    store: Arc<MemoryByteStore>,
    options: PlayerOptions,
) -> AudioPlayer<FakeGraph> {
    build_player_on(http, store, options, FakeGraph::new())
}

pub fn build_player_on(
    http: Arc<dyn HttpClient>,
    store: Arc<MemoryByteStore>,
    options: PlayerOptions,
    graph: FakeGraph,
) -> AudioPlayer<FakeGraph> {
    PlayerBuilder::new(options)
        .with_http_client(http)
        .with_byte_store(store)
        .build(move || Ok(graph))
        .expect("valid builder")
        .into_player()
        .expect("graph opened")
}

pub fn cdn_options() -> PlayerOptions {
    PlayerOptions::default().with_base_url(BASE_URL)
}

/// Give detached tasks (persistent writes, playback) a chance to run.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
