//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the audio player crates:
//! - Logging and tracing initialisation for native and browser hosts
//! - Runtime error types
//!
//! ## Overview
//!
//! Hosts call [`logging::init_logging`] once at startup. Natively this
//! installs a `tracing-subscriber` registry; in the browser it routes
//! `tracing` events to the DevTools console through `tracing-wasm`.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
