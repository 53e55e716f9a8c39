//! Runtime-agnostic async helpers for the web audio player.
//!
//! The player core is written once and runs on two executors:
//! - Native platforms: the ambient Tokio runtime
//! - WebAssembly: the browser event loop via `wasm-bindgen-futures`
//!
//! Core crates depend on this crate instead of on tokio directly, so the
//! `cfg` switches live in one place.
//!
//! # Modules
//!
//! - `task`: detached task spawning
//! - `future`: boxed future alias with the right `Send` bound per target

pub mod future;
pub mod task;

pub use future::{boxed, BoxFuture};
pub use task::{spawn, SpawnError};
