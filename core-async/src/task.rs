//! Task spawning.
//!
//! Tasks are fire-and-forget: callers that need a result pass a channel into
//! the task. This keeps the native and wasm signatures identical.
//!
//! ## Native (Tokio)
//! - Spawns onto the current Tokio runtime; futures must be `Send`.
//! - Returns [`SpawnError::NoRuntime`] when called outside a runtime, and the
//!   future is dropped without being polled.
//!
//! ## WASM
//! - Spawns onto the browser microtask queue with `spawn_local`; futures may
//!   hold `!Send` browser handles. The event loop is always there, so this
//!   never fails.
//!
//! # Examples
//!
//! ```rust,ignore
//! use core_async::task;
//! use futures::channel::oneshot;
//!
//! async fn example() -> Result<(), task::SpawnError> {
//!     let (tx, rx) = oneshot::channel();
//!     task::spawn(async move {
//!         let _ = tx.send(42);
//!     })?;
//!     assert_eq!(rx.await.unwrap(), 42);
//!     Ok(())
//! }
//! ```

use std::future::Future;

use thiserror::Error;

/// Why a task could not be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("no async runtime is available on this thread")]
    NoRuntime,
}

#[cfg(not(target_arch = "wasm32"))]
/// Spawns a detached task on the Tokio runtime.
pub fn spawn<F>(future: F) -> Result<(), SpawnError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current().map_err(|_| SpawnError::NoRuntime)?;
    drop(handle.spawn(future));
    Ok(())
}

#[cfg(target_arch = "wasm32")]
/// Spawns a detached task on the browser event loop.
pub fn spawn<F>(future: F) -> Result<(), SpawnError>
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
    Ok(())
}
