//! Boxed futures with target-appropriate bounds.

use std::future::Future;

/// Heap-allocated future: `Send` on native targets, local on wasm32.
#[cfg(not(target_arch = "wasm32"))]
pub type BoxFuture<'a, T> = futures::future::BoxFuture<'a, T>;

#[cfg(target_arch = "wasm32")]
pub type BoxFuture<'a, T> = futures::future::LocalBoxFuture<'a, T>;

/// Box a future into a [`BoxFuture`].
#[cfg(not(target_arch = "wasm32"))]
pub fn boxed<'a, F>(future: F) -> BoxFuture<'a, F::Output>
where
    F: Future + Send + 'a,
{
    Box::pin(future)
}

#[cfg(target_arch = "wasm32")]
pub fn boxed<'a, F>(future: F) -> BoxFuture<'a, F::Output>
where
    F: Future + 'a,
{
    Box::pin(future)
}
