//! Registry of loads that have started but not settled.
//!
//! Concurrent `load_audio` calls for the same key await one shared future
//! instead of each fetching and decoding. The future's owner removes the
//! entry once it settles, so a failed load can be retried.

use core_async::BoxFuture;
use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::error::Result;

/// A pending load that any number of callers can await.
pub type SharedLoad<B> = Shared<BoxFuture<'static, Result<B>>>;

pub struct InFlightLoads<B: Clone> {
    pending: Mutex<HashMap<String, SharedLoad<B>>>,
}

impl<B: Clone> InFlightLoads<B> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Return the pending load for `key`, or register the one produced by
    /// `start`. The flag is `true` when this call registered the load.
    ///
    /// `start` runs under the registry lock and must only build the future,
    /// not poll it.
    pub fn join_or_start<F>(&self, key: &str, start: F) -> (SharedLoad<B>, bool)
    where
        F: FnOnce() -> BoxFuture<'static, Result<B>>,
    {
        let mut pending = self.pending.lock();
        if let Some(existing) = pending.get(key) {
            return (existing.clone(), false);
        }

        let load = start().shared();
        pending.insert(key.to_string(), load.clone());
        (load, true)
    }

    /// Drop the registry entry for `key`.
    pub fn finish(&self, key: &str) {
        self.pending.lock().remove(key);
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl<B: Clone> Default for InFlightLoads<B> {
    fn default() -> Self {
        Self::new()
    }
}
