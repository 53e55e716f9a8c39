//! In-memory cache of decoded buffers.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Append-only map from cache key to decoded buffer.
///
/// Buffers are handles, so lookups clone cheaply. The first insert for a key
/// wins; later inserts of the same key are ignored.
pub struct DecodedBufferCache<B> {
    entries: RwLock<HashMap<String, B>>,
}

impl<B: Clone> DecodedBufferCache<B> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<B> {
        self.entries.read().get(key).cloned()
    }

    /// Insert `buffer` unless the key is already populated. Returns `true`
    /// when the buffer was stored.
    pub fn insert(&self, key: impl Into<String>, buffer: B) -> bool {
        let mut entries = self.entries.write();
        let key = key.into();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, buffer);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<B: Clone> Default for DecodedBufferCache<B> {
    fn default() -> Self {
        Self::new()
    }
}
