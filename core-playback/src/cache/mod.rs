//! # Audio Caches
//!
//! Three layers sit in front of the network:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ DecodedBufferCache (memory)  │  decoded buffers, player lifetime
//! └──────────────┬───────────────┘
//!                │ miss
//! ┌──────────────▼───────────────┐
//! │ InFlightLoads                │  one shared pending load per key
//! └──────────────┬───────────────┘
//!                │ first caller
//! ┌──────────────▼───────────────┐
//! │ PersistentByteCache (store)  │  raw bytes, survives restarts
//! └──────────────┬───────────────┘
//!                │ miss
//!                ▼
//!             network
//! ```
//!
//! All layers share the same key, built by [`cache_key`]. Nothing is ever
//! evicted.

pub mod buffers;
pub mod in_flight;
pub mod persistent;

pub use buffers::DecodedBufferCache;
pub use in_flight::{InFlightLoads, SharedLoad};
pub use persistent::PersistentByteCache;

/// Prefix of every cache key.
pub const CACHE_NAMESPACE: &str = "web-audio";

/// Cache key for `filename`: the namespace concatenated with the filename,
/// without a separator.
pub fn cache_key(filename: &str) -> String {
    format!("{}{}", CACHE_NAMESPACE, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_concatenates() {
        assert_eq!(cache_key("click.mp3"), "web-audioclick.mp3");
        assert_eq!(cache_key("/ui/pop.wav"), "web-audio/ui/pop.wav");
    }
}
