//! Thread-safe LFU cache: [`ConcurrentCache`] wrapping [`LfuEngine`].

use crate::byteview::ByteView;
use crate::concurrent::ConcurrentCache;
use crate::config::LfuConfig;
use crate::lfu::LfuEngine;

/// A thread-safe, bytes-bounded LFU cache.
///
/// # Examples
///
/// ```
/// use meshcache::concurrent::ConcurrentLfuCache;
///
/// let cache = ConcurrentLfuCache::new(1 << 20);
/// cache.add("k".to_string(), "v".into());
/// assert!(cache.get("k").is_some());
/// ```
pub type ConcurrentLfuCache = ConcurrentCache<LfuEngine<ByteView>, ByteView>;

impl ConcurrentLfuCache {
    /// Creates a cache with the given byte budget (`0` for unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self::from_config(LfuConfig::new(max_bytes))
    }

    /// Creates a cache from an [`LfuConfig`].
    pub fn from_config(config: LfuConfig) -> Self {
        ConcurrentCache::new(config.max_bytes(), move || LfuEngine::from_config(config, None))
    }
}
