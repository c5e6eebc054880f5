//! Thread-safe LRU cache: [`ConcurrentCache`] wrapping [`LruEngine`].

use crate::byteview::ByteView;
use crate::concurrent::ConcurrentCache;
use crate::config::LruConfig;
use crate::lru::LruEngine;

/// A thread-safe, bytes-bounded LRU cache.
///
/// # Examples
///
/// ```
/// use meshcache::concurrent::ConcurrentLruCache;
///
/// let cache = ConcurrentLruCache::new(1 << 20);
/// cache.add("k".to_string(), "v".into());
/// assert!(cache.get("k").is_some());
/// ```
pub type ConcurrentLruCache = ConcurrentCache<LruEngine<ByteView>, ByteView>;

impl ConcurrentLruCache {
    /// Creates a cache with the given byte budget (`0` for unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self::from_config(LruConfig::new(max_bytes))
    }

    /// Creates a cache from an [`LruConfig`].
    pub fn from_config(config: LruConfig) -> Self {
        ConcurrentCache::new(config.max_bytes(), move || LruEngine::from_config(config, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used_under_concurrent_wrapper() {
        let cache = ConcurrentLruCache::new(6);
        cache.add("a".into(), "12".into());
        cache.add("b".into(), "34".into());
        cache.add("c".into(), "56".into());
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 2);
    }
}
