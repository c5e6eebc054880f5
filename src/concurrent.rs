//! The thread-safe cache wrapper the rest of the crate actually uses.
//!
//! [`ConcurrentCache`] wraps a single [`crate::engine::EvictionEngine`] behind one
//! `parking_lot::Mutex`, matching the teacher's choice of `parking_lot` for its concurrent
//! module. Unlike the teacher's segmented caches, there is exactly one lock: the cache's
//! linearizability guarantee is per-key across the *whole* cache, and 16-way segment striping
//! would only give that guarantee per-segment.
//!
//! The inner engine is constructed lazily, on the first `add`, from the factory closure passed
//! to [`ConcurrentCache::new`]. A freshly-constructed, never-written-to cache therefore holds no
//! engine at all.

mod lfu;
mod lru;

pub use self::lfu::ConcurrentLfuCache;
pub use self::lru::ConcurrentLruCache;

use crate::engine::EvictionEngine;
use crate::metrics::CacheMetrics;
use crate::value::Value;
use parking_lot::Mutex;

struct State<E, V> {
    engine: Option<E>,
    metrics: CacheMetrics,
    _value: core::marker::PhantomData<V>,
}

/// A thread-safe byte-bounded cache wrapping one [`EvictionEngine`] behind a single mutex.
pub struct ConcurrentCache<E, V> {
    state: Mutex<State<E, V>>,
    build: Box<dyn Fn() -> E + Send + Sync>,
}

impl<E, V> std::fmt::Debug for ConcurrentCache<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentCache")
            .field("metrics", &self.state.lock().metrics)
            .finish_non_exhaustive()
    }
}

impl<V, E> ConcurrentCache<E, V>
where
    V: Value + Clone,
    E: EvictionEngine<V>,
{
    /// Creates a cache with the given byte budget, deferring engine construction until the
    /// first `add`. `build` must construct an engine configured with the same `max_bytes`.
    pub fn new(max_bytes: u64, build: impl Fn() -> E + Send + Sync + 'static) -> Self {
        ConcurrentCache {
            state: Mutex::new(State {
                engine: None,
                metrics: CacheMetrics::new(max_bytes),
                _value: core::marker::PhantomData,
            }),
            build: Box::new(build),
        }
    }

    /// Looks up `key`, recording a hit or miss in this cache's metrics.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();
        let result = state.engine.as_mut().and_then(|engine| engine.get(key));
        if result.is_some() {
            state.metrics.record_hit();
            tracing::debug!(key, "cache hit");
        } else {
            state.metrics.record_miss();
        }
        result
    }

    /// Inserts or overwrites `key`, constructing the engine on first use if necessary.
    pub fn add(&self, key: String, value: V) {
        let new_cost = (key.len() + value.len()) as u64;
        let mut state = self.state.lock();
        if state.engine.is_none() {
            state.engine = Some((self.build)());
        }
        let engine = state.engine.as_mut().expect("just constructed above");

        let old_cost = engine.peek_cost(&key);
        let is_new = old_cost.is_none();
        let len_before = engine.len();
        let bytes_before = engine.nbytes();
        engine.add(key, value);
        let len_after = engine.len();
        let bytes_after = engine.nbytes();

        // The true cost this write added before any eviction ran: the full cost for a new key,
        // or just the size delta for an overwrite.
        let write_delta = new_cost.saturating_sub(old_cost.unwrap_or(0));
        state.metrics.record_insertion(write_delta, bytes_after);

        let expected_len = len_before + usize::from(is_new);
        let evicted = expected_len.saturating_sub(len_after) as u64;
        if evicted > 0 {
            let bytes_before_eviction = bytes_before + write_delta;
            let evicted_bytes = bytes_before_eviction.saturating_sub(bytes_after);
            state.metrics.record_eviction(evicted, evicted_bytes, bytes_after);
            tracing::trace!(count = evicted, bytes = evicted_bytes, "evicted entries");
        }
    }

    /// Current number of live entries, or `0` if the engine has not been constructed yet.
    pub fn len(&self) -> usize {
        self.state.lock().engine.as_ref().map_or(0, EvictionEngine::len)
    }

    /// `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of this cache's request/hit/eviction/byte counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.state.lock().metrics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byteview::ByteView;
    use crate::lru::LruEngine;

    fn cache(max_bytes: u64) -> ConcurrentCache<LruEngine<ByteView>, ByteView> {
        ConcurrentCache::new(max_bytes, move || LruEngine::new(max_bytes, None))
    }

    #[test]
    fn engine_is_not_built_until_first_add() {
        let cache = cache(10);
        assert_eq!(cache.len(), 0);
        assert!(cache.get("missing").is_none());
        assert_eq!(cache.metrics().requests, 1);
    }

    #[test]
    fn metrics_track_hits_misses_and_evictions() {
        let cache = cache(6);
        cache.add("a".into(), "12".into()); // cost 3
        cache.add("b".into(), "34".into()); // cost 3, total 6
        assert!(cache.get("a").is_some());
        assert!(cache.get("missing").is_none());
        cache.add("c".into(), "5678".into()); // cost 5, evicts a and b
        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.requests, 2);
        assert!(metrics.evictions >= 1);
        assert_eq!(metrics.current_bytes, cache.metrics().current_bytes);
    }
}
