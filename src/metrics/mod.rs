//! Cache metrics.
//!
//! One [`CacheMetrics`] lives inside each [`crate::concurrent::ConcurrentCache`], updated on
//! every `get`/`add`/eviction and readable via `ConcurrentCache::metrics()`. Unlike the rest of
//! the crate this has no counterpart in the original GeeCache: it is the ambient observability
//! layer expected of a cache library, carried over in spirit from the teacher's
//! `CoreCacheMetrics`, trimmed down to the fields this crate actually needs (no BTreeMap
//! reporting, no per-algorithm metric subtype — LRU and LFU share one shape).

/// Request/hit/eviction/byte counters for a single cache instance.
#[derive(Debug, Default, Clone)]
pub struct CacheMetrics {
    /// Total `get` calls.
    pub requests: u64,
    /// `get` calls that found the key.
    pub hits: u64,
    /// Entries evicted so far.
    pub evictions: u64,
    /// Cumulative bytes written across all `add` calls, counting both inserts and updates.
    pub bytes_written: u64,
    /// Cumulative bytes freed by eviction.
    pub bytes_evicted: u64,
    /// Bytes currently held (mirrors the engine's `nbytes`).
    pub current_bytes: u64,
    /// Configured byte budget (`0` means unbounded).
    pub max_bytes: u64,
}

impl CacheMetrics {
    /// Creates a zeroed metrics instance for an engine with the given byte budget.
    pub fn new(max_bytes: u64) -> Self {
        CacheMetrics {
            max_bytes,
            ..Default::default()
        }
    }

    /// Records a `get` that found the key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.hits += 1;
    }

    /// Records a `get` that did not find the key.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records bytes written by an `add` (insert or update) and the engine's new total.
    pub fn record_insertion(&mut self, bytes_written: u64, current_bytes: u64) {
        self.bytes_written += bytes_written;
        self.current_bytes = current_bytes;
    }

    /// Records `count` evictions from a single `add` call and the engine's new total.
    pub fn record_eviction(&mut self, count: u64, evicted_bytes: u64, current_bytes: u64) {
        self.evictions += count;
        self.bytes_evicted += evicted_bytes;
        self.current_bytes = current_bytes;
    }

    /// Hit ratio in `[0.0, 1.0]`, or `0.0` if there have been no requests yet.
    pub fn hit_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.requests as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_is_zero_with_no_requests() {
        assert_eq!(CacheMetrics::new(0).hit_rate(), 0.0);
    }

    #[test]
    fn tracks_hits_and_misses() {
        let mut metrics = CacheMetrics::new(100);
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        assert_eq!(metrics.requests, 3);
        assert_eq!(metrics.hits, 2);
        assert!((metrics.hit_rate() - (2.0 / 3.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn tracks_bytes_written_and_evicted() {
        let mut metrics = CacheMetrics::new(100);
        metrics.record_insertion(10, 10);
        metrics.record_insertion(20, 30);
        metrics.record_eviction(1, 10, 20);
        assert_eq!(metrics.bytes_written, 30);
        assert_eq!(metrics.bytes_evicted, 10);
        assert_eq!(metrics.current_bytes, 20);
        assert_eq!(metrics.evictions, 1);
    }
}
