//! Least Recently Used (LRU) eviction engine.
//!
//! Evicts the least-recently-accessed entry first. Ordering is maintained with the intrusive
//! list in [`crate::list`]: front is most-recently-used, back is least-recently-used. A `get`
//! or an overwriting `add` moves the touched entry to the front; a plain `add` of a new key
//! pushes it straight to the front.
//!
//! # Byte accounting
//!
//! `max_bytes == 0` means unbounded. Otherwise, after every `add`, entries are evicted from the
//! back until `nbytes <= max_bytes` or only one entry remains — so a single value larger than
//! `max_bytes` is still stored (the eviction loop empties everything else around it, then
//! stops because the list has nothing left to evict).
//!
//! # Examples
//!
//! ```
//! use meshcache::lru::LruEngine;
//!
//! let mut cache: LruEngine<meshcache::ByteView> = LruEngine::new(10, None);
//! cache.add("k1".to_string(), "1234".into());
//! cache.add("k2".to_string(), "k2v2".into());
//! cache.add("k3".to_string(), "k3v3".into());
//! assert!(cache.get("k1").is_none()); // evicted
//! assert_eq!(cache.len(), 2);
//! ```

use crate::config::LruConfig;
use crate::engine::{EvictionEngine, OnEvicted};
use crate::entry::CacheEntry;
use crate::list::{Handle, List};
use crate::value::Value;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

type Entry<V> = CacheEntry<String, V>;

/// A bytes-bounded LRU engine. See the module docs for the eviction rule.
///
/// Not internally synchronized; see [`crate::concurrent::ConcurrentCache`] for the
/// thread-safe wrapper the rest of the crate actually uses.
pub struct LruEngine<V> {
    max_bytes: u64,
    nbytes: u64,
    list: List<Entry<V>>,
    index: HashMap<String, Handle<Entry<V>>>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V> std::fmt::Debug for LruEngine<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruEngine")
            .field("max_bytes", &self.max_bytes)
            .field("nbytes", &self.nbytes)
            .field("len", &self.index.len())
            .finish()
    }
}

impl<V: Value + Clone> LruEngine<V> {
    /// Creates an engine with the given byte budget (`0` for unbounded) and an optional
    /// callback invoked once per evicted entry.
    pub fn new(max_bytes: u64, on_evicted: Option<OnEvicted<V>>) -> Self {
        LruEngine {
            max_bytes,
            nbytes: 0,
            list: List::new(),
            index: HashMap::new(),
            on_evicted,
        }
    }

    /// Creates an engine from an [`LruConfig`].
    pub fn from_config(config: LruConfig, on_evicted: Option<OnEvicted<V>>) -> Self {
        LruEngine::new(config.max_bytes(), on_evicted)
    }

    fn cost_of(key: &str, value: &V) -> u64 {
        (key.len() + value.len()) as u64
    }
}

impl<V: Value + Clone> EvictionEngine<V> for LruEngine<V> {
    fn add(&mut self, key: String, value: V) {
        let new_cost = Self::cost_of(&key, &value);
        if let Some(&handle) = self.index.get(&key) {
            // SAFETY: `handle` came from `self.index` and has not been unlinked since.
            unsafe { self.list.move_to_front(handle) };
            // SAFETY: same as above.
            let entry = unsafe { self.list.get_mut(handle) };
            self.nbytes = self.nbytes - entry.cost + new_cost;
            entry.value = value;
            entry.cost = new_cost;
        } else {
            let handle = self.list.push_front(CacheEntry::new(key.clone(), value, new_cost, ()));
            self.index.insert(key, handle);
            self.nbytes += new_cost;
        }

        while self.max_bytes != 0 && self.nbytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<V> {
        let handle = *self.index.get(key)?;
        // SAFETY: `handle` came from `self.index` and has not been unlinked since.
        unsafe { self.list.move_to_front(handle) };
        // SAFETY: same as above.
        let entry = unsafe { self.list.get(handle) };
        Some(entry.value.clone())
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn peek_cost(&self, key: &str) -> Option<u64> {
        let &handle = self.index.get(key)?;
        // SAFETY: `handle` came from `self.index` and has not been unlinked since.
        Some(unsafe { self.list.get(handle) }.cost)
    }

    fn remove_oldest(&mut self) -> Option<(String, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        self.nbytes -= entry.cost;
        if let Some(cb) = self.on_evicted.as_mut() {
            cb(&entry.key, &entry.value);
        }
        Some((entry.key, entry.value))
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn nbytes(&self) -> u64 {
        self.nbytes
    }

    fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}
