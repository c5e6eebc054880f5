//! Least Frequently Used (LFU) eviction engine.
//!
//! Entries are bucketed by access frequency: `freq_lists[f]` is an intrusive list (see
//! [`crate::list`]) of every entry that has been touched exactly `f` times, most-recently-touched
//! at the front. Eviction always pops the back of `freq_lists[min_freq]` — the least-recently
//! touched entry among the least-frequently touched entries.
//!
//! # Promotion
//!
//! A `get`, or an `add` that overwrites an existing key, removes the entry from its current
//! frequency's list, bumps its frequency by one, and pushes it to the front of the new
//! frequency's list. If the old list becomes empty and was `min_freq`, `min_freq` can simply be
//! incremented: every remaining class has a strictly higher frequency, and the entry just
//! promoted now occupies `min_freq + 1`, so that is the new minimum.
//!
//! Eviction is different: after popping the back of `min_freq`'s list, if that list is now empty
//! there is no shortcut (the next-lowest populated frequency could be anything), so `min_freq` is
//! recomputed by scanning the live frequency classes.
//!
//! # Updates don't trigger eviction
//!
//! `add` on an existing key only promotes the entry and adjusts its cost; it returns before the
//! eviction loop runs. Eviction only happens on the branch that inserts a brand new key. A
//! sequence of same-key updates can therefore leave the engine transiently over its byte budget
//! until the next new key is added.
//!
//! # Byte accounting
//!
//! Same rule as [`crate::lru::LruEngine`]: `max_bytes == 0` is unbounded, and a single
//! over-budget entry is still stored once the rest of the engine has been evicted around it.

use crate::config::LfuConfig;
use crate::engine::{EvictionEngine, OnEvicted};
use crate::entry::CacheEntry;
use crate::list::{Handle, List};
use crate::meta::LfuMeta;
use crate::value::Value;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

type Entry<V> = CacheEntry<String, V, LfuMeta>;

#[derive(Clone, Copy)]
struct Indexed<V> {
    freq: usize,
    handle: Handle<Entry<V>>,
}

/// A bytes-bounded LFU engine. See the module docs for the eviction and promotion rules.
///
/// Not internally synchronized; see [`crate::concurrent::ConcurrentCache`] for the thread-safe
/// wrapper the rest of the crate actually uses.
pub struct LfuEngine<V> {
    max_bytes: u64,
    nbytes: u64,
    min_freq: usize,
    freq_lists: HashMap<usize, List<Entry<V>>>,
    index: HashMap<String, Indexed<V>>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V> std::fmt::Debug for LfuEngine<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfuEngine")
            .field("max_bytes", &self.max_bytes)
            .field("nbytes", &self.nbytes)
            .field("min_freq", &self.min_freq)
            .field("len", &self.index.len())
            .finish()
    }
}

impl<V: Value + Clone> LfuEngine<V> {
    /// Creates an engine with the given byte budget (`0` for unbounded) and an optional
    /// callback invoked once per evicted entry.
    pub fn new(max_bytes: u64, on_evicted: Option<OnEvicted<V>>) -> Self {
        LfuEngine {
            max_bytes,
            nbytes: 0,
            min_freq: 0,
            freq_lists: HashMap::new(),
            index: HashMap::new(),
            on_evicted,
        }
    }

    /// Creates an engine from an [`LfuConfig`].
    pub fn from_config(config: LfuConfig, on_evicted: Option<OnEvicted<V>>) -> Self {
        LfuEngine::new(config.max_bytes(), on_evicted)
    }

    fn cost_of(key: &str, value: &V) -> u64 {
        (key.len() + value.len()) as u64
    }

    /// Removes the indexed entry from its current frequency list, bumps its frequency, and
    /// relinks it at the front of the new frequency's list, updating `self.index` to match.
    /// Returns the handle's new location.
    fn promote(&mut self, key: &str, indexed: Indexed<V>) -> Indexed<V> {
        let list = self
            .freq_lists
            .get_mut(&indexed.freq)
            .expect("indexed entry must live in the list for its recorded frequency");
        // SAFETY: `indexed.handle` was produced by a previous push into this exact list and has
        // not been unlinked since (the index is updated in lock-step with every unlink here).
        let mut entry = unsafe { list.unlink(indexed.handle) };
        if list.is_empty() {
            self.freq_lists.remove(&indexed.freq);
            if indexed.freq == self.min_freq {
                self.min_freq += 1;
            }
        }
        entry.meta.frequency += 1;
        let new_freq = entry.meta.frequency;
        let new_handle = self
            .freq_lists
            .entry(new_freq)
            .or_insert_with(List::new)
            .push_front(entry);
        let new_indexed = Indexed {
            freq: new_freq,
            handle: new_handle,
        };
        self.index.insert(key.to_string(), new_indexed);
        new_indexed
    }
}

impl<V: Value + Clone> EvictionEngine<V> for LfuEngine<V> {
    fn add(&mut self, key: String, value: V) {
        let new_cost = Self::cost_of(&key, &value);
        if let Some(indexed) = self.index.get(&key).copied() {
            let new_indexed = self.promote(&key, indexed);
            // SAFETY: `promote` just linked this handle at the front of `freq_lists[new_freq]`.
            let entry = unsafe {
                self.freq_lists
                    .get_mut(&new_indexed.freq)
                    .expect("promote just populated this frequency class")
                    .get_mut(new_indexed.handle)
            };
            self.nbytes = self.nbytes - entry.cost + new_cost;
            entry.value = value;
            entry.cost = new_cost;
            // Updates never trigger eviction, matching the original loader's insert-or-update.
            return;
        }

        let handle = self
            .freq_lists
            .entry(1)
            .or_insert_with(List::new)
            .push_front(CacheEntry::new(key.clone(), value, new_cost, LfuMeta::new(1)));
        self.index.insert(key, Indexed { freq: 1, handle });
        self.min_freq = 1;
        self.nbytes += new_cost;

        while self.max_bytes != 0 && self.nbytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<V> {
        let indexed = self.index.get(key).copied()?;
        let new_indexed = self.promote(key, indexed);
        // SAFETY: `promote` just linked this handle at the front of `freq_lists[new_freq]`.
        let entry = unsafe {
            self.freq_lists
                .get(&new_indexed.freq)?
                .get(new_indexed.handle)
        };
        Some(entry.value.clone())
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn peek_cost(&self, key: &str) -> Option<u64> {
        let indexed = self.index.get(key)?;
        // SAFETY: `indexed.handle` is linked into `freq_lists[indexed.freq]` and has not been
        // unlinked since (the index is updated in lock-step with every unlink in `promote`).
        Some(unsafe { self.freq_lists.get(&indexed.freq)?.get(indexed.handle) }.cost)
    }

    fn remove_oldest(&mut self) -> Option<(String, V)> {
        if self.index.is_empty() {
            return None;
        }
        let list = self.freq_lists.get_mut(&self.min_freq)?;
        let entry = list.pop_back()?;
        if list.is_empty() {
            self.freq_lists.remove(&self.min_freq);
            self.min_freq = self.freq_lists.keys().copied().min().unwrap_or(0);
        }
        self.index.remove(&entry.key);
        self.nbytes -= entry.cost;
        if let Some(cb) = self.on_evicted.as_mut() {
            cb(&entry.key, &entry.value);
        }
        Some((entry.key, entry.value))
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn nbytes(&self) -> u64 {
        self.nbytes
    }

    fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byteview::ByteView;
    use std::sync::{Arc, Mutex};

    fn engine(max_bytes: u64) -> LfuEngine<ByteView> {
        LfuEngine::new(max_bytes, None)
    }

    #[test]
    fn s2_frequency_wins_over_recency() {
        // maxBytes = len(key1)+len(key2)+len(value1)+len(value2) = 20.
        let mut cache = engine(20);
        cache.add("key1".into(), "value1".into());
        cache.add("key2".into(), "value2".into());
        cache.add("k3".into(), "v3".into());
        assert!(cache.get("key1").is_none());
        assert_eq!(cache.len(), 2);
        assert!(cache.get("key2").is_some());
        assert!(cache.get("k3").is_some());
    }

    #[test]
    fn s3_promotion_sequence_matches_source_scenario() {
        let evicted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let evicted_cb = Arc::clone(&evicted);
        let mut cache: LfuEngine<ByteView> = LfuEngine::new(
            10,
            Some(Box::new(move |key, _value| {
                evicted_cb.lock().unwrap().push(key.to_string());
            })),
        );
        cache.add("key1".into(), "123456".into());
        cache.add("k2".into(), "k2".into());
        cache.add("k2".into(), "k2".into());
        cache.add("k3".into(), "k3".into());
        cache.add("k4".into(), "k4".into());
        cache.add("k5".into(), "k5".into());
        cache.add("k5".into(), "k5".into());
        assert_eq!(
            *evicted.lock().unwrap(),
            vec!["key1".to_string(), "k3".to_string(), "k4".to_string()]
        );
    }

    #[test]
    fn update_does_not_trigger_eviction() {
        let mut cache = engine(4);
        cache.add("a".into(), "1".into()); // cost 2
        cache.add("b".into(), "2".into()); // cost 2, at budget
                                            // Overwriting "a" grows it past budget, but updates never run the eviction loop.
        cache.add("a".into(), "11111111".into()); // cost 9
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn unbounded_when_max_bytes_zero() {
        let mut cache = engine(0);
        for i in 0..1000 {
            cache.add(format!("k{i}"), ByteView::from(vec![0u8; 32]));
        }
        assert_eq!(cache.len(), 1000);
    }

    #[test]
    fn min_freq_recomputed_after_emptying_its_class() {
        let mut cache = engine(0);
        cache.add("a".into(), "1".into());
        cache.add("b".into(), "2".into());
        cache.get("a"); // a -> freq 2, min_freq stays 1 (b still at freq 1)
        cache.get("b"); // b -> freq 2, freq-1 class now empty, min_freq becomes 2
        assert_eq!(cache.remove_oldest().map(|(k, _)| k), Some("a".to_string()));
    }
}
