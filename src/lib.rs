#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Module map
//!
//! - [`byteview`]: the immutable, cheaply-cloneable byte buffer every cache stores as its value.
//! - [`engine`]: the trait both eviction policies implement, hidden behind
//!   [`concurrent::ConcurrentCache`].
//! - [`lru`] / [`lfu`]: the two bytes-bounded eviction engines.
//! - [`config`]: configuration structures for engines and groups.
//! - [`metrics`]: hit/miss/eviction counters tracked per cache.
//! - [`concurrent`]: thread-safe wrappers around the eviction engines.
//! - [`hashring`]: consistent hashing for assigning keys to peers.
//! - [`singleflight`]: coalescing concurrent callers of an expensive function into one call.
//! - [`loader`] / [`peer`]: the pluggable capabilities a [`Group`] composes.
//! - [`group`]: the top-level `Group` namespace tying all of the above together.
//! - [`error`]: the error types returned across the public API.

#[cfg(test)]
extern crate scoped_threadpool;

/// The immutable, cheaply-cloneable byte buffer stored as every cache's value.
pub mod byteview;

/// The `Value` trait bounding what a cache may store.
pub mod value;

/// Error types shared across the distribution layer.
pub mod error;

/// Unified cache entry type shared by the LRU and LFU engines.
pub mod entry;

/// Algorithm-specific metadata types (currently just LFU's frequency counter).
pub mod meta;

/// Doubly linked list implementation with in-place editing capabilities.
///
/// Internal infrastructure exposing unsafe raw-pointer operations; not for direct use.
pub(crate) mod list;

/// The common shape both eviction engines implement.
pub(crate) mod engine;

/// Least Recently Used (LRU) eviction engine, bounded by total byte size.
pub mod lru;

/// Least Frequently Used (LFU) eviction engine, bounded by total byte size.
pub mod lfu;

/// Configuration structures for engines and groups.
pub mod config;

/// Hit/miss/eviction counters tracked per cache.
pub mod metrics;

/// Thread-safe wrappers around the eviction engines.
pub mod concurrent;

/// Consistent hashing ring for assigning keys to peers.
pub mod hashring;

/// Coalesces concurrent callers of an expensive function into a single call.
pub mod singleflight;

/// The pluggable capability a [`group::Group`] calls on a cache miss.
pub mod loader;

/// The transport contract a [`group::Group`] uses to fetch keys owned by other peers.
pub mod peer;

/// Cache namespaces: the load pipeline combining a local cache, a loader, and peer lookup.
pub mod group;

pub use byteview::ByteView;
pub use concurrent::{ConcurrentLfuCache, ConcurrentLruCache};
pub use error::{GroupError, PeerError};
pub use group::{get_group, Group};
pub use hashring::HashRing;
pub use lfu::LfuEngine;
pub use loader::Loader;
pub use lru::LruEngine;
pub use peer::{PeerGetter, PeerPicker};
pub use singleflight::SingleFlight;
pub use value::Value;
