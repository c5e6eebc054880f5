//! Cache namespaces: the load pipeline combining a local cache, a loader, and peer lookup.
//!
//! Mirrors the original GeeCache `Group`/`NewGroup`/`GetGroup`: each named group is a process-wide
//! singleton (registered in [`GROUPS`]) combining a local [`ConcurrentCache`], a pluggable
//! [`Loader`], an optional [`PeerPicker`], and a [`SingleFlight`] that collapses concurrent
//! misses for the same key into one load.

use crate::byteview::ByteView;
use crate::concurrent::ConcurrentCache;
use crate::config::{GroupConfig, LfuConfig, LruConfig};
use crate::engine::EvictionEngine;
use crate::error::GroupError;
use crate::lfu::LfuEngine;
use crate::loader::Loader;
use crate::lru::LruEngine;
use crate::peer::PeerPicker;
use crate::singleflight::SingleFlight;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// An engine whose concrete policy (LRU vs. LFU) was decided at [`Group`] construction time.
type DynEngine = Box<dyn EvictionEngine<ByteView> + Send>;

static GROUPS: Lazy<RwLock<HashMap<String, Arc<Group>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// A named cache namespace: local store, loader, optional peer picker, and single-flight.
pub struct Group {
    name: String,
    cache: ConcurrentCache<DynEngine, ByteView>,
    loader: Arc<dyn Loader>,
    peers: RwLock<Option<Arc<dyn PeerPicker>>>,
    flight: SingleFlight<Result<ByteView, Arc<GroupError>>>,
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("len", &self.cache.len())
            .field("has_peers", &self.peers.read().is_some())
            .finish()
    }
}

impl Group {
    /// Creates and registers a group backed by a byte-bounded LRU cache, the most common choice
    /// and the original GeeCache's only choice.
    ///
    /// Fails with [`GroupError::AlreadyRegistered`] if a group with this name already exists.
    pub fn new(config: GroupConfig, loader: Arc<dyn Loader>) -> Result<Arc<Group>, GroupError> {
        let lru_config = LruConfig::new(config.cache_bytes());
        Group::with_engine(config, loader, move || {
            Box::new(LruEngine::from_config(lru_config, None)) as DynEngine
        })
    }

    /// Creates and registers a group backed by a byte-bounded LFU cache, for workloads where
    /// popularity is a better eviction signal than recency.
    ///
    /// Fails with [`GroupError::AlreadyRegistered`] if a group with this name already exists.
    pub fn with_lfu(config: GroupConfig, loader: Arc<dyn Loader>) -> Result<Arc<Group>, GroupError> {
        let lfu_config = LfuConfig::new(config.cache_bytes());
        Group::with_engine(config, loader, move || {
            Box::new(LfuEngine::from_config(lfu_config, None)) as DynEngine
        })
    }

    fn with_engine(
        config: GroupConfig,
        loader: Arc<dyn Loader>,
        build: impl Fn() -> DynEngine + Send + Sync + 'static,
    ) -> Result<Arc<Group>, GroupError> {
        let mut groups = GROUPS.write();
        if groups.contains_key(config.name()) {
            return Err(GroupError::AlreadyRegistered(config.name().to_string()));
        }
        let group = Arc::new(Group {
            name: config.name().to_string(),
            cache: ConcurrentCache::new(config.cache_bytes(), build),
            loader,
            peers: RwLock::new(None),
            flight: SingleFlight::new(),
        });
        groups.insert(group.name.clone(), Arc::clone(&group));
        Ok(group)
    }

    /// Returns this group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers the peer picker used to route keys this node does not own. May only be called
    /// once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<(), GroupError> {
        let mut slot = self.peers.write();
        if slot.is_some() {
            return Err(GroupError::PeersAlreadyRegistered(self.name.clone()));
        }
        *slot = Some(peers);
        Ok(())
    }

    /// Returns the value for `key`, consulting the local cache, then peers, then the loader.
    pub fn get(&self, key: &str) -> Result<ByteView, GroupError> {
        if key.is_empty() {
            return Err(GroupError::EmptyKey);
        }
        if let Some(value) = self.cache.get(key) {
            return Ok(value);
        }
        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView, GroupError> {
        let result = self
            .flight
            .do_call(key, || self.fetch(key).map_err(Arc::new))
            .unwrap_or_else(|panic_message| {
                Err(Arc::new(GroupError::loader(key, PanicMessage(panic_message))))
            });
        match result {
            Ok(value) => Ok(value),
            Err(err) => Err((*err).clone()),
        }
    }

    /// Tries the registered peer first (if any), falling back to the local loader. A peer
    /// failure demotes to the loader rather than surfacing directly; a loader failure surfaces
    /// unchanged and is never cached.
    fn fetch(&self, key: &str) -> Result<ByteView, GroupError> {
        if let Some(peer) = self.peers.read().as_ref().and_then(|picker| picker.pick(key)) {
            match peer.get(&self.name, key) {
                Ok(bytes) => return Ok(ByteView::new(bytes)),
                Err(err) => tracing::warn!(error = %err, "failed to get from peer, falling back to loader"),
            }
        }
        self.get_locally(key)
    }

    fn get_locally(&self, key: &str) -> Result<ByteView, GroupError> {
        let bytes = self.loader.load(key)?;
        let value = ByteView::new(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.cache.add(key.to_string(), value);
    }
}

/// Wraps a single-flight panic's message as a loader-style error, so a poisoned load surfaces to
/// callers the same way a loader failure would.
#[derive(Debug)]
struct PanicMessage(String);

impl std::fmt::Display for PanicMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PanicMessage {}

/// Returns the group previously registered under `name` via [`Group::new`] or
/// [`Group::with_engine`], if any.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    GROUPS.read().get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GroupError as Err, PeerError};
    use crate::loader::GetterFn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn unique_name(tag: &str) -> String {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        format!("test-{tag}-{}", COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    struct AlwaysFailsPicker;
    impl PeerPicker for AlwaysFailsPicker {
        fn pick(&self, _key: &str) -> Option<Arc<dyn crate::peer::PeerGetter>> {
            Some(Arc::new(AlwaysFailsGetter))
        }
    }
    struct AlwaysFailsGetter;
    impl crate::peer::PeerGetter for AlwaysFailsGetter {
        fn get(&self, _group: &str, _key: &str) -> Result<Vec<u8>, PeerError> {
            Err(PeerError::NotFound)
        }
    }

    #[test]
    fn empty_key_is_rejected_before_touching_the_cache() {
        let config = GroupConfig::new(unique_name("empty-key"), 1 << 10);
        let loader = Arc::new(GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec())));
        let group = Group::new(config, loader).unwrap();
        assert!(matches!(group.get(""), Err(Err::EmptyKey)));
    }

    #[test]
    fn duplicate_name_registration_fails() {
        let name = unique_name("dup");
        let loader = Arc::new(GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec())));
        let _first = Group::new(GroupConfig::new(name.clone(), 1 << 10), Arc::clone(&loader)).unwrap();
        let second = Group::new(GroupConfig::new(name, 1 << 10), loader);
        assert!(matches!(second, Err(Err::AlreadyRegistered(_))));
    }

    #[test]
    fn s6_peer_failure_falls_back_to_loader_without_populating_on_peer_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let config = GroupConfig::new(unique_name("peer-fallback"), 1 << 10);
        let loader = Arc::new(GetterFn::new(move |_key: &str| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(b"V".to_vec())
        }));
        let group = Group::new(config, loader).unwrap();
        group.register_peers(Arc::new(AlwaysFailsPicker)).unwrap();

        let value = group.get("k").unwrap();
        assert_eq!(value.as_slice(), b"V");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let value_again = group.get("k").unwrap();
        assert_eq!(value_again.as_slice(), b"V");
        assert_eq!(calls.load(Ordering::SeqCst), 1, "loader must not be invoked again");
    }

    #[test]
    fn loader_failure_surfaces_and_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let config = GroupConfig::new(unique_name("loader-fails"), 1 << 10);
        let loader = Arc::new(GetterFn::new(move |_key: &str| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Err(crate::error::LoaderMessage("upstream down".to_string()))
        }));
        let group = Group::new(config, loader).unwrap();

        assert!(group.get("k").is_err());
        assert!(group.get("k").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2, "a failed load is never cached");
    }

    #[test]
    fn registering_peers_twice_fails() {
        let config = GroupConfig::new(unique_name("dup-peers"), 1 << 10);
        let loader = Arc::new(GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec())));
        let group = Group::new(config, loader).unwrap();
        group.register_peers(Arc::new(AlwaysFailsPicker)).unwrap();
        assert!(matches!(
            group.register_peers(Arc::new(AlwaysFailsPicker)),
            Err(Err::PeersAlreadyRegistered(_))
        ));
    }

    #[test]
    fn get_group_finds_a_previously_registered_group() {
        let name = unique_name("lookup");
        let loader = Arc::new(GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec())));
        Group::new(GroupConfig::new(name.clone(), 1 << 10), loader).unwrap();
        assert!(get_group(&name).is_some());
        assert!(get_group("definitely-not-registered").is_none());
    }
}
