//! Error types shared across the distribution layer.
//!
//! [`PeerError`] is what a [`crate::peer::PeerGetter`] implementation returns. A
//! [`crate::group::Group`] only logs a peer failure and falls back to its local loader, so
//! `PeerError` never surfaces through [`GroupError`] — `GroupError` instead covers what a
//! `Group::get`/`register_peers` caller can observe directly: a bad argument, a duplicate
//! registration, or the loader itself failing.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Failure modes of a peer transport ([`crate::peer::PeerGetter`]) call.
///
/// Carries its source as `Arc` rather than `Box` so the whole error is cheaply `Clone`: a
/// [`crate::group::Group`] load failure is shared, not re-run, across every caller coalesced
/// onto it by [`crate::singleflight::SingleFlight`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PeerError {
    /// The remote peer does not recognize the requested group.
    #[error("peer does not know group {0:?}")]
    UnknownGroup(String),
    /// The remote peer's loader failed to produce a value for the key.
    #[error("peer reported the key was not found")]
    NotFound,
    /// Any other transport-level failure: connection refused, timeout, decode error, etc.
    #[error("peer transport error: {0}")]
    Transport(#[source] Arc<dyn StdError + Send + Sync>),
}

/// Errors surfaced by [`crate::group::Group`] operations.
///
/// `Clone` for the same reason as [`PeerError`]: every caller coalesced onto one in-flight
/// `Group::get` by single-flight must be able to receive its own copy of the same failure.
#[derive(thiserror::Error, Debug, Clone)]
pub enum GroupError {
    /// `Group::get` was called with an empty key.
    #[error("key must not be empty")]
    EmptyKey,

    /// `Group::register_peers` was called a second time on the same group.
    #[error("register_peers called more than once on group {0:?}")]
    PeersAlreadyRegistered(String),

    /// A group with this name is already registered.
    #[error("a group named {0:?} is already registered")]
    AlreadyRegistered(String),

    /// The loader failed to produce a value for the key. The value is not cached.
    #[error("loader failed for key {key:?}: {source}")]
    Loader {
        /// The key the loader was asked to produce a value for.
        key: String,
        /// The loader's underlying error.
        #[source]
        source: Arc<dyn StdError + Send + Sync>,
    },
}

impl GroupError {
    /// Wraps an arbitrary loader error, tagging it with the key that was being loaded.
    pub fn loader(key: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        GroupError::Loader {
            key: key.into(),
            source: Arc::new(source),
        }
    }
}

/// A loader error that carries only a message, for loaders with no richer error type of
/// their own (e.g. a closure-based [`crate::loader::GetterFn`]).
#[derive(Debug)]
pub struct LoaderMessage(pub String);

impl fmt::Display for LoaderMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for LoaderMessage {}
