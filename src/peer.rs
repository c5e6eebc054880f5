//! The transport contract a [`crate::group::Group`] uses to fetch keys owned by other peers.
//!
//! Deliberately leaves the wire format unimplemented — HTTP/gRPC/whatever is a deployment
//! choice, not part of this crate. Callers supply a concrete [`PeerPicker`]/[`PeerGetter`] pair
//! (typically backed by [`crate::hashring::HashRing`] for the picker).

use crate::error::PeerError;
use std::sync::Arc;

/// Chooses which peer, if any, owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the peer that should own `key`, or `None` if the key is owned locally (including
    /// the case where picking resolved to this peer itself — see
    /// [`crate::hashring::HashRing`]'s use as a `PeerPicker`).
    fn pick(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a key from a specific remote peer.
pub trait PeerGetter: Send + Sync {
    /// Requests `key` from `group` on the remote peer.
    fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, PeerError>;
}
