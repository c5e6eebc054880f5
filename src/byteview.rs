//! Immutable byte payload used as the cache's value type.
//!
//! `ByteView` eliminates aliasing between what the cache stores, what a loader produced, and
//! what a caller holds: every crossing of that boundary is a copy, never a shared reference to
//! the same buffer. This is deliberately wasteful of a copy at each edge in exchange for never
//! having to reason about a loader or caller mutating bytes the cache still thinks are current.

use std::fmt;
use std::string::FromUtf8Error;
use std::sync::Arc;

/// An immutable, reference-counted view of a byte payload.
///
/// Cloning a `ByteView` is cheap (an `Arc` bump); the bytes themselves are never mutated after
/// construction, so clones may be handed to concurrent readers freely. Accessors that return
/// owned data ([`ByteView::as_bytes`], [`ByteView::as_string`]) always copy, so a caller can
/// never observe or influence what the cache holds.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Constructs a view by copying `bytes`.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        ByteView {
            bytes: Arc::from(bytes.as_ref()),
        }
    }

    /// Returns the number of bytes held by this view.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if this view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a fresh copy of the underlying bytes.
    ///
    /// The returned `Vec` is independent of this view: mutating it has no effect on any other
    /// holder of the same `ByteView`.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns a borrowed slice of the underlying bytes.
    ///
    /// Unlike [`ByteView::as_bytes`] this does not copy, but the slice's lifetime is tied to
    /// this view, which itself never changes after construction — so the no-aliasing contract
    /// still holds for the duration the slice is observed.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes the bytes as UTF-8, returning an owned `String`.
    pub fn as_string(&self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.as_bytes())
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        ByteView {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        ByteView::new(s.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        ByteView::from(s.into_bytes())
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView").field("len", &self.len()).finish()
    }
}
