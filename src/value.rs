//! The `Value` contract consumed by the eviction engines.
//!
//! Any value accepted by [`crate::lru::LruEngine`] or [`crate::lfu::LfuEngine`] must expose a
//! stable byte length: once an entry is inserted, its reported length must never change, since
//! the engine's byte accounting (`nbytes`) is derived from it once and never recomputed.

/// A value whose length can be queried for byte accounting.
///
/// # Contract
///
/// `len()` must be stable for the lifetime of the value once it has been handed to an
/// engine. Implementations should prefer immutable types ([`crate::byteview::ByteView`] is the
/// canonical one) so this invariant holds by construction.
pub trait Value {
    /// Returns the number of bytes this value counts for in a cache's byte accounting.
    fn len(&self) -> usize;

    /// Returns `true` if this value counts for zero bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for crate::byteview::ByteView {
    fn len(&self) -> usize {
        crate::byteview::ByteView::len(self)
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}
