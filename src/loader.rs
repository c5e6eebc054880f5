//! The pluggable capability a [`crate::group::Group`] calls on a cache miss.

use crate::error::{GroupError, LoaderMessage};
use std::fmt;

/// Produces the bytes for a key that was not found in any cache.
///
/// Mirrors the original GeeCache `Getter` interface. A [`GroupError::Loader`] returned here is
/// never cached and is surfaced to the original caller unchanged.
pub trait Loader: Send + Sync {
    /// Loads the value for `key`, or fails with an error tagged with `key`.
    fn load(&self, key: &str) -> Result<Vec<u8>, GroupError>;
}

/// Adapts a plain closure to [`Loader`], mirroring GeeCache's `GetterFunc`.
///
/// # Examples
///
/// ```
/// use meshcache::loader::GetterFn;
/// use meshcache::Loader;
///
/// let loader = GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec()));
/// assert_eq!(loader.load("hi").unwrap(), b"hi");
/// ```
pub struct GetterFn<F> {
    f: F,
}

impl<F> GetterFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>, LoaderMessage> + Send + Sync,
{
    /// Wraps `f` as a [`Loader`]. `f` reports failure as a plain message, since closures rarely
    /// have a dedicated error type of their own.
    pub fn new(f: F) -> Self {
        GetterFn { f }
    }
}

impl<F> fmt::Debug for GetterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterFn").finish_non_exhaustive()
    }
}

impl<F> Loader for GetterFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>, LoaderMessage> + Send + Sync,
{
    fn load(&self, key: &str) -> Result<Vec<u8>, GroupError> {
        (self.f)(key).map_err(|err| GroupError::loader(key, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getter_fn_wraps_success() {
        let loader = GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec()));
        assert_eq!(loader.load("hello").unwrap(), b"hello");
    }

    #[test]
    fn getter_fn_wraps_failure_tagged_with_key() {
        let loader = GetterFn::new(|_: &str| Err(LoaderMessage("not found upstream".to_string())));
        let err = loader.load("missing").unwrap_err();
        assert!(matches!(err, GroupError::Loader { key, .. } if key == "missing"));
    }
}
