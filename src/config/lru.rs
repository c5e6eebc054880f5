//! Configuration for the LRU eviction engine.

use core::fmt;

/// Configuration for an [`crate::lru::LruEngine`].
///
/// # Examples
///
/// ```
/// use meshcache::config::LruConfig;
///
/// let config = LruConfig::new(1024);
/// assert_eq!(config.max_bytes(), 1024);
/// ```
#[derive(Clone, Copy)]
pub struct LruConfig {
    max_bytes: u64,
}

impl LruConfig {
    /// Creates a configuration with the given byte budget (`0` for unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Returns the configured byte budget.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl fmt::Debug for LruConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruConfig")
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}
