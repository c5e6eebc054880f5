//! Configuration for the LFU eviction engine.

use core::fmt;

/// Configuration for an [`crate::lfu::LfuEngine`].
///
/// # Examples
///
/// ```
/// use meshcache::config::LfuConfig;
///
/// let config = LfuConfig::new(1024);
/// assert_eq!(config.max_bytes(), 1024);
/// ```
#[derive(Clone, Copy)]
pub struct LfuConfig {
    max_bytes: u64,
}

impl LfuConfig {
    /// Creates a configuration with the given byte budget (`0` for unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Returns the configured byte budget.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl fmt::Debug for LfuConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuConfig")
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_the_byte_budget() {
        let config = LfuConfig::new(1024);
        assert_eq!(config.max_bytes(), 1024);
    }
}
