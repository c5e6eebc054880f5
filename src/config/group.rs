//! Configuration for a [`crate::group::Group`].

use core::fmt;

/// Default virtual-node replica count used by [`crate::hashring::HashRing`] when a
/// [`GroupConfig`] does not override it.
pub const DEFAULT_REPLICAS: usize = 50;

/// Configuration for a cache namespace.
///
/// # Examples
///
/// ```
/// use meshcache::config::GroupConfig;
///
/// let config = GroupConfig::new("scores", 1 << 20);
/// assert_eq!(config.name(), "scores");
/// assert_eq!(config.replicas(), meshcache::config::group::DEFAULT_REPLICAS);
/// ```
#[derive(Clone)]
pub struct GroupConfig {
    name: String,
    cache_bytes: u64,
    replicas: usize,
}

impl GroupConfig {
    /// Creates a configuration for a group named `name` with the given local cache byte budget.
    pub fn new(name: impl Into<String>, cache_bytes: u64) -> Self {
        GroupConfig {
            name: name.into(),
            cache_bytes,
            replicas: DEFAULT_REPLICAS,
        }
    }

    /// Overrides the number of virtual nodes a [`crate::hashring::HashRing`]-based peer picker
    /// built for this group should use. `Group` itself does not build a ring (peer transport is
    /// left to the caller); this is a convenience knob for callers who do.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Returns the group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the local cache's byte budget.
    pub fn cache_bytes(&self) -> u64 {
        self.cache_bytes
    }

    /// Returns the configured hash ring replica count.
    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl fmt::Debug for GroupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupConfig")
            .field("name", &self.name)
            .field("cache_bytes", &self.cache_bytes)
            .field("replicas", &self.replicas)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_replicas_applied_unless_overridden() {
        let config = GroupConfig::new("scores", 1024);
        assert_eq!(config.replicas(), DEFAULT_REPLICAS);
        let custom = GroupConfig::new("scores", 1024).with_replicas(10);
        assert_eq!(custom.replicas(), 10);
    }
}
