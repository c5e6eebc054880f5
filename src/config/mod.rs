//! Configuration structures for the eviction engines and for [`crate::group::Group`].
//!
//! Each cache is created using its configuration struct as a single entry point, carried over
//! from the convention the eviction engines already use elsewhere in this crate.
//!
//! # Examples
//!
//! ```
//! use meshcache::config::LruConfig;
//! use meshcache::lru::LruEngine;
//! use meshcache::ByteView;
//!
//! let config = LruConfig::new(1 << 20);
//! let cache: LruEngine<ByteView> = LruEngine::from_config(config, None);
//! ```

pub mod group;
pub mod lfu;
pub mod lru;

pub use group::GroupConfig;
pub use lfu::LfuConfig;
pub use lru::LruConfig;
