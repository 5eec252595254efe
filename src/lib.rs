//! gw2items - cached item definitions for the Guild Wars 2 item API
//!
//! Resolves item ids into typed items, caching raw payloads (and failures)
//! so repeat lookups stay off the network, and derives the display-ready
//! attributes a tooltip needs.

pub mod cache;
pub mod config;
pub mod error;
pub mod items;
pub mod resolver;
pub mod source;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use cache::{cache_key, CacheLookup, CacheValue, FileCache, ItemCache, MemoryCache};
pub use config::ResolverConfig;
pub use error::{ConfigError, ResolveError};
pub use items::{AttributeModifier, Item, ItemId, ItemVariant, RawItemRecord, SuffixResolver};
pub use resolver::ItemResolver;
pub use source::{HttpItemSource, ItemSource};
