//! Item resolution
//!
//! cache lookup -> fetch on miss -> negative-cache on failure -> decode -> variant dispatch

use std::sync::Arc;

use crate::cache::{cache_key, CacheLookup, CacheValue, ItemCache};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::items::{Item, ItemId, RawItemRecord, SuffixResolver};
use crate::source::ItemSource;

/// Resolves identifiers into typed items. Holds no mutable state of its own;
/// all sharing happens through the cache, so one instance can serve many threads.
pub struct ItemResolver {
    config: ResolverConfig,
    source: Arc<dyn ItemSource>,
    cache: Arc<dyn ItemCache>,
}

impl ItemResolver {
    pub fn new(config: ResolverConfig, source: Arc<dyn ItemSource>, cache: Arc<dyn ItemCache>) -> Self {
        Self {
            config,
            source,
            cache,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve an item; every failure is reported as `None`
    pub fn resolve(&self, id: ItemId) -> Option<Item> {
        match self.try_resolve(id) {
            Ok(item) => Some(item),
            Err(e) => {
                log::debug!("Item {} not found: {}", id, e);
                None
            }
        }
    }

    /// Resolve an item, keeping the reason it was unavailable
    pub fn try_resolve(&self, id: ItemId) -> Result<Item, ResolveError> {
        if id == 0 {
            return Err(ResolveError::InvalidId(id));
        }

        let key = cache_key(id);
        let record = match self.cache.get(&key) {
            CacheLookup::Negative => return Err(ResolveError::NegativelyCached(id)),
            CacheLookup::Hit(bytes) => {
                log::debug!("Cache hit for item {}", id);
                self.decode_cached(id, &key, &bytes)?
            }
            CacheLookup::Miss => {
                log::debug!("Cache miss for item {}", id);
                self.fetch(id, &key)?
            }
        };

        Item::from_record(record, &self.config.render_url).map_err(|e| {
            log::warn!("Item {} has an unsupported type: {}", id, e);
            e
        })
    }

    /// Suffix lookups backed by this resolver
    pub fn suffixes(&self) -> SuffixResolver<'_> {
        SuffixResolver::new(self, self.config.max_suffix_depth)
    }

    fn fetch(&self, id: ItemId, key: &str) -> Result<RawItemRecord, ResolveError> {
        let bytes = match self.source.fetch(id) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Fetching item {} failed: {}", id, e);
                self.remember_failure(key);
                return Err(e);
            }
        };

        match RawItemRecord::from_slice(&bytes) {
            Ok(record) => {
                self.cache
                    .set(key, CacheValue::Payload(bytes), self.config.positive_ttl());
                Ok(record)
            }
            Err(e) => {
                log::warn!("Item {} payload is malformed: {}", id, e);
                self.remember_failure(key);
                Err(e.into())
            }
        }
    }

    /// A cached payload that no longer decodes is replaced by a negative
    /// marker once, so the next attempt after the short TTL refetches it.
    fn decode_cached(&self, id: ItemId, key: &str, bytes: &[u8]) -> Result<RawItemRecord, ResolveError> {
        RawItemRecord::from_slice(bytes).map_err(|e| {
            log::warn!("Cached payload for item {} is malformed: {}", id, e);
            self.remember_failure(key);
            ResolveError::from(e)
        })
    }

    fn remember_failure(&self, key: &str) {
        log::debug!("Negative-caching {} for {}s", key, self.config.negative_ttl_secs);
        self.cache
            .set(key, CacheValue::Negative, self.config.negative_ttl());
    }
}
