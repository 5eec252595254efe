//! In-process cache backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::{CacheLookup, CacheValue, Clock, ItemCache, SystemClock};

/// Every this many writes, `set` also drops expired entries
const PRUNE_INTERVAL: usize = 256;

#[derive(Debug, Clone)]
struct Entry {
    value: CacheValue,
    /// Unix seconds
    expires_at: u64,
}

/// Thread-safe map of entries with lazy expiry
///
/// Expired entries are removed when read, and swept periodically on write so
/// keys that are never read again do not accumulate.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    writes: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of stored entries, expired ones included until pruned
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        drop_expired(&mut self.entries.write(), now)
    }
}

fn drop_expired(entries: &mut HashMap<String, Entry>, now: u64) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);
    before - entries.len()
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemCache for MemoryCache {
    fn get(&self, key: &str) -> CacheLookup {
        let now = self.clock.now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return CacheLookup::Miss,
                Some(entry) if entry.expires_at > now => return entry.value.clone().into(),
                Some(_) => {}
            }
        }

        // Expired: remove it unless another writer refreshed it meanwhile
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }
        CacheLookup::Miss
    }

    fn set(&self, key: &str, value: CacheValue, ttl: Duration) {
        let now = self.clock.now();
        let expires_at = now.saturating_add(ttl.as_secs());

        let mut entries = self.entries.write();
        if self.writes.fetch_add(1, Ordering::Relaxed) % PRUNE_INTERVAL == PRUNE_INTERVAL - 1 {
            let dropped = drop_expired(&mut entries, now);
            if dropped > 0 {
                log::debug!("Pruned {} expired cache entries", dropped);
            }
        }
        entries.insert(key.to_string(), Entry { value, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    fn cache() -> (MemoryCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        (MemoryCache::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_miss_then_hit() {
        let (cache, _) = cache();
        assert_eq!(cache.get("a"), CacheLookup::Miss);

        cache.set("a", CacheValue::Payload(b"{}".to_vec()), Duration::from_secs(60));
        assert_eq!(cache.get("a"), CacheLookup::Hit(b"{}".to_vec()));
    }

    #[test]
    fn test_negative_is_not_a_miss() {
        let (cache, _) = cache();
        cache.set("a", CacheValue::Negative, Duration::from_secs(60));
        assert_eq!(cache.get("a"), CacheLookup::Negative);
    }

    #[test]
    fn test_expiry() {
        let (cache, clock) = cache();
        cache.set("a", CacheValue::Negative, Duration::from_secs(600));

        clock.advance(599);
        assert_eq!(cache.get("a"), CacheLookup::Negative);

        clock.advance(1);
        assert_eq!(cache.get("a"), CacheLookup::Miss);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_overwrite_replaces_value_and_ttl() {
        let (cache, clock) = cache();
        cache.set("a", CacheValue::Negative, Duration::from_secs(10));
        cache.set("a", CacheValue::Payload(vec![1]), Duration::from_secs(100));

        clock.advance(50);
        assert_eq!(cache.get("a"), CacheLookup::Hit(vec![1]));
    }

    #[test]
    fn test_prune() {
        let (cache, clock) = cache();
        cache.set("short", CacheValue::Negative, Duration::from_secs(10));
        cache.set("long", CacheValue::Negative, Duration::from_secs(100));

        clock.advance(20);
        assert_eq!(cache.prune(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_writes_sweep_unread_expired_entries() {
        let (cache, clock) = cache();
        cache.set("forgotten", CacheValue::Negative, Duration::from_secs(10));
        clock.advance(20);

        for _ in 0..PRUNE_INTERVAL {
            cache.set("busy", CacheValue::Payload(vec![1]), Duration::from_secs(60));
        }

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("busy"), CacheLookup::Hit(vec![1]));
    }
}
