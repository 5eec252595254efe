//! Result cache
//!
//! Key-value storage for raw item payloads with per-entry TTL. A failed fetch
//! leaves a negative marker behind, which is distinct from "never fetched".

pub mod file;
pub mod memory;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::items::ItemId;

pub use file::FileCache;
pub use memory::MemoryCache;

/// What gets stored under a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    Payload(Vec<u8>),
    /// "We tried and failed"
    Negative,
}

/// Outcome of a cache read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(Vec<u8>),
    Negative,
    Miss,
}

impl From<CacheValue> for CacheLookup {
    fn from(value: CacheValue) -> Self {
        match value {
            CacheValue::Payload(bytes) => CacheLookup::Hit(bytes),
            CacheValue::Negative => CacheLookup::Negative,
        }
    }
}

/// Storage backend for resolved payloads. Implementations must be safe to
/// share between threads; storage failures degrade to misses.
pub trait ItemCache: Send + Sync {
    fn get(&self, key: &str) -> CacheLookup;
    fn set(&self, key: &str, value: CacheValue, ttl: Duration);
}

/// Deterministic cache key: `"{id}::{first 10 hex chars of sha256(id)}"`
pub fn cache_key(id: ItemId) -> String {
    let id = id.to_string();
    let digest = Sha256::digest(id.as_bytes());
    let hash = hex::encode(digest);
    format!("{}::{}", id, &hash[..10])
}

/// Wall-clock source for expiry, in unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_stable() {
        assert_eq!(cache_key(12452), cache_key(12452));
        assert!(cache_key(12452).starts_with("12452::"));
        assert_eq!(cache_key(12452).len(), "12452::".len() + 10);
    }

    #[test]
    fn test_cache_keys_distinct() {
        let keys: std::collections::HashSet<String> = (1..=5000).map(cache_key).collect();
        assert_eq!(keys.len(), 5000);
    }

    #[test]
    fn test_cache_key_known_value() {
        // sha256("1") = 6b86b273ff34fce1...
        assert_eq!(cache_key(1), "1::6b86b273ff");
    }
}
