//! File-backed cache
//!
//! One JSON document per key, so entries survive restarts of the process.
//! Storage problems are logged and read back as misses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::{CacheLookup, CacheValue, Clock, ItemCache, SystemClock};

/// On-disk entry
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    /// Unix seconds
    expires_at: u64,
    /// Base64 payload; `None` is a negative marker
    payload: Option<String>,
}

/// Directory of cache entries
pub struct FileCache {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
    tmp_counter: AtomicU64,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
            tmp_counter: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    fn read_entry(&self, path: &Path) -> io::Result<Option<StoredEntry>> {
        match fs::read(path) {
            Ok(data) => serde_json::from_slice(&data)
                .map(Some)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_entry(&self, path: &Path, entry: &StoredEntry) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_vec(entry)?;
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("tmp.{}.{}", std::process::id(), n));
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }
}

impl ItemCache for FileCache {
    fn get(&self, key: &str) -> CacheLookup {
        let path = self.entry_path(key);

        let entry = match self.read_entry(&path) {
            Ok(Some(entry)) => entry,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                log::warn!("Unreadable cache entry {:?}: {}", path, e);
                return CacheLookup::Miss;
            }
        };

        // Never delete here: a concurrent `set` may have just renamed a fresh
        // entry into place. The next write for this key overwrites it.
        if entry.expires_at <= self.clock.now() {
            return CacheLookup::Miss;
        }

        match entry.payload {
            None => CacheLookup::Negative,
            Some(encoded) => match STANDARD.decode(encoded) {
                Ok(bytes) => CacheLookup::Hit(bytes),
                Err(e) => {
                    log::warn!("Corrupt payload in cache entry {:?}: {}", path, e);
                    CacheLookup::Miss
                }
            },
        }
    }

    fn set(&self, key: &str, value: CacheValue, ttl: Duration) {
        let entry = StoredEntry {
            expires_at: self.clock.now().saturating_add(ttl.as_secs()),
            payload: match value {
                CacheValue::Payload(bytes) => Some(STANDARD.encode(bytes)),
                CacheValue::Negative => None,
            },
        };

        let path = self.entry_path(key);
        if let Err(e) = self.write_entry(&path, &entry) {
            log::warn!("Failed to write cache entry {:?}: {}", path, e);
        }
    }
}
