//! Resolver configuration
//!
//! Loaded from an optional RON file, with every field falling back to a default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings shared by the resolver, the HTTP source and the caches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Base URL of the item API
    pub api_url: String,
    /// Base URL used to compose icon image URLs
    pub render_url: String,
    /// Lifetime of a successfully fetched payload
    pub positive_ttl_secs: u64,
    /// Lifetime of a negative marker after a failed fetch
    pub negative_ttl_secs: u64,
    /// Overall deadline for one remote fetch
    pub fetch_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// How many suffix hops the suffix resolver will follow
    pub max_suffix_depth: usize,
    /// Directory for the file cache; the platform data dir when unset
    pub cache_dir: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.guildwars2.com".to_string(),
            render_url: "https://render.guildwars2.com".to_string(),
            positive_ttl_secs: 86_400,
            negative_ttl_secs: 600,
            fetch_timeout_secs: 10,
            connect_timeout_secs: 5,
            max_suffix_depth: 8,
            cache_dir: None,
        }
    }
}

impl ResolverConfig {
    /// Load from a RON file, falling back to defaults if it is missing or broken
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                log::info!("Config loaded from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{} ({:?}), using defaults", e, path);
                Self::default()
            }
        }
    }

    /// Read and parse a RON file, surfacing any failure
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    pub fn positive_ttl(&self) -> Duration {
        Duration::from_secs(self.positive_ttl_secs)
    }

    pub fn negative_ttl(&self) -> Duration {
        Duration::from_secs(self.negative_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Resolve the cache directory (configured, platform data dir, or `./cache`)
    pub fn cache_directory(&self) -> PathBuf {
        use directories::ProjectDirs;

        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }

        if let Some(proj_dirs) = ProjectDirs::from("com", "gw2spidy", "gw2items") {
            let mut path = proj_dirs.cache_dir().to_path_buf();
            path.push("items");
            path
        } else {
            PathBuf::from("./cache")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.positive_ttl(), Duration::from_secs(86_400));
        assert_eq!(config.negative_ttl(), Duration::from_secs(600));
        assert_eq!(config.max_suffix_depth, 8);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = ResolverConfig::from_ron_str(
            r#"(api_url: "http://localhost:8080", negative_ttl_secs: 30)"#,
        )
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.negative_ttl_secs, 30);
        assert_eq!(config.positive_ttl_secs, 86_400);
        assert_eq!(config.render_url, "https://render.guildwars2.com");
    }

    #[test]
    fn test_malformed_ron_is_error() {
        assert!(ResolverConfig::from_ron_str("(api_url: 42").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = ResolverConfig::load(Path::new("/nonexistent/gw2items.ron"));
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw2items.ron");
        fs::write(&path, r#"(max_suffix_depth: 3, cache_dir: Some("/tmp/items"))"#).unwrap();

        let config = ResolverConfig::load(&path);
        assert_eq!(config.max_suffix_depth, 3);
        assert_eq!(config.cache_directory(), PathBuf::from("/tmp/items"));
    }
}
