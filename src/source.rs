//! Remote item source
//!
//! One network request per identifier, returning the raw payload bytes.

use std::io::Read;

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::items::ItemId;

/// Upper bound on a single item payload
const MAX_PAYLOAD_BYTES: u64 = 1024 * 1024;

/// Something that can fetch a raw item record
pub trait ItemSource: Send + Sync {
    /// Fetch the payload for `id`. Any failure, timeouts included, is a
    /// `ResolveError::Transport`.
    fn fetch(&self, id: ItemId) -> Result<Vec<u8>, ResolveError>;
}

/// Item API over HTTP
#[derive(Clone, Debug)]
pub struct HttpItemSource {
    api_url: String,
    agent: ureq::Agent,
}

impl HttpItemSource {
    pub fn new(config: &ResolverConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.fetch_timeout())
            .timeout_connect(config.connect_timeout())
            .build();

        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn item_url(&self, id: ItemId) -> String {
        format!("{}/v1/item_details.json?item_id={}", self.api_url, id)
    }
}

impl ItemSource for HttpItemSource {
    fn fetch(&self, id: ItemId) -> Result<Vec<u8>, ResolveError> {
        let url = self.item_url(id);

        let response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => {
                ResolveError::Transport(format!("HTTP {} from {}", code, url))
            }
            ureq::Error::Transport(t) => ResolveError::Transport(t.to_string()),
        })?;

        // One byte past the cap tells an oversized body from one that fits
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_PAYLOAD_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| ResolveError::Transport(format!("failed to read body: {}", e)))?;

        if bytes.len() as u64 > MAX_PAYLOAD_BYTES {
            return Err(ResolveError::Transport(format!(
                "payload too large from {} (over {} bytes)",
                url, MAX_PAYLOAD_BYTES
            )));
        }

        Ok(bytes)
    }
}
