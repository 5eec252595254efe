//! Error types
//!
//! Every failure below collapses into "not found" at the `resolve` boundary.
//! The distinctions only matter for logging and for picking a cache TTL.

use thiserror::Error;

use crate::items::ItemId;

/// Why an item could not be resolved
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Network failure, non-2xx response or timeout
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload was not a valid item record
    #[error("malformed item payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The `type` tag is outside the known variant set
    #[error("unknown item type {0:?}")]
    UnknownVariant(String),

    /// A previous attempt failed and the negative entry has not expired yet
    #[error("item {0} is negatively cached")]
    NegativelyCached(ItemId),

    /// Identifier can never name a catalog item
    #[error("invalid item id {0}")]
    InvalidId(ItemId),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
