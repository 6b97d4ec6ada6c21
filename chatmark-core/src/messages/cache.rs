//! Cache control directive for prompt caching.
//!
//! Providers that support prompt caching (e.g., Anthropic) accept a
//! `cache_control` object on individual content blocks. The block marks
//! the end of a cacheable prompt prefix.

use serde::{Deserialize, Serialize};

/// A cache directive attached to a content part.
///
/// Serializes as `{"type": "ephemeral"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CacheControl {
    /// Cache type hint.
    #[serde(rename = "type")]
    pub cache_type: CacheType,
}

impl CacheControl {
    /// Create an ephemeral cache directive.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            cache_type: CacheType::Ephemeral,
        }
    }

    /// Get the cache type.
    #[must_use]
    pub fn cache_type(&self) -> CacheType {
        self.cache_type
    }
}

/// Type of caching to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheType {
    /// Ephemeral cache (short-lived).
    #[default]
    Ephemeral,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ephemeral => write!(f, "ephemeral"),
        }
    }
}
