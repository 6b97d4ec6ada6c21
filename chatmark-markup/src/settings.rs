//! Adapter settings and configuration.
//!
//! This module provides the `AdapterSettings` type that controls the tag
//! vocabulary and the defaults used when markup omits an attribute.

use chatmark_core::{DEFAULT_AUDIO_FORMAT, DEFAULT_ROLE, DEFAULT_SECTION};
use serde::{Deserialize, Serialize};

use crate::vocabulary::ChatVocabulary;

/// Settings for conversation extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Recognized tag names.
    pub vocabulary: ChatVocabulary,

    /// Role for a message without a `role` attribute.
    pub default_role: String,

    /// Name for a section without a `name` attribute, and for the
    /// implicit section that holds messages before any section tag.
    pub default_section: String,

    /// Format for an audio part without a `format` attribute.
    pub default_audio_format: String,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            vocabulary: ChatVocabulary::default(),
            default_role: DEFAULT_ROLE.to_string(),
            default_section: DEFAULT_SECTION.to_string(),
            default_audio_format: DEFAULT_AUDIO_FORMAT.to_string(),
        }
    }
}

impl AdapterSettings {
    /// Create default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag vocabulary.
    #[must_use]
    pub fn vocabulary(mut self, vocabulary: ChatVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Set the default role.
    #[must_use]
    pub fn default_role(mut self, role: impl Into<String>) -> Self {
        self.default_role = role.into();
        self
    }

    /// Set the default section name.
    #[must_use]
    pub fn default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    /// Set the default audio format.
    #[must_use]
    pub fn default_audio_format(mut self, format: impl Into<String>) -> Self {
        self.default_audio_format = format.into();
        self
    }
}
