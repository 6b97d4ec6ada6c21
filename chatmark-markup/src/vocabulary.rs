//! The tag vocabulary recognized in chat markup.

use serde::{Deserialize, Serialize};

/// Tag names that carry conversation structure.
///
/// Passed to the classifier (which looks for the root tags) and to the
/// tree parser (which builds elements only for these names). Names are
/// matched ASCII case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatVocabulary {
    /// Optional wrapper around a whole conversation.
    pub chat: String,
    /// A single role-tagged message.
    pub message: String,
    /// A typed content part inside a message.
    pub content: String,
    /// Starts a new named section.
    pub section: String,
}

impl Default for ChatVocabulary {
    fn default() -> Self {
        Self {
            chat: "chat".to_string(),
            message: "message".to_string(),
            content: "content".to_string(),
            section: "section".to_string(),
        }
    }
}

impl ChatVocabulary {
    /// Create the default vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chat wrapper tag.
    #[must_use]
    pub fn with_chat(mut self, tag: impl Into<String>) -> Self {
        self.chat = tag.into();
        self
    }

    /// Set the message tag.
    #[must_use]
    pub fn with_message(mut self, tag: impl Into<String>) -> Self {
        self.message = tag.into();
        self
    }

    /// Set the content tag.
    #[must_use]
    pub fn with_content(mut self, tag: impl Into<String>) -> Self {
        self.content = tag.into();
        self
    }

    /// Set the section tag.
    #[must_use]
    pub fn with_section(mut self, tag: impl Into<String>) -> Self {
        self.section = tag.into();
        self
    }

    /// Every tag the tree parser should turn into an element.
    #[must_use]
    pub fn tags(&self) -> [&str; 4] {
        [
            self.chat.as_str(),
            self.message.as_str(),
            self.content.as_str(),
            self.section.as_str(),
        ]
    }

    /// Tags whose presence marks text as a conversation.
    #[must_use]
    pub fn root_tags(&self) -> [&str; 3] {
        [self.chat.as_str(), self.message.as_str(), self.section.as_str()]
    }

    /// Check whether a tag name belongs to the vocabulary.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
