//! Sectioned conversation scripts.
//!
//! A [`Script`] is an ordered list of named [`Section`]s. Section names are
//! not unique keys: two sections may share a name and stay separate.

use serde::{Deserialize, Serialize};

use super::message::Message;

/// Name of the implicit section used when markup declares none.
pub const DEFAULT_SECTION: &str = "messages";

/// A named group of consecutive messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section name.
    pub name: String,
    /// Messages in document order.
    pub messages: Vec<Message>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    /// Create a section with messages.
    #[must_use]
    pub fn with_messages(name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            name: name.into(),
            messages,
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the section holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// An ordered collection of sections.
///
/// Serializes as a JSON array of `{name, messages}` objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    sections: Vec<Section>,
}

impl Script {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new section, even if one with the same name exists.
    pub fn open_section(&mut self, name: impl Into<String>) -> &mut Section {
        self.sections.push(Section::new(name));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Add a complete section.
    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Get the sections in order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Find the first section with the given name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Iterate over every message across sections, in order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.sections.iter().flat_map(|s| s.messages.iter())
    }

    /// Flatten into the message list, dropping section boundaries.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.sections
            .into_iter()
            .flat_map(|s| s.messages)
            .collect()
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the script has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl From<Vec<Section>> for Script {
    fn from(sections: Vec<Section>) -> Self {
        Self { sections }
    }
}

impl IntoIterator for Script {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}
