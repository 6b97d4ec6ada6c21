//! Message and content-part extraction from markup elements.
//!
//! Both builders are total: any element produces a value, with missing
//! attributes replaced by the configured defaults.

use chatmark_core::{ContentPart, Message, MessageContent};

use crate::settings::AdapterSettings;
use crate::tree::Element;

/// The kind of a `content` element, from its `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// `type="text"`, the default.
    Text,
    /// `type="image"`.
    Image,
    /// `type="audio"`.
    Audio,
}

impl ContentKind {
    /// Map a `type` attribute value. Unrecognized values become [`ContentKind::Text`].
    #[must_use]
    pub fn from_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "image" => Self::Image,
            "audio" => Self::Audio,
            _ => Self::Text,
        }
    }
}

/// Builds provider-shaped content parts from `content` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPartBuilder {
    default_audio_format: String,
}

impl Default for ContentPartBuilder {
    fn default() -> Self {
        Self::new(&AdapterSettings::default())
    }
}

impl ContentPartBuilder {
    /// Create a builder from settings.
    #[must_use]
    pub fn new(settings: &AdapterSettings) -> Self {
        Self {
            default_audio_format: settings.default_audio_format.clone(),
        }
    }

    /// Build one content part.
    #[must_use]
    pub fn build(&self, element: &Element) -> ContentPart {
        let text = element.content();
        match ContentKind::from_type(element.attribute_or("type", "text")) {
            ContentKind::Image => ContentPart::image_url(text),
            ContentKind::Audio => {
                let format = element.attribute_or("format", &self.default_audio_format);
                ContentPart::input_audio(text, format)
            }
            ContentKind::Text if element.flag("cache") => ContentPart::cached_text(text),
            ContentKind::Text => ContentPart::text(text),
        }
    }
}

/// Builds role-tagged messages from `message` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageExtractor {
    default_role: String,
    content_tag: String,
    parts: ContentPartBuilder,
}

impl Default for MessageExtractor {
    fn default() -> Self {
        Self::new(&AdapterSettings::default())
    }
}

impl MessageExtractor {
    /// Create an extractor from settings.
    #[must_use]
    pub fn new(settings: &AdapterSettings) -> Self {
        Self {
            default_role: settings.default_role.clone(),
            content_tag: settings.vocabulary.content.clone(),
            parts: ContentPartBuilder::new(settings),
        }
    }

    /// Build one message.
    ///
    /// Without child elements the content is the raw text. With child
    /// elements it is the list of parts built from the `content`
    /// children, even when that list has one entry or none.
    #[must_use]
    pub fn extract(&self, element: &Element) -> Message {
        let role = element.attribute_or("role", &self.default_role);

        let content = if element.has_children() {
            MessageContent::Parts(
                element
                    .children()
                    .filter(|child| child.is(&self.content_tag))
                    .map(|child| self.parts.build(child))
                    .collect(),
            )
        } else {
            MessageContent::Text(element.content())
        };

        Message::new(role, content)
    }
}
