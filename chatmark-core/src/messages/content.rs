//! Message content and multi-modal content parts.
//!
//! The wire shapes here follow the chat-completions format consumed by
//! OpenAI-compatible APIs: plain string content, or a list of typed parts
//! (`text`, `image_url`, `input_audio`).

use serde::{Deserialize, Serialize};

use super::cache::CacheControl;

/// Default audio format when none is given.
pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";

/// Message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Multi-part content.
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Create text content.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create multi-part content.
    #[must_use]
    pub fn parts(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }

    /// Check if this is text content.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Get as text if this is text content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Parts(_) => None,
        }
    }

    /// Get the parts if this is multi-part content.
    #[must_use]
    pub fn as_parts(&self) -> Option<&[ContentPart]> {
        match self {
            Self::Text(_) => None,
            Self::Parts(parts) => Some(parts),
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// Individual content part in a multi-part message.
///
/// `cache_control` on a text part is omitted from the serialized record
/// entirely when there is no directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text.
        text: String,
        /// Optional cache directive.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
    /// Image referenced by URL (or data URL).
    #[serde(rename = "image_url")]
    ImageUrl {
        /// Image URL details.
        image_url: ImageUrl,
    },
    /// Inline audio payload.
    #[serde(rename = "input_audio")]
    InputAudio {
        /// Audio data.
        input_audio: InputAudio,
    },
}

impl ContentPart {
    /// Create a text part without a cache directive.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            cache_control: None,
        }
    }

    /// Create a text part marked as an ephemeral cache point.
    #[must_use]
    pub fn cached_text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            cache_control: Some(CacheControl::ephemeral()),
        }
    }

    /// Create an image URL part.
    #[must_use]
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    /// Create an audio part.
    #[must_use]
    pub fn input_audio(data: impl Into<String>, format: impl Into<String>) -> Self {
        Self::InputAudio {
            input_audio: InputAudio {
                data: data.into(),
                format: format.into(),
            },
        }
    }

    /// The `type` tag this part serializes with.
    #[must_use]
    pub fn part_kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ImageUrl { .. } => "image_url",
            Self::InputAudio { .. } => "input_audio",
        }
    }

    /// Get the text if this is a text part.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Get the cache directive, if any.
    #[must_use]
    pub fn cache_control(&self) -> Option<&CacheControl> {
        match self {
            Self::Text { cache_control, .. } => cache_control.as_ref(),
            _ => None,
        }
    }
}

/// Image URL payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// The image URL.
    pub url: String,
}

/// Audio payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAudio {
    /// Base64-encoded audio data.
    pub data: String,
    /// Audio format (mp3, wav).
    pub format: String,
}

impl InputAudio {
    /// Create an audio payload in the default format.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            format: DEFAULT_AUDIO_FORMAT.to_string(),
        }
    }
}
