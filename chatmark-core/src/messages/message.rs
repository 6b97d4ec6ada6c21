//! Role-tagged conversation messages.

use serde::{Deserialize, Serialize};

use super::content::{ContentPart, MessageContent};

/// Role assigned when markup does not name one.
pub const DEFAULT_ROLE: &str = "user";

/// A single message in a conversation.
///
/// Roles are free-form strings; no validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role ("system", "user", "assistant", ...).
    pub role: String,
    /// Message content.
    pub content: MessageContent,
}

impl Message {
    /// Create a message with any role.
    #[must_use]
    pub fn new(role: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(DEFAULT_ROLE, content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new("assistant", content)
    }

    /// Get the role.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Get the content as text, if it is plain text.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }

    /// Get the content parts, if the content is multi-part.
    #[must_use]
    pub fn parts(&self) -> Option<&[ContentPart]> {
        self.content.as_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role(), "user");
        assert_eq!(msg.text(), Some("Hello"));
        assert!(msg.parts().is_none());
    }

    #[test]
    fn test_serialize_flat_message() {
        let msg = Message::system("Be brief.");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "system", "content": "Be brief."})
        );
    }

    #[test]
    fn test_serialize_parts_message() {
        let msg = Message::new("user", vec![ContentPart::image_url("u")]);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "user", "content": [{"type": "image_url", "image_url": {"url": "u"}}]})
        );
    }
}
