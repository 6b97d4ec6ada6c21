//! Structured-markup detection.
//!
//! A cheap check run before any parsing: text is treated as a conversation
//! only if it contains some `<...>` tag at all and at least one opening tag
//! from the vocabulary's root set (`<chat`, `<message`, `<section`, with or
//! without attributes).

use crate::vocabulary::ChatVocabulary;

/// Decides whether rendered text encodes a structured conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationClassifier {
    root_tags: Vec<String>,
}

impl Default for ConversationClassifier {
    fn default() -> Self {
        Self::new(&ChatVocabulary::default())
    }
}

impl ConversationClassifier {
    /// Create a classifier for a vocabulary.
    #[must_use]
    pub fn new(vocabulary: &ChatVocabulary) -> Self {
        Self {
            root_tags: vocabulary
                .root_tags()
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| t.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Check whether `text` should be parsed as chat markup.
    #[must_use]
    pub fn is_structured(&self, text: &str) -> bool {
        if !has_any_tag(text) {
            return false;
        }
        let lower = text.to_ascii_lowercase();
        self.root_tags.iter().any(|tag| has_open_tag(&lower, tag))
    }
}

/// True if some `<` is followed, after at least one other byte, by `>`.
fn has_any_tag(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(offset) = bytes[from..].iter().position(|&b| b == b'<') {
        let open = from + offset;
        match bytes[open + 1..].iter().position(|&b| b == b'>') {
            Some(0) => from = open + 1,
            Some(_) => return true,
            None => return false,
        }
    }
    false
}

/// True if `<tag` appears followed by whitespace, `>` or `/`.
fn has_open_tag(lower: &str, tag: &str) -> bool {
    let needle = format!("<{tag}");
    lower.match_indices(&needle).any(|(idx, _)| {
        match lower.as_bytes().get(idx + needle.len()) {
            Some(b) => b.is_ascii_whitespace() || *b == b'>' || *b == b'/',
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("Hello {name}", false)]
    #[case::angles_without_root_tag("a < b and c > d is math", false)]
    #[case::empty_brackets("<> message", false)]
    #[case::bare_message("<message>Hi</message>", true)]
    #[case::message_with_role(r#"<message role="x">Hi</message>"#, true)]
    #[case::chat_root("<chat><message>Hi</message></chat>", true)]
    #[case::section("<section name=\"a\"></section>", true)]
    #[case::self_closing_section("<section/>", true)]
    #[case::uppercase("<MESSAGE>Hi</MESSAGE>", true)]
    #[case::other_tags_only("<b>bold</b> <div>x</div>", false)]
    #[case::prefix_only("<messages>Hi</messages>", false)]
    #[case::closing_only("text </message>", false)]
    #[case::content_alone("<content>x</content>", false)]
    #[case::empty("", false)]
    fn test_is_structured(#[case] text: &str, #[case] expected: bool) {
        let classifier = ConversationClassifier::default();
        assert_eq!(classifier.is_structured(text), expected, "text: {text:?}");
    }

    #[test]
    fn test_no_brackets_never_structured() {
        let classifier = ConversationClassifier::default();
        for text in ["message", "chat section message", "role=user", "{message}"] {
            assert!(!classifier.is_structured(text));
        }
    }

    #[test]
    fn test_has_any_tag() {
        assert!(has_any_tag("x <y> z"));
        assert!(has_any_tag("a < b > c"));
        assert!(!has_any_tag("<>"));
        assert!(!has_any_tag("a > b < c"));
        assert!(has_any_tag("<><a>"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = ChatVocabulary::new().with_message("turn");
        let classifier = ConversationClassifier::new(&vocab);
        assert!(classifier.is_structured("<turn>Hi</turn>"));
        assert!(!classifier.is_structured("<message>Hi</message>"));
    }
}
