//! Conversation extraction from rendered text.
//!
//! The [`ConversationAdapter`] is the entry point. It classifies the text,
//! parses it into a markup tree when it looks structured, and walks the
//! tree's top-level elements in document order:
//!
//! - `section` closes the active section and opens a new one named by its
//!   `name` attribute, then walks its own children.
//! - `message` becomes a [`Message`] in the active section. A message seen
//!   before any section opens the implicit default section.
//! - `chat` walks its children with the same rules.
//! - Anything else is skipped.
//!
//! Sections are "currently active", not nested: messages that follow a
//! closed `</section>` stay in that section until the next `section` tag.
//!
//! Text that does not look structured goes to the [`PlainTextFallback`].
//!
//! ## Example
//!
//! ```rust
//! use chatmark_markup::ConversationAdapter;
//!
//! let adapter = ConversationAdapter::default();
//! let script = adapter
//!     .extract_script(r#"<message role="system">Be brief.</message>
//! <section name="history"><message>Hi</message></section>"#)
//!     .unwrap();
//!
//! let names: Vec<_> = script.sections().iter().map(|s| s.name.as_str()).collect();
//! assert_eq!(names, vec!["messages", "history"]);
//! ```

use std::fmt;
use std::sync::Arc;

use chatmark_core::{Message, Script, Section};
use tracing::{debug, trace};

use crate::classifier::ConversationClassifier;
use crate::error::Result;
use crate::extract::MessageExtractor;
use crate::settings::AdapterSettings;
use crate::tree::{preview, Element, MarkupParser, TagSoupParser};

/// Converts unstructured text into messages.
pub trait PlainTextFallback: Send + Sync {
    /// Convert the whole text into messages.
    fn to_messages(&self, text: &str) -> Vec<Message>;
}

/// Fallback that wraps the whole text in one message with a fixed role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessageFallback {
    role: String,
}

impl UserMessageFallback {
    /// Create a fallback producing messages with `role`.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

impl Default for UserMessageFallback {
    fn default() -> Self {
        Self::new(chatmark_core::DEFAULT_ROLE)
    }
}

impl PlainTextFallback for UserMessageFallback {
    fn to_messages(&self, text: &str) -> Vec<Message> {
        vec![Message::new(self.role.clone(), text)]
    }
}

impl<F> PlainTextFallback for F
where
    F: Fn(&str) -> Vec<Message> + Send + Sync,
{
    fn to_messages(&self, text: &str) -> Vec<Message> {
        self(text)
    }
}

/// Turns rendered text into a flat message list or a sectioned script.
#[derive(Clone)]
pub struct ConversationAdapter {
    settings: AdapterSettings,
    classifier: ConversationClassifier,
    extractor: MessageExtractor,
    parser: Arc<dyn MarkupParser>,
    fallback: Arc<dyn PlainTextFallback>,
}

impl fmt::Debug for ConversationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationAdapter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for ConversationAdapter {
    fn default() -> Self {
        Self::new(AdapterSettings::default())
    }
}

impl ConversationAdapter {
    /// Create an adapter with the tag-soup parser and a user-message fallback.
    #[must_use]
    pub fn new(settings: AdapterSettings) -> Self {
        Self {
            classifier: ConversationClassifier::new(&settings.vocabulary),
            extractor: MessageExtractor::new(&settings),
            parser: Arc::new(TagSoupParser::new()),
            fallback: Arc::new(UserMessageFallback::new(settings.default_role.clone())),
            settings,
        }
    }

    /// Replace the markup parser.
    #[must_use]
    pub fn with_parser(mut self, parser: impl MarkupParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Replace the plain-text fallback.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl PlainTextFallback + 'static) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    /// Get the settings.
    #[must_use]
    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// Check whether `text` would be parsed as markup.
    #[must_use]
    pub fn is_structured(&self, text: &str) -> bool {
        self.classifier.is_structured(text)
    }

    /// Extract messages in document order, ignoring section boundaries.
    pub fn extract_messages(&self, text: &str) -> Result<Vec<Message>> {
        if !self.is_structured(text) {
            debug!(text = %preview(text), "Text is not structured, using plain-text fallback");
            return Ok(self.fallback.to_messages(text));
        }
        Ok(self.parse_script(text)?.into_messages())
    }

    /// Extract messages grouped into named sections.
    ///
    /// Unstructured text yields one default section holding the fallback messages.
    pub fn extract_script(&self, text: &str) -> Result<Script> {
        if !self.is_structured(text) {
            debug!(text = %preview(text), "Text is not structured, using plain-text fallback");
            let section = Section::with_messages(
                self.settings.default_section.clone(),
                self.fallback.to_messages(text),
            );
            return Ok(Script::from(vec![section]));
        }
        self.parse_script(text)
    }

    fn parse_script(&self, text: &str) -> Result<Script> {
        let vocabulary = &self.settings.vocabulary;
        let document = self.parser.parse(text, &vocabulary.tags())?;

        let mut walk = SectionWalk::new(&self.settings.default_section);
        self.walk(document.children(), &mut walk);

        let script = walk.finish();
        debug!(
            sections = script.len(),
            messages = script.messages().count(),
            "Extracted structured conversation"
        );
        Ok(script)
    }

    fn walk<'e>(&self, elements: impl Iterator<Item = &'e Element>, walk: &mut SectionWalk<'_>) {
        let vocabulary = &self.settings.vocabulary;
        for element in elements {
            if element.is(&vocabulary.section) {
                let name = element.attribute_or("name", &self.settings.default_section);
                debug!(section = %name, "Opening section");
                walk.open(name);
                self.walk(element.children(), walk);
            } else if element.is(&vocabulary.message) {
                walk.push(self.extractor.extract(element));
            } else if element.is(&vocabulary.chat) {
                self.walk(element.children(), walk);
            } else {
                trace!(tag = element.tag(), "Skipping element");
            }
        }
    }
}

/// Accumulates sections during a single tree walk.
struct SectionWalk<'a> {
    default_section: &'a str,
    sections: Vec<Section>,
}

impl<'a> SectionWalk<'a> {
    fn new(default_section: &'a str) -> Self {
        Self {
            default_section,
            sections: Vec::new(),
        }
    }

    fn open(&mut self, name: &str) {
        self.sections.push(Section::new(name));
    }

    fn push(&mut self, message: Message) {
        if self.sections.is_empty() {
            self.open(self.default_section);
        }
        if let Some(active) = self.sections.last_mut() {
            active.push(message);
        }
    }

    fn finish(self) -> Script {
        Script::from(self.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarkupError;
    use crate::tree::Document;
    use crate::vocabulary::ChatVocabulary;
    use chatmark_core::{ContentPart, MessageContent};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn adapter() -> ConversationAdapter {
        ConversationAdapter::default()
    }

    fn section_names(script: &Script) -> Vec<&str> {
        script.sections().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_active_section_grouping() {
        let text = r#"<message>A</message><section name="s2"><message>B</message></section><message>C</message>"#;
        let script = adapter().extract_script(text).unwrap();
        assert_eq!(
            script.sections(),
            &[
                Section::with_messages("messages", vec![Message::user("A")]),
                Section::with_messages("s2", vec![Message::user("B"), Message::user("C")]),
            ]
        );
    }

    #[test]
    fn test_flattening_matches_script() {
        let text = r#"<chat>
<message role="system">sys</message>
<section name="a"><message>1</message></section>
<section name="a"><message role="assistant">2</message></section>
<message>3</message>
</chat>"#;
        let adapter = adapter();
        let script = adapter.extract_script(text).unwrap();
        let messages = adapter.extract_messages(text).unwrap();
        assert_eq!(messages, script.messages().cloned().collect::<Vec<_>>());
        assert_eq!(section_names(&script), vec!["messages", "a", "a"]);
        let texts: Vec<_> = messages.iter().filter_map(Message::text).collect();
        assert_eq!(texts, vec!["sys", "1", "2", "3"]);
    }

    #[test]
    fn test_repeated_section_names_stay_separate() {
        let text = r#"<section name="x"><message>1</message></section><section name="x"><message>2</message></section>"#;
        let script = adapter().extract_script(text).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.sections()[0].messages, vec![Message::user("1")]);
        assert_eq!(script.sections()[1].messages, vec![Message::user("2")]);
    }

    #[test]
    fn test_section_default_name() {
        let script = adapter()
            .extract_script("<section><message>x</message></section>")
            .unwrap();
        assert_eq!(section_names(&script), vec!["messages"]);
    }

    #[test]
    fn test_empty_section_kept() {
        let script = adapter()
            .extract_script(r#"<section name="empty"></section><section name="b"><message>x</message></section>"#)
            .unwrap();
        assert_eq!(section_names(&script), vec!["empty", "b"]);
        assert!(script.sections()[0].is_empty());
    }

    #[test]
    fn test_unknown_top_level_tags_skipped() {
        let text = r#"<content>loose</content><message>kept</message><div>no</div>"#;
        let messages = adapter().extract_messages(text).unwrap();
        assert_eq!(messages, vec![Message::user("kept")]);
    }

    #[test]
    fn test_multimodal_message_payload() {
        let text = r#"<message role="user">
<content type="text" cache="true">Describe this.</content>
<content type="image">https://example.com/cat.png</content>
<content type="audio" format="wav">UklGRg==</content>
</message>"#;
        let messages = adapter().extract_messages(text).unwrap();
        assert_eq!(
            serde_json::to_value(&messages).unwrap(),
            json!([{
                "role": "user",
                "content": [
                    {"type": "text", "text": "Describe this.", "cache_control": {"type": "ephemeral"}},
                    {"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}},
                    {"type": "input_audio", "input_audio": {"data": "UklGRg==", "format": "wav"}}
                ]
            }])
        );
    }

    #[test]
    fn test_raw_text_preserved() {
        let messages = adapter()
            .extract_messages("<message>\n  Hello <b>there</b>\n</message>")
            .unwrap();
        assert_eq!(
            messages[0].content,
            MessageContent::Text("\n  Hello <b>there</b>\n".to_string())
        );
    }

    #[test]
    fn test_comparison_text_keeps_following_messages() {
        let text = concat!(
            "<message>1 < 2</message>",
            "<message>a<b</message>",
            "<message>x <3</message>",
            r#"<message role="assistant">a <= b &amp; c & d</message>"#,
            "<message>last</message>",
        );
        let messages = adapter().extract_messages(text).unwrap();
        assert_eq!(
            messages,
            vec![
                Message::user("1 < 2"),
                Message::user("a<b"),
                Message::user("x <3"),
                Message::assistant("a <= b & c & d"),
                Message::user("last"),
            ]
        );
    }

    #[test]
    fn test_content_part_with_angle_bracket() {
        let text = r#"<message><content type="text">if a<b && b>c</content><content type="image">u</content></message>"#;
        let messages = adapter().extract_messages(text).unwrap();
        assert_eq!(
            messages[0].content,
            MessageContent::Parts(vec![
                ContentPart::text("if a<b && b>c"),
                ContentPart::image_url("u"),
            ])
        );
    }

    #[test]
    fn test_plain_text_uses_fallback() {
        let adapter = adapter();
        let messages = adapter.extract_messages("Hello {name}").unwrap();
        assert_eq!(messages, vec![Message::user("Hello {name}")]);

        let script = adapter.extract_script("Hello {name}").unwrap();
        assert_eq!(
            script.sections(),
            &[Section::with_messages("messages", vec![Message::user("Hello {name}")])]
        );
    }

    #[test]
    fn test_fallback_never_reaches_parser() {
        struct FailingParser;
        impl MarkupParser for FailingParser {
            fn parse(&self, _text: &str, _tags: &[&str]) -> Result<Document> {
                Err(MarkupError::Attribute(
                    quick_xml::events::attributes::AttrError::ExpectedEq(0),
                ))
            }
        }

        let adapter = adapter().with_parser(FailingParser);
        assert!(adapter.extract_messages("Hello {name}").is_ok());
        assert!(adapter.extract_messages("<message>x</message>").is_err());
    }

    #[test]
    fn test_custom_fallback() {
        let adapter = adapter().with_fallback(|text: &str| vec![Message::system(text)]);
        let messages = adapter.extract_messages("just text").unwrap();
        assert_eq!(messages, vec![Message::system("just text")]);
    }

    #[test]
    fn test_parse_error_propagates() {
        let result = adapter().extract_messages(r#"<message role="a" role="b">x</message>"#);
        assert!(matches!(result, Err(MarkupError::Attribute(_))));
    }

    #[test]
    fn test_structured_without_messages() {
        let messages = adapter().extract_messages("<chat></chat>").unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_custom_settings() {
        let settings = AdapterSettings::new()
            .vocabulary(ChatVocabulary::new().with_message("turn").with_content("part"))
            .default_role("assistant")
            .default_section("main");
        let adapter = ConversationAdapter::new(settings);
        let script = adapter
            .extract_script("<turn><part>x</part></turn>")
            .unwrap();
        assert_eq!(section_names(&script), vec!["main"]);
        let msg = &script.sections()[0].messages[0];
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.parts(), Some(&[ContentPart::text("x")][..]));

        let fallback = adapter.extract_messages("plain").unwrap();
        assert_eq!(fallback[0].role, "assistant");
    }

    #[test]
    fn test_deterministic() {
        let text = r#"<message role="system">a</message><section name="b"><message>c</message></section>"#;
        let adapter = adapter();
        assert_eq!(
            adapter.extract_script(text).unwrap(),
            adapter.extract_script(text).unwrap()
        );
    }
}
