//! Prompt templates and their rendered output.
//!
//! A [`PromptTemplate`] is rendered exactly once into a [`RenderedPrompt`].
//! The rendered prompt owns its text; turning it into messages or a script
//! runs the adapter on that text and nothing is cached behind the caller's
//! back.

use chatmark_core::{reconcile, Message, Script, VariableReport};
use chatmark_markup::ConversationAdapter;
use indexmap::IndexSet;
use tracing::debug;

use crate::error::Result;
use crate::render::{Renderer, Values};

/// A template body plus the variables it declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplate {
    body: String,
    declared: IndexSet<String>,
}

impl PromptTemplate {
    /// Create a template with no declared variables.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            declared: IndexSet::new(),
        }
    }

    /// Declare one variable.
    #[must_use]
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.declared.insert(name.into());
        self
    }

    /// Declare several variables.
    #[must_use]
    pub fn with_declared<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared.extend(names.into_iter().map(Into::into));
        self
    }

    /// Template body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Declared variable names.
    #[must_use]
    pub fn declared(&self) -> &IndexSet<String> {
        &self.declared
    }

    /// Render the body with `values`.
    pub fn render(&self, renderer: &dyn Renderer, values: &Values) -> Result<RenderedPrompt> {
        let text = renderer.render(&self.body, values)?;
        debug!(
            renderer = %renderer.name(),
            len = text.len(),
            "Rendered prompt"
        );
        Ok(RenderedPrompt::new(text))
    }

    /// Compare declared, referenced and supplied variables.
    ///
    /// An empty report means the three sets agree.
    pub fn validate(&self, renderer: &dyn Renderer, values: &Values) -> Result<VariableReport> {
        let used = renderer.referenced_variables(&self.body)?;
        let supplied: IndexSet<String> = values.keys().cloned().collect();
        let report = reconcile(&self.declared, &used, &supplied);
        debug!(issues = report.len(), "Validated prompt variables");
        Ok(report)
    }
}

/// Text produced by rendering a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    text: String,
}

impl RenderedPrompt {
    /// Wrap already rendered text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The rendered text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take the rendered text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether the text uses the adapter's chat markup.
    #[must_use]
    pub fn is_structured(&self, adapter: &ConversationAdapter) -> bool {
        adapter.is_structured(&self.text)
    }

    /// Convert to a flat message list.
    pub fn messages(&self, adapter: &ConversationAdapter) -> Result<Vec<Message>> {
        Ok(adapter.extract_messages(&self.text)?)
    }

    /// Convert to messages grouped by section.
    pub fn script(&self, adapter: &ConversationAdapter) -> Result<Script> {
        Ok(adapter.extract_script(&self.text)?)
    }
}

impl AsRef<str> for RenderedPrompt {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PlaceholderRenderer;
    use chatmark_core::{ContentPart, MessageContent};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn values(pairs: &[(&str, serde_json::Value)]) -> Values {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_plain_text_goes_through_fallback() {
        let adapter = ConversationAdapter::default();
        let template = PromptTemplate::new("Hello {name}").declare("name");

        let rendered = template
            .render(&PlaceholderRenderer::new(), &values(&[("name", json!("Ada"))]))
            .unwrap();
        assert!(!rendered.is_structured(&adapter));

        let messages = rendered.messages(&adapter).unwrap();
        assert_eq!(messages, vec![Message::user("Hello Ada")]);
    }

    #[test]
    fn test_unrendered_placeholder_is_plain_text() {
        let adapter = ConversationAdapter::default();
        let rendered = RenderedPrompt::new("Hello {name}");

        let messages = rendered.messages(&adapter).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].text(), Some("Hello {name}"));
    }

    #[test]
    fn test_structured_render() {
        let adapter = ConversationAdapter::default();
        let template = PromptTemplate::new(concat!(
            r#"<message role="system">You help {name}.</message>"#,
            r#"<message><content type="text" cache>{question}</content>"#,
            r#"<content type="image">{image}</content></message>"#,
        ));
        let rendered = template
            .render(
                &PlaceholderRenderer::new(),
                &values(&[
                    ("name", json!("Ada")),
                    ("question", json!("What is this?")),
                    ("image", json!("https://example.com/a.png")),
                ]),
            )
            .unwrap();
        assert!(rendered.is_structured(&adapter));

        let messages = rendered.messages(&adapter).unwrap();
        assert_eq!(messages[0], Message::system("You help Ada."));
        assert_eq!(
            messages[1].content,
            MessageContent::Parts(vec![
                ContentPart::cached_text("What is this?"),
                ContentPart::image_url("https://example.com/a.png"),
            ])
        );
    }

    #[test]
    fn test_script_uses_same_text() {
        let adapter = ConversationAdapter::default();
        let rendered = RenderedPrompt::new(concat!(
            r#"<section name="intro"><message role="system">S</message></section>"#,
            r#"<section name="turns"><message>Q</message></section>"#,
        ));

        let script = rendered.script(&adapter).unwrap();
        let names: Vec<&str> = script.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["intro", "turns"]);
        assert_eq!(
            script.into_messages(),
            rendered.messages(&adapter).unwrap()
        );
    }

    #[test]
    fn test_validate_clean() {
        let template = PromptTemplate::new("Hi {name}, {user.age}").with_declared(["name", "user"]);
        let report = template
            .validate(
                &PlaceholderRenderer::new(),
                &values(&[("name", json!("x")), ("user", json!({"age": 1}))]),
            )
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_validate_reports_mismatches() {
        let template = PromptTemplate::new("{a} {b}").with_declared(["a", "c"]);
        let report = template
            .validate(
                &PlaceholderRenderer::new(),
                &values(&[("a", json!(1)), ("d", json!(2))]),
            )
            .unwrap();
        assert_eq!(
            report.messages(),
            vec![
                "c: declared but not supplied",
                "c: declared but not used",
                "d: supplied but not declared",
                "d: supplied but not used",
                "b: used but not declared",
                "b: used but not supplied",
            ]
        );
    }

    #[test]
    fn test_into_text_and_display() {
        let rendered = RenderedPrompt::new("done");
        assert_eq!(rendered.to_string(), "done");
        assert_eq!(rendered.as_ref(), "done");
        assert_eq!(rendered.into_text(), "done");
    }
}
