//! Template rendering.
//!
//! Rendering engines sit behind the [`Renderer`] trait. Besides producing
//! text, a renderer reports which variables a template references, which
//! feeds variable validation.
//!
//! [`PlaceholderRenderer`] is the built-in engine. It replaces `{name}`
//! placeholders with values and leaves everything else alone, so chat
//! markup passes through untouched.
//!
//! # Example
//!
//! ```rust
//! use chatmark::render::{PlaceholderRenderer, Renderer, Values};
//! use serde_json::json;
//!
//! let renderer = PlaceholderRenderer::new();
//! let mut values = Values::new();
//! values.insert("name".into(), json!("Ada"));
//! values.insert("user".into(), json!({"age": 36}));
//!
//! let text = renderer.render("Hello {name}, age { user.age }.", &values).unwrap();
//! assert_eq!(text, "Hello Ada, age 36.");
//! ```

use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{PromptError, Result};

/// Values supplied by the caller, keyed by variable name.
pub type Values = IndexMap<String, JsonValue>;

/// A string template engine.
pub trait Renderer: Send + Sync {
    /// Library name used in DSN selectors.
    fn name(&self) -> &str;

    /// Alternative names this renderer answers to.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Render a template with values.
    fn render(&self, template: &str, values: &Values) -> Result<String>;

    /// Top-level variable names referenced by a template, in order of first use.
    fn referenced_variables(&self, template: &str) -> Result<IndexSet<String>>;
}

/// Substitutes `{name}` placeholders.
///
/// - Whitespace inside the delimiters is allowed: `{ name }`.
/// - Dotted names walk into objects and arrays: `{user.name}`, `{items.0}`.
/// - Strings render raw, `null` renders empty, other values render as JSON.
/// - Unknown placeholders are left as-is unless [`strict`](Self::strict) is set.
#[derive(Debug, Clone)]
pub struct PlaceholderRenderer {
    name: String,
    open: String,
    close: String,
    strict: bool,
    pattern: OnceLock<std::result::Result<Regex, regex::Error>>,
}

impl Default for PlaceholderRenderer {
    fn default() -> Self {
        Self {
            name: Self::NAME.to_string(),
            open: "{".to_string(),
            close: "}".to_string(),
            strict: false,
            pattern: OnceLock::new(),
        }
    }
}

impl PlaceholderRenderer {
    /// Default library name.
    pub const NAME: &'static str = "placeholder";

    /// Create a renderer with `{` / `}` delimiters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use different delimiters, e.g. `{{` and `}}`.
    #[must_use]
    pub fn with_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open = open.into();
        self.close = close.into();
        self.pattern = OnceLock::new();
        self
    }

    /// Register under a different library name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Fail on placeholders with no value.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// The placeholder pattern, compiled on first use and kept for the
    /// lifetime of this renderer.
    fn pattern(&self) -> Result<&Regex> {
        let compiled = self.pattern.get_or_init(|| {
            Regex::new(&format!(
                r"{}\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)\s*{}",
                regex::escape(&self.open),
                regex::escape(&self.close),
            ))
        });
        compiled.as_ref().map_err(|e| PromptError::Pattern(e.clone()))
    }
}

impl Renderer for PlaceholderRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[&str] {
        if self.name == Self::NAME {
            &["pipe"]
        } else {
            &[]
        }
    }

    fn render(&self, template: &str, values: &Values) -> Result<String> {
        let pattern = self.pattern()?;

        let mut missing: Vec<String> = Vec::new();
        let rendered = pattern.replace_all(template, |caps: &Captures<'_>| {
            match lookup(values, &caps[1]) {
                Some(value) => display_value(value),
                None => {
                    missing.push(caps[1].to_string());
                    caps[0].to_string()
                }
            }
        });

        if self.strict && !missing.is_empty() {
            return Err(PromptError::render(
                &self.name,
                format!("no value for {}", missing.join(", ")),
            ));
        }

        debug!(
            renderer = %self.name,
            unresolved = missing.len(),
            "Rendered template"
        );
        Ok(rendered.into_owned())
    }

    fn referenced_variables(&self, template: &str) -> Result<IndexSet<String>> {
        let pattern = self.pattern()?;
        Ok(pattern
            .captures_iter(template)
            .filter_map(|caps| caps[1].split('.').next().map(str::to_string))
            .collect())
    }
}

/// Resolve a possibly dotted name against the values.
fn lookup<'v>(values: &'v Values, name: &str) -> Option<&'v JsonValue> {
    if let Some(value) = values.get(name) {
        return Some(value);
    }

    let mut segments = name.split('.');
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
