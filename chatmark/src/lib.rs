//! # chatmark
//!
//! Render prompt templates and turn the result into chat conversation
//! payloads for LLM APIs.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatmark::prelude::*;
//! use serde_json::json;
//!
//! let registry = RendererRegistry::with_defaults();
//! let (_dsn, renderer) = registry.resolve_str("placeholder:support/greeting").unwrap();
//!
//! let template = PromptTemplate::new(
//!     r#"<message role="system">You help {name}.</message><message>{question}</message>"#,
//! )
//! .with_declared(["name", "question"]);
//!
//! let mut values = Values::new();
//! values.insert("name".into(), json!("Ada"));
//! values.insert("question".into(), json!("What is a monad?"));
//!
//! assert!(template.validate(renderer.as_ref(), &values).unwrap().is_empty());
//!
//! let rendered = template.render(renderer.as_ref(), &values).unwrap();
//! let messages = rendered.messages(&ConversationAdapter::default()).unwrap();
//! assert_eq!(messages[0].role, "system");
//! assert_eq!(messages[1].text(), Some("What is a monad?"));
//! ```
//!
//! ## Architecture
//!
//! The workspace is split into focused crates:
//!
//! - [`chatmark_core`]: messages, content parts, scripts and variable reconciliation
//! - [`chatmark_markup`]: chat markup classification, parsing and extraction
//! - `chatmark` (this crate): renderers, selectors and the prompt pipeline

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod dsn;
pub mod error;
pub mod prompt;
pub mod render;

pub use chatmark_core;
pub use chatmark_markup;

// Re-exports
pub use chatmark_core::{
    reconcile, CacheControl, CacheType, ContentPart, ImageUrl, InputAudio, Message,
    MessageContent, Script, Section, VariableIssue, VariableReport,
};
pub use chatmark_markup::{
    AdapterSettings, ChatVocabulary, ConversationAdapter, MarkupError, MarkupParser,
    PlainTextFallback, TagSoupParser, UserMessageFallback,
};
pub use dsn::{BoxedRenderer, Dsn, RendererRegistry};
pub use error::{PromptError, Result};
pub use prompt::{PromptTemplate, RenderedPrompt};
pub use render::{PlaceholderRenderer, Renderer, Values};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AdapterSettings, ChatVocabulary, ContentPart, ConversationAdapter, Dsn, Message,
        MessageContent, PlaceholderRenderer, PromptError, PromptTemplate, RenderedPrompt,
        Renderer, RendererRegistry, Result, Script, Section, Values, VariableReport,
    };
}
