//! # chatmark-markup
//!
//! Turns rendered prompt text into chat conversations.
//!
//! A rendered template may be plain text, or it may use a small tag
//! vocabulary to describe a multi-turn conversation:
//!
//! ```text
//! <chat>
//!   <message role="system">You are a helpful assistant.</message>
//!   <section name="history">
//!     <message role="user">
//!       <content type="text" cache="true">Describe this picture.</content>
//!       <content type="image">https://example.com/cat.png</content>
//!     </message>
//!   </section>
//! </chat>
//! ```
//!
//! ## Core Concepts
//!
//! - **[`ConversationClassifier`]**: cheap check for whether text is chat markup
//! - **[`MarkupParser`]**: builds a lenient [`Document`] tree ([`TagSoupParser`] by default)
//! - **[`MessageExtractor`]** / **[`ContentPartBuilder`]**: element to message / content part
//! - **[`ConversationAdapter`]**: the entry point, producing messages or a sectioned script
//! - **[`PlainTextFallback`]**: handles text that is not structured
//!
//! ## Example
//!
//! ```rust
//! use chatmark_markup::ConversationAdapter;
//!
//! let adapter = ConversationAdapter::default();
//!
//! let messages = adapter
//!     .extract_messages(r#"<message role="system">Be brief.</message><message>Hi!</message>"#)
//!     .unwrap();
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[1].role, "user");
//!
//! // Plain text becomes a single user message.
//! let messages = adapter.extract_messages("Hello there").unwrap();
//! assert_eq!(messages[0].text(), Some("Hello there"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod classifier;
pub mod error;
pub mod extract;
pub mod settings;
pub mod tree;
pub mod vocabulary;

// Re-exports
pub use adapter::{ConversationAdapter, PlainTextFallback, UserMessageFallback};
pub use classifier::ConversationClassifier;
pub use error::{MarkupError, Result};
pub use extract::{ContentKind, ContentPartBuilder, MessageExtractor};
pub use settings::AdapterSettings;
pub use tree::{Document, Element, MarkupParser, Node, TagSoupParser};
pub use vocabulary::ChatVocabulary;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AdapterSettings, ChatVocabulary, ConversationAdapter, ConversationClassifier,
        MarkupError, PlainTextFallback,
    };
}
