//! # chatmark-core
//!
//! Core types for the chatmark framework.
//!
//! This crate provides the foundational types used throughout chatmark:
//!
//! - **Messages**: Role-tagged messages with plain or multi-part content
//! - **Content parts**: Text (with optional cache directive), image URL and input audio
//! - **Scripts**: Named sections of messages
//! - **Variables**: Reconciliation of declared, used and supplied template variables
//!
//! All types serialize to the exact shapes expected by chat-completion APIs.
//!
//! ## Example
//!
//! ```rust
//! use chatmark_core::{ContentPart, Message};
//!
//! let msg = Message::user(vec![
//!     ContentPart::cached_text("Describe this image."),
//!     ContentPart::image_url("https://example.com/cat.png"),
//! ]);
//!
//! let json = serde_json::to_value(&msg).unwrap();
//! assert_eq!(json["content"][0]["cache_control"]["type"], "ephemeral");
//! assert!(json["content"][1].get("cache_control").is_none());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod messages;
pub mod variables;

// Re-exports for convenience
pub use messages::{
    CacheControl, CacheType, ContentPart, ImageUrl, InputAudio, Message, MessageContent, Script,
    Section, DEFAULT_AUDIO_FORMAT, DEFAULT_ROLE, DEFAULT_SECTION,
};
pub use variables::{reconcile, VariableIssue, VariableReport};

/// Prelude module for common imports.
///
/// ```rust
/// use chatmark_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::messages::{
        CacheControl, ContentPart, Message, MessageContent, Script, Section,
    };
    pub use crate::variables::{reconcile, VariableIssue, VariableReport};
}
