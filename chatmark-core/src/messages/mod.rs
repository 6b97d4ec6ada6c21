//! Message types for chat conversations.
//!
//! - **Messages**: [`Message`] with a role and [`MessageContent`]
//! - **Content parts**: [`ContentPart`] (text, image URL, input audio)
//! - **Caching**: [`CacheControl`] directives on text parts
//! - **Scripts**: [`Section`] and [`Script`] for named message groups
//!
//! ## Example
//!
//! ```rust
//! use chatmark_core::messages::{ContentPart, Message, Script};
//!
//! let mut script = Script::new();
//! script
//!     .open_section("messages")
//!     .push(Message::user(vec![ContentPart::cached_text("Hello!")]));
//!
//! assert_eq!(script.messages().count(), 1);
//! ```

pub mod cache;
pub mod content;
pub mod message;
pub mod script;

// Re-exports for convenience
pub use cache::{CacheControl, CacheType};
pub use content::{ContentPart, ImageUrl, InputAudio, MessageContent, DEFAULT_AUDIO_FORMAT};
pub use message::{Message, DEFAULT_ROLE};
pub use script::{Script, Section, DEFAULT_SECTION};
