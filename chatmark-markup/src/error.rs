//! Error types for markup parsing.
//!
//! Extraction itself never fails: unknown tags are skipped and missing
//! attributes fall back to defaults. Only the tree parser reports errors,
//! and those reach the caller unchanged.

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Error raised while building the markup tree.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The markup could not be tokenized.
    #[error("Malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute list could not be parsed.
    #[error("Malformed attribute: {0}")]
    Attribute(#[from] AttrError),
}

/// Result type alias using [`MarkupError`].
pub type Result<T> = std::result::Result<T, MarkupError>;
