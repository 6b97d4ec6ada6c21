//! Error types for the prompt pipeline.

use chatmark_markup::MarkupError;
use thiserror::Error;

/// Errors from selecting, loading or rendering a prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Malformed selector, unknown renderer or missing template.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The renderer failed.
    #[error("Render error in '{renderer}': {message}")]
    Render {
        /// Renderer name.
        renderer: String,
        /// What went wrong.
        message: String,
    },

    /// A placeholder pattern did not compile.
    #[error("Invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The rendered markup could not be parsed.
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

impl PromptError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a render error.
    pub fn render(renderer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            renderer: renderer.into(),
            message: message.into(),
        }
    }

    /// Check whether this error came from caller input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias using [`PromptError`].
pub type Result<T> = std::result::Result<T, PromptError>;
