//! Renderer selection by `library:path` selectors.
//!
//! A DSN names the rendering library and the template path, e.g.
//! `placeholder:greetings/welcome`. Selectors are validated and resolved
//! before anything is loaded or rendered.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{PromptError, Result};
use crate::render::{PlaceholderRenderer, Renderer};

/// A boxed renderer that can be shared.
pub type BoxedRenderer = Arc<dyn Renderer>;

/// A parsed `library:path` selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dsn {
    library: String,
    path: String,
}

impl Dsn {
    /// Parse a selector.
    ///
    /// The string splits on the first `:`. The library must be non-empty and
    /// made of ASCII letters, digits, `_` or `-`. The path must be non-empty.
    pub fn parse(selector: &str) -> Result<Self> {
        let (library, path) = selector.split_once(':').ok_or_else(|| {
            PromptError::invalid_input(format!(
                "selector '{selector}' must have the form 'library:path'"
            ))
        })?;

        let library = library.trim();
        if library.is_empty() {
            return Err(PromptError::invalid_input(format!(
                "selector '{selector}' has an empty library name"
            )));
        }
        if !library
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(PromptError::invalid_input(format!(
                "selector '{selector}' has an invalid library name '{library}'"
            )));
        }
        if path.trim().is_empty() {
            return Err(PromptError::invalid_input(format!(
                "selector '{selector}' has an empty path"
            )));
        }

        Ok(Self {
            library: library.to_string(),
            path: path.to_string(),
        })
    }

    /// The rendering library name.
    #[must_use]
    pub fn library(&self) -> &str {
        &self.library
    }

    /// The template path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FromStr for Dsn {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.library, self.path)
    }
}

/// Registry for looking up renderers by library name.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: RwLock<HashMap<String, BoxedRenderer>>,
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("libraries", &self.libraries())
            .finish()
    }
}

impl RendererRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            renderers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with the built-in placeholder renderer.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(PlaceholderRenderer::new()));
        registry
    }

    /// Register a renderer under its library name and every alias.
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register(&self, renderer: BoxedRenderer) {
        let names: Vec<String> = std::iter::once(renderer.name())
            .chain(renderer.aliases().iter().copied())
            .map(str::to_string)
            .collect();
        debug!(names = ?names, "Registered renderer");

        let mut renderers = self.renderers.write();
        for name in names {
            renderers.insert(name, Arc::clone(&renderer));
        }
    }

    /// Library names a selector may use, sorted.
    pub fn libraries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.renderers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the renderer a DSN selects.
    pub fn resolve(&self, dsn: &Dsn) -> Result<BoxedRenderer> {
        let found = self.renderers.read().get(dsn.library()).cloned();
        let renderer = found.ok_or_else(|| {
            PromptError::invalid_input(format!(
                "unknown rendering library '{}' in selector '{dsn}', expected one of: {}",
                dsn.library(),
                self.libraries().join(", ")
            ))
        })?;
        debug!(library = %dsn.library(), path = %dsn.path(), "Resolved renderer");
        Ok(renderer)
    }

    /// Parse a selector and resolve its renderer.
    pub fn resolve_str(&self, selector: &str) -> Result<(Dsn, BoxedRenderer)> {
        let dsn = Dsn::parse(selector)?;
        let renderer = self.resolve(&dsn)?;
        Ok((dsn, renderer))
    }
}
