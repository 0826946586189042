//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available export
//! formats. Formats can be registered and retrieved by name.

use crate::error::ExportError;
use crate::format::Format;
use crate::ir::Document;
use crate::style::GostProfile;
use std::collections::HashMap;

/// Registry of export formats
///
/// Provides a centralized registry for all available formats.
/// Formats can be registered and retrieved by name.
///
/// # Examples
///
/// ```ignore
/// let mut registry = FormatRegistry::new();
/// registry.register(MyFormat);
///
/// let format = registry.get("my-format")?;
/// let bytes = format.render(&doc, &profile)?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, ExportError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| ExportError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Render a document using the specified format
    pub fn render(
        &self,
        doc: &Document,
        profile: &GostProfile,
        format: &str,
    ) -> Result<Vec<u8>, ExportError> {
        self.get(format)?.render(doc, profile)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::docx::DocxFormat::default());
        registry.register(crate::formats::pdf::PdfFormat::default());

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
