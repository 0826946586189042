//! Format trait definition
//!
//! This module defines the core Format trait that every export backend must
//! implement. The trait provides a uniform interface for rendering an
//! assembled document into one output format.

use crate::error::ExportError;
use crate::ir::Document;
use crate::style::GostProfile;

/// Trait for export formats
///
/// Implementors render a read-only [`Document`] into finished bytes using the
/// layout constants of the given [`GostProfile`]. Backends never write to the
/// filesystem themselves; file placement is the export service's job.
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "docx", "pdf")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extension associated with this format, without the leading dot.
    ///
    /// Used to build output file names.
    fn file_extension(&self) -> &str;

    /// Render a document into the format's byte representation.
    ///
    /// Rendering is all-or-nothing: on any backend failure no bytes are
    /// returned and the caller creates no output file.
    fn render(&self, doc: &Document, profile: &GostProfile) -> Result<Vec<u8>, ExportError>;
}
