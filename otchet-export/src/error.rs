//! Error types for export operations

use std::fmt;

/// Errors that can occur while assembling or exporting a report
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Section code has no corresponding template metadata
    SectionNotFound(String),
    /// Error while building the output document in memory
    RenderError(String),
    /// Filesystem error while writing the finished document
    Io(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            ExportError::SectionNotFound(code) => {
                write!(f, "Section '{code}' has no template metadata")
            }
            ExportError::RenderError(msg) => write!(f, "Render error: {msg}"),
            ExportError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}
