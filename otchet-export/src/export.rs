//! The export pipeline: document in, finished files out.
//!
//! Rendering is strictly separated from file placement. Every registered
//! format renders fully in memory first; only when all of them succeed are
//! any files written, each through a temporary file in the target directory
//! followed by an atomic rename. A crash or backend failure therefore never
//! leaves a partial or stale file at a final path.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::error::ExportError;
use crate::ir::Document;
use crate::registry::FormatRegistry;
use crate::style::GostProfile;

/// One finished output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub format: String,
    pub path: PathBuf,
}

/// Render `doc` in every registered format and write the results into
/// `output_dir` as `{title}_{id}.{ext}`.
pub fn export_document(
    doc: &Document,
    profile: &GostProfile,
    doc_id: &str,
    output_dir: &Path,
    registry: &FormatRegistry,
) -> Result<Vec<ExportedFile>, ExportError> {
    let names = registry.list_formats();

    let mut rendered = Vec::with_capacity(names.len());
    for name in &names {
        let format = registry.get(name)?;
        let bytes = format.render(doc, profile)?;
        let path = output_path(output_dir, &doc.title, doc_id, format.file_extension());
        rendered.push((name.clone(), path, bytes));
    }

    fs::create_dir_all(output_dir)?;
    let mut files = Vec::with_capacity(rendered.len());
    for (format, path, bytes) in rendered {
        write_atomic(&path, &bytes, output_dir)?;
        info!("exported {format}: {}", path.display());
        files.push(ExportedFile { format, path });
    }
    Ok(files)
}

/// Final path for one output file: sanitized title, document id, extension.
pub fn output_path(output_dir: &Path, title: &str, doc_id: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}_{}.{}", sanitize_title(title), doc_id, extension))
}

/// Replace path-hostile characters with underscores. The title is otherwise
/// kept verbatim, Cyrillic included.
fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().to_string();
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed
    }
}

/// Write through a temp file in the same directory, then rename over the
/// final path. The rename is atomic because both live on one filesystem.
fn write_atomic(path: &Path, bytes: &[u8], dir: &Path) -> Result<(), ExportError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_path_hostile_titles() {
        assert_eq!(sanitize_title("Отчет о НИР"), "Отчет о НИР");
        assert_eq!(sanitize_title("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_title("  "), "document");
        assert_eq!(sanitize_title("\u{0}x"), "_x");
    }

    #[test]
    fn output_path_shape() {
        let path = output_path(Path::new("exports"), "Отчет", "42", "docx");
        assert_eq!(path, Path::new("exports").join("Отчет_42.docx"));
    }
}
