//! Backend-independent document walking.
//!
//! Both format backends share one traversal of the document: section order,
//! the skip rule for empty sections and the injected heading for title-like
//! sections are decided here exactly once. A backend only implements
//! [`RenderBackend`] and receives blocks in final render order.

use crate::error::ExportError;
use crate::ir::{Block, Document, ListItem, Run, Section};

/// Sink for the block stream of one document render.
///
/// Calls arrive in order: `begin_document`, then per block one of the `emit_*`
/// methods, then `end_document`. Errors abort the walk immediately.
pub trait RenderBackend {
    fn begin_document(&mut self, doc: &Document) -> Result<(), ExportError>;
    fn emit_heading(&mut self, level: u8, runs: &[Run]) -> Result<(), ExportError>;
    fn emit_paragraph(&mut self, runs: &[Run]) -> Result<(), ExportError>;
    fn emit_list(&mut self, items: &[ListItem]) -> Result<(), ExportError>;
    fn end_document(&mut self) -> Result<(), ExportError>;
}

/// Walk a document and feed its blocks to `backend`.
///
/// Sections with no blocks are skipped entirely: no heading, no spacing, no
/// trace in the output. Title-like sections contribute an extra level-1
/// heading carrying the section name before their own blocks.
pub fn render_document<B: RenderBackend + ?Sized>(
    doc: &Document,
    backend: &mut B,
) -> Result<(), ExportError> {
    backend.begin_document(doc)?;
    for section in &doc.sections {
        render_section(section, backend)?;
    }
    backend.end_document()
}

fn render_section<B: RenderBackend + ?Sized>(
    section: &Section,
    backend: &mut B,
) -> Result<(), ExportError> {
    if section.blocks.is_empty() {
        log::debug!("skipping empty section '{}'", section.code);
        return Ok(());
    }
    if section.is_title_like() {
        backend.emit_heading(1, &[Run::plain(section.name.clone())])?;
    }
    for block in &section.blocks {
        match block {
            Block::Heading { level, runs } => backend.emit_heading(*level, runs)?,
            Block::Paragraph { runs } => backend.emit_paragraph(runs)?,
            Block::OrderedList { items } => backend.emit_list(items)?,
        }
    }
    Ok(())
}
