//! PDF export backend.
//!
//! Fully self-contained rendering: resolves a serif TTF family, plans the
//! page layout with [`layout`] and writes the result with `printpdf`. The
//! output has no TOC, outline or page numbers; it is the print-preview twin
//! of the DOCX output, not a re-rendering of it.

pub mod fonts;
pub mod layout;

use std::io::{BufWriter, Cursor};
use std::path::PathBuf;

use printpdf::{IndirectFontRef, Mm, PdfDocument};

use crate::error::ExportError;
use crate::format::Format;
use crate::ir::Document;
use crate::style::{pt_to_mm, GostProfile};

use fonts::{FaceMetrics, FontSet};
use layout::{plan_document, RunStyle};

/// The PDF export format.
///
/// `font_dirs` is searched after the `OTCHET_FONT_DIR` environment variable
/// and before the well-known system font locations.
#[derive(Debug, Default)]
pub struct PdfFormat {
    font_dirs: Vec<PathBuf>,
}

impl PdfFormat {
    pub fn with_font_dirs(font_dirs: Vec<PathBuf>) -> Self {
        PdfFormat { font_dirs }
    }
}

impl Format for PdfFormat {
    fn name(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &str {
        "Print-ready PDF with embedded fonts"
    }

    fn file_extension(&self) -> &str {
        "pdf"
    }

    fn render(&self, doc: &Document, profile: &GostProfile) -> Result<Vec<u8>, ExportError> {
        let set = FontSet::discover(&self.font_dirs)?;
        let metrics = FaceMetrics::new(&set)?;
        let pages = plan_document(doc, profile, &metrics)?;

        // layout stays in f64; printpdf's unit types are f32
        let page_w = Mm(profile.page_width_mm as f32);
        let page_h = Mm(profile.page_height_mm as f32);
        let (pdf, first_page, first_layer) =
            PdfDocument::new(&doc.title, page_w, page_h, "Content");

        let embed = |style: RunStyle| -> Result<IndirectFontRef, ExportError> {
            pdf.add_external_font(Cursor::new(set.bytes(style).to_vec()))
                .map_err(|e| ExportError::RenderError(format!("pdf: embedding font: {e}")))
        };
        let regular = embed(RunStyle::Regular)?;
        let bold = embed(RunStyle::Bold)?;
        let italic = embed(RunStyle::Italic)?;
        let font_for = |style: RunStyle| match style {
            RunStyle::Regular => &regular,
            RunStyle::Bold => &bold,
            RunStyle::Italic => &italic,
        };

        for (i, page) in pages.iter().enumerate() {
            let layer = if i == 0 {
                pdf.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_idx, layer_idx) = pdf.add_page(page_w, page_h, "Content");
                pdf.get_page(page_idx).get_layer(layer_idx)
            };
            for item in &page.items {
                // layout measures baselines from the page top; PDF origin is
                // bottom-left
                let x = Mm(pt_to_mm(item.x_pt) as f32);
                let y = Mm((profile.page_height_mm - pt_to_mm(item.baseline_pt)) as f32);
                layer.use_text(&item.text, item.size_pt as f32, x, y, font_for(item.style));
            }
        }

        let mut writer = BufWriter::new(Cursor::new(Vec::new()));
        pdf.save(&mut writer)
            .map_err(|e| ExportError::RenderError(format!("pdf: writing document: {e}")))?;
        let cursor = writer
            .into_inner()
            .map_err(|e| ExportError::RenderError(format!("pdf: flushing document: {e}")))?;
        Ok(cursor.into_inner())
    }
}
