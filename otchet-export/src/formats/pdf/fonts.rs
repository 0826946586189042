//! Serif font discovery and metrics for the PDF backend.
//!
//! PDF output embeds real TTF fonts, so the backend needs a serif family with
//! regular, bold and italic faces that covers Cyrillic. Resolution order:
//! the `OTCHET_FONT_DIR` environment variable, caller-supplied directories,
//! then well-known system locations, trying Times New Roman first and the
//! metric-compatible Liberation Serif and DejaVu Serif after it.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use ttf_parser::Face;

use crate::error::ExportError;
use crate::formats::pdf::layout::{RunStyle, TextMeasure};

/// Environment variable naming an extra directory to search first.
pub const FONT_DIR_ENV: &str = "OTCHET_FONT_DIR";

/// File name triples (regular, bold, italic) per candidate family.
const FAMILIES: &[[&str; 3]] = &[
    ["times.ttf", "timesbd.ttf", "timesi.ttf"],
    [
        "Times_New_Roman.ttf",
        "Times_New_Roman_Bold.ttf",
        "Times_New_Roman_Italic.ttf",
    ],
    [
        "LiberationSerif-Regular.ttf",
        "LiberationSerif-Bold.ttf",
        "LiberationSerif-Italic.ttf",
    ],
    [
        "DejaVuSerif.ttf",
        "DejaVuSerif-Bold.ttf",
        "DejaVuSerif-Italic.ttf",
    ],
];

const SYSTEM_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/liberation-serif",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];

/// Raw bytes of the three faces of one resolved family.
pub struct FontSet {
    pub regular: Vec<u8>,
    pub bold: Vec<u8>,
    pub italic: Vec<u8>,
}

impl FontSet {
    /// Resolve and read a serif family, searching `extra_dirs` after the
    /// environment override and before the system locations.
    pub fn discover(extra_dirs: &[PathBuf]) -> Result<FontSet, ExportError> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        if let Ok(dir) = std::env::var(FONT_DIR_ENV) {
            if !dir.is_empty() {
                dirs.push(PathBuf::from(dir));
            }
        }
        dirs.extend(extra_dirs.iter().cloned());
        dirs.extend(SYSTEM_DIRS.iter().map(PathBuf::from));

        for dir in &dirs {
            if let Some(set) = Self::try_dir(dir) {
                return Ok(set);
            }
        }
        Err(ExportError::RenderError(format!(
            "pdf: no serif font family found; set {FONT_DIR_ENV} to a directory \
             with Times New Roman, Liberation Serif or DejaVu Serif TTF files"
        )))
    }

    fn try_dir(dir: &Path) -> Option<FontSet> {
        for [regular, bold, italic] in FAMILIES {
            let paths = [dir.join(regular), dir.join(bold), dir.join(italic)];
            if paths.iter().all(|p| p.is_file()) {
                debug!("using font family {} from {}", regular, dir.display());
                let mut faces = paths.iter().map(fs::read);
                // is_file checked above; reads can still race with deletion
                match (faces.next()?, faces.next()?, faces.next()?) {
                    (Ok(regular), Ok(bold), Ok(italic)) => {
                        return Some(FontSet {
                            regular,
                            bold,
                            italic,
                        })
                    }
                    _ => continue,
                }
            }
        }
        None
    }

    pub fn bytes(&self, style: RunStyle) -> &[u8] {
        match style {
            RunStyle::Regular => &self.regular,
            RunStyle::Bold => &self.bold,
            RunStyle::Italic => &self.italic,
        }
    }
}

/// Text measurement on parsed faces, in PostScript points.
pub struct FaceMetrics<'a> {
    regular: Face<'a>,
    bold: Face<'a>,
    italic: Face<'a>,
}

impl<'a> FaceMetrics<'a> {
    pub fn new(set: &'a FontSet) -> Result<FaceMetrics<'a>, ExportError> {
        let parse = |bytes: &'a [u8], which: &str| {
            Face::parse(bytes, 0)
                .map_err(|e| ExportError::RenderError(format!("pdf: parsing {which} face: {e}")))
        };
        Ok(FaceMetrics {
            regular: parse(&set.regular, "regular")?,
            bold: parse(&set.bold, "bold")?,
            italic: parse(&set.italic, "italic")?,
        })
    }

    fn face(&self, style: RunStyle) -> &Face<'a> {
        match style {
            RunStyle::Regular => &self.regular,
            RunStyle::Bold => &self.bold,
            RunStyle::Italic => &self.italic,
        }
    }
}

impl TextMeasure for FaceMetrics<'_> {
    fn text_width_pt(&self, text: &str, style: RunStyle, size_pt: f64) -> f64 {
        let face = self.face(style);
        let upem = f64::from(face.units_per_em());
        let mut units = 0.0;
        for c in text.chars() {
            let advance = face
                .glyph_index(c)
                .and_then(|g| face.glyph_hor_advance(g))
                .map(f64::from)
                // glyph not in font: assume a half-em box
                .unwrap_or(upem * 0.5);
            units += advance;
        }
        units / upem * size_pt
    }
}
