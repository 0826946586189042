//! Built-in catalog of GOST report section templates.
//!
//! The catalog mirrors the section set a research report is seeded with:
//! title page, introduction, main part, conclusion and bibliography. It is the
//! source of truth for display names and ordering when the caller supplies
//! only section codes, and for the closed set of "title-like" codes that
//! receive an injected centered heading during rendering.

use crate::error::ExportError;

/// Metadata for one report section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTemplate {
    /// Short category code, e.g. `ТЛ` for the title page.
    pub code: &'static str,
    /// Display name rendered as the section heading.
    pub name: &'static str,
    /// URL-safe identifier used by callers that address sections by slug.
    pub slug: &'static str,
    /// Position of the section in the finished report.
    pub order: i32,
    /// Whether rendering injects a centered heading line with [`Self::name`].
    /// Sections without the flag carry their headings inline in the content.
    pub title_like: bool,
}

/// The section templates of a GOST 7.32-2017 research report, in report order.
pub const SECTION_TEMPLATES: &[SectionTemplate] = &[
    SectionTemplate {
        code: "ТЛ",
        name: "Титульный лист",
        slug: "title-page",
        order: 1,
        title_like: true,
    },
    SectionTemplate {
        code: "В",
        name: "Введение",
        slug: "introduction",
        order: 6,
        title_like: false,
    },
    SectionTemplate {
        code: "ОЧ",
        name: "Основная часть",
        slug: "main",
        order: 7,
        title_like: false,
    },
    SectionTemplate {
        code: "З",
        name: "Заключение",
        slug: "conclusion",
        order: 8,
        title_like: false,
    },
    SectionTemplate {
        code: "СИ",
        name: "Список использованных источников",
        slug: "bibliography",
        order: 9,
        title_like: true,
    },
];

/// Look up a section template by its category code.
pub fn find_by_code(code: &str) -> Result<&'static SectionTemplate, ExportError> {
    SECTION_TEMPLATES
        .iter()
        .find(|t| t.code == code)
        .ok_or_else(|| ExportError::SectionNotFound(code.to_string()))
}

/// Look up a section template by slug.
pub fn find_by_slug(slug: &str) -> Result<&'static SectionTemplate, ExportError> {
    SECTION_TEMPLATES
        .iter()
        .find(|t| t.slug == slug)
        .ok_or_else(|| ExportError::SectionNotFound(slug.to_string()))
}

/// Whether a section code belongs to the closed title-like set.
///
/// Codes outside the catalog are rendered as plain body, so this returns
/// `false` for them rather than failing.
pub fn is_title_like(code: &str) -> bool {
    SECTION_TEMPLATES
        .iter()
        .any(|t| t.code == code && t.title_like)
}
