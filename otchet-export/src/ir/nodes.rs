//! Core data structures for the report Intermediate Representation (IR).

use serde::Deserialize;

use crate::error::ExportError;
use crate::templates;

/// A contiguous span of text with two independent style flags.
///
/// Invariant: a run's text is never empty after trimming; the block parser
/// drops empty runs instead of emitting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub italic: bool,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            italic: false,
            bold: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            italic: true,
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            italic: false,
            bold: true,
        }
    }
}

/// One item of an ordered list. The `1.`, `2.`, ... prefix is assigned by
/// position at render time, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub runs: Vec<Run>,
}

/// A parsed structural unit of section content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, runs: Vec<Run> },
    Paragraph { runs: Vec<Run> },
    OrderedList { items: Vec<ListItem> },
}

/// A report section with parsed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Category code, e.g. `ТЛ`, `В`, `СИ`.
    pub code: String,
    /// Display name, rendered as an injected heading for title-like codes.
    pub name: String,
    /// Position in the finished report; sections render in ascending order.
    pub order: i32,
    pub blocks: Vec<Block>,
}

impl Section {
    /// Whether rendering injects a centered heading line with the section
    /// name. Non-title-like sections carry their headings inline.
    pub fn is_title_like(&self) -> bool {
        templates::is_title_like(&self.code)
    }
}

/// A fully assembled report, ready for rendering.
///
/// A document is built fresh per export request, is read-only during
/// rendering and is discarded afterwards; nothing here is shared or cached
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

/// Caller-supplied input for one section, as stored by the editing layer.
///
/// `name` and `order` may be omitted when `code` is in the built-in template
/// catalog; they are then resolved from it.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionInput {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    pub content: String,
}

impl Document {
    /// Assemble a document from raw section inputs.
    ///
    /// Each section's markup is normalized and parsed into blocks; sections
    /// are sorted by ascending order. Inputs missing name or order for a code
    /// outside the template catalog fail with
    /// [`ExportError::SectionNotFound`].
    pub fn assemble(
        title: impl Into<String>,
        inputs: Vec<SectionInput>,
    ) -> Result<Document, ExportError> {
        let mut sections = Vec::with_capacity(inputs.len());
        for input in inputs {
            let template = if input.name.is_none() || input.order.is_none() {
                Some(templates::find_by_code(&input.code)?)
            } else {
                None
            };
            let name = match input.name {
                Some(name) => name,
                None => template.map(|t| t.name.to_string()).unwrap_or_default(),
            };
            let order = match input.order {
                Some(order) => order,
                None => template.map(|t| t.order).unwrap_or_default(),
            };
            let blocks = crate::ir::parse_content(&input.content);
            sections.push(Section {
                code: input.code,
                name,
                order,
                blocks,
            });
        }
        sections.sort_by_key(|s| s.order);
        Ok(Document {
            title: title.into(),
            sections,
        })
    }
}
