//! DOCX export backend.
//!
//! Renders the IR into WordprocessingML and packages it as an OPC zip. The
//! output leans on the consuming word processor for everything dynamic: the
//! table of contents and the page numbers are fields, headings carry outline
//! levels so navigation panes and TOC refresh work, and pagination is left
//! entirely to the consumer.

mod package;

use crate::error::ExportError;
use crate::format::Format;
use crate::ir::{Document, ListItem, Run};
use crate::render::{render_document, RenderBackend};
use crate::style::{mm_to_twips, pt_to_half_points, GostProfile};

use package::xml_escape;

/// The DOCX export format.
#[derive(Debug, Default)]
pub struct DocxFormat;

impl Format for DocxFormat {
    fn name(&self) -> &str {
        "docx"
    }

    fn description(&self) -> &str {
        "Office Open XML word-processing document"
    }

    fn file_extension(&self) -> &str {
        "docx"
    }

    fn render(&self, doc: &Document, profile: &GostProfile) -> Result<Vec<u8>, ExportError> {
        let mut builder = BodyBuilder::new(profile);
        render_document(doc, &mut builder)?;
        package::write_package(profile, &builder.body)
    }
}

/// Accumulates the `w:body` paragraph stream.
struct BodyBuilder<'a> {
    profile: &'a GostProfile,
    body: String,
}

impl<'a> BodyBuilder<'a> {
    fn new(profile: &'a GostProfile) -> Self {
        BodyBuilder {
            profile,
            body: String::new(),
        }
    }

    /// One run with explicit character properties. `w:rPr` is omitted when
    /// the run matches the document defaults.
    fn push_run(&mut self, run: &Run, force_bold: bool, size: Option<u32>) {
        let bold = run.bold || force_bold;
        self.body.push_str("<w:r>");
        if bold || run.italic || size.is_some() {
            self.body.push_str("<w:rPr>");
            if bold {
                self.body.push_str("<w:b/>");
            }
            if run.italic {
                self.body.push_str("<w:i/>");
            }
            if let Some(sz) = size {
                self.body
                    .push_str(&format!(r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/>"#));
            }
            self.body.push_str("</w:rPr>");
        }
        self.body.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            xml_escape(&run.text)
        ));
        self.body.push_str("</w:r>");
    }

    /// A paragraph holding one field: begin/instruction/separator/cached
    /// placeholder/end. `dirty` asks the consumer to recalculate on open.
    fn push_field_paragraph(&mut self, instr: &str, placeholder: &str, dirty: bool) {
        let begin = if dirty {
            r#"<w:fldChar w:fldCharType="begin" w:dirty="true"/>"#
        } else {
            r#"<w:fldChar w:fldCharType="begin"/>"#
        };
        self.body.push_str(&format!(
            concat!(
                "<w:p>",
                "<w:r>{begin}</w:r>",
                r#"<w:r><w:instrText xml:space="preserve">{instr}</w:instrText></w:r>"#,
                r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r>"#,
                r#"<w:r><w:t xml:space="preserve">{placeholder}</w:t></w:r>"#,
                r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#,
                "</w:p>",
            ),
            begin = begin,
            instr = xml_escape(instr),
            placeholder = xml_escape(placeholder),
        ));
    }

    fn push_page_break(&mut self) {
        self.body
            .push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
    }
}

impl RenderBackend for BodyBuilder<'_> {
    /// Title paragraph, then the TOC field on its own page.
    fn begin_document(&mut self, doc: &Document) -> Result<(), ExportError> {
        let title_sz = pt_to_half_points(self.profile.title_size_pt);
        self.body
            .push_str(r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#);
        self.push_run(&Run::plain(doc.title.clone()), true, Some(title_sz));
        self.body.push_str("</w:p>");
        self.push_page_break();

        let (lo, hi) = self.profile.toc_levels;
        self.push_field_paragraph(
            &format!(" TOC \\o \"{lo}-{hi}\" \\h \\z \\u "),
            "Обновите поле, чтобы увидеть содержание.",
            true,
        );
        self.push_page_break();
        Ok(())
    }

    fn emit_heading(&mut self, level: u8, runs: &[Run]) -> Result<(), ExportError> {
        let heading_sz = pt_to_half_points(self.profile.heading_size_pt);
        self.body.push_str("<w:p><w:pPr>");
        self.body.push_str("<w:keepLines/>");
        if self.profile.heading_centered(level) {
            self.body.push_str(r#"<w:jc w:val="center"/>"#);
        }
        self.body.push_str(&format!(
            r#"<w:outlineLvl w:val="{}"/>"#,
            self.profile.outline_level(level)
        ));
        self.body.push_str("</w:pPr>");
        for run in runs {
            self.push_run(run, true, Some(heading_sz));
        }
        self.body.push_str("</w:p>");
        Ok(())
    }

    fn emit_paragraph(&mut self, runs: &[Run]) -> Result<(), ExportError> {
        // A bold-heuristic run marks an emphasis paragraph, rendered centered
        // and without the first-line indent.
        let centered = runs.iter().any(|r| r.bold);
        self.body.push_str("<w:p><w:pPr><w:keepLines/>");
        if centered {
            self.body.push_str(r#"<w:jc w:val="center"/>"#);
        } else {
            self.body.push_str(&format!(
                r#"<w:ind w:firstLine="{}"/>"#,
                mm_to_twips(self.profile.first_line_indent_mm)
            ));
        }
        self.body.push_str("</w:pPr>");
        for run in runs {
            self.push_run(run, false, None);
        }
        self.body.push_str("</w:p>");
        Ok(())
    }

    /// Items carry literal positional `N.` prefixes, not a numbering part, so
    /// the list reads identically in every consumer.
    fn emit_list(&mut self, items: &[ListItem]) -> Result<(), ExportError> {
        let indent = mm_to_twips(self.profile.list_indent_mm);
        for (i, item) in items.iter().enumerate() {
            self.body.push_str(&format!(
                r#"<w:p><w:pPr><w:keepLines/><w:ind w:left="{indent}"/></w:pPr>"#
            ));
            self.push_run(&Run::plain(format!("{}. ", i + 1)), false, None);
            for run in &item.runs {
                self.push_run(run, false, None);
            }
            self.body.push_str("</w:p>");
        }
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Block, Section};

    fn build_body(doc: &Document) -> String {
        let profile = GostProfile::default();
        let mut builder = BodyBuilder::new(&profile);
        render_document(doc, &mut builder).unwrap();
        builder.body
    }

    fn doc_with_blocks(blocks: Vec<Block>) -> Document {
        Document {
            title: "Отчет о НИР".to_string(),
            sections: vec![Section {
                code: "ОЧ".to_string(),
                name: "Основная часть".to_string(),
                order: 7,
                blocks,
            }],
        }
    }

    #[test]
    fn body_opens_with_title_and_toc_field() {
        let body = build_body(&doc_with_blocks(vec![Block::Paragraph {
            runs: vec![Run::plain("x")],
        }]));
        assert!(body.contains("Отчет о НИР"));
        assert!(body.contains(r#"<w:sz w:val="32"/>"#));
        assert!(body.contains(r#" TOC \o &quot;1-3&quot; \h \z \u "#));
        assert!(body.contains(r#"<w:fldChar w:fldCharType="begin" w:dirty="true"/>"#));
        assert!(body.contains(r#"<w:br w:type="page"/>"#));
    }

    #[test]
    fn headings_carry_outline_levels() {
        let body = build_body(&doc_with_blocks(vec![
            Block::Heading {
                level: 1,
                runs: vec![Run::plain("Глава")],
            },
            Block::Heading {
                level: 3,
                runs: vec![Run::plain("Пункт")],
            },
        ]));
        assert!(body.contains(r#"<w:outlineLvl w:val="0"/>"#));
        assert!(body.contains(r#"<w:outlineLvl w:val="2"/>"#));
        // level 1 centered, level 3 not: exactly one centered heading plus
        // the title paragraph
        assert_eq!(body.matches(r#"<w:jc w:val="center"/>"#).count(), 2);
    }

    #[test]
    fn bold_run_centers_its_paragraph() {
        let body = build_body(&doc_with_blocks(vec![
            Block::Paragraph {
                runs: vec![Run::plain("a"), Run::bold("b"), Run::plain("c")],
            },
            Block::Paragraph {
                runs: vec![Run::plain("обычный")],
            },
        ]));
        // emphasis paragraph centered and unindented, plain one indented
        assert_eq!(body.matches(r#"<w:jc w:val="center"/>"#).count(), 2);
        assert_eq!(body.matches(r#"<w:ind w:firstLine="709"/>"#).count(), 1);
        assert!(body.contains("<w:rPr><w:b/></w:rPr>"));
    }

    #[test]
    fn list_items_are_numbered_from_one() {
        let body = build_body(&doc_with_blocks(vec![Block::OrderedList {
            items: vec![
                ListItem {
                    runs: vec![Run::plain("первый")],
                },
                ListItem {
                    runs: vec![Run::plain("второй")],
                },
            ],
        }]));
        assert!(body.contains(">1. </w:t>"));
        assert!(body.contains(">2. </w:t>"));
        assert_eq!(body.matches(r#"<w:ind w:left="709"/>"#).count(), 2);
    }

    #[test]
    fn italic_runs_get_character_properties() {
        let body = build_body(&doc_with_blocks(vec![Block::Paragraph {
            runs: vec![Run::italic("курсив")],
        }]));
        assert!(body.contains("<w:rPr><w:i/></w:rPr>"));
    }

    #[test]
    fn render_produces_a_zip() {
        let bytes = DocxFormat
            .render(
                &doc_with_blocks(vec![Block::Paragraph {
                    runs: vec![Run::plain("x")],
                }]),
                &GostProfile::default(),
            )
            .unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
