//! Structural assertions on generated DOCX packages.
//!
//! The package is opened as a zip and the XML parts are checked both for
//! well-formedness (roxmltree) and for the concrete WordprocessingML the
//! GOST profile mandates.

use std::io::{Cursor, Read};

use otchet_export::formats::docx::DocxFormat;
use otchet_export::ir::{Document, SectionInput};
use otchet_export::{Format, GostProfile};

fn assemble(sections: Vec<SectionInput>) -> Document {
    Document::assemble("Отчет о НИР", sections).unwrap()
}

fn section(code: &str, content: &str) -> SectionInput {
    SectionInput {
        code: code.to_string(),
        name: None,
        order: None,
        content: content.to_string(),
    }
}

fn render(doc: &Document) -> Vec<u8> {
    DocxFormat.render(doc, &GostProfile::default()).unwrap()
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

#[test]
fn package_contains_expected_parts() {
    let bytes = render(&assemble(vec![section("В", "<p>Текст.</p>")]));
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/footer1.xml",
    ] {
        assert!(archive.by_name(name).is_ok(), "missing part {name}");
    }
}

#[test]
fn all_xml_parts_are_well_formed() {
    let bytes = render(&assemble(vec![section(
        "В",
        "<p>Спецсимволы: &amp; &lt;тег&gt; \"кавычки\".</p>",
    )]));
    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/footer1.xml",
    ] {
        let xml = part(&bytes, name);
        roxmltree::Document::parse(&xml)
            .unwrap_or_else(|e| panic!("part {name} is not well-formed XML: {e}"));
    }
}

#[test]
fn section_properties_follow_gost() {
    let bytes = render(&assemble(vec![section("В", "<p>x</p>")]));
    let doc_xml = part(&bytes, "word/document.xml");
    assert!(doc_xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    assert!(doc_xml.contains(r#"w:left="1701""#));
    assert!(doc_xml.contains(r#"w:right="850""#));
    assert!(doc_xml.contains(r#"<w:footerReference w:type="default""#));

    let styles = part(&bytes, "word/styles.xml");
    assert!(styles.contains(r#"w:ascii="Times New Roman""#));
    assert!(styles.contains(r#"<w:sz w:val="28"/>"#));
    assert!(styles.contains(r#"w:line="360" w:lineRule="auto""#));
}

#[test]
fn toc_and_page_fields_are_dynamic() {
    let bytes = render(&assemble(vec![section("В", "<p>x</p>")]));
    let doc_xml = part(&bytes, "word/document.xml");
    assert!(doc_xml.contains(r#" TOC \o &quot;1-3&quot; \h \z \u "#));
    assert!(doc_xml.contains(r#"<w:fldChar w:fldCharType="begin" w:dirty="true"/>"#));
    assert!(doc_xml.contains(r#"<w:fldChar w:fldCharType="separate"/>"#));

    let footer = part(&bytes, "word/footer1.xml");
    assert!(footer.contains(" PAGE "));
    assert!(footer.contains(r#"<w:jc w:val="center"/>"#));
}

#[test]
fn bold_heuristic_paragraph_is_centered_with_three_runs() {
    let bytes = render(&assemble(vec![section(
        "В",
        "<p>Текст **важно** обычный.</p>",
    )]));
    let doc_xml = part(&bytes, "word/document.xml");
    assert!(doc_xml.contains(r#"<w:t xml:space="preserve">Текст </w:t>"#));
    assert!(doc_xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">важно</w:t>"#));
    assert!(doc_xml.contains(r#"<w:t xml:space="preserve"> обычный.</w:t>"#));
    // emphasis paragraph is centered, so no first-line indent on it
    assert!(!doc_xml.contains(r#"<w:ind w:firstLine"#));
}

#[test]
fn headings_get_outline_levels_and_title_like_sections_inject_one() {
    let doc = assemble(vec![
        section("ОЧ", "<h2>Обзор</h2><p>Текст.</p>"),
        section("СИ", "<ol><li>Источник</li></ol>"),
    ]);
    let doc_xml = part(&render(&doc), "word/document.xml");
    // inline h2 and the injected level-1 heading of the bibliography
    assert!(doc_xml.contains(r#"<w:outlineLvl w:val="1"/>"#));
    assert!(doc_xml.contains(r#"<w:outlineLvl w:val="0"/>"#));
    assert!(doc_xml.contains("Список использованных источников"));
}

#[test]
fn empty_sections_leave_no_trace() {
    let doc = assemble(vec![
        section("В", "<p>Текст введения.</p>"),
        section("СИ", "<p>  </p><br>"),
    ]);
    let doc_xml = part(&render(&doc), "word/document.xml");
    assert!(doc_xml.contains("Текст введения."));
    // even the injected heading of the empty title-like section is absent
    assert!(!doc_xml.contains("Список использованных источников"));
}

#[test]
fn list_items_carry_literal_numbering() {
    let doc = assemble(vec![section("СИ", "<ol><li>Иванов И.И.</li><li>Петров П.П.</li></ol>")]);
    let doc_xml = part(&render(&doc), "word/document.xml");
    assert!(doc_xml.contains(r#"<w:t xml:space="preserve">1. </w:t>"#));
    assert!(doc_xml.contains(r#"<w:t xml:space="preserve">2. </w:t>"#));
    assert!(doc_xml.contains("Иванов И.И."));
    // no numbering part is referenced
    assert!(!doc_xml.contains("<w:numPr>"));
}

#[test]
fn document_part_is_deterministic() {
    let doc = assemble(vec![section("В", "<p>Текст <i>курсивом</i>.</p>")]);
    let first = part(&render(&doc), "word/document.xml");
    let second = part(&render(&doc), "word/document.xml");
    assert_eq!(first, second);
}
