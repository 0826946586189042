//! OPC package assembly for the DOCX backend.
//!
//! A .docx file is a zip archive of XML parts. The package written here is
//! deliberately minimal: content types, the two relationship parts, the
//! document body, a styles part carrying the document-wide defaults and one
//! footer with the dynamic page-number field.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::ExportError;
use crate::style::{mm_to_twips, pt_to_half_points, GostProfile};

const STYLES_REL_ID: &str = "rId1";
const FOOTER_REL_ID: &str = "rId2";

/// Escape text for placement inside an XML text node or attribute.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Assemble the finished package around an already-built body.
pub fn write_package(profile: &GostProfile, body_xml: &str) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts: &[(&str, String)] = &[
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", root_rels_xml()),
        ("word/document.xml", document_xml(profile, body_xml)),
        ("word/_rels/document.xml.rels", document_rels_xml()),
        ("word/styles.xml", styles_xml(profile)),
        ("word/footer1.xml", footer_xml()),
    ];
    for (name, content) in parts {
        zip.start_file(*name, opt)
            .map_err(|e| ExportError::RenderError(format!("docx: writing {name}: {e}")))?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| ExportError::RenderError(format!("docx: finishing package: {e}")))?;
    Ok(cursor.into_inner())
}

fn content_types_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
        r#"<Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#,
        r#"</Types>"#,
    )
    .to_string()
}

fn root_rels_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

fn document_rels_xml() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="{styles}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            r#"<Relationship Id="{footer}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>"#,
            r#"</Relationships>"#,
        ),
        styles = STYLES_REL_ID,
        footer = FOOTER_REL_ID,
    )
}

/// Document-wide defaults: the body font, body size and 1.5 line spacing.
/// Paragraph builders only write properties that differ from these.
fn styles_xml(profile: &GostProfile) -> String {
    let font = xml_escape(&profile.font_family);
    let sz = pt_to_half_points(profile.body_size_pt);
    let line = profile.line_units();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:docDefaults>"#,
            r#"<w:rPrDefault><w:rPr>"#,
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#,
            r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/>"#,
            r#"</w:rPr></w:rPrDefault>"#,
            r#"<w:pPrDefault><w:pPr>"#,
            r#"<w:spacing w:after="0" w:line="{line}" w:lineRule="auto"/>"#,
            r#"</w:pPr></w:pPrDefault>"#,
            r#"</w:docDefaults>"#,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">"#,
            r#"<w:name w:val="Normal"/>"#,
            r#"</w:style>"#,
            r#"</w:styles>"#,
        ),
        font = font,
        sz = sz,
        line = line,
    )
}

/// Footer with a centered dynamic `PAGE` field, so page numbers stay correct
/// however the consuming word processor paginates.
fn footer_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#,
        r#"<w:r><w:fldChar w:fldCharType="begin"/></w:r>"#,
        r#"<w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>"#,
        r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r>"#,
        r#"<w:r><w:t>1</w:t></w:r>"#,
        r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#,
        r#"</w:p></w:ftr>"#,
    )
    .to_string()
}

/// Wrap the body in the document root and section properties: A4 page size
/// and the GOST margins in twips, plus the footer reference.
fn document_xml(profile: &GostProfile, body_xml: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<w:body>{body}"#,
            r#"<w:sectPr>"#,
            r#"<w:footerReference w:type="default" r:id="{footer}"/>"#,
            r#"<w:pgSz w:w="{page_w}" w:h="{page_h}"/>"#,
            r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="708" w:footer="708" w:gutter="0"/>"#,
            r#"</w:sectPr>"#,
            r#"</w:body></w:document>"#,
        ),
        body = body_xml,
        footer = FOOTER_REL_ID,
        page_w = mm_to_twips(profile.page_width_mm),
        page_h = mm_to_twips(profile.page_height_mm),
        top = mm_to_twips(profile.margin_top_mm),
        right = mm_to_twips(profile.margin_right_mm),
        bottom = mm_to_twips(profile.margin_bottom_mm),
        left = mm_to_twips(profile.margin_left_mm),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_xml_special_characters() {
        assert_eq!(xml_escape("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(xml_escape(r#"'q' "w""#), "&apos;q&apos; &quot;w&quot;");
        assert_eq!(xml_escape("Отчет"), "Отчет");
    }

    #[test]
    fn section_properties_use_gost_metrics() {
        let xml = document_xml(&GostProfile::default(), "");
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
        assert!(xml.contains(r#"w:left="1701""#));
        assert!(xml.contains(r#"w:right="850""#));
        assert!(xml.contains(r#"w:top="1134""#));
    }

    #[test]
    fn styles_carry_font_and_size_defaults() {
        let xml = styles_xml(&GostProfile::default());
        assert!(xml.contains(r#"w:ascii="Times New Roman""#));
        assert!(xml.contains(r#"<w:sz w:val="28"/>"#));
        assert!(xml.contains(r#"w:line="360""#));
    }

    #[test]
    fn package_is_a_zip_archive() {
        let bytes = write_package(&GostProfile::default(), "").unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
