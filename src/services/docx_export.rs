//! Minimal DOCX rendering of an inspection act.
//!
//! The package holds exactly three parts: `[Content_Types].xml`,
//! `_rels/.rels` and `word/document.xml`. Each rendered line becomes one
//! paragraph; an empty line becomes an empty paragraph.
use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::api::InspectionResponse;
use crate::database::record::build_letter_number;

pub const DOCX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Stand-in for any empty value
pub const PLACEHOLDER: &str = "—";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>
"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>
"#;

// Letter page, 1 inch margins
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("zip packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("writing document part failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the act into DOCX bytes
pub fn build_inspection_docx(item: &InspectionResponse) -> Result<Vec<u8>, ExportError> {
    let document = document_xml(&inspection_lines(item));

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, contents) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("word/document.xml", document.as_str()),
    ] {
        zip.start_file(name, options)?;
        zip.write_all(contents.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// The labeled text lines of the document, in order
pub fn inspection_lines(item: &InspectionResponse) -> Vec<String> {
    let org = &item.organization;
    let head = &item.head;
    let insp = &item.inspection;

    let letter_number = build_letter_number(&insp.letter.number_left, &insp.letter.number_right);
    let head_name = [head.last_name.as_str(), head.name_patronymic.as_str(), head.last_name_to.as_str()]
        .join(" ")
        .trim()
        .to_string();

    vec![
        "АКТ ПРОВЕРКИ".to_string(),
        String::new(),
        format!("Организация: {}", value(&org.name)),
        format!("Краткое наименование: {}", value(&org.short_name)),
        format!("ОГРН: {}", value(&org.ogrn)),
        format!("Юридический адрес: {}", value(&org.address.legal_address)),
        format!("Почтовый адрес: {}", value(&org.address.postal_address)),
        String::new(),
        format!("Форма проверки: {}", value(&insp.form_type)),
        format!(
            "Приказ Минздрава: №{} от {}",
            value(&insp.mz_order.number),
            value(&insp.mz_order.date)
        ),
        format!("Письмо: №{} от {}", value(&letter_number), value(&insp.letter.date)),
        format!(
            "Срок проверки: {} — {} ({} раб. дней)",
            value(&insp.period.start_date),
            value(&insp.period.end_date),
            value(&insp.period.days)
        ),
        String::new(),
        format!("Руководитель учреждения: {} {}", value(&head.role), value(&head_name)),
        format!("Представитель учреждения: {}", list(&insp.representative)),
        format!("Инспекторы: {}", list(&insp.inspectors)),
        format!("Адреса проверки: {}", list(&insp.address_no_index)),
        format!("Подписи: {}", list(&insp.signatures)),
        String::new(),
        format!("Создал: {} ({})", value(&item.created_by), value(&item.created_at)),
        format!("Обновил: {} ({})", value(&item.updated_by), value(&item.updated_at)),
    ]
}

fn value(raw: &str) -> &str {
    if raw.trim().is_empty() {
        PLACEHOLDER
    } else {
        raw
    }
}

fn list(values: &[String]) -> String {
    let kept: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .collect();
    if kept.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        kept.join(", ")
    }
}

/// The `word/document.xml` part for the given lines
pub fn document_xml(lines: &[String]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);
    xml.push_str("<w:body>");
    for line in lines {
        if line.is_empty() {
            xml.push_str("<w:p/>");
            continue;
        }
        xml.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
        xml.push_str(&escape_xml(line));
        xml.push_str("</w:t></w:r></w:p>");
    }
    xml.push_str(SECTION_PROPERTIES);
    xml.push_str("</w:body></w:document>");
    xml
}

/// Escapes text content. Characters outside the XML character range are
/// replaced with U+FFFD so the part always stays well-formed.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push('\u{FFFD}'),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c as u32, 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InspectionDto, LetterDto, OrganizationDto};
    use std::io::Read;

    fn sample() -> InspectionResponse {
        InspectionResponse {
            id: 42,
            created_at: "2024-03-01T09:00:00Z".to_string(),
            updated_at: "2024-03-02T10:30:00Z".to_string(),
            created_by: "Петров".to_string(),
            updated_by: String::new(),
            organization: OrganizationDto {
                ogrn: "1027700132195".to_string(),
                name: "ООО \"Ромашка\" <филиал> & Co".to_string(),
                ..Default::default()
            },
            head: Default::default(),
            inspection: InspectionDto {
                letter: LetterDto {
                    number_left: "123".to_string(),
                    number_right: "45".to_string(),
                    date: "2024-02-20".to_string(),
                    number: None,
                },
                inspectors: vec!["Иванов".to_string(), " ".to_string(), "Сидоров".to_string()],
                ..Default::default()
            },
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&#34;c&#39;");
        assert_eq!(escape_xml("x\ty\nz\r"), "x&#x9;y&#xA;z&#xD;");
        assert_eq!(escape_xml("bad\u{1}char"), "bad\u{FFFD}char");
        assert_eq!(escape_xml("Кириллица"), "Кириллица");
    }

    #[test]
    fn empty_values_render_placeholder() {
        let mut item = sample();
        item.organization.name = "   ".to_string();
        let lines = inspection_lines(&item);

        assert!(lines.contains(&"Организация: —".to_string()));
        assert!(lines.contains(&"Подписи: —".to_string()));
        assert!(lines.contains(&"Руководитель учреждения: — —".to_string()));
    }

    #[test]
    fn lines_join_lists_and_letter_number() {
        let lines = inspection_lines(&sample());
        assert_eq!(lines[0], "АКТ ПРОВЕРКИ");
        assert!(lines.contains(&"Инспекторы: Иванов, Сидоров".to_string()));
        assert!(lines.contains(&"Письмо: №123/45 от 2024-02-20".to_string()));
        assert!(lines.contains(&"Обновил: — (2024-03-02T10:30:00Z)".to_string()));
    }

    #[test]
    fn blank_lines_become_empty_paragraphs() {
        let xml = document_xml(&["one".to_string(), String::new(), "two".to_string()]);
        assert!(xml.contains(r#"<w:t xml:space="preserve">one</w:t></w:r></w:p><w:p/><w:p><w:r>"#));
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
    }

    #[test]
    fn package_contains_three_parts() {
        let bytes = build_inspection_docx(&sample()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["[Content_Types].xml", "_rels/.rels", "word/document.xml"]);

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains("ООО &#34;Ромашка&#34; &lt;филиал&gt; &amp; Co"));
        assert!(!document.contains("<филиал>"));
        assert_eq!(read_part(&bytes, "_rels/.rels"), ROOT_RELS_XML);
    }
}
