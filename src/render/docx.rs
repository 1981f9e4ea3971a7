//! Flowed (DOCX) rendering.
//!
//! Produces a WordprocessingML package straight from the
//! [`DocumentModel`]. Pagination is left to the word processor; the page
//! layout engine is not involved. Every paragraph is flagged right-to-left
//! and every run carries its own direction.

use std::io::{Cursor, Write};
use std::path::Path;

use chrono::Utc;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{DocxMode, RenderOptions};
use crate::bidi::direction_runs;
use crate::error::Result;
use crate::layout::Color;
use crate::model::{
    Contact, ContactKind, DocumentModel, LabelValue, ListItem, SectionItem,
};
use crate::parser::DEFAULT_CONTACT_MARKER;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Renders document models to DOCX packages.
#[derive(Debug, Clone)]
pub struct DocxRenderer {
    options: RenderOptions,
}

impl DocxRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a model according to the configured [`DocxMode`].
    pub fn render(&self, model: &DocumentModel) -> Result<Vec<u8>> {
        let body = match self.options.docx_mode {
            DocxMode::Structured => self.structured_body(model)?,
            DocxMode::PlainLines => self.lines_body(model.plain_text().lines())?,
        };
        self.package(&body)
    }

    /// Render raw text with one right-to-left paragraph per input line.
    pub fn render_lines(&self, text: &str) -> Result<Vec<u8>> {
        let body = self.lines_body(text.lines())?;
        self.package(&body)
    }

    /// Render a model and write it to a file.
    pub fn render_to_file(&self, model: &DocumentModel, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.render(model)?)?;
        Ok(())
    }

    fn lines_body<'t>(&self, lines: impl Iterator<Item = &'t str>) -> Result<Vec<u8>> {
        let mut xml = BodyWriter::new(&self.options);
        xml.open_document()?;
        for line in lines {
            xml.paragraph(line, &Para::default())?;
        }
        xml.close_document()?;
        Ok(xml.finish())
    }

    fn structured_body(&self, model: &DocumentModel) -> Result<Vec<u8>> {
        let style = &self.options.style;
        let mut xml = BodyWriter::new(&self.options);
        xml.open_document()?;

        let size = self.options.docx_size;
        xml.paragraph(
            &self.options.title,
            &Para {
                style: Some("Title"),
                center: true,
                bold: true,
                size: Some(size + 16),
                ..Para::default()
            },
        )?;

        for section in &model.sections {
            if section.has_title() {
                xml.paragraph(&section.title, &Para::heading(size))?;
            }
            for item in &section.items {
                xml.item(item)?;
            }
        }

        if !model.contacts.is_empty() || model.contact_section.is_some() {
            let title = model.contact_title().unwrap_or(DEFAULT_CONTACT_MARKER);
            xml.paragraph(title, &Para::heading(size))?;
            if !model.contacts.is_empty() {
                xml.contact_table(&model.contacts)?;
            }
            if let Some(ref contact_section) = model.contact_section {
                for note in &contact_section.notes {
                    xml.item(note)?;
                }
            }
        }

        if let Some(ref footer) = self.options.footer {
            let muted = hex(style.muted);
            xml.paragraph(
                footer,
                &Para {
                    center: true,
                    color: Some(muted),
                    size: Some(self.options.docx_size.saturating_sub(8).max(2)),
                    ..Para::default()
                },
            )?;
        }

        xml.close_document()?;
        Ok(xml.finish())
    }

    fn package(&self, document: &[u8]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS.as_bytes())?;
        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(DOCUMENT_RELS.as_bytes())?;
        zip.start_file("word/document.xml", options)?;
        zip.write_all(document)?;
        zip.start_file("word/styles.xml", options)?;
        zip.write_all(self.styles_xml().as_bytes())?;
        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(self.core_xml().as_bytes())?;

        let bytes = zip.finish()?.into_inner();
        log::debug!("DOCX written: {} bytes", bytes.len());
        Ok(bytes)
    }

    fn styles_xml(&self) -> String {
        let font = xml_text(&self.options.docx_font);
        let font = escape(&font);
        let size = self.options.docx_size;
        let primary = hex(self.options.style.primary_dark);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/><w:rtl/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:bidi/><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="{primary}"/><w:sz w:val="{title}"/><w:szCs w:val="{title}"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="240"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="{primary}"/><w:sz w:val="{heading}"/><w:szCs w:val="{heading}"/></w:rPr></w:style></w:styles>"#,
            title = size + 16,
            heading = size + 4,
        )
    }

    fn core_xml(&self) -> String {
        let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let title = xml_text(&self.options.title);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>rtldoc</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified></cp:coreProperties>"#,
            title = escape(&title),
        )
    }
}

/// Paragraph formatting.
#[derive(Debug, Default)]
struct Para {
    style: Option<&'static str>,
    center: bool,
    /// Left-to-right paragraph (Latin cell data)
    ltr: bool,
    bold: bool,
    color: Option<String>,
    /// Half-points; `None` keeps the document default
    size: Option<u32>,
}

impl Para {
    fn heading(body_size: u32) -> Self {
        Self {
            style: Some("Heading1"),
            bold: true,
            size: Some(body_size + 4),
            ..Self::default()
        }
    }
}

/// Streams `word/document.xml`.
struct BodyWriter<'a> {
    options: &'a RenderOptions,
    writer: Writer<Vec<u8>>,
}

impl<'a> BodyWriter<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            writer: Writer::new(Vec::new()),
        }
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(tag))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(tag))?;
        Ok(())
    }

    fn open_document(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        self.start("w:document", &[("xmlns:w", W_NS)])?;
        self.start("w:body", &[])
    }

    fn close_document(&mut self) -> Result<()> {
        let spec = &self.options.page_spec;
        let width = twips(spec.width).to_string();
        let height = twips(spec.height).to_string();
        let side = twips(spec.margin_side).to_string();
        let top = twips(spec.margin_top).to_string();
        let bottom = twips(spec.margin_bottom).to_string();

        self.start("w:sectPr", &[])?;
        self.empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
        self.empty(
            "w:pgMar",
            &[
                ("w:top", top.as_str()),
                ("w:right", side.as_str()),
                ("w:bottom", bottom.as_str()),
                ("w:left", side.as_str()),
                ("w:header", "708"),
                ("w:footer", "708"),
                ("w:gutter", "0"),
            ],
        )?;
        self.empty("w:bidi", &[])?;
        self.end("w:sectPr")?;
        self.end("w:body")?;
        self.end("w:document")
    }

    fn item(&mut self, item: &SectionItem) -> Result<()> {
        match item {
            SectionItem::Paragraph { text } => self.paragraph(text, &Para::default()),
            SectionItem::ListItem(list_item) => self.list_item(list_item),
            SectionItem::LabelValue(pair) => self.label_value(pair),
        }
    }

    fn list_item(&mut self, item: &ListItem) -> Result<()> {
        let text = format!("{} {}", item.marker_text(), item.text);
        self.paragraph(&text, &Para::default())
    }

    fn label_value(&mut self, pair: &LabelValue) -> Result<()> {
        self.start("w:p", &[])?;
        self.paragraph_properties(&Para::default())?;
        let label = Para {
            bold: true,
            color: Some(hex(self.options.style.primary_dark)),
            ..Para::default()
        };
        self.runs(&format!("{}: ", pair.label), &label)?;
        self.runs(&pair.value, &Para::default())?;
        self.end("w:p")
    }

    fn paragraph(&mut self, text: &str, para: &Para) -> Result<()> {
        self.start("w:p", &[])?;
        self.paragraph_properties(para)?;
        self.runs(text, para)?;
        self.end("w:p")
    }

    fn paragraph_properties(&mut self, para: &Para) -> Result<()> {
        self.start("w:pPr", &[])?;
        if let Some(style) = para.style {
            self.empty("w:pStyle", &[("w:val", style)])?;
        }
        if !para.ltr {
            self.empty("w:bidi", &[])?;
        }
        if para.center {
            self.empty("w:jc", &[("w:val", "center")])?;
        } else if para.ltr {
            self.empty("w:jc", &[("w:val", "left")])?;
        }
        self.end("w:pPr")
    }

    /// One run per maximal same-direction span.
    fn runs(&mut self, text: &str, para: &Para) -> Result<()> {
        let font = xml_text(&self.options.docx_font);
        let size = para.size.unwrap_or(self.options.docx_size).to_string();

        for (run, rtl) in direction_runs(text, !para.ltr) {
            self.start("w:r", &[])?;
            self.start("w:rPr", &[])?;
            self.empty(
                "w:rFonts",
                &[("w:ascii", font.as_str()), ("w:hAnsi", font.as_str()), ("w:cs", font.as_str())],
            )?;
            if para.bold {
                self.empty("w:b", &[])?;
                self.empty("w:bCs", &[])?;
            }
            if let Some(ref color) = para.color {
                self.empty("w:color", &[("w:val", color.as_str())])?;
            }
            self.empty("w:sz", &[("w:val", size.as_str())])?;
            self.empty("w:szCs", &[("w:val", size.as_str())])?;
            if rtl {
                self.empty("w:rtl", &[])?;
            }
            self.end("w:rPr")?;
            self.start("w:t", &[("xml:space", "preserve")])?;
            self.writer
                .write_event(Event::Text(BytesText::new(&xml_text(&run))))?;
            self.end("w:t")?;
            self.end("w:r")?;
        }
        Ok(())
    }

    fn contact_table(&mut self, contacts: &[Contact]) -> Result<()> {
        let style = &self.options.style;
        let widths = style.column_widths(self.options.page_spec.content_width());
        let border = hex(style.border);
        let header_fill = hex(style.primary);
        let alternate_fill = hex(style.row_alternate);

        self.start("w:tbl", &[])?;
        self.start("w:tblPr", &[])?;
        self.empty("w:bidiVisual", &[])?;
        self.empty("w:tblW", &[("w:w", "5000"), ("w:type", "pct")])?;
        self.start("w:tblBorders", &[])?;
        for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
            self.empty(
                side,
                &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", border.as_str())],
            )?;
        }
        self.end("w:tblBorders")?;
        self.end("w:tblPr")?;

        self.start("w:tblGrid", &[])?;
        for w in widths {
            let twips = twips(w).to_string();
            self.empty("w:gridCol", &[("w:w", twips.as_str())])?;
        }
        self.end("w:tblGrid")?;

        // Header row, repeated by the word processor on every page.
        self.start("w:tr", &[])?;
        self.start("w:trPr", &[])?;
        self.empty("w:tblHeader", &[])?;
        self.end("w:trPr")?;
        for (kind, w) in ContactKind::ALL.iter().zip(widths) {
            let para = Para {
                center: true,
                bold: true,
                color: Some("FFFFFF".to_string()),
                ..Para::default()
            };
            self.cell(kind.header(), w, Some(header_fill.as_str()), &para)?;
        }
        self.end("w:tr")?;

        for (index, contact) in contacts.iter().enumerate() {
            let fill = (index % 2 == 1).then_some(alternate_fill.as_str());
            self.start("w:tr", &[])?;
            for (kind, w) in ContactKind::ALL.iter().zip(widths) {
                let para = Para {
                    ltr: kind.is_latin(),
                    ..Para::default()
                };
                self.cell(contact.display(*kind), w, fill, &para)?;
            }
            self.end("w:tr")?;
        }

        self.end("w:tbl")?;
        // Word requires a paragraph between a table and the section end.
        self.paragraph("", &Para::default())
    }

    fn cell(&mut self, text: &str, width: f32, fill: Option<&str>, para: &Para) -> Result<()> {
        self.start("w:tc", &[])?;
        self.start("w:tcPr", &[])?;
        let width = twips(width).to_string();
        self.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
        if let Some(fill) = fill {
            self.empty(
                "w:shd",
                &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)],
            )?;
        }
        self.end("w:tcPr")?;
        self.paragraph(text, para)?;
        self.end("w:tc")
    }
}

/// Millimetres to twentieths of a point.
fn twips(mm: f32) -> u32 {
    (mm * 1440.0 / 25.4).round() as u32
}

/// Replace characters XML 1.0 does not allow (controls other than tab and
/// newlines, U+FFFE, U+FFFF) with spaces.
fn xml_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => c,
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => ' ',
            c => c,
        })
        .collect()
}

fn hex(color: Color) -> String {
    format!("{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

/// Render a model to DOCX bytes.
pub fn to_docx(model: &DocumentModel, options: &RenderOptions) -> Result<Vec<u8>> {
    DocxRenderer::new(options.clone()).render(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn sample() -> DocumentModel {
        let mut section = Section::new("مقدمة", 1);
        section.push(SectionItem::paragraph("نص عربي مع 2024"));
        section.push(SectionItem::LabelValue(LabelValue::new("المدة", "سنة")));
        DocumentModel {
            sections: vec![section],
            contacts: vec![
                Contact::named("علي").with(ContactKind::Email, "ali@example.org"),
                Contact::named("منى"),
            ],
            contact_section: None,
        }
    }

    #[test]
    fn test_package_parts() {
        let bytes = to_docx(&sample(), &RenderOptions::default()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
    }

    #[test]
    fn test_structured_document() {
        let bytes = to_docx(&sample(), &RenderOptions::default()).unwrap();
        let document = read_part(&bytes, "word/document.xml");

        assert!(document.contains("<w:bidi/>"));
        assert!(document.contains("<w:rtl/>"));
        assert!(document.contains("<w:bidiVisual/>"));
        assert!(document.contains("مقدمة"));
        assert!(document.contains("ali@example.org"));
        assert!(document.contains(r#"<w:sz w:val="28"/>"#));
        // Header row plus two contacts.
        assert_eq!(document.matches("<w:tr>").count(), 3);
        // Only the second body row is shaded with the alternate fill.
        assert_eq!(document.matches(r#"w:fill="F0FDF4""#).count(), 5);
    }

    #[test]
    fn test_plain_lines_mode() {
        let options = RenderOptions::new().with_docx_mode(DocxMode::PlainLines);
        let renderer = DocxRenderer::new(options);
        let bytes = renderer.render_lines("سطر أول\nسطر ثان\n").unwrap();
        let document = read_part(&bytes, "word/document.xml");
        assert_eq!(document.matches("<w:p>").count(), 2);
        assert_eq!(document.matches("<w:bidi/>").count(), 3);
    }

    #[test]
    fn test_title_is_escaped_in_core_properties() {
        let options = RenderOptions::new().with_title("A & B");
        let bytes = to_docx(&DocumentModel::new(), &options).unwrap();
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>A &amp; B</dc:title>"));
    }

    #[test]
    fn test_control_characters_do_not_reach_xml() {
        let mut section = Section::new("T", 1);
        section.push(SectionItem::paragraph("الصفحة\u{000C}التالية\u{0001}"));
        let model = DocumentModel {
            sections: vec![section],
            ..Default::default()
        };
        let options = RenderOptions::new().with_title("Memo\u{0008}");
        let bytes = to_docx(&model, &options).unwrap();

        let document = read_part(&bytes, "word/document.xml");
        assert!(!document.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
        assert!(document.contains("الصفحة التالية"));
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Memo </dc:title>"));

        let plain = DocxRenderer::new(options).render_lines("سطر\u{000C}أول\nسطر ثان").unwrap();
        let document = read_part(&plain, "word/document.xml");
        assert!(!document.contains('\u{000C}'));
        assert!(document.contains("سطر أول"));
    }
}
