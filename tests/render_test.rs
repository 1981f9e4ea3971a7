//! Integration tests for the PDF, DOCX and JSON renderers.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use lopdf::{Document, Object};
use rtldoc::render::{from_json, to_docx, to_pdf, DocxRenderer, PdfRenderer};
use rtldoc::{DocxMode, Error, FontSource, JsonFormat, ReadingOrder, RenderOptions, RtlDoc};

const SCENARIO: &str = "# Intro\nHello world\n# بيانات منسقي الاتصال\nالاسم: Ali\nالجهة: Acme\n";

fn shown_strings(doc: &Document) -> Vec<Vec<u8>> {
    let mut strings = Vec::new();
    for page_id in doc.get_pages().values() {
        let content = doc.get_and_decode_page_content(*page_id).unwrap();
        for op in content.operations {
            if op.operator == "Tj" {
                if let Some(Object::String(s, _)) = op.operands.first() {
                    strings.push(s.clone());
                }
            }
        }
    }
    strings
}

/// Glyph id to character map read back from the embedded font's ToUnicode
/// CMap.
fn to_unicode(doc: &Document) -> HashMap<u16, char> {
    let mut map = HashMap::new();
    for object in doc.objects.values() {
        let Ok(dict) = object.as_dict() else { continue };
        let Ok(reference) = dict.get(b"ToUnicode").and_then(Object::as_reference) else {
            continue;
        };
        let stream = doc.get_object(reference).unwrap().as_stream().unwrap();
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let cmap = String::from_utf8(data).unwrap();
        let body = cmap.split("beginbfchar").skip(1);
        for chunk in body {
            let chunk = chunk.split("endbfchar").next().unwrap();
            for line in chunk.lines() {
                let hex: Vec<&str> = line
                    .split(|c| c == '<' || c == '>')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect();
                if let &[gid, code] = hex.as_slice() {
                    let gid = u16::from_str_radix(gid, 16).unwrap();
                    let code = u32::from_str_radix(code, 16).unwrap();
                    map.insert(gid, char::from_u32(code).unwrap());
                }
            }
        }
    }
    map
}

/// Text shown on every page, decoded through the ToUnicode map.
fn shown_text(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    let map = to_unicode(&doc);
    shown_strings(&doc)
        .iter()
        .map(|s| {
            s.chunks(2)
                .map(|pair| {
                    let gid = u16::from_be_bytes([pair[0], pair[1]]);
                    map.get(&gid).copied().unwrap_or('\u{FFFD}')
                })
                .collect()
        })
        .collect()
}

fn reversed(text: &str) -> String {
    text.chars().rev().collect()
}

fn fixture_font() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fonts/DejaVuSans-Arabic.ttf")
}

fn docx_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn test_end_to_end_pdf() {
    let bytes = rtldoc::to_pdf(SCENARIO).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let text = shown_text(&bytes);
    for latin in ["Intro", "Hello world", "Ali", "Acme"] {
        assert!(text.iter().any(|t| t == latin), "missing {:?}", latin);
    }
    // Arabic runs are drawn in visual order.
    for arabic in ["مذكرة تفاهم", "بيانات منسقي الاتصال", "الاسم", "الجهة"] {
        assert!(
            text.iter().any(|t| *t == reversed(arabic)),
            "missing {:?}",
            arabic
        );
    }
    assert!(text.iter().all(|t| !t.contains('\u{FFFD}') && !t.contains('?')));
}

#[test]
fn test_builtin_font_refuses_arabic() {
    let options = RenderOptions::new().with_font(FontSource::Builtin);
    let err = to_pdf(&rtldoc::parse(SCENARIO), &options).unwrap_err();
    assert!(matches!(err, Error::Font(_)));
}

#[test]
fn test_page_count_matches_layout() {
    let mut text = String::from("# البنود\n");
    for i in 0..150 {
        text.push_str(&format!("بند رقم {} من بنود المذكرة\n", i));
    }
    let model = rtldoc::parse(&text);

    let renderer = PdfRenderer::new(RenderOptions::default()).unwrap();
    let layout = renderer.layout(&model);
    assert!(layout.page_count > 1);

    let bytes = renderer.render(&model).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), layout.page_count);
}

#[test]
fn test_pdf_title_metadata() {
    let model = rtldoc::parse(SCENARIO);
    let options = RenderOptions::new().with_title("Memo");
    let bytes = to_pdf(&model, &options).unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    assert!(info.get(b"Title").is_ok());
    assert!(info.get(b"Producer").is_ok());
}

#[test]
fn test_render_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.pdf");

    let renderer = PdfRenderer::new(RenderOptions::default()).unwrap();
    renderer
        .render_to_file(&rtldoc::parse(SCENARIO), &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_missing_font_fails() {
    let options = RenderOptions::new().with_font(FontSource::File("/nonexistent/font.ttf".into()));
    assert!(matches!(PdfRenderer::new(options), Err(Error::Font(_))));

    let options = RenderOptions::new().with_font(FontSource::Bytes(b"not a font".to_vec()));
    assert!(matches!(PdfRenderer::new(options), Err(Error::Font(_))));
}

#[test]
fn test_embedded_font() {
    let options = RenderOptions::new()
        .with_font_file(fixture_font())
        .with_reading_order(ReadingOrder::Logical);
    let bytes = to_pdf(&rtldoc::parse(SCENARIO), &options).unwrap();

    let doc = Document::load_mem(&bytes).unwrap();
    let map = to_unicode(&doc);
    for ch in "بيانات منسقي الاتصال".chars().filter(|c| *c != ' ') {
        let gid = map.iter().find(|(_, c)| **c == ch).map(|(gid, _)| *gid);
        assert!(matches!(gid, Some(g) if g != 0), "no glyph for {:?}", ch);
    }
    let text = shown_text(&bytes);
    assert!(text.iter().any(|t| t == "بيانات منسقي الاتصال"));

    let type0 = doc.objects.values().any(|object| {
        object
            .as_dict()
            .ok()
            .and_then(|dict| dict.get(b"Subtype").ok())
            .and_then(|subtype| subtype.as_name().ok())
            == Some(&b"Type0"[..])
    });
    assert!(type0);
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_structured_docx() {
    let model = rtldoc::parse(SCENARIO);
    let bytes = to_docx(&model, &RenderOptions::default()).unwrap();
    let document = docx_part(&bytes, "word/document.xml");

    assert!(document.contains("Intro"));
    assert!(document.contains("Hello world"));
    assert!(document.contains("بيانات منسقي الاتصال"));
    assert!(document.contains("<w:bidiVisual/>"));
    // Header row plus one contact.
    assert_eq!(document.matches("<w:tr>").count(), 2);
    assert!(document.contains("<w:t xml:space=\"preserve\">-</w:t>"));
}

#[test]
fn test_plain_lines_docx() {
    let text = "سطر أول\n# عنوان\nسطر ثالث 2024";
    let bytes = RtlDoc::new()
        .with_docx_mode(DocxMode::PlainLines)
        .parse(text)
        .to_docx()
        .unwrap();
    let document = docx_part(&bytes, "word/document.xml");

    assert_eq!(document.matches("<w:p>").count(), 3);
    assert!(document.contains("# عنوان"));
    assert!(!document.contains("<w:tbl>"));

    let renderer = DocxRenderer::new(RenderOptions::new().with_docx_mode(DocxMode::PlainLines));
    let from_lines = renderer.render_lines(text).unwrap();
    assert_eq!(
        docx_part(&from_lines, "word/document.xml"),
        document
    );
}

#[test]
fn test_docx_font_and_size() {
    let options = RenderOptions::new()
        .with_docx_font("Noto Naskh Arabic")
        .with_docx_size(32);
    let bytes = to_docx(&rtldoc::parse(SCENARIO), &options).unwrap();
    let document = docx_part(&bytes, "word/document.xml");
    assert!(document.contains("w:cs=\"Noto Naskh Arabic\""));
    assert!(document.contains("<w:sz w:val=\"32\"/>"));

    let styles = docx_part(&bytes, "word/styles.xml");
    assert!(styles.contains("Noto Naskh Arabic"));
}

#[test]
fn test_json_round_trip() {
    let result = RtlDoc::new().parse(SCENARIO);
    let json = result.to_json(JsonFormat::Pretty).unwrap();
    assert!(json.contains("\"type\": \"paragraph\""));
    assert_eq!(&from_json(&json).unwrap(), result.model());
}
