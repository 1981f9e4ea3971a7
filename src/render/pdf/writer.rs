//! Serializes a [`Layout`] to PDF with lopdf.

use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use super::font::{encode_win_ansi, to_unicode_cmap, EmbeddedFont, GlyphUsage, PdfFont};
use crate::bidi::{strip_bidi_controls, ReadingOrder};
use crate::error::Result;
use crate::layout::{Align, Color, DrawCommand, Layout, PageSpec, TextRun, MM_PER_PT};

/// Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Writes laid-out pages into a PDF document.
#[derive(Debug)]
pub struct PdfWriter<'a> {
    font: &'a PdfFont,
    reading_order: ReadingOrder,
    title: &'a str,
}

impl<'a> PdfWriter<'a> {
    pub fn new(font: &'a PdfFont, reading_order: ReadingOrder, title: &'a str) -> Self {
        Self {
            font,
            reading_order,
            title,
        }
    }

    /// Serialize every page of `layout`.
    pub fn write(&self, layout: &Layout) -> Result<Vec<u8>> {
        let spec = layout.page_spec;
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let regular_id = doc.new_object_id();
        let bold_id = match self.font {
            PdfFont::Base14 => Some(doc.new_object_id()),
            PdfFont::Embedded(_) => None,
        };

        let mut fonts = Dictionary::new();
        fonts.set("F1", regular_id);
        if let Some(id) = bold_id {
            fonts.set("F2", id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut usage = GlyphUsage::new();
        let mut kids: Vec<Object> = Vec::with_capacity(layout.page_count);
        for page in 0..layout.page_count {
            let mut ops = Vec::new();
            for positioned in layout.page(page) {
                self.command(&positioned.command, &spec, &mut ops, &mut usage)?;
            }
            let content = Content { operations: ops };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), pt(spec.width).into(), pt(spec.height).into()],
            });
            kids.push(page_id.into());
        }

        match self.font {
            PdfFont::Base14 => {
                doc.objects
                    .insert(regular_id, Object::Dictionary(base14_font("Helvetica")));
                if let Some(id) = bold_id {
                    doc.objects
                        .insert(id, Object::Dictionary(base14_font("Helvetica-Bold")));
                }
            }
            PdfFont::Embedded(font) => {
                let type0 = embedded_font_objects(&mut doc, font, &usage);
                doc.objects.insert(regular_id, Object::Dictionary(type0));
            }
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => layout.page_count as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(self.title),
            "Producer" => Object::string_literal(concat!("rtldoc ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(Local::now().format("D:%Y%m%d%H%M%S").to_string()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        log::debug!("PDF written: {} pages, {} bytes", layout.page_count, buffer.len());
        Ok(buffer)
    }

    fn command(
        &self,
        command: &DrawCommand,
        spec: &PageSpec,
        ops: &mut Vec<Operation>,
        usage: &mut GlyphUsage,
    ) -> Result<()> {
        match command {
            DrawCommand::Rect {
                x,
                y,
                w,
                h,
                fill,
                stroke,
            } => {
                let paint = paint_op(*fill, *stroke, ops);
                let Some(paint) = paint else { return Ok(()) };
                ops.push(Operation::new(
                    "re",
                    vec![
                        pt(*x).into(),
                        flip(spec, y + h).into(),
                        pt(*w).into(),
                        pt(*h).into(),
                    ],
                ));
                ops.push(Operation::new(paint, vec![]));
            }
            DrawCommand::RoundedRect {
                x,
                y,
                w,
                h,
                radius,
                fill,
            } => {
                ops.push(color_op("rg", *fill));
                rounded_rect_path(spec, *x, *y, *w, *h, *radius, ops);
                ops.push(Operation::new("f", vec![]));
            }
            DrawCommand::Circle { cx, cy, r, fill } => {
                ops.push(color_op("rg", *fill));
                ellipse_path(pt(*cx), flip(spec, *cy), pt(*r), ops);
                ops.push(Operation::new("f", vec![]));
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                ops.push(color_op("RG", *color));
                ops.push(Operation::new("w", vec![pt(*width).into()]));
                ops.push(Operation::new("m", vec![pt(*x1).into(), flip(spec, *y1).into()]));
                ops.push(Operation::new("l", vec![pt(*x2).into(), flip(spec, *y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawCommand::Text(run) => self.text(run, spec, ops, usage)?,
        }
        Ok(())
    }

    fn text(
        &self,
        run: &TextRun,
        spec: &PageSpec,
        ops: &mut Vec<Operation>,
        usage: &mut GlyphUsage,
    ) -> Result<()> {
        let ordered = self.reading_order.apply(&run.text, run.direction.is_rtl());
        let text = strip_bidi_controls(&ordered);
        if text.trim().is_empty() {
            return Ok(());
        }

        let width = self.font.width_pt(&text, run.size, run.bold);
        let x = match run.align {
            Align::Left => pt(run.x),
            Align::Center => pt(run.x) - width / 2.0,
            Align::Right => pt(run.x) - width,
        };

        let (resource, bytes, fake_bold) = match self.font {
            PdfFont::Base14 => {
                let resource = if run.bold { "F2" } else { "F1" };
                (resource, encode_win_ansi(&text)?, false)
            }
            PdfFont::Embedded(font) => ("F1", font.encode(&text, usage), run.bold),
        };
        let format = match self.font {
            PdfFont::Base14 => StringFormat::Literal,
            PdfFont::Embedded(_) => StringFormat::Hexadecimal,
        };

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![resource.into(), run.size.into()]));
        ops.push(color_op("rg", run.color));
        if fake_bold {
            // Fill and stroke the outlines.
            ops.push(color_op("RG", run.color));
            ops.push(Operation::new("w", vec![(run.size * 0.03).into()]));
            ops.push(Operation::new("Tr", vec![2.into()]));
        }
        ops.push(Operation::new("Td", vec![x.into(), flip(spec, run.y).into()]));
        ops.push(Operation::new("Tj", vec![Object::String(bytes, format)]));
        if fake_bold {
            ops.push(Operation::new("Tr", vec![0.into()]));
        }
        ops.push(Operation::new("ET", vec![]));
        Ok(())
    }
}

/// Millimetres to points.
fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

/// Top-down millimetres to bottom-up points.
fn flip(spec: &PageSpec, y: f32) -> f32 {
    pt(spec.height - y)
}

fn color_op(op: &str, color: Color) -> Operation {
    let (r, g, b) = color.unit();
    Operation::new(op, vec![r.into(), g.into(), b.into()])
}

/// Push colour operators and pick the painting operator.
fn paint_op(fill: Option<Color>, stroke: Option<Color>, ops: &mut Vec<Operation>) -> Option<&'static str> {
    if let Some(color) = fill {
        ops.push(color_op("rg", color));
    }
    if let Some(color) = stroke {
        ops.push(color_op("RG", color));
        ops.push(Operation::new("w", vec![0.5f32.into()]));
    }
    match (fill.is_some(), stroke.is_some()) {
        (true, true) => Some("B"),
        (true, false) => Some("f"),
        (false, true) => Some("S"),
        (false, false) => None,
    }
}

fn rounded_rect_path(
    spec: &PageSpec,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    ops: &mut Vec<Operation>,
) {
    let r = pt(radius.min(w / 2.0).min(h / 2.0));
    let (left, right) = (pt(x), pt(x + w));
    let (top, bottom) = (flip(spec, y), flip(spec, y + h));
    let k = r * KAPPA;

    let mv = |op: &str, coords: &[f32]| {
        Operation::new(op, coords.iter().map(|c| Object::Real(*c)).collect())
    };
    ops.push(mv("m", &[left + r, bottom]));
    ops.push(mv("l", &[right - r, bottom]));
    ops.push(mv("c", &[right - r + k, bottom, right, bottom + r - k, right, bottom + r]));
    ops.push(mv("l", &[right, top - r]));
    ops.push(mv("c", &[right, top - r + k, right - r + k, top, right - r, top]));
    ops.push(mv("l", &[left + r, top]));
    ops.push(mv("c", &[left + r - k, top, left, top - r + k, left, top - r]));
    ops.push(mv("l", &[left, bottom + r]));
    ops.push(mv("c", &[left, bottom + r - k, left + r - k, bottom, left + r, bottom]));
    ops.push(mv("h", &[]));
}

fn ellipse_path(cx: f32, cy: f32, r: f32, ops: &mut Vec<Operation>) {
    let k = r * KAPPA;
    let mv = |op: &str, coords: &[f32]| {
        Operation::new(op, coords.iter().map(|c| Object::Real(*c)).collect())
    };
    ops.push(mv("m", &[cx + r, cy]));
    ops.push(mv("c", &[cx + r, cy + k, cx + k, cy + r, cx, cy + r]));
    ops.push(mv("c", &[cx - k, cy + r, cx - r, cy + k, cx - r, cy]));
    ops.push(mv("c", &[cx - r, cy - k, cx - k, cy - r, cx, cy - r]));
    ops.push(mv("c", &[cx + k, cy - r, cx + r, cy - k, cx + r, cy]));
    ops.push(mv("h", &[]));
}

fn base14_font(name: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => name,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// PDF text string: UTF-16BE with byte order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Add the descendant font, descriptor, font file and ToUnicode objects and
/// return the Type0 font dictionary.
fn embedded_font_objects(
    doc: &mut Document,
    font: &EmbeddedFont,
    usage: &GlyphUsage,
) -> Dictionary {
    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => font.data().len() as i64 },
        font.data().to_vec(),
    ));
    let (x_min, y_min, x_max, y_max) = font.bbox;
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font.name.as_str(),
        "Flags" => 4,
        "FontBBox" => vec![x_min.into(), y_min.into(), x_max.into(), y_max.into()],
        "ItalicAngle" => 0,
        "Ascent" => font.ascender,
        "Descent" => font.descender,
        "CapHeight" => font.ascender,
        "StemV" => 80,
        "FontFile2" => file_id,
    });

    let mut widths: Vec<Object> = Vec::new();
    for (start, run) in font.width_runs(usage) {
        widths.push((start as i64).into());
        widths.push(Object::Array(run.into_iter().map(|w| (w as i64).into()).collect()));
    }
    let cid_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => font.name.as_str(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let cmap_id = doc.add_object(Stream::new(
        dictionary! {},
        to_unicode_cmap(usage).into_bytes(),
    ));

    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => font.name.as_str(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_id)],
        "ToUnicode" => cmap_id,
    }
}
