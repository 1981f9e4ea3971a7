//! Fonts for the fixed-page renderer.
//!
//! Two kinds are supported: the standard Helvetica pair, which needs no
//! embedding but only covers Latin-1, and an embedded TrueType font written
//! as a Type0 font with Identity-H encoding so any glyph in the file can be
//! addressed. A DejaVu Sans cut covering Latin and Arabic ships with the
//! crate and is embedded unless another font is configured.

use std::collections::{BTreeMap, HashMap};

use ttf_parser::{Face, GlyphId};

use crate::bidi::is_bidi_control;
use crate::error::{Error, Result};
use crate::layout::{TextMeasurer, MM_PER_PT};
use crate::render::FontSource;

/// DejaVu Sans reduced to Latin-1, general punctuation and Arabic.
pub const BUNDLED_FONT: &[u8] = include_bytes!("../../../fonts/DejaVuSans-Arabic.ttf");

/// A font ready for use by the PDF writer.
#[derive(Debug, Clone)]
pub enum PdfFont {
    /// Helvetica / Helvetica-Bold with WinAnsi encoding
    Base14,
    /// Embedded TrueType font
    Embedded(EmbeddedFont),
}

impl PdfFont {
    /// Load the font a [`FontSource`] points to.
    ///
    /// An unreadable or unparseable font file is an error; there is no
    /// silent fallback to the built-in font.
    pub fn load(source: &FontSource) -> Result<Self> {
        match source {
            FontSource::Bundled => Ok(PdfFont::Embedded(EmbeddedFont::from_data(
                BUNDLED_FONT.to_vec(),
            )?)),
            FontSource::Builtin => Ok(PdfFont::Base14),
            FontSource::File(path) => {
                let data = std::fs::read(path).map_err(|e| {
                    Error::Font(format!("cannot read {}: {}", path.display(), e))
                })?;
                Ok(PdfFont::Embedded(EmbeddedFont::from_data(data)?))
            }
            FontSource::Bytes(data) => Ok(PdfFont::Embedded(EmbeddedFont::from_data(data.clone())?)),
        }
    }

    /// Width of `text` in points.
    pub fn width_pt(&self, text: &str, size: f32, bold: bool) -> f32 {
        let units: u32 = match self {
            PdfFont::Base14 => text
                .chars()
                .filter(|c| !is_bidi_control(*c))
                .map(|c| helvetica_width(c, bold) as u32)
                .sum(),
            PdfFont::Embedded(font) => text
                .chars()
                .filter(|c| !is_bidi_control(*c))
                .map(|c| font.char_width(c) as u32)
                .sum(),
        };
        units as f32 * size / 1000.0
    }
}

impl TextMeasurer for PdfFont {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        self.width_pt(text, size, bold) * MM_PER_PT
    }
}

/// Glyphs used while writing, keyed by glyph id.
pub type GlyphUsage = BTreeMap<u16, char>;

/// A parsed TrueType font.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    /// PostScript name, or a generated one
    pub name: String,
    data: Vec<u8>,
    glyphs: HashMap<char, u16>,
    /// Advance widths in 1/1000 em
    widths: HashMap<u16, u16>,
    pub ascender: i32,
    pub descender: i32,
    /// `(x_min, y_min, x_max, y_max)` in 1/1000 em
    pub bbox: (i32, i32, i32, i32),
}

impl EmbeddedFont {
    /// Parse TrueType data.
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0)?;
        let upem = face.units_per_em().max(1) as f32;
        let scale = |v: f32| (v * 1000.0 / upem).round() as i32;

        let mut glyphs = HashMap::new();
        let mut widths = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|cp| {
                    let Some(ch) = char::from_u32(cp) else {
                        return;
                    };
                    if let Some(gid) = subtable.glyph_index(cp) {
                        glyphs.entry(ch).or_insert(gid.0);
                        let advance = face.glyph_hor_advance(gid).unwrap_or(0) as f32;
                        widths.entry(gid.0).or_insert(scale(advance) as u16);
                    }
                });
            }
        }
        if glyphs.is_empty() {
            return Err(Error::Font("font has no Unicode cmap".to_string()));
        }

        let name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|n| n.to_string())
            .map(|n| n.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect())
            .filter(|n: &String| !n.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let rect = face.global_bounding_box();
        let notdef_width = face
            .glyph_hor_advance(GlyphId(0))
            .map(|a| scale(a as f32) as u16)
            .unwrap_or(500);
        widths.entry(0).or_insert(notdef_width);

        log::debug!("embedded font {} with {} mapped characters", name, glyphs.len());
        Ok(Self {
            name,
            ascender: scale(face.ascender() as f32),
            descender: scale(face.descender() as f32),
            bbox: (
                scale(rect.x_min as f32),
                scale(rect.y_min as f32),
                scale(rect.x_max as f32),
                scale(rect.y_max as f32),
            ),
            data,
            glyphs,
            widths,
        })
    }

    /// Raw font file bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph id for a character, if the font maps it.
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.glyphs.get(&ch).copied()
    }

    /// Advance width of a glyph in 1/1000 em.
    pub fn glyph_width(&self, gid: u16) -> u16 {
        self.widths.get(&gid).copied().unwrap_or(500)
    }

    /// Advance width of a character in 1/1000 em.
    pub fn char_width(&self, ch: char) -> u16 {
        self.glyph_width(self.glyph_id(ch).unwrap_or(0))
    }

    /// Encode text as big-endian glyph ids, recording which glyphs were used.
    pub fn encode(&self, text: &str, usage: &mut GlyphUsage) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let gid = match self.glyph_id(ch) {
                Some(gid) => gid,
                None => {
                    log::warn!("no glyph for {:?} (U+{:04X})", ch, ch as u32);
                    0
                }
            };
            usage.entry(gid).or_insert(ch);
            out.extend_from_slice(&gid.to_be_bytes());
        }
        out
    }

    /// Widths of the used glyphs, grouped into runs of consecutive ids as
    /// `(first_gid, widths)`.
    pub fn width_runs(&self, usage: &GlyphUsage) -> Vec<(u16, Vec<u16>)> {
        let mut runs: Vec<(u16, Vec<u16>)> = Vec::new();
        for &gid in usage.keys() {
            let width = self.glyph_width(gid);
            match runs.last_mut() {
                Some((start, widths)) if *start as usize + widths.len() == gid as usize => {
                    widths.push(width)
                }
                _ => runs.push((gid, vec![width])),
            }
        }
        runs
    }
}

/// ToUnicode CMap mapping used glyph ids back to characters.
pub fn to_unicode_cmap(usage: &GlyphUsage) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let mappings: Vec<(&u16, &char)> = usage.iter().filter(|(gid, _)| **gid != 0).collect();
    for chunk in mappings.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

/// Encode text for a WinAnsi font.
///
/// Fails on the first character outside Latin-1 and the bullet; the
/// standard fonts have no glyph for it.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => Ok(c as u8),
            0x2022 => Ok(0x95),
            _ => Err(Error::Font(format!(
                "built-in Helvetica cannot show {:?} (U+{:04X}); embed a TrueType font",
                c, c as u32
            ))),
        })
        .collect()
}

/// Approximate Helvetica advance widths in 1/1000 em.
fn helvetica_width(c: char, bold: bool) -> u16 {
    let regular = match c {
        ' ' | ',' | '.' | '/' | ':' | ';' | '!' => 278,
        'i' | 'j' | 'l' => 222,
        'f' | 't' | 'I' | '[' | ']' => 278,
        'r' | '-' | '(' | ')' => 333,
        'm' => 833,
        'w' => 722,
        'M' => 833,
        'W' => 944,
        '@' => 1015,
        '0'..='9' | 'a'..='z' | '$' | '_' | '#' => 556,
        'A'..='Z' => 667,
        '\u{2022}' => 350,
        _ => 556,
    };
    if bold {
        regular + regular / 12
    } else {
        regular
    }
}
