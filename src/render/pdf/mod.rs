//! Fixed-page (PDF) rendering.
//!
//! The model is laid out by the [`LayoutEngine`](crate::layout::LayoutEngine)
//! using the chosen font as measurer, then the pages are serialized with
//! lopdf. Line text is put into the configured [`ReadingOrder`] first, since
//! PDF places glyphs strictly left to right.
//!
//! [`ReadingOrder`]: crate::bidi::ReadingOrder

mod font;
mod writer;

pub use font::{
    encode_win_ansi, to_unicode_cmap, EmbeddedFont, GlyphUsage, PdfFont, BUNDLED_FONT,
};
pub use writer::PdfWriter;

use std::path::Path;

use super::RenderOptions;
use crate::error::Result;
use crate::layout::Layout;
use crate::model::DocumentModel;

/// Renders document models to PDF.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    options: RenderOptions,
    font: PdfFont,
}

impl PdfRenderer {
    /// Create a renderer, loading the configured font.
    pub fn new(options: RenderOptions) -> Result<Self> {
        let font = PdfFont::load(&options.font)?;
        Ok(Self { options, font })
    }

    /// Get the loaded font.
    pub fn font(&self) -> &PdfFont {
        &self.font
    }

    /// Lay out a model without serializing it.
    pub fn layout(&self, model: &DocumentModel) -> Layout {
        self.options.layout_engine().layout(model, &self.font)
    }

    /// Render a model to PDF bytes.
    pub fn render(&self, model: &DocumentModel) -> Result<Vec<u8>> {
        let layout = self.layout(model);
        log::debug!(
            "layout: {} pages, {} commands, {} breaks",
            layout.page_count,
            layout.commands.len(),
            layout.page_breaks.len()
        );
        self.render_layout(&layout)
    }

    /// Serialize an existing layout.
    pub fn render_layout(&self, layout: &Layout) -> Result<Vec<u8>> {
        PdfWriter::new(&self.font, self.options.reading_order, &self.options.title).write(layout)
    }

    /// Render a model and write it to a file.
    pub fn render_to_file(&self, model: &DocumentModel, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render(model)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Render a model to PDF bytes.
pub fn to_pdf(model: &DocumentModel, options: &RenderOptions) -> Result<Vec<u8>> {
    PdfRenderer::new(options.clone())?.render(model)
}
