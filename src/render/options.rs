//! Rendering options and configuration.

use std::path::PathBuf;

use crate::bidi::ReadingOrder;
use crate::layout::{HeaderPolicy, LayoutEngine, LayoutStyle, PageSpec, DEFAULT_FOOTER, DEFAULT_TITLE};

/// Default file name for fixed-page output.
pub const DEFAULT_PDF_NAME: &str = "مذكرة-تفاهم.pdf";

/// Default file name for flowed output.
pub const DEFAULT_DOCX_NAME: &str = "result.docx";

/// Options shared by the renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Document title (header band, document metadata)
    pub title: String,

    /// Footer caption on the last page
    pub footer: Option<String>,

    /// Which pages carry the header band
    pub header_policy: HeaderPolicy,

    /// How the fixed-page renderer orders line text before drawing
    pub reading_order: ReadingOrder,

    /// Font for the fixed-page renderer
    pub font: FontSource,

    /// Page geometry for the fixed-page renderer
    pub page_spec: PageSpec,

    /// Fixed-page look
    pub style: LayoutStyle,

    /// Font family named in the flowed document
    pub docx_font: String,

    /// Run size in the flowed document, in half-points
    pub docx_size: u32,

    /// Structure of the flowed document
    pub docx_mode: DocxMode,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the footer caption.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Remove the footer caption.
    pub fn without_footer(mut self) -> Self {
        self.footer = None;
        self
    }

    /// Set the header policy.
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    /// Set the reading order of the fixed-page renderer.
    pub fn with_reading_order(mut self, order: ReadingOrder) -> Self {
        self.reading_order = order;
        self
    }

    /// Set the font source.
    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    /// Embed a TrueType font from a file.
    pub fn with_font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = FontSource::File(path.into());
        self
    }

    /// Set the page geometry.
    pub fn with_page_spec(mut self, spec: PageSpec) -> Self {
        self.page_spec = spec;
        self
    }

    /// Set the fixed-page style.
    pub fn with_style(mut self, style: LayoutStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the flowed document font family.
    pub fn with_docx_font(mut self, family: impl Into<String>) -> Self {
        self.docx_font = family.into();
        self
    }

    /// Set the flowed document run size in half-points.
    pub fn with_docx_size(mut self, half_points: u32) -> Self {
        self.docx_size = half_points.max(2);
        self
    }

    /// Set the flowed document mode.
    pub fn with_docx_mode(mut self, mode: DocxMode) -> Self {
        self.docx_mode = mode;
        self
    }

    /// Layout engine configured from these options.
    pub fn layout_engine(&self) -> LayoutEngine {
        LayoutEngine::new()
            .with_page_spec(self.page_spec)
            .with_style(self.style.clone())
            .with_header_policy(self.header_policy)
            .with_title(self.title.clone())
            .with_footer(self.footer.clone())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            footer: Some(DEFAULT_FOOTER.to_string()),
            header_policy: HeaderPolicy::FirstPage,
            reading_order: ReadingOrder::Visual,
            font: FontSource::Bundled,
            page_spec: PageSpec::a4(),
            style: LayoutStyle::default(),
            docx_font: "Amiri".to_string(),
            docx_size: 28,
            docx_mode: DocxMode::Structured,
        }
    }
}

/// Where the fixed-page renderer gets its font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// The bundled Latin and Arabic font, embedded
    #[default]
    Bundled,
    /// Standard Helvetica, not embedded. Rendering fails on text outside
    /// Latin-1.
    Builtin,
    /// A TrueType file to embed
    File(PathBuf),
    /// TrueType data to embed
    Bytes(Vec<u8>),
}

/// Structure of the flowed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocxMode {
    /// Headings, lists, label/value rows and a contact table
    #[default]
    Structured,
    /// One right-to-left paragraph per input line
    PlainLines,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.title, DEFAULT_TITLE);
        assert_eq!(options.reading_order, ReadingOrder::Visual);
        assert_eq!(options.font, FontSource::Bundled);
        assert_eq!(options.docx_size, 28);
        assert_eq!(options.docx_mode, DocxMode::Structured);
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .with_title("Memo")
            .without_footer()
            .with_header_policy(HeaderPolicy::EveryPage)
            .with_font_file("/fonts/Amiri.ttf")
            .with_docx_size(0);

        assert_eq!(options.title, "Memo");
        assert!(options.footer.is_none());
        assert_eq!(options.header_policy, HeaderPolicy::EveryPage);
        assert_eq!(options.font, FontSource::File(PathBuf::from("/fonts/Amiri.ttf")));
        assert_eq!(options.docx_size, 2);
    }
}
