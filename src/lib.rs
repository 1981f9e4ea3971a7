//! # rtldoc
//!
//! Turns Arabic (right-to-left) extracted text into structured, styled
//! documents.
//!
//! Raw text from an extraction service is cleaned, classified line by line
//! into headings, list items, label/value pairs, contact fields and
//! paragraphs, and assembled into a [`DocumentModel`]. The model can then be
//! rendered as a paginated PDF, a flowed DOCX document or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rtldoc::{parse, render};
//!
//! fn main() -> rtldoc::Result<()> {
//!     let text = std::fs::read_to_string("extracted.txt")?;
//!     let model = parse(&text);
//!
//!     let options = render::RenderOptions::default();
//!     let pdf = render::to_pdf(&model, &options)?;
//!     std::fs::write("memo.pdf", pdf)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bidi normalization**: numeric and Latin runs are isolated so they keep
//!   their order inside right-to-left lines
//! - **Contact aggregation**: contact fields are grouped into records and
//!   rendered as a five-column table
//! - **Fixed-page layout**: headings and tables never split across pages;
//!   paragraphs break line by line
//! - **Flowed output**: right-to-left DOCX with per-run direction flags

pub mod bidi;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod upstream;

// Re-export commonly used types
pub use bidi::{BidiNormalizer, IsolationStyle, NormalizeOptions, ReadingOrder};
pub use error::{Error, Result};
pub use layout::{HeaderPolicy, Layout, LayoutEngine, LayoutStyle, PageSpec};
pub use model::{
    Contact, ContactKind, ContactSection, DocumentModel, LabelValue, ListItem, Section,
    SectionItem,
};
pub use parser::{Block, BlockClassifier, ContactDetection, LeadingContent, ParseOptions};
pub use render::{DocxMode, FontSource, JsonFormat, RenderOptions};
pub use upstream::{Extractor, UpstreamResponse};

use std::path::Path;

/// Parse extracted text with default options.
///
/// # Example
///
/// ```
/// let model = rtldoc::parse("# Intro\nHello world\n");
/// assert_eq!(model.sections[0].title, "Intro");
/// ```
pub fn parse(text: &str) -> DocumentModel {
    parser::parse_text(text, &ParseOptions::default())
}

/// Parse extracted text with custom options.
///
/// # Example
///
/// ```
/// use rtldoc::{parse_with_options, LeadingContent, ParseOptions};
///
/// let options = ParseOptions::new().with_leading_content(LeadingContent::Discard);
/// let model = parse_with_options("preamble\n# Intro\nHello\n", &options);
/// assert_eq!(model.section_count(), 1);
/// ```
pub fn parse_with_options(text: &str, options: &ParseOptions) -> DocumentModel {
    parser::parse_text(text, options)
}

/// Parse a UTF-8 text file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DocumentModel> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse(&text))
}

/// Convert extracted text to a PDF with default options.
///
/// # Example
///
/// ```no_run
/// let pdf = rtldoc::to_pdf("# Intro\nHello world\n").unwrap();
/// std::fs::write("memo.pdf", pdf).unwrap();
/// ```
pub fn to_pdf(text: &str) -> Result<Vec<u8>> {
    render::to_pdf(&parse(text), &RenderOptions::default())
}

/// Convert extracted text to a DOCX document with default options.
pub fn to_docx(text: &str) -> Result<Vec<u8>> {
    render::to_docx(&parse(text), &RenderOptions::default())
}

/// Convert extracted text to JSON.
///
/// # Example
///
/// ```
/// use rtldoc::{to_json, JsonFormat};
///
/// let json = to_json("# Intro\nHello\n", JsonFormat::Compact).unwrap();
/// assert!(json.contains("Intro"));
/// ```
pub fn to_json(text: &str, format: JsonFormat) -> Result<String> {
    render::to_json(&parse(text), format)
}

/// Builder for parsing and rendering extracted text.
///
/// # Example
///
/// ```no_run
/// use rtldoc::{HeaderPolicy, RtlDoc};
///
/// let pdf = RtlDoc::new()
///     .with_title("Memorandum")
///     .with_header_policy(HeaderPolicy::EveryPage)
///     .with_font_file("fonts/Amiri-Regular.ttf")
///     .parse("# Intro\nHello world\n")
///     .to_pdf()?;
/// # Ok::<(), rtldoc::Error>(())
/// ```
pub struct RtlDoc {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl RtlDoc {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Set the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Recognize contact fields outside the contact section too.
    pub fn standalone_contacts(mut self) -> Self {
        self.parse_options = self.parse_options.standalone_contacts();
        self
    }

    /// Set what happens to content before the first heading.
    pub fn with_leading_content(mut self, policy: LeadingContent) -> Self {
        self.parse_options = self.parse_options.with_leading_content(policy);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_title(title);
        self
    }

    /// Set the header policy.
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.render_options = self.render_options.with_header_policy(policy);
        self
    }

    /// Set the reading order of the fixed-page renderer.
    pub fn with_reading_order(mut self, order: ReadingOrder) -> Self {
        self.render_options = self.render_options.with_reading_order(order);
        self
    }

    /// Embed a TrueType font from a file.
    pub fn with_font_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.render_options = self.render_options.with_font_file(path);
        self
    }

    /// Set the flowed document mode.
    pub fn with_docx_mode(mut self, mode: DocxMode) -> Self {
        self.render_options = self.render_options.with_docx_mode(mode);
        self
    }

    /// Parse extracted text and return a result wrapper.
    pub fn parse(self, text: &str) -> RtlDocResult {
        RtlDocResult {
            model: parser::parse_text(text, &self.parse_options),
            source: text.to_string(),
            render_options: self.render_options,
        }
    }

    /// Parse a UTF-8 text file.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<RtlDocResult> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.parse(&text))
    }
}

impl Default for RtlDoc {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing extracted text.
pub struct RtlDocResult {
    /// The parsed model
    pub model: DocumentModel,
    /// The text the model was parsed from
    source: String,
    /// Render options to use
    render_options: RenderOptions,
}

impl RtlDocResult {
    /// Render to PDF.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        render::to_pdf(&self.model, &self.render_options)
    }

    /// Render to DOCX. In [`DocxMode::PlainLines`] the source text is used
    /// line for line.
    pub fn to_docx(&self) -> Result<Vec<u8>> {
        let renderer = render::DocxRenderer::new(self.render_options.clone());
        match self.render_options.docx_mode {
            DocxMode::Structured => renderer.render(&self.model),
            DocxMode::PlainLines => renderer.render_lines(&self.source),
        }
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.model, format)
    }

    /// Lay the model out on pages without rendering.
    ///
    /// Text is measured with the average-width estimate; the PDF renderer
    /// measures with its actual font and may paginate differently.
    pub fn layout(&self) -> Layout {
        self.render_options
            .layout_engine()
            .layout(&self.model, &layout::AverageWidth::default())
    }

    /// Get the model.
    pub fn model(&self) -> &DocumentModel {
        &self.model
    }
}
