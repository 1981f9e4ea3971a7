//! Rendering module for turning document models into output artifacts.
//!
//! The fixed-page renderer goes through the layout engine; the flowed and
//! JSON renderers work from the model directly.

mod docx;
mod json;
mod options;
pub mod pdf;

pub use docx::{to_docx, DocxRenderer};
pub use json::{from_json, to_json, JsonFormat};
pub use options::{DocxMode, FontSource, RenderOptions, DEFAULT_DOCX_NAME, DEFAULT_PDF_NAME};
pub use pdf::{to_pdf, PdfRenderer};
