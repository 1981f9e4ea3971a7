//! Error types for rtldoc.
//!
//! Parsing and layout are total and never fail; only serialization of the
//! output documents and the resources it needs (fonts, files) can error.

use std::io;
use thiserror::Error;

/// Result type alias for rtldoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A font resource could not be read or parsed.
    #[error("Font error: {0}")]
    Font(String),

    /// Error serializing the fixed-page (PDF) document.
    #[error("PDF writing error: {0}")]
    Pdf(String),

    /// Error packaging the flowed (DOCX) document.
    #[error("DOCX packaging error: {0}")]
    Docx(String),

    /// Error writing WordprocessingML markup.
    #[error("XML writing error: {0}")]
    Xml(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error serializing or deserializing JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream extraction service could not be used.
    #[error("Upstream extraction failed: {0}")]
    Upstream(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Docx(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<ttf_parser::FaceParsingError> for Error {
    fn from(err: ttf_parser::FaceParsingError) -> Self {
        Error::Font(err.to_string())
    }
}
