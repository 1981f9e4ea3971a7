//! Reading the text payload out of an upstream extraction response.
//!
//! The extraction service answers with a JSON object whose text may sit
//! under one of several keys. The keys are tried in a fixed priority order
//! and the first non-empty string wins; a pretty-printed dump of the whole
//! response is the last resort.

use serde_json::Value;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// One way of pulling text out of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// The `resultText` field
    ResultText,
    /// The `statusText` field
    StatusText,
    /// The `message` field
    Message,
    /// The whole response, pretty-printed
    JsonDump,
}

impl Extractor {
    /// The default priority order.
    pub const CHAIN: [Extractor; 4] = [
        Extractor::ResultText,
        Extractor::StatusText,
        Extractor::Message,
        Extractor::JsonDump,
    ];

    /// Response key read by this extractor.
    pub fn key(self) -> Option<&'static str> {
        match self {
            Extractor::ResultText => Some("resultText"),
            Extractor::StatusText => Some("statusText"),
            Extractor::Message => Some("message"),
            Extractor::JsonDump => None,
        }
    }

    /// Apply the extractor. Keyed extractors only match non-empty strings.
    pub fn extract(self, value: &Value) -> Option<String> {
        match self.key() {
            Some(key) => value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            None => serde_json::to_string_pretty(value).ok(),
        }
    }
}

/// A parsed upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    value: Value,
}

impl UpstreamResponse {
    /// Parse a response body.
    pub fn parse(body: &str) -> Result<Self> {
        let value = serde_json::from_str(body)
            .map_err(|e| Error::Upstream(format!("malformed response: {}", e)))?;
        Ok(Self { value })
    }

    /// Wrap an already parsed value.
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// The raw response value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Run `chain` in order and return the first match with the extractor
    /// that produced it.
    pub fn extract_with(&self, chain: &[Extractor]) -> Option<(Extractor, String)> {
        chain
            .iter()
            .find_map(|extractor| extractor.extract(&self.value).map(|text| (*extractor, text)))
    }

    /// Text payload using the default chain.
    pub fn text(&self) -> String {
        match self.extract_with(&Extractor::CHAIN) {
            Some((extractor, text)) => {
                log::debug!("upstream text taken from {:?}", extractor);
                text
            }
            None => String::new(),
        }
    }
}

/// Text payload of a response body. A malformed body yields an empty string.
pub fn extract_text(body: &str) -> String {
    match UpstreamResponse::parse(body) {
        Ok(response) => response.text(),
        Err(e) => {
            log::warn!("{}", e);
            String::new()
        }
    }
}

/// Check that an upload starts with a PDF header (`%PDF-x.y`).
pub fn is_pdf_upload(data: &[u8]) -> bool {
    match data.strip_prefix(PDF_MAGIC) {
        Some([major, b'.', minor, ..]) => major.is_ascii_digit() && minor.is_ascii_digit(),
        _ => false,
    }
}
