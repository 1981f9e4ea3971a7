//! Text parsing module.
//!
//! Raw extracted text is cleaned, split into lines and classified into
//! [`Block`]s in a single forward pass.

mod classifier;
mod contacts;
mod options;

pub use classifier::{
    classify, split_lines, Block, BlockClassifier, Heading, ParserState, RawLine,
};
pub use contacts::{aggregate, ContactAggregator, ContactMatcher};
pub use options::{ContactDetection, LeadingContent, ParseOptions, DEFAULT_CONTACT_MARKER};

use crate::bidi::BidiNormalizer;
use crate::model::{DocumentBuilder, DocumentModel};

/// Clean the text and classify its lines.
pub fn parse_blocks(text: &str, options: &ParseOptions) -> Vec<Block> {
    let cleaned = BidiNormalizer::with_options(options.normalize.clone()).clean(text);
    let lines = split_lines(&cleaned);
    log::debug!("classifying {} lines", lines.len());
    BlockClassifier::with_options(options.clone()).classify(&lines)
}

/// Parse extracted text into a document model.
///
/// Never fails: every line is classified and empty input yields an empty
/// model.
pub fn parse_text(text: &str, options: &ParseOptions) -> DocumentModel {
    let mut builder = DocumentBuilder::from_options(options);
    for block in parse_blocks(text, options) {
        builder.push(block);
    }
    builder.build()
}
