//! Line-by-line block classification.
//!
//! Every non-blank line becomes exactly one [`Block`]. The only state
//! carried between lines is [`ParserState`], threaded through the pass as a
//! value, so the classification of a line depends on its own text and
//! whether the contact section is open, never on the lines after it.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::contacts::ContactMatcher;
use super::options::{ContactDetection, ParseOptions};
use crate::model::{ContactField, LabelValue, ListItem};

/// One line of input with its zero-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Line number (0-indexed)
    pub index: usize,
    /// Line text without the terminator
    pub text: &'a str,
}

impl AsRef<str> for RawLine<'_> {
    fn as_ref(&self) -> &str {
        self.text
    }
}

/// Split text into raw lines.
pub fn split_lines(text: &str) -> Vec<RawLine<'_>> {
    text.split('\n')
        .enumerate()
        .map(|(index, text)| RawLine { index, text })
        .collect()
}

/// A classified unit of input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A `#` heading, or the contact section marker line
    Heading(Heading),

    /// A bulleted or numbered list item
    ListItem(ListItem),

    /// A `label: value` pair
    LabelValue(LabelValue),

    /// A contact field inside the contact section
    ContactField(ContactField),

    /// Anything else
    Paragraph {
        /// Trimmed line text
        text: String,
    },
}

impl Block {
    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading(_))
    }

    /// Check if this block is a contact field.
    pub fn is_contact_field(&self) -> bool {
        matches!(self, Block::ContactField(_))
    }

    /// Short name of the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::ListItem(_) => "list_item",
            Block::LabelValue(_) => "label_value",
            Block::ContactField(_) => "contact_field",
            Block::Paragraph { .. } => "paragraph",
        }
    }
}

/// Heading block data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Number of leading `#` (1-6)
    pub level: u8,
    /// Heading text without markers
    pub text: String,
    /// Whether this heading opens the contact section
    pub opens_contact_section: bool,
}

/// State threaded through the classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserState {
    /// Between the contact marker and the next heading
    pub in_contact_section: bool,
}

impl ParserState {
    fn entering_contacts(self) -> Self {
        Self {
            in_contact_section: true,
        }
    }

    fn leaving_contacts(self) -> Self {
        Self {
            in_contact_section: false,
        }
    }
}

/// Classifies lines into blocks.
#[derive(Debug, Clone)]
pub struct BlockClassifier {
    options: ParseOptions,
    contacts: ContactMatcher,
    numbered: Regex,
}

impl BlockClassifier {
    /// Create a classifier with default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a classifier with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            contacts: ContactMatcher::new(),
            numbered: Regex::new(r"^([0-9]+)[.)\-]\s*(.*)$").expect("numbered pattern is valid"),
        }
    }

    /// Classify lines in a single forward pass.
    pub fn classify<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Block> {
        lines
            .iter()
            .fold(
                (ParserState::default(), Vec::with_capacity(lines.len())),
                |(state, mut blocks), line| {
                    let (next, block) = self.classify_line(state, line.as_ref());
                    blocks.extend(block);
                    (next, blocks)
                },
            )
            .1
    }

    /// Classify one line given the running state.
    ///
    /// Blank lines produce no block and leave the state unchanged.
    pub fn classify_line(&self, state: ParserState, line: &str) -> (ParserState, Option<Block>) {
        let t = line.trim();
        if t.is_empty() {
            return (state, None);
        }

        if let Some((level, text)) = self.contact_marker(t) {
            log::debug!("contact section opened by {:?}", t);
            return (
                state.entering_contacts(),
                Some(Block::Heading(Heading {
                    level,
                    text: text.to_string(),
                    opens_contact_section: true,
                })),
            );
        }

        if let Some((level, text)) = heading_parts(t) {
            if state.in_contact_section {
                log::debug!("contact section closed by {:?}", t);
            }
            return (
                state.leaving_contacts(),
                Some(Block::Heading(Heading {
                    level,
                    text: text.to_string(),
                    opens_contact_section: false,
                })),
            );
        }

        let contact_line = state.in_contact_section
            || (self.options.contact_detection == ContactDetection::Anywhere
                && self.contacts.looks_like_contact(t));
        if contact_line {
            if let Some(field) = self.contacts.recognize(t) {
                return (state, Some(Block::ContactField(field)));
            }
        }

        (state, Some(self.classify_content(t)))
    }

    /// Level and text of a line that opens the contact section: a heading
    /// containing the marker, or a line that is the marker alone (an
    /// optional trailing colon allowed). Prose that merely mentions the
    /// marker does not open it.
    fn contact_marker<'t>(&self, t: &'t str) -> Option<(u8, &'t str)> {
        let marker = self.options.contact_marker.as_str();
        if marker.is_empty() {
            return None;
        }
        match heading_parts(t) {
            Some((level, text)) if text.contains(marker) => Some((level, text)),
            Some(_) => None,
            None => {
                let bare = t.trim_end_matches([':', '：']).trim_end();
                (bare == marker).then_some((1, bare))
            }
        }
    }

    fn classify_content(&self, t: &str) -> Block {
        if let Some(rest) = t.strip_prefix('-').or_else(|| t.strip_prefix('•')) {
            let content = rest.trim();
            if !content.is_empty() {
                return match LabelValue::split(content) {
                    Some(pair) => Block::LabelValue(pair),
                    None => Block::ListItem(ListItem::bullet(content)),
                };
            }
        }

        if let Some(caps) = self.numbered.captures(t) {
            if let Ok(index) = caps[1].parse::<u32>() {
                return Block::ListItem(ListItem::numbered(index, caps[2].trim()));
            }
        }

        if self.options.plain_label_values {
            if let Some(pair) = LabelValue::split(t) {
                if pair.label.chars().count() <= self.options.max_label_chars {
                    return Block::LabelValue(pair);
                }
            }
        }

        Block::Paragraph {
            text: t.to_string(),
        }
    }
}

impl Default for BlockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a `#`-prefixed line into level and text.
fn heading_parts(t: &str) -> Option<(u8, &str)> {
    let hashes = t.chars().take_while(|c| *c == '#').count();
    if hashes == 0 {
        return None;
    }
    let level = hashes.clamp(1, 6) as u8;
    Some((level, t[hashes..].trim()))
}

/// Classify lines with default options.
pub fn classify<S: AsRef<str>>(lines: &[S]) -> Vec<Block> {
    BlockClassifier::new().classify(lines)
}
