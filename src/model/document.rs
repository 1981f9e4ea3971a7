//! Document-level types.

use serde::{Deserialize, Serialize};

use super::Contact;

/// The structured form of one extracted text.
///
/// Built once per input string by [`DocumentBuilder`](super::DocumentBuilder)
/// and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Sections in input order
    pub sections: Vec<Section>,

    /// Contact records in input order
    pub contacts: Vec<Contact>,

    /// The contact section heading, when the input had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_section: Option<ContactSection>,
}

impl DocumentModel {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the model has no sections and no contacts.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.contacts.is_empty() && self.contact_section.is_none()
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Get the total number of section items.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Title used above the contact table.
    pub fn contact_title(&self) -> Option<&str> {
        self.contact_section.as_ref().map(|c| c.title.as_str())
    }

    /// Get plain text content of the model, one line per item.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for section in &self.sections {
            if section.has_title() {
                lines.push(section.title.clone());
            }
            lines.extend(section.items.iter().map(SectionItem::plain_text));
        }
        if let Some(ref contact_section) = self.contact_section {
            lines.push(contact_section.title.clone());
            lines.extend(contact_section.notes.iter().map(SectionItem::plain_text));
        }
        lines.join("\n")
    }
}

/// A titled run of content items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section title (empty for the implicit leading section and for a
    /// bare `#` line)
    pub title: String,

    /// Heading level the title came from (0 for the implicit section)
    pub level: u8,

    /// Content items in input order
    pub items: Vec<SectionItem>,
}

impl Section {
    /// Create a new titled section.
    pub fn new(title: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            level,
            items: Vec::new(),
        }
    }

    /// Create the untitled section that holds content preceding any heading.
    pub fn untitled() -> Self {
        Self::new("", 0)
    }

    /// Check if this is the implicit section for content before any heading.
    ///
    /// A heading with no text still opens a section of its own, so this
    /// looks at the level rather than the title.
    pub fn is_untitled(&self) -> bool {
        self.level == 0
    }

    /// Check if there is a title to show.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Append an item.
    pub fn push(&mut self, item: SectionItem) {
        self.items.push(item);
    }
}

/// The heading of the contact section and any non-contact lines inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSection {
    /// Heading text
    pub title: String,

    /// Lines inside the section that were not contact fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<SectionItem>,
}

impl ContactSection {
    /// Create a contact section heading.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: Vec::new(),
        }
    }
}

/// Content that can appear inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionItem {
    /// A bulleted or numbered list item
    ListItem(ListItem),

    /// A `label: value` row
    LabelValue(LabelValue),

    /// A plain paragraph
    Paragraph {
        /// Paragraph text
        text: String,
    },
}

impl SectionItem {
    /// Create a paragraph item.
    pub fn paragraph(text: impl Into<String>) -> Self {
        SectionItem::Paragraph { text: text.into() }
    }

    /// Get the item text as a single line.
    pub fn plain_text(&self) -> String {
        match self {
            SectionItem::ListItem(item) => match item.marker {
                ListMarker::Bullet => format!("• {}", item.text),
                ListMarker::Numbered => {
                    format!("{}. {}", item.index.unwrap_or(1), item.text)
                }
            },
            SectionItem::LabelValue(pair) => format!("{}: {}", pair.label, pair.value),
            SectionItem::Paragraph { text } => text.clone(),
        }
    }

    /// Check if this item is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, SectionItem::Paragraph { .. })
    }

    /// Check if this item is a list item.
    pub fn is_list_item(&self) -> bool {
        matches!(self, SectionItem::ListItem(_))
    }
}

/// List marker kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMarker {
    /// `-` or `•`
    Bullet,
    /// `1.`, `2)`, `3-`
    Numbered,
}

/// A list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Marker kind
    pub marker: ListMarker,

    /// Leading number for numbered items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Item text without the marker
    pub text: String,
}

impl ListItem {
    /// Create a bulleted item.
    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            marker: ListMarker::Bullet,
            index: None,
            text: text.into(),
        }
    }

    /// Create a numbered item.
    pub fn numbered(index: u32, text: impl Into<String>) -> Self {
        Self {
            marker: ListMarker::Numbered,
            index: Some(index),
            text: text.into(),
        }
    }

    /// Marker text drawn at the leading edge.
    pub fn marker_text(&self) -> String {
        match self.marker {
            ListMarker::Bullet => "•".to_string(),
            ListMarker::Numbered => format!("{}.", self.index.unwrap_or(1)),
        }
    }
}

/// A `label: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValue {
    /// Text before the first colon
    pub label: String,
    /// Text after the first colon
    pub value: String,
}

impl LabelValue {
    /// Create a new pair.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Split on the first colon; both sides must be non-empty after trimming.
    pub fn split(text: &str) -> Option<Self> {
        let (label, value) = text.split_once(':')?;
        let (label, value) = (label.trim(), value.trim());
        if label.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self::new(label, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_new() {
        let model = DocumentModel::new();
        assert!(model.is_empty());
        assert_eq!(model.section_count(), 0);
        assert_eq!(model.item_count(), 0);
        assert_eq!(model.contact_title(), None);
    }

    #[test]
    fn test_label_value_split() {
        let pair = LabelValue::split("تاريخ البدء: 1/1/2024").unwrap();
        assert_eq!(pair.label, "تاريخ البدء");
        assert_eq!(pair.value, "1/1/2024");

        // Only the first colon splits.
        let pair = LabelValue::split("الوقت: 10:30").unwrap();
        assert_eq!(pair.value, "10:30");

        assert!(LabelValue::split("بدون فاصل").is_none());
        assert!(LabelValue::split("عنوان:").is_none());
        assert!(LabelValue::split(": قيمة").is_none());
    }

    #[test]
    fn test_plain_text() {
        let mut section = Section::new("Intro", 1);
        section.push(SectionItem::paragraph("Hello"));
        section.push(SectionItem::ListItem(ListItem::numbered(2, "Second")));
        let model = DocumentModel {
            sections: vec![section],
            ..Default::default()
        };
        assert_eq!(model.plain_text(), "Intro\nHello\n2. Second");
    }

    #[test]
    fn test_marker_text() {
        assert_eq!(ListItem::bullet("x").marker_text(), "•");
        assert_eq!(ListItem::numbered(3, "x").marker_text(), "3.");
    }
}
