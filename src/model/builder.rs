//! Assembles classified blocks into a [`DocumentModel`].

use super::{ContactSection, DocumentModel, LabelValue, ListItem, Section, SectionItem};
use crate::bidi::BidiNormalizer;
use crate::parser::{Block, ContactAggregator, Heading, LeadingContent, ParseOptions};

/// Builds a document model from blocks in a single forward pass.
///
/// Headings open sections; every other block goes to the open section.
/// Contact fields bypass the sections and are grouped by a
/// [`ContactAggregator`]. Lines inside the contact section that are not
/// contact fields become [`ContactSection::notes`].
#[derive(Debug)]
pub struct DocumentBuilder {
    leading: LeadingContent,
    isolator: Option<BidiNormalizer>,
    sections: Vec<Section>,
    current: Option<Section>,
    contact_section: Option<ContactSection>,
    in_contacts: bool,
    contacts: ContactAggregator,
}

impl DocumentBuilder {
    /// Create a builder with the default leading-content policy and no
    /// run isolation.
    pub fn new() -> Self {
        Self {
            leading: LeadingContent::default(),
            isolator: None,
            sections: Vec::new(),
            current: None,
            contact_section: None,
            in_contacts: false,
            contacts: ContactAggregator::new(),
        }
    }

    /// Create a builder configured from parse options.
    pub fn from_options(options: &ParseOptions) -> Self {
        let isolator = options
            .isolate_runs
            .then(|| BidiNormalizer::with_options(options.normalize.clone()));
        Self {
            leading: options.leading_content,
            isolator,
            ..Self::new()
        }
    }

    /// Set the policy for content before the first heading.
    pub fn with_leading_content(mut self, policy: LeadingContent) -> Self {
        self.leading = policy;
        self
    }

    /// Wrap numeric and phone runs of display text using this normalizer.
    pub fn with_isolator(mut self, normalizer: BidiNormalizer) -> Self {
        self.isolator = Some(normalizer);
        self
    }

    /// Feed one block.
    pub fn push(&mut self, block: Block) {
        match block {
            Block::Heading(heading) => self.push_heading(heading),
            Block::ContactField(field) => self.contacts.push(field),
            Block::ListItem(item) => {
                let text = self.display(&item.text);
                self.push_item(SectionItem::ListItem(ListItem { text, ..item }));
            }
            Block::LabelValue(pair) => {
                let value = self.display(&pair.value);
                self.push_item(SectionItem::LabelValue(LabelValue::new(pair.label, value)));
            }
            Block::Paragraph { text } => {
                let text = self.display(&text);
                self.push_item(SectionItem::Paragraph { text });
            }
        }
    }

    /// Finish the pass and return the model.
    pub fn build(mut self) -> DocumentModel {
        self.flush_section();
        let contacts = self.contacts.finish();
        log::debug!(
            "document model: {} sections, {} contacts",
            self.sections.len(),
            contacts.len()
        );
        DocumentModel {
            sections: self.sections,
            contacts,
            contact_section: self.contact_section,
        }
    }

    fn push_heading(&mut self, heading: Heading) {
        // Every heading closes the pending record, including fields
        // recognized outside the contact section.
        self.contacts.end_section();
        self.in_contacts = false;
        self.flush_section();

        let title = self.display(&heading.text);
        if heading.opens_contact_section {
            self.in_contacts = true;
            match self.contact_section {
                Some(ref existing) => {
                    log::debug!("repeated contact heading, keeping {:?}", existing.title)
                }
                None => self.contact_section = Some(ContactSection::new(title)),
            }
        } else {
            self.current = Some(Section::new(title, heading.level));
        }
    }

    fn push_item(&mut self, item: SectionItem) {
        if self.in_contacts {
            if let Some(ref mut contact_section) = self.contact_section {
                contact_section.notes.push(item);
            }
            return;
        }

        if self.current.is_none() {
            match self.leading {
                LeadingContent::ImplicitSection => self.current = Some(Section::untitled()),
                LeadingContent::Discard => {
                    log::debug!("dropping content before first heading");
                    return;
                }
            }
        }
        if let Some(ref mut section) = self.current {
            section.push(item);
        }
    }

    fn flush_section(&mut self) {
        if let Some(section) = self.current.take() {
            self.sections.push(section);
        }
    }

    fn display(&self, text: &str) -> String {
        match self.isolator {
            Some(ref normalizer) => normalizer.isolate(text),
            None => text.to_string(),
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a model from blocks with default settings.
pub fn build(blocks: impl IntoIterator<Item = Block>) -> DocumentModel {
    let mut builder = DocumentBuilder::new();
    for block in blocks {
        builder.push(block);
    }
    builder.build()
}
