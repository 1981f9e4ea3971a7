//! Parsing options and configuration.

use crate::bidi::NormalizeOptions;

/// Heading phrase that opens the contact section.
pub const DEFAULT_CONTACT_MARKER: &str = "بيانات منسقي الاتصال";

/// Options for turning extracted text into a document model.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Phrase whose presence on a line opens the contact section
    pub contact_marker: String,

    /// Where contact fields are recognized
    pub contact_detection: ContactDetection,

    /// Split plain `label: value` lines into label/value pairs
    pub plain_label_values: bool,

    /// Longest label (in characters) accepted for a plain label/value line
    pub max_label_chars: usize,

    /// What to do with content before the first heading
    pub leading_content: LeadingContent,

    /// Wrap numeric and phone runs in the model text
    pub isolate_runs: bool,

    /// Normalizer options
    pub normalize: NormalizeOptions,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contact section marker phrase.
    pub fn with_contact_marker(mut self, marker: impl Into<String>) -> Self {
        self.contact_marker = marker.into();
        self
    }

    /// Set the contact detection mode.
    pub fn with_contact_detection(mut self, detection: ContactDetection) -> Self {
        self.contact_detection = detection;
        self
    }

    /// Recognize contact-looking lines outside the contact section too.
    pub fn standalone_contacts(mut self) -> Self {
        self.contact_detection = ContactDetection::Anywhere;
        self
    }

    /// Enable or disable label/value splitting of plain lines.
    pub fn with_plain_label_values(mut self, enabled: bool) -> Self {
        self.plain_label_values = enabled;
        self
    }

    /// Set the leading content policy.
    pub fn with_leading_content(mut self, policy: LeadingContent) -> Self {
        self.leading_content = policy;
        self
    }

    /// Enable or disable run isolation in model text.
    pub fn with_isolation(mut self, enabled: bool) -> Self {
        self.isolate_runs = enabled;
        self
    }

    /// Set normalizer options.
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize = options;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            contact_marker: DEFAULT_CONTACT_MARKER.to_string(),
            contact_detection: ContactDetection::SectionOnly,
            plain_label_values: true,
            max_label_chars: 40,
            leading_content: LeadingContent::ImplicitSection,
            isolate_runs: true,
            normalize: NormalizeOptions::default(),
        }
    }
}

/// Where contact fields are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactDetection {
    /// Only between the contact marker and the next heading
    #[default]
    SectionOnly,
    /// Also isolated contact-looking lines anywhere in the text
    Anywhere,
}

/// Policy for content that precedes the first heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadingContent {
    /// Collect it under an untitled section
    #[default]
    ImplicitSection,
    /// Drop it
    Discard,
}
