//! Contact field recognition and aggregation into contact records.

use regex::Regex;

use crate::model::{Contact, ContactField, ContactKind};

const ROLE_KEY: &str = "الصفة";
const EMAIL_KEY: &str = "البريد";
const PHONE_KEY: &str = "الهاتف";
const PHONE_PREFIX: &str = "رقم الهاتف";

/// Recognizes contact fields on single lines.
#[derive(Debug, Clone)]
pub struct ContactMatcher {
    name_label: Regex,
    org_label: Regex,
    phone_label: Regex,
    email: Regex,
}

impl ContactMatcher {
    /// Create a matcher.
    pub fn new() -> Self {
        Self {
            name_label: Regex::new(r"الاسم\s*:").expect("name label pattern is valid"),
            org_label: Regex::new(r"الجهة\s*:").expect("org label pattern is valid"),
            phone_label: Regex::new(r"(?:رقم\s+)?الهاتف\s*:").expect("phone label pattern is valid"),
            email: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
                .expect("email pattern is valid"),
        }
    }

    /// Recognize a contact field on a line, checking kinds in priority
    /// order: name, organization, role, email, phone.
    ///
    /// Returns `None` when the line carries no contact keyword. A keyword
    /// without a usable value yields a field with an empty value.
    pub fn recognize(&self, line: &str) -> Option<ContactField> {
        let t = strip_bullet(line.trim());

        if t.starts_with("الاسم:") || t.contains("الاسم :") {
            let value = self.name_label.replacen(t, 1, "");
            return Some(ContactField::new(ContactKind::Name, value.trim()));
        }

        if t.starts_with("الجهة:") || t.contains("الجهة :") {
            let value = self.org_label.replacen(t, 1, "");
            return Some(ContactField::new(ContactKind::Org, value.trim()));
        }

        if t.contains(ROLE_KEY) {
            let value = t.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
            return Some(ContactField::new(ContactKind::Role, value));
        }

        if t.contains(EMAIL_KEY) || t.contains('@') {
            let value = self.extract_email(t).unwrap_or("");
            return Some(ContactField::new(ContactKind::Email, value));
        }

        if t.starts_with(PHONE_PREFIX) || t.contains(PHONE_KEY) {
            let value = self.phone_label.replacen(t, 1, "");
            return Some(ContactField::new(ContactKind::Phone, value.trim()));
        }

        None
    }

    /// Stricter check used outside a contact section: does this isolated
    /// line look like contact data?
    pub fn looks_like_contact(&self, line: &str) -> bool {
        let t = strip_bullet(line.trim());
        t.starts_with("الاسم:")
            || t.contains("الاسم :")
            || t.starts_with("الجهة:")
            || t.contains("الجهة :")
            || t.starts_with(ROLE_KEY)
            || t.starts_with(PHONE_PREFIX)
            || t.contains("الهاتف:")
            || (t.contains(EMAIL_KEY) && t.contains('@'))
            || (t.contains('@') && t.contains('.') && self.email.is_match(t))
    }

    /// Extract the first email address in the text.
    pub fn extract_email<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.email.find(text).map(|m| m.as_str())
    }
}

impl Default for ContactMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_bullet(t: &str) -> &str {
    t.strip_prefix('-')
        .or_else(|| t.strip_prefix('•'))
        .map(str::trim_start)
        .unwrap_or(t)
}

/// Groups contact fields into records.
///
/// A name field always starts a new record. Other fields set their
/// attribute on the current record, the last occurrence winning.
#[derive(Debug, Default)]
pub struct ContactAggregator {
    current: Contact,
    contacts: Vec<Contact>,
}

impl ContactAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one field.
    pub fn push(&mut self, field: ContactField) {
        if field.kind == ContactKind::Name {
            self.finalize();
        }
        if !field.value.is_empty() {
            self.current.set(field.kind, field.value);
        }
    }

    /// Close the current record because the contact section ended.
    pub fn end_section(&mut self) {
        self.finalize();
    }

    /// Number of finalized records so far.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Check if no record has been finalized yet.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Finalize the last record and return all records in input order.
    pub fn finish(mut self) -> Vec<Contact> {
        self.finalize();
        self.contacts
    }

    fn finalize(&mut self) {
        if !self.current.is_empty() {
            let contact = std::mem::take(&mut self.current);
            log::debug!(
                "contact #{} finalized ({:?})",
                self.contacts.len() + 1,
                contact.name
            );
            self.contacts.push(contact);
        }
    }
}

/// Aggregate a sequence of fields into contact records.
pub fn aggregate(fields: impl IntoIterator<Item = ContactField>) -> Vec<Contact> {
    let mut aggregator = ContactAggregator::new();
    for field in fields {
        aggregator.push(field);
    }
    aggregator.finish()
}
