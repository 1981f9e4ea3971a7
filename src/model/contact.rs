//! Contact records and fields.

use serde::{Deserialize, Serialize};

/// Value rendered for a missing contact field.
pub const PLACEHOLDER: &str = "-";

/// The five contact attributes, in table column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// Person name; starts a new record
    Name,
    /// Organization
    Org,
    /// Role or title
    Role,
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl ContactKind {
    /// All kinds in column order (leading column first).
    pub const ALL: [ContactKind; 5] = [
        ContactKind::Name,
        ContactKind::Org,
        ContactKind::Role,
        ContactKind::Email,
        ContactKind::Phone,
    ];

    /// Column header label.
    pub fn header(self) -> &'static str {
        match self {
            ContactKind::Name => "الاسم",
            ContactKind::Org => "الجهة",
            ContactKind::Role => "الصفة",
            ContactKind::Email => "البريد الإلكتروني",
            ContactKind::Phone => "الهاتف",
        }
    }

    /// Whether values of this kind are Latin-script data that must be laid
    /// out left-to-right.
    pub fn is_latin(self) -> bool {
        matches!(self, ContactKind::Email | ContactKind::Phone)
    }
}

/// A single recognized contact field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactField {
    /// Which attribute this field sets
    pub kind: ContactKind,
    /// Field value (may be empty when the line carried no value)
    pub value: String,
}

impl ContactField {
    /// Create a new field.
    pub fn new(kind: ContactKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A contact record. Every attribute is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Contact {
    /// Create an empty contact.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a contact with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Get an attribute by kind.
    pub fn get(&self, kind: ContactKind) -> Option<&str> {
        match kind {
            ContactKind::Name => self.name.as_deref(),
            ContactKind::Org => self.org.as_deref(),
            ContactKind::Role => self.role.as_deref(),
            ContactKind::Email => self.email.as_deref(),
            ContactKind::Phone => self.phone.as_deref(),
        }
    }

    /// Set an attribute by kind, replacing any previous value.
    pub fn set(&mut self, kind: ContactKind, value: impl Into<String>) {
        let slot = match kind {
            ContactKind::Name => &mut self.name,
            ContactKind::Org => &mut self.org,
            ContactKind::Role => &mut self.role,
            ContactKind::Email => &mut self.email,
            ContactKind::Phone => &mut self.phone,
        };
        *slot = Some(value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, kind: ContactKind, value: impl Into<String>) -> Self {
        self.set(kind, value);
        self
    }

    /// Cell text for a column, falling back to [`PLACEHOLDER`].
    pub fn display(&self, kind: ContactKind) -> &str {
        match self.get(kind) {
            Some(v) if !v.trim().is_empty() => v,
            _ => PLACEHOLDER,
        }
    }

    /// Check if no attribute is set.
    pub fn is_empty(&self) -> bool {
        ContactKind::ALL.iter().all(|k| self.get(*k).is_none())
    }
}
