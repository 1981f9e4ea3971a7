//! JSON rendering for document models.

use crate::error::{Error, Result};
use crate::model::DocumentModel;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document model to JSON.
pub fn to_json(model: &DocumentModel, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(model),
        JsonFormat::Compact => serde_json::to_string(model),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Read a document model back from JSON.
pub fn from_json(json: &str) -> Result<DocumentModel> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, ContactKind, Section, SectionItem};

    fn sample() -> DocumentModel {
        let mut section = Section::new("Intro", 1);
        section.push(SectionItem::paragraph("Hello world"));
        DocumentModel {
            sections: vec![section],
            contacts: vec![Contact::named("Ali").with(ContactKind::Org, "Acme")],
            contact_section: None,
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Intro"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(!json.contains("contact_section"));
    }

    #[test]
    fn test_from_json() {
        let model = sample();
        let json = to_json(&model, JsonFormat::Compact).unwrap();
        assert_eq!(from_json(&json).unwrap(), model);
        assert!(matches!(from_json("{"), Err(Error::Json(_))));
    }
}
