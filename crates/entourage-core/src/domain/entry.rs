use crate::domain::{is_form_whitespace, EmailAddress, WaitlistEntryId};
use serde::{Deserialize, Serialize};

/// Trims optional free text; blank input becomes `None`.
pub fn normalize_optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim_matches(is_form_whitespace);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitlistEntry {
    pub email: EmailAddress,
    pub name: Option<String>,
    pub company: Option<String>,
}

impl NewWaitlistEntry {
    pub fn new(email: EmailAddress, name: Option<&str>, company: Option<&str>) -> Self {
        Self {
            email,
            name: name.and_then(normalize_optional_text),
            company: company.and_then(normalize_optional_text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: WaitlistEntryId,
    pub email: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{normalize_optional_text, NewWaitlistEntry};
    use crate::domain::EmailAddress;

    #[test]
    fn optional_text_trims_and_drops_blank() {
        assert_eq!(normalize_optional_text("  Ada  ").as_deref(), Some("Ada"));
        assert_eq!(normalize_optional_text(" \t "), None);
        assert_eq!(normalize_optional_text(""), None);
    }

    #[test]
    fn new_entry_normalizes_optional_fields() {
        let email = EmailAddress::parse("ada@example.com").expect("email");
        let entry = NewWaitlistEntry::new(email, Some("  Ada Lovelace "), Some("   "));
        assert_eq!(entry.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(entry.company, None);
    }
}
