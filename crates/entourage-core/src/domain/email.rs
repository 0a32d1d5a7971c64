use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The whitespace class the address pattern and trimming agree on.
///
/// Includes U+FEFF and excludes U+0085, unlike [`char::is_whitespace`].
pub fn is_form_whitespace(ch: char) -> bool {
    (ch.is_whitespace() && ch != '\u{85}') || ch == '\u{FEFF}'
}

pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim_matches(is_form_whitespace);
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Checks the `local@domain.tld` shape against the whole string.
///
/// Neither side of the `@` may contain whitespace or another `@`, and the
/// domain needs a `.` with at least one character on each side of it.
pub fn is_valid_email_format(value: &str) -> bool {
    if value.chars().any(is_form_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

/// A validated, normalized (trimmed and lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if !is_valid_email_format(raw) {
            return Err(CoreError::InvalidEmailFormat);
        }
        normalize_email(raw)
            .map(Self)
            .ok_or(CoreError::MissingEmail)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{is_form_whitespace, is_valid_email_format, normalize_email, EmailAddress};
    use crate::error::CoreError;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  Ada@Example.com ");
        assert_eq!(value.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn normalize_email_strips_byte_order_mark_but_not_next_line() {
        assert_eq!(
            normalize_email("\u{FEFF}User@Example.com ").as_deref(),
            Some("user@example.com")
        );
        assert_eq!(
            normalize_email("\u{85}a@b.co").as_deref(),
            Some("\u{85}a@b.co")
        );
        assert!(is_form_whitespace('\u{FEFF}'));
        assert!(!is_form_whitespace('\u{85}'));
    }

    #[test]
    fn normalize_email_rejects_blank() {
        assert_eq!(normalize_email("   "), None);
    }

    #[test]
    fn format_accepts_simple_addresses() {
        for value in [
            "user@example.com",
            "USER@EXAMPLE.COM",
            "first.last+tag@sub.example.co.uk",
            "a@b.c",
            "weird!chars@domain..tld",
            "user\u{85}@example.com",
        ] {
            assert!(is_valid_email_format(value), "expected valid: {value}");
        }
    }

    #[test]
    fn format_rejects_malformed_addresses() {
        for value in [
            "not-an-email",
            "",
            "@example.com",
            "user@",
            "user@example",
            "user@.com",
            "user@example.",
            "user@@example.com",
            "user@exa@mple.com",
            "us er@example.com",
            " user@example.com",
            "user@example.com\n",
            "\u{FEFF}user@example.com",
            "user@exam\u{A0}ple.com",
        ] {
            assert!(!is_valid_email_format(value), "expected invalid: {value:?}");
        }
    }

    #[test]
    fn parse_normalizes_after_validation() {
        let email = EmailAddress::parse("Ada.Lovelace@Example.COM").expect("parse");
        assert_eq!(email.as_str(), "ada.lovelace@example.com");
    }

    #[test]
    fn parse_reports_format_errors() {
        assert_eq!(
            EmailAddress::parse("not-an-email"),
            Err(CoreError::InvalidEmailFormat)
        );
    }
}
