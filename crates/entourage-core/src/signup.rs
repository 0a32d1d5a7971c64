use crate::domain::{
    is_valid_email_format, normalize_optional_text, EmailAddress, NewWaitlistEntry,
};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw `POST /api/waitlist` body.
///
/// Fields stay untyped until [`SignupPayload::validate`] so a wrong JSON type
/// is classified the same way a loosely typed form handler would see it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SignupPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,
}

enum RawEmail {
    Missing,
    Text(String),
    /// A non-string value rendered the way a form handler stringifies it.
    Coerced(String),
}

impl SignupPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| CoreError::MalformedPayload(err.to_string()))?;
        if !value.is_object() {
            return Err(CoreError::MalformedPayload(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|err| CoreError::MalformedPayload(err.to_string()))
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(Value::String(email.into())),
            ..Self::default()
        }
    }

    /// Validates the email and normalizes every field.
    ///
    /// Email presence is checked first, then its format, then the types of
    /// the optional fields. A non-string email whose rendering passes the
    /// format check still cannot be normalized and is a malformed payload.
    pub fn validate(self) -> Result<NewWaitlistEntry, CoreError> {
        let email = match raw_email(self.email.as_ref()) {
            RawEmail::Missing => return Err(CoreError::MissingEmail),
            RawEmail::Coerced(text) if is_valid_email_format(&text) => {
                return Err(CoreError::MalformedPayload(
                    "email must be a string".to_string(),
                ))
            }
            RawEmail::Coerced(_) => return Err(CoreError::InvalidEmailFormat),
            RawEmail::Text(text) => EmailAddress::parse(&text)?,
        };
        let name = optional_text("name", self.name)?;
        let company = optional_text("company", self.company)?;
        Ok(NewWaitlistEntry {
            email,
            name,
            company,
        })
    }
}

fn raw_email(value: Option<&Value>) -> RawEmail {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => RawEmail::Missing,
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => RawEmail::Missing,
        Some(Value::String(text)) if text.is_empty() => RawEmail::Missing,
        Some(Value::String(text)) => RawEmail::Text(text.clone()),
        Some(other) => RawEmail::Coerced(coerce_to_text(other)),
    }
}

/// Arrays join their elements with `,` (nested arrays flatten, `null`
/// becomes empty); objects render as `[object Object]`.
fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(coerce_to_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn optional_text(field: &str, value: Option<Value>) -> Result<Option<String>, CoreError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(normalize_optional_text(&text)),
        Some(_) => Err(CoreError::MalformedPayload(format!(
            "{field} must be a string"
        ))),
    }
}
