use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const MESSAGE_JOINED: &str = "Successfully joined the waitlist!";
pub const MESSAGE_ALREADY_JOINED: &str = "You are already on the waitlist!";
pub const ERROR_MISSING_EMAIL: &str = "Email is required";
pub const ERROR_INVALID_EMAIL: &str = "Invalid email format";
pub const ERROR_PERSISTENCE: &str = "Failed to join waitlist";
pub const ERROR_UNEXPECTED: &str = "Something went wrong";

/// Every result a signup submission can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Joined,
    AlreadyJoined,
    MissingEmail,
    InvalidEmail,
    PersistenceFailed,
    Unexpected,
}

impl SignupOutcome {
    pub fn status_code(self) -> u16 {
        match self {
            SignupOutcome::Joined | SignupOutcome::AlreadyJoined => 200,
            SignupOutcome::MissingEmail | SignupOutcome::InvalidEmail => 400,
            SignupOutcome::PersistenceFailed | SignupOutcome::Unexpected => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, SignupOutcome::Joined | SignupOutcome::AlreadyJoined)
    }

    pub fn response(self) -> SignupResponse {
        match self {
            SignupOutcome::Joined => SignupResponse::message(MESSAGE_JOINED),
            SignupOutcome::AlreadyJoined => SignupResponse::message(MESSAGE_ALREADY_JOINED),
            SignupOutcome::MissingEmail => SignupResponse::error(ERROR_MISSING_EMAIL),
            SignupOutcome::InvalidEmail => SignupResponse::error(ERROR_INVALID_EMAIL),
            SignupOutcome::PersistenceFailed => SignupResponse::error(ERROR_PERSISTENCE),
            SignupOutcome::Unexpected => SignupResponse::error(ERROR_UNEXPECTED),
        }
    }
}

impl From<&CoreError> for SignupOutcome {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::MissingEmail => SignupOutcome::MissingEmail,
            CoreError::InvalidEmailFormat => SignupOutcome::InvalidEmail,
            CoreError::MalformedPayload(_) | CoreError::InvalidTheme(_) => {
                SignupOutcome::Unexpected
            }
        }
    }
}

/// JSON body returned by the waitlist endpoint; exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignupResponse {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SignupOutcome, SignupResponse};
    use crate::error::CoreError;

    #[test]
    fn outcome_table() {
        let cases = [
            (SignupOutcome::MissingEmail, 400, r#"{"error":"Email is required"}"#),
            (SignupOutcome::InvalidEmail, 400, r#"{"error":"Invalid email format"}"#),
            (
                SignupOutcome::AlreadyJoined,
                200,
                r#"{"message":"You are already on the waitlist!"}"#,
            ),
            (
                SignupOutcome::Joined,
                200,
                r#"{"message":"Successfully joined the waitlist!"}"#,
            ),
            (
                SignupOutcome::PersistenceFailed,
                500,
                r#"{"error":"Failed to join waitlist"}"#,
            ),
            (SignupOutcome::Unexpected, 500, r#"{"error":"Something went wrong"}"#),
        ];
        for (outcome, status, body) in cases {
            assert_eq!(outcome.status_code(), status);
            let json = serde_json::to_string(&outcome.response()).expect("serialize");
            assert_eq!(json, body);
        }
    }

    #[test]
    fn core_errors_map_to_outcomes() {
        assert_eq!(
            SignupOutcome::from(&CoreError::MissingEmail),
            SignupOutcome::MissingEmail
        );
        assert_eq!(
            SignupOutcome::from(&CoreError::MalformedPayload("x".to_string())),
            SignupOutcome::Unexpected
        );
    }

    #[test]
    fn response_parses_partial_bodies() {
        let parsed: SignupResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(parsed, SignupResponse::default());
    }
}
