use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("email is required")]
    MissingEmail,
    #[error("invalid email format")]
    InvalidEmailFormat,
    #[error("malformed signup payload: {0}")]
    MalformedPayload(String),
    #[error("invalid theme: {0}")]
    InvalidTheme(String),
}
