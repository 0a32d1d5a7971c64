use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[cfg(feature = "resend")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email api rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("notifier unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
