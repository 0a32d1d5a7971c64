pub mod email;
pub mod entry;
pub mod ids;

pub use email::{is_form_whitespace, is_valid_email_format, normalize_email, EmailAddress};
pub use entry::{normalize_optional_text, NewWaitlistEntry, WaitlistEntry};
pub use ids::WaitlistEntryId;
