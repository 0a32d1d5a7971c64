pub mod error;
pub mod message;
#[cfg(feature = "resend")]
pub mod resend;

pub use error::{NotifyError, Result};
pub use message::{signup_notification, NotificationTemplate, OwnerNotification};
#[cfg(feature = "resend")]
pub use resend::ResendNotifier;

use async_trait::async_trait;

/// Delivers an owner notification somewhere outside the process.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn send(&self, message: &OwnerNotification) -> Result<()>;
}
