use crate::error::{NotifyError, Result};
use crate::message::OwnerNotification;
use crate::Notifier;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Sends notifications through a Resend-compatible `POST /emails` API.
#[derive(Clone)]
pub struct ResendNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ResendNotifier {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NotifyError::Unavailable("email api key is empty".to_string()));
        }
        let client = Client::builder()
            .user_agent("entourage")
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for ResendNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendNotifier")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    fn backend_name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, message: &OwnerNotification) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(status = status.as_u16(), to = %message.to, "notification accepted");
        Ok(())
    }
}
