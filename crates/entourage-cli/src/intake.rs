use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entourage_core::{NewWaitlistEntry, SignupOutcome, SignupPayload, WaitlistEntry};
use entourage_notify::{signup_notification, NotificationTemplate, Notifier};
use entourage_store::error::StoreError;
use entourage_store::Store;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("persistence task failed: {0}")]
    Task(String),
}

/// Append-only destination for accepted signups.
#[async_trait]
pub trait EntrySink: Send + Sync {
    async fn append(
        &self,
        now_utc: i64,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, SinkError>;
}

/// Runs inserts on the blocking pool against a shared SQLite connection.
pub struct SqliteSink {
    store: Arc<Mutex<Store>>,
}

impl SqliteSink {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

#[async_trait]
impl EntrySink for SqliteSink {
    async fn append(
        &self,
        now_utc: i64,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, SinkError> {
        let store = Arc::clone(&self.store);
        let joined = tokio::task::spawn_blocking(move || {
            // a panicking holder never leaves a statement half applied
            let store = store.lock().unwrap_or_else(PoisonError::into_inner);
            store
                .waitlist()
                .insert(now_utc, &entry)
                .map_err(SinkError::from)
        })
        .await;
        match joined {
            Ok(result) => result,
            Err(err) => Err(SinkError::Task(err.to_string())),
        }
    }
}

/// Validate, persist, then notify the owner.
///
/// Only validation and persistence decide the outcome. The notification runs
/// after a new entry is stored and its failures are logged and dropped.
pub struct IntakeService {
    sink: Arc<dyn EntrySink>,
    notifier: Option<Arc<dyn Notifier>>,
    template: NotificationTemplate,
}

impl IntakeService {
    pub fn new(
        sink: Arc<dyn EntrySink>,
        notifier: Option<Arc<dyn Notifier>>,
        template: NotificationTemplate,
    ) -> Self {
        Self {
            sink,
            notifier,
            template,
        }
    }

    pub async fn submit(&self, body: &[u8]) -> SignupOutcome {
        match SignupPayload::from_slice(body) {
            Ok(payload) => self.submit_payload(payload).await,
            Err(err) => {
                error!(error = %err, "unreadable signup request");
                SignupOutcome::Unexpected
            }
        }
    }

    pub async fn submit_payload(&self, payload: SignupPayload) -> SignupOutcome {
        let entry = match payload.validate() {
            Ok(entry) => entry,
            Err(err) => {
                let outcome = SignupOutcome::from(&err);
                if outcome == SignupOutcome::Unexpected {
                    error!(error = %err, "unreadable signup request");
                } else {
                    debug!(reason = %err, "signup rejected");
                }
                return outcome;
            }
        };

        let submitted_at = Utc::now();
        let created = match self.sink.append(submitted_at.timestamp(), entry).await {
            Ok(created) => created,
            Err(SinkError::Store(err)) if err.is_duplicate() => {
                debug!("signup already on the waitlist");
                return SignupOutcome::AlreadyJoined;
            }
            Err(SinkError::Store(err)) => {
                error!(error = %err, "failed to persist waitlist entry");
                return SignupOutcome::PersistenceFailed;
            }
            Err(err) => {
                error!(error = %err, "waitlist insert did not complete");
                return SignupOutcome::Unexpected;
            }
        };

        info!(entry_id = %created.id, "waitlist entry created");
        self.notify_owner(&created, submitted_at).await;
        SignupOutcome::Joined
    }

    async fn notify_owner(&self, entry: &WaitlistEntry, submitted_at: DateTime<Utc>) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let message = signup_notification(&self.template, entry, submitted_at);
        match notifier.send(&message).await {
            Ok(()) => debug!(backend = notifier.backend_name(), "owner notified"),
            Err(err) => warn!(
                backend = notifier.backend_name(),
                error = %err,
                "owner notification failed"
            ),
        }
    }
}
