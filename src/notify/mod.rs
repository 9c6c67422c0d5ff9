//! Contact form notification relay.
//!
//! Stored submissions are handed to a bounded queue and delivered by a single
//! background worker, so a slow or failing email provider never touches the
//! HTTP response. Delivery is best effort with a small retry budget.

mod sendgrid;

pub use sendgrid::*;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::AppError;
use crate::models::ContactSubmission;

/// What the site owner is told about a new submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNotification {
    pub contact_id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<&ContactSubmission> for ContactNotification {
    fn from(contact: &ContactSubmission) -> Self {
        Self {
            contact_id: contact.id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
        }
    }
}

/// Delivers contact notifications to the site owner.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    /// Short name used in logs.
    fn kind(&self) -> &'static str;

    /// Deliver one notification.
    async fn notify(&self, notification: &ContactNotification) -> Result<(), AppError>;
}

/// Notifier used when no email provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl ContactNotifier for LogNotifier {
    fn kind(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, notification: &ContactNotification) -> Result<(), AppError> {
        tracing::info!(
            contact_id = notification.contact_id,
            from = %notification.email,
            subject = %notification.subject,
            "New contact submission (email relay disabled)"
        );
        Ok(())
    }
}

/// How hard the worker tries before giving up on one notification.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Sending half of the notification queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<ContactNotification>,
}

impl NotificationQueue {
    /// Spawn the delivery worker.
    ///
    /// The worker exits once every queue handle is dropped and the backlog is
    /// drained.
    pub fn start(
        notifier: Arc<dyn ContactNotifier>,
        capacity: usize,
        policy: RetryPolicy,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_worker(notifier, rx, policy));
        (Self { tx }, handle)
    }

    /// Queue a notification without waiting. Returns false if it was dropped.
    pub fn enqueue(&self, notification: ContactNotification) -> bool {
        let contact_id = notification.contact_id;
        match self.tx.try_send(notification) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(contact_id, "Notification queue full, dropping notification");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(contact_id, "Notification worker stopped, dropping notification");
                false
            }
        }
    }
}

async fn run_worker(
    notifier: Arc<dyn ContactNotifier>,
    mut rx: mpsc::Receiver<ContactNotification>,
    policy: RetryPolicy,
) {
    tracing::debug!(notifier = notifier.kind(), "Notification worker started");

    while let Some(notification) = rx.recv().await {
        deliver_with_retry(notifier.as_ref(), &notification, policy).await;
    }

    tracing::debug!("Notification worker stopped");
}

/// Try to deliver one notification. Returns whether it went out.
pub async fn deliver_with_retry(
    notifier: &dyn ContactNotifier,
    notification: &ContactNotification,
    policy: RetryPolicy,
) -> bool {
    let attempts = policy.max_attempts.max(1);
    let mut backoff = policy.initial_backoff;

    for attempt in 1..=attempts {
        match notifier.notify(notification).await {
            Ok(()) => {
                tracing::info!(
                    contact_id = notification.contact_id,
                    notifier = notifier.kind(),
                    attempt,
                    "Contact notification delivered"
                );
                return true;
            }
            Err(e) => {
                let retryable = matches!(e, AppError::Notification { retryable: true, .. });
                if !retryable || attempt == attempts {
                    tracing::error!(
                        contact_id = notification.contact_id,
                        notifier = notifier.kind(),
                        attempt,
                        "Giving up on contact notification: {}",
                        e
                    );
                    return false;
                }
                tracing::warn!(
                    contact_id = notification.contact_id,
                    attempt,
                    "Contact notification failed, retrying in {:?}: {}",
                    backoff,
                    e
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Fails the first `failures` calls, then succeeds.
    struct ScriptedNotifier {
        failures: Mutex<u32>,
        retryable: bool,
        calls: Mutex<u32>,
        delivered: Mutex<Vec<i64>>,
    }

    impl ScriptedNotifier {
        fn new(failures: u32, retryable: bool) -> Self {
            Self {
                failures: Mutex::new(failures),
                retryable,
                calls: Mutex::new(0),
                delivered: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ContactNotifier for ScriptedNotifier {
        fn kind(&self) -> &'static str {
            "scripted"
        }

        async fn notify(&self, notification: &ContactNotification) -> Result<(), AppError> {
            *self.calls.lock().unwrap() += 1;
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AppError::Notification {
                    message: "provider unavailable".to_string(),
                    retryable: self.retryable,
                });
            }
            self.delivered
                .lock()
                .unwrap()
                .push(notification.contact_id);
            Ok(())
        }
    }

    fn notification(id: i64) -> ContactNotification {
        ContactNotification {
            contact_id: id,
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let notifier = ScriptedNotifier::new(2, true);
        let delivered = deliver_with_retry(&notifier, &notification(1), fast_policy(3)).await;
        assert!(delivered);
        assert_eq!(notifier.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let notifier = ScriptedNotifier::new(5, true);
        let delivered = deliver_with_retry(&notifier, &notification(1), fast_policy(3)).await;
        assert!(!delivered);
        assert_eq!(notifier.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_not_retried() {
        let notifier = ScriptedNotifier::new(1, false);
        let delivered = deliver_with_retry(&notifier, &notification(1), fast_policy(3)).await;
        assert!(!delivered);
        assert_eq!(notifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_queue_delivers_in_order_and_drains() {
        let notifier = Arc::new(ScriptedNotifier::new(1, true));
        let (queue, handle) = NotificationQueue::start(notifier.clone(), 8, fast_policy(3));

        for id in 1..=4 {
            assert!(queue.enqueue(notification(id)));
        }
        drop(queue);
        handle.await.unwrap();

        assert_eq!(*notifier.delivered.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_enqueue_after_worker_stopped() {
        let (queue, handle) = NotificationQueue::start(Arc::new(LogNotifier), 1, fast_policy(1));
        handle.abort();
        let _ = handle.await;

        assert!(!queue.enqueue(notification(9)));
    }

    #[test]
    fn test_notification_from_submission() {
        let contact = ContactSubmission {
            id: 3,
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
            created_at: chrono::Utc::now(),
        };
        let n = ContactNotification::from(&contact);
        assert_eq!(n.contact_id, 3);
        assert_eq!(n.subject, "Hi");
    }
}
