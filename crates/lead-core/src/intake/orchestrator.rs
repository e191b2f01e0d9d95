//! Lead intake orchestrator
//!
//! Received -> Validated -> Persisted -> notified on both channels -> Responded.
//! Only validation and persistence can fail the request; notification
//! outcomes are recorded on the receipt and never propagated.

use super::traits::{LeadStore, NotificationChannel};
use crate::error::Result;
use crate::services::{build_notification, validate_lead};
use crate::types::{IntakeReceipt, SendOutcome};
use lead_types::{Lead, NotificationAttempt};
use std::sync::Arc;

pub struct IntakeOrchestrator {
    store: Arc<dyn LeadStore>,
    email: Arc<dyn NotificationChannel>,
    messaging: Arc<dyn NotificationChannel>,
}

impl IntakeOrchestrator {
    pub fn new(
        store: Arc<dyn LeadStore>,
        email: Arc<dyn NotificationChannel>,
        messaging: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self { store, email, messaging }
    }

    /// Accept a lead: validate, persist, then notify the owner on both channels
    pub async fn submit(&self, lead: Lead) -> Result<IntakeReceipt> {
        validate_lead(&lead)?;

        let record = self.store.create(&lead).await?;
        log::info!("Stored lead {} from source '{}'", record.id, lead.source_or_default());

        let notification = build_notification(&record.lead, &record.id);

        // Independent channels: neither observes the other's outcome
        let (email_outcome, messaging_outcome) = futures::join!(
            self.email.send(&notification.subject, &notification.body),
            self.messaging.send(&notification.subject, &notification.body),
        );

        let email = Self::record_attempt(self.email.as_ref(), &record.id, email_outcome);
        let messaging = Self::record_attempt(self.messaging.as_ref(), &record.id, messaging_outcome);

        Ok(IntakeReceipt { record, email, messaging })
    }

    /// Log an outcome and reduce it to the attempt flags; failure detail ends here
    fn record_attempt(
        channel: &dyn NotificationChannel,
        lead_id: &str,
        outcome: SendOutcome,
    ) -> NotificationAttempt {
        match &outcome {
            SendOutcome::Sent => {
                log::info!("Lead {}: {} notification sent", lead_id, channel.channel());
            }
            SendOutcome::NotConfigured => {
                log::debug!("Lead {}: {} notification skipped (not configured)", lead_id, channel.channel());
            }
            SendOutcome::Failed(reason) => {
                log::warn!("Lead {}: {} notification failed: {}", lead_id, channel.channel(), reason);
            }
        }

        outcome.attempt(channel.channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::error::LeadsError;
    use chrono::Utc;
    use lead_types::{Channel, LeadRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockStore {
        should_fail: bool,
        created: Mutex<Vec<LeadRecord>>,
    }

    impl MockStore {
        fn new() -> Self {
            Self { should_fail: false, created: Mutex::new(Vec::new()) }
        }

        fn failing() -> Self {
            Self { should_fail: true, created: Mutex::new(Vec::new()) }
        }

        fn created_count(&self) -> usize {
            self.created.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LeadStore for MockStore {
        async fn create(&self, lead: &Lead) -> Result<LeadRecord> {
            if self.should_fail {
                return Err(LeadsError::Persistence("connection refused".to_string()));
            }
            let mut created = self.created.lock().unwrap();
            let record = LeadRecord {
                id: format!("mock-{}", created.len() + 1),
                lead: lead.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            created.push(record.clone());
            Ok(record)
        }

        async fn get(&self, id: &str) -> Result<Option<LeadRecord>> {
            Ok(self.created.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        async fn list_collections(&self, _limit: usize) -> Result<Vec<String>> {
            Ok(vec!["lead".to_string()])
        }
    }

    struct MockChannel {
        channel: Channel,
        outcome: SendOutcome,
        calls: AtomicUsize,
        last_body: Mutex<Option<String>>,
    }

    impl MockChannel {
        fn new(channel: Channel, outcome: SendOutcome) -> Arc<Self> {
            Arc::new(Self {
                channel,
                outcome,
                calls: AtomicUsize::new(0),
                last_body: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationChannel for MockChannel {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn send(&self, _subject: &str, body: &str) -> SendOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_body.lock().unwrap() = Some(body.to_string());
            self.outcome.clone()
        }
    }

    fn orchestrator(
        store: Arc<MockStore>,
        email: Arc<MockChannel>,
        messaging: Arc<MockChannel>,
    ) -> IntakeOrchestrator {
        IntakeOrchestrator::new(store, email, messaging)
    }

    #[tokio::test]
    async fn test_minimal_lead_without_providers() {
        let store = Arc::new(MockStore::new());
        let email = MockChannel::new(Channel::Email, SendOutcome::NotConfigured);
        let messaging = MockChannel::new(Channel::Messaging, SendOutcome::NotConfigured);

        let receipt = orchestrator(store.clone(), email.clone(), messaging.clone())
            .submit(Lead::new("Alice", "+1555000111"))
            .await
            .unwrap();

        let response = receipt.to_response();
        assert!(response.ok);
        assert_eq!(response.id, "mock-1");
        assert!(!response.email_sent);
        assert!(!response.whatsapp_sent);
        assert!(!receipt.email.attempted);
        assert_eq!(store.created_count(), 1);
        assert_eq!(email.calls(), 1);
        assert_eq!(messaging.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_before_any_side_effect() {
        let store = Arc::new(MockStore::new());
        let email = MockChannel::new(Channel::Email, SendOutcome::Sent);
        let messaging = MockChannel::new(Channel::Messaging, SendOutcome::Sent);

        let lead = Lead {
            email: Some("not-an-email".to_string()),
            ..Lead::new("Bob", "+1555000222")
        };
        let result = orchestrator(store.clone(), email.clone(), messaging.clone())
            .submit(lead)
            .await;

        assert!(matches!(result, Err(LeadsError::Validation(_))));
        assert_eq!(store.created_count(), 0);
        assert_eq!(email.calls(), 0);
        assert_eq!(messaging.calls(), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_skips_notifications() {
        let store = Arc::new(MockStore::failing());
        let email = MockChannel::new(Channel::Email, SendOutcome::Sent);
        let messaging = MockChannel::new(Channel::Messaging, SendOutcome::Sent);

        let err = orchestrator(store, email.clone(), messaging.clone())
            .submit(Lead::new("Carol", "+1555000333"))
            .await
            .unwrap_err();

        assert!(matches!(err, LeadsError::Persistence(_)));
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(email.calls(), 0);
        assert_eq!(messaging.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_channel_does_not_affect_the_other() {
        let store = Arc::new(MockStore::new());
        let email = MockChannel::new(Channel::Email, SendOutcome::Failed("503".to_string()));
        let messaging = MockChannel::new(Channel::Messaging, SendOutcome::Sent);

        let receipt = orchestrator(store, email.clone(), messaging.clone())
            .submit(Lead::new("Dave", "+1555000444"))
            .await
            .unwrap();

        assert!(receipt.email.attempted);
        assert!(!receipt.email.succeeded);
        assert!(receipt.messaging.succeeded);
        assert_eq!(email.calls(), 1);
        assert_eq!(messaging.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_channels_receive_the_same_body_with_lead_id() {
        let store = Arc::new(MockStore::new());
        let email = MockChannel::new(Channel::Email, SendOutcome::Sent);
        let messaging = MockChannel::new(Channel::Messaging, SendOutcome::Sent);

        let receipt = orchestrator(store.clone(), email.clone(), messaging.clone())
            .submit(Lead::new("Erin", "+1555000555"))
            .await
            .unwrap();

        let email_body = email.last_body.lock().unwrap().clone().unwrap();
        let messaging_body = messaging.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(email_body, messaging_body);
        assert!(email_body.ends_with(&format!("Lead ID: {}", receipt.id())));

        // Placeholders live in the notification only
        let stored = store.get(receipt.id()).await.unwrap().unwrap();
        assert_eq!(stored.lead.email, None);
        assert_eq!(stored.lead.source, None);
    }
}
