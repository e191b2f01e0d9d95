//! Common types used throughout the lead intake system

use lead_types::{Channel, CreateLeadResponse, LeadRecord, NotificationAttempt};
use serde::{Deserialize, Serialize};

/// Result of handing one notification to a provider
///
/// `Sent` means the provider accepted the request synchronously, not that
/// the message was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    NotConfigured,
    Failed(String),
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }

    pub fn was_attempted(&self) -> bool {
        !matches!(self, SendOutcome::NotConfigured)
    }

    pub fn attempt(&self, channel: Channel) -> NotificationAttempt {
        NotificationAttempt {
            channel,
            attempted: self.was_attempted(),
            succeeded: self.is_sent(),
        }
    }
}

/// Plain-text announcement of a new lead
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Everything the orchestrator learned while accepting one lead
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeReceipt {
    pub record: LeadRecord,
    pub email: NotificationAttempt,
    pub messaging: NotificationAttempt,
}

impl IntakeReceipt {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn to_response(&self) -> CreateLeadResponse {
        CreateLeadResponse {
            ok: true,
            id: self.record.id.clone(),
            email_sent: self.email.succeeded,
            whatsapp_sent: self.messaging.succeeded,
        }
    }
}
