//! Seams between the intake orchestrator and its external collaborators

use async_trait::async_trait;
use crate::error::Result;
use crate::types::SendOutcome;
use lead_types::{Channel, Lead, LeadRecord};

/// Persistent storage for accepted leads
///
/// Creation is the one step of intake that is not best-effort: any error
/// returned here aborts the request.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Persist a lead and return it with its store-assigned identifier
    async fn create(&self, lead: &Lead) -> Result<LeadRecord>;

    /// Fetch a previously stored lead
    async fn get(&self, id: &str) -> Result<Option<LeadRecord>>;

    /// Lightweight connectivity probe: names of up to `limit` collections
    async fn list_collections(&self, limit: usize) -> Result<Vec<String>>;
}

/// One best-effort delivery path to the owner
///
/// Implementations never return errors; every failure, including an
/// unconfigured provider or a timeout, is folded into the `SendOutcome`.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn channel(&self) -> Channel;

    async fn send(&self, subject: &str, body: &str) -> SendOutcome;
}

/// Placeholder for a channel whose provider is not configured
pub struct DisabledChannel {
    channel: Channel,
}

impl DisabledChannel {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl NotificationChannel for DisabledChannel {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, _subject: &str, _body: &str) -> SendOutcome {
        SendOutcome::NotConfigured
    }
}
