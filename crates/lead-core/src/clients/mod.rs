//! Client modules for external services

pub mod document_store;
pub mod sendgrid;
pub mod twilio;

// Re-export all client types
pub use document_store::{SqliteDocumentStore, UnavailableStore, DatabaseLocation};
pub use sendgrid::SendGridClient;
pub use twilio::{TwilioClient, whatsapp_address};

use crate::config::{DatabaseConfig, LeadsConfig};
use crate::error::Result;
use crate::intake::{DisabledChannel, LeadStore, NotificationChannel};
use lead_types::Channel;
use std::sync::Arc;

/// How far the storage backend got at startup
#[derive(Clone)]
pub enum StoreState {
    /// No `DATABASE_URL` configured
    Absent,
    /// Configured, but opening failed
    Uninitialized { error: String },
    Ready(Arc<dyn LeadStore>),
}

impl StoreState {
    /// Open the configured store, recording rather than propagating failures
    pub fn open(config: &DatabaseConfig) -> Self {
        if config.url.is_none() {
            log::warn!("DATABASE_URL not set, leads cannot be stored");
            return StoreState::Absent;
        }

        match SqliteDocumentStore::open(config) {
            Ok(store) => StoreState::Ready(Arc::new(store)),
            Err(e) => {
                log::error!("Failed to open document store: {}", e);
                StoreState::Uninitialized { error: e.to_string() }
            }
        }
    }

    /// Store handed to the orchestrator; writes fail when no backend is ready
    pub fn lead_store(&self) -> Arc<dyn LeadStore> {
        match self {
            StoreState::Ready(store) => store.clone(),
            StoreState::Absent => Arc::new(UnavailableStore::new("DATABASE_URL is not set")),
            StoreState::Uninitialized { error } => Arc::new(UnavailableStore::new(error.clone())),
        }
    }
}

/// Email and messaging channels, with disabled placeholders for unconfigured providers
pub fn notification_channels(
    config: &LeadsConfig,
) -> Result<(Arc<dyn NotificationChannel>, Arc<dyn NotificationChannel>)> {
    let email: Arc<dyn NotificationChannel> = match SendGridClient::from_config(config)? {
        Some(client) => Arc::new(client),
        None => Arc::new(DisabledChannel::new(Channel::Email)),
    };

    let messaging: Arc<dyn NotificationChannel> = match TwilioClient::from_config(config)? {
        Some(client) => Arc::new(client),
        None => Arc::new(DisabledChannel::new(Channel::Messaging)),
    };

    Ok((email, messaging))
}
