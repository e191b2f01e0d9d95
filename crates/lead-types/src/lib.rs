//! Shared types for the lead intake service

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Source recorded in notifications when the submitter did not name one
pub const DEFAULT_LEAD_SOURCE: &str = "web";

/// A lead as submitted through the web form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub selected_plan: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl Lead {
    /// Create a lead with only the required fields set
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
            selected_plan: None,
            message: None,
            source: None,
        }
    }

    /// Source of the lead, falling back to the web form when absent or empty
    pub fn source_or_default(&self) -> &str {
        self.source
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LEAD_SOURCE)
    }
}

/// A lead after persistence, carrying the store-assigned identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadRecord {
    pub id: String,
    #[serde(flatten)]
    pub lead: Lead,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notification channels a lead announcement is sent through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Messaging,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Messaging => write!(f, "messaging"),
        }
    }
}

/// What happened on one notification channel for one lead. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationAttempt {
    pub channel: Channel,
    pub attempted: bool,
    pub succeeded: bool,
}

/// Body of a successful `POST /api/leads`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateLeadResponse {
    pub ok: bool,
    pub id: String,
    pub email_sent: bool,
    pub whatsapp_sent: bool,
}

/// Body of the greeting endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Error body returned for rejected or failed requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Operational snapshot served by `GET /test`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
    pub email_provider: String,
    pub whatsapp_provider: String,
}
