//! Lead Intake Core Library
//!
//! Accepts web-form leads, stores them, and notifies the owner by email and
//! WhatsApp on a best-effort basis.

pub mod config;
pub mod clients;
pub mod services;
pub mod intake;
pub mod types;
pub mod error;
pub mod constants;

// Re-export main types for easy access
pub use config::LeadsConfig;
pub use error::{LeadsError, Result};

// Re-export all client types
pub use clients::{
    SendGridClient,
    TwilioClient,
    SqliteDocumentStore,
    StoreState,
};

// Re-export service types
pub use services::DiagnosticsReporter;

// Re-export intake types
pub use intake::{IntakeOrchestrator, LeadStore, NotificationChannel};
pub use types::{IntakeReceipt, Notification, SendOutcome};
