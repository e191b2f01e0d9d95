//! Read-only operational snapshot of configuration and storage connectivity

use crate::clients::StoreState;
use crate::config::LeadsConfig;
use crate::constants::{DIAGNOSTICS_MAX_COLLECTIONS, DIAGNOSTICS_MAX_ERROR_CHARS};
use lead_types::DiagnosticsReport;

pub struct DiagnosticsReporter {
    config: LeadsConfig,
    store: StoreState,
}

fn truncate(message: &str) -> String {
    message.chars().take(DIAGNOSTICS_MAX_ERROR_CHARS).collect()
}

fn set_or_not(value: &Option<String>) -> String {
    let label = if value.is_some() { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

impl DiagnosticsReporter {
    pub fn new(config: LeadsConfig, store: StoreState) -> Self {
        Self { config, store }
    }

    /// Best-effort report; probing the store never mutates it
    pub async fn report(&self) -> DiagnosticsReport {
        let mut report = DiagnosticsReport {
            backend: "✅ Running".to_string(),
            database: "❌ Not Available".to_string(),
            database_url: set_or_not(&self.config.database.url),
            database_name: set_or_not(&self.config.database.name),
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
            email_provider: if self.config.sendgrid.is_configured() {
                "✅ SendGrid"
            } else {
                "❌ Not Configured"
            }
            .to_string(),
            whatsapp_provider: if self.config.twilio.is_configured() {
                "✅ Twilio"
            } else {
                "❌ Not Configured"
            }
            .to_string(),
        };

        match &self.store {
            StoreState::Absent => {
                report.database = "❌ Not Available (DATABASE_URL not set)".to_string();
            }
            StoreState::Uninitialized { error } => {
                report.database = format!("⚠️  Available but not initialized: {}", truncate(error));
            }
            StoreState::Ready(store) => {
                report.connection_status = "Connected".to_string();
                match store.list_collections(DIAGNOSTICS_MAX_COLLECTIONS).await {
                    Ok(collections) => {
                        report.collections = collections;
                        report.database = "✅ Connected & Working".to_string();
                    }
                    Err(e) => {
                        log::warn!("Diagnostics probe of document store failed: {}", e);
                        report.database = format!("⚠️  Connected but Error: {}", truncate(&e.to_string()));
                    }
                }
            }
        }

        report
    }
}
