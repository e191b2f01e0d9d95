//! Configuration management for the lead intake system
//!
//! Everything is read from the process environment once at startup and then
//! passed by reference into the components that need it. Changing a variable
//! requires a restart.

use serde::{Deserialize, Serialize};
use crate::constants::{
    DEFAULT_NOTIFICATION_TIMEOUT_SECS, DEFAULT_PORT, DEFAULT_SENDGRID_API_URL,
    DEFAULT_TWILIO_API_URL, DEV_OWNER_EMAIL, DEV_OWNER_WHATSAPP_TO,
};
use crate::error::{LeadsError, Result};
use std::collections::HashMap;
use std::time::Duration;

/// Raw configuration structure matching the environment variable names
/// (lower-cased by the `config` environment source)
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    owner_email: Option<String>,
    owner_whatsapp_to: Option<String>,

    sendgrid_api_key: Option<String>,
    sendgrid_from_email: Option<String>,
    sendgrid_api_url: Option<String>,

    twilio_account_sid: Option<String>,
    twilio_auth_token: Option<String>,
    twilio_whatsapp_from: Option<String>,
    twilio_api_url: Option<String>,

    notification_timeout_secs: Option<String>,

    port: Option<String>,

    database_url: Option<String>,
    database_name: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadsConfig {
    pub owner: OwnerContacts,
    pub sendgrid: SendGridConfig,
    pub twilio: TwilioConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub notification_timeout_secs: u64,
}

/// Where new-lead notifications are delivered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerContacts {
    pub email: String,
    pub whatsapp_to: String,
    /// True when either contact fell back to a development sentinel
    #[serde(default)]
    pub uses_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    /// Resolved sender: explicit from-address, then owner email, then sentinel
    pub from_email: String,
    pub base_url: String,
}

impl SendGridConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub whatsapp_from: Option<String>,
    pub base_url: String,
}

impl TwilioConfig {
    /// All three credentials must be present
    pub fn is_configured(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.whatsapp_from.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
}

/// Drop unset and empty values so that `VAR=` behaves like an absent variable
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl LeadsConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::default())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(source: config::Environment) -> Result<Self> {
        let raw: RawConfig = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| LeadsError::Config(format!("Failed to read environment: {}", e)))?;

        Self::from_raw_config(raw)
    }

    /// Convert raw config to structured config, applying fallbacks
    fn from_raw_config(raw: RawConfig) -> Result<Self> {
        let owner_email = non_empty(raw.owner_email);
        let owner_whatsapp_to = non_empty(raw.owner_whatsapp_to);
        let uses_fallback = owner_email.is_none() || owner_whatsapp_to.is_none();

        let from_email = non_empty(raw.sendgrid_from_email)
            .or_else(|| owner_email.clone())
            .unwrap_or_else(|| DEV_OWNER_EMAIL.to_string());

        let owner = OwnerContacts {
            email: owner_email.unwrap_or_else(|| DEV_OWNER_EMAIL.to_string()),
            whatsapp_to: owner_whatsapp_to.unwrap_or_else(|| DEV_OWNER_WHATSAPP_TO.to_string()),
            uses_fallback,
        };

        let sendgrid = SendGridConfig {
            api_key: non_empty(raw.sendgrid_api_key),
            from_email,
            base_url: non_empty(raw.sendgrid_api_url)
                .unwrap_or_else(|| DEFAULT_SENDGRID_API_URL.to_string()),
        };

        let twilio = TwilioConfig {
            account_sid: non_empty(raw.twilio_account_sid),
            auth_token: non_empty(raw.twilio_auth_token),
            whatsapp_from: non_empty(raw.twilio_whatsapp_from),
            base_url: non_empty(raw.twilio_api_url)
                .unwrap_or_else(|| DEFAULT_TWILIO_API_URL.to_string()),
        };

        let database = DatabaseConfig {
            url: non_empty(raw.database_url),
            name: non_empty(raw.database_name),
        };

        let port = match non_empty(raw.port) {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| LeadsError::Config(format!("Invalid PORT '{}': {}", port, e)))?,
            None => DEFAULT_PORT,
        };

        let notification_timeout_secs = match non_empty(raw.notification_timeout_secs) {
            Some(secs) => secs.parse::<u64>().map_err(|e| {
                LeadsError::Config(format!("Invalid NOTIFICATION_TIMEOUT_SECS '{}': {}", secs, e))
            })?,
            None => DEFAULT_NOTIFICATION_TIMEOUT_SECS,
        };

        let config = Self {
            owner,
            sendgrid,
            twilio,
            database,
            server: ServerConfig { port },
            notification_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.notification_timeout_secs == 0 {
            return Err(LeadsError::Config(
                "NOTIFICATION_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Upper bound for a single provider call
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }
}
