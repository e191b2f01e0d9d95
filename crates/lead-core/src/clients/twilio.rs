//! Twilio client for WhatsApp notifications to the owner

use async_trait::async_trait;
use crate::config::LeadsConfig;
use crate::constants::WHATSAPP_PREFIX;
use crate::error::{LeadsError, Result};
use crate::intake::NotificationChannel;
use crate::types::SendOutcome;
use lead_types::Channel;
use reqwest::Client as HttpClient;
use std::time::Duration;

pub struct TwilioClient {
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
    base_url: String,
    timeout: Duration,
    http_client: HttpClient,
}

/// Prefix a phone number with the WhatsApp address scheme unless already present
pub fn whatsapp_address(phone: &str) -> String {
    if phone.starts_with(WHATSAPP_PREFIX) {
        phone.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, phone)
    }
}

impl TwilioClient {
    /// Build a client when SID, token and sender are all configured, `None` otherwise
    pub fn from_config(config: &LeadsConfig) -> Result<Option<Self>> {
        let twilio = &config.twilio;
        let (Some(account_sid), Some(auth_token), Some(from)) = (
            twilio.account_sid.clone(),
            twilio.auth_token.clone(),
            twilio.whatsapp_from.clone(),
        ) else {
            log::info!("Twilio not fully configured, WhatsApp notifications disabled");
            return Ok(None);
        };

        let timeout = config.notification_timeout();
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()?;

        Ok(Some(Self {
            account_sid,
            auth_token,
            from,
            to: whatsapp_address(&config.owner.whatsapp_to),
            base_url: twilio.base_url.trim_end_matches('/').to_string(),
            timeout,
            http_client,
        }))
    }

    /// Destination address the owner is messaged at
    pub fn destination(&self) -> &str {
        &self.to
    }

    /// Send a WhatsApp message to the owner
    pub async fn send_message(&self, body: &str) -> Result<()> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let form = [
            ("From", self.from.as_str()),
            ("To", self.to.as_str()),
            ("Body", body),
        ];

        let request = self.http_client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| LeadsError::Timeout(format!("Twilio did not answer within {:?}", self.timeout)))??;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LeadsError::ServiceUnavailable(
                format!("Twilio API error ({}): {}", status, error_text)
            ));
        }

        log::info!("Twilio accepted WhatsApp notification to {}", self.to);
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for TwilioClient {
    fn channel(&self) -> Channel {
        Channel::Messaging
    }

    // Messaging has no subject line; the body already carries the label
    async fn send(&self, _subject: &str, body: &str) -> SendOutcome {
        match self.send_message(body).await {
            Ok(()) => SendOutcome::Sent,
            Err(e) => SendOutcome::Failed(e.to_string()),
        }
    }
}
