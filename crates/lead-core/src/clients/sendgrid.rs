//! SendGrid client for emailing new-lead notifications to the owner

use async_trait::async_trait;
use crate::config::LeadsConfig;
use crate::error::{LeadsError, Result};
use crate::intake::NotificationChannel;
use crate::types::SendOutcome;
use lead_types::Channel;
use reqwest::Client as HttpClient;
use serde_json::json;
use std::time::Duration;

pub struct SendGridClient {
    api_key: String,
    from_email: String,
    to_email: String,
    base_url: String,
    timeout: Duration,
    http_client: HttpClient,
}

impl SendGridClient {
    /// Build a client when an API key is configured, `None` otherwise
    pub fn from_config(config: &LeadsConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.sendgrid.api_key.clone() else {
            log::info!("SendGrid not configured (SENDGRID_API_KEY not set), email notifications disabled");
            return Ok(None);
        };

        let timeout = config.notification_timeout();
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()?;

        Ok(Some(Self {
            api_key,
            from_email: config.sendgrid.from_email.clone(),
            to_email: config.owner.email.clone(),
            base_url: config.sendgrid.base_url.trim_end_matches('/').to_string(),
            timeout,
            http_client,
        }))
    }

    /// Escape special characters for HTML content
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Plain text to the HTML body SendGrid renders, one `<br>` per line break
    pub fn to_html(body: &str) -> String {
        Self::escape_html(body).replace('\n', "<br>")
    }

    /// Send one email to the owner
    pub async fn send_email(&self, subject: &str, body: &str) -> Result<()> {
        let url = format!("{}/v3/mail/send", self.base_url);

        let payload = json!({
            "personalizations": [{
                "to": [{"email": self.to_email}]
            }],
            "from": {"email": self.from_email},
            "subject": subject,
            "content": [{
                "type": "text/html",
                "value": Self::to_html(body)
            }]
        });

        let request = self.http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| LeadsError::Timeout(format!("SendGrid did not answer within {:?}", self.timeout)))??;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LeadsError::ServiceUnavailable(
                format!("SendGrid API error ({}): {}", status, error_text)
            ));
        }

        log::info!("SendGrid accepted notification email to {}", self.to_email);
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for SendGridClient {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, subject: &str, body: &str) -> SendOutcome {
        match self.send_email(subject, body).await {
            Ok(()) => SendOutcome::Sent,
            Err(e) => SendOutcome::Failed(e.to_string()),
        }
    }
}
