//! Composition of the owner notification for a new lead

use crate::constants::{EMPTY_FIELD_PLACEHOLDER, NOTIFICATION_LABEL, NOTIFICATION_SUBJECT};
use crate::types::Notification;
use lead_types::Lead;

/// Build the plain-text announcement for a stored lead.
///
/// One field per line in a fixed order; absent or empty optional fields
/// render as `-` and an absent or empty source as `web`. The stored record
/// itself is untouched.
pub fn build_notification(lead: &Lead, lead_id: &str) -> Notification {
    let or_placeholder = |value: &Option<String>| -> String {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(EMPTY_FIELD_PLACEHOLDER)
            .to_string()
    };

    let body = format!(
        "{}\n\
        Name: {}\n\
        Phone: {}\n\
        Email: {}\n\
        Plan: {}\n\
        Message: {}\n\
        Source: {}\n\
        Lead ID: {}",
        NOTIFICATION_LABEL,
        lead.name,
        lead.phone,
        or_placeholder(&lead.email),
        or_placeholder(&lead.selected_plan),
        or_placeholder(&lead.message),
        lead.source_or_default(),
        lead_id
    );

    Notification {
        subject: NOTIFICATION_SUBJECT.to_string(),
        body,
    }
}
