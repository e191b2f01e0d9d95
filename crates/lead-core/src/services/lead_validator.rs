//! Structural validation of submitted leads

use crate::error::{LeadsError, Result};
use lead_types::Lead;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email regex is valid")
});

/// Check that an address is syntactically an email (`local@domain.tld`)
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Reject leads missing a name or phone, or carrying a malformed email
pub fn validate_lead(lead: &Lead) -> Result<()> {
    if lead.name.trim().is_empty() {
        return Err(LeadsError::Validation("name is required".to_string()));
    }

    if lead.phone.trim().is_empty() {
        return Err(LeadsError::Validation("phone is required".to_string()));
    }

    if let Some(email) = &lead.email {
        if !is_valid_email(email) {
            return Err(LeadsError::Validation(format!(
                "email '{}' is not a valid email address",
                email
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_lead_is_valid() {
        assert!(validate_lead(&Lead::new("Alice", "+1555000111")).is_ok());
    }

    #[test]
    fn test_blank_name_or_phone_is_rejected() {
        let err = validate_lead(&Lead::new("  ", "+1555000111")).unwrap_err();
        assert!(err.to_string().contains("name"));

        let err = validate_lead(&Lead::new("Alice", "")).unwrap_err();
        assert!(err.to_string().contains("phone"));
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let lead = Lead {
            email: Some("not-an-email".to_string()),
            ..Lead::new("Bob", "+1555000222")
        };
        assert!(matches!(validate_lead(&lead), Err(LeadsError::Validation(_))));
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("bob@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(!is_valid_email("bob@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("bob@localhost"));
        assert!(!is_valid_email("bob example@example.com"));
    }
}
