//! Service constants and development fallbacks

/// Development-only owner email used when `OWNER_EMAIL` is unset
pub const DEV_OWNER_EMAIL: &str = "owner@example.com";

/// Development-only owner phone used when `OWNER_WHATSAPP_TO` is unset
pub const DEV_OWNER_WHATSAPP_TO: &str = "+10000000000";

pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com";
pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";

/// Bound on each provider call; a call exceeding it counts as a failed send
pub const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 10;

/// Address-scheme tag Twilio expects on WhatsApp numbers
pub const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Collection new leads are written to
pub const LEAD_COLLECTION: &str = "lead";

pub const NOTIFICATION_SUBJECT: &str = "New Lead";
pub const NOTIFICATION_LABEL: &str = "New gym lead";

/// Placeholder rendered for absent optional fields
pub const EMPTY_FIELD_PLACEHOLDER: &str = "-";

/// Diagnostics: how many collections to list and how much of an error to show
pub const DIAGNOSTICS_MAX_COLLECTIONS: usize = 10;
pub const DIAGNOSTICS_MAX_ERROR_CHARS: usize = 50;
