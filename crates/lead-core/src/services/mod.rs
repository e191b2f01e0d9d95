//! Service modules for lead processing

pub mod lead_validator;
pub mod notification;
pub mod diagnostics;

pub use lead_validator::{validate_lead, is_valid_email};
pub use notification::build_notification;
pub use diagnostics::DiagnosticsReporter;
