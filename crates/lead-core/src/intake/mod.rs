//! Lead intake flow

pub mod traits;
pub mod orchestrator;

pub use traits::{LeadStore, NotificationChannel, DisabledChannel};
pub use orchestrator::IntakeOrchestrator;
