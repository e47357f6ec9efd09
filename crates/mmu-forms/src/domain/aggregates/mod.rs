//! Aggregates module

pub mod form_instance;
pub mod job_card;
pub mod equipment;

pub use form_instance::{AuditInfo, FormInstance, FormInstanceError, FormStatus};
pub use job_card::{JobCard, JobCardError, JobCardStatus, Priority};
pub use equipment::Equipment;
