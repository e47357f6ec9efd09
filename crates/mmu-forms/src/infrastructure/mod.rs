//! Infrastructure layer
//!
//! Adapters implementing the outbound ports.

pub mod persistence;
pub mod template_source;
pub mod events;

pub use persistence::{InMemoryEquipmentRepository, InMemoryFormRepository, InMemoryJobCardRepository};
pub use template_source::JsonTemplateSource;
pub use events::{InMemoryEventLog, TracingEventPublisher};
