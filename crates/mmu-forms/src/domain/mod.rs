//! Domain module
//!
//! Form schema, editing state, validation and the records built from them.

pub mod value_objects;
pub mod template;
pub mod store;
pub mod validation;
pub mod binding;
pub mod aggregates;
pub mod events;
pub mod services;

pub use value_objects::*;
pub use aggregates::*;
pub use events::*;

/// Domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("unknown form type: {0}")]
    UnknownFormType(String),

    #[error("invalid field id: {0}")]
    InvalidFieldId(#[from] value_objects::FieldIdError),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
