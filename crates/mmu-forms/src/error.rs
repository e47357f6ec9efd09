//! Error types for the forms engine

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::store::StoreError;
use crate::domain::template::TemplateError;
use crate::domain::DomainError;
use crate::ports::inbound::UseCaseError;
use crate::ports::outbound::RepositoryError;

/// Forms engine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormsError {
    /// Domain rule broken
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Template failed to build
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Value store refused a write
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    UseCase(#[from] UseCaseError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for the forms engine
pub type FormsResult<T> = Result<T, FormsError>;
