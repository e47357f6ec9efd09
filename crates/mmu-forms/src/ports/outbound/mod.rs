//! Outbound ports (Repository traits)
//!
//! Hexagonal architecture: these are the interfaces that infrastructure must implement.

use async_trait::async_trait;

use crate::domain::aggregates::{Equipment, FormInstance, FormStatus, JobCard, JobCardStatus};
use crate::domain::template::FormTemplate;
use crate::domain::value_objects::{EntityId, FormId};
use crate::domain::DomainEvent;

/// Saved drafts and submissions
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Find form by ID
    async fn find_by_id(&self, id: &FormId) -> Result<Option<FormInstance>, RepositoryError>;

    /// Find forms filled against a piece of equipment
    async fn find_by_equipment(&self, equipment_id: &EntityId) -> Result<Vec<FormInstance>, RepositoryError>;

    async fn find_by_status(&self, status: &FormStatus) -> Result<Vec<FormInstance>, RepositoryError>;

    /// All forms, most recently updated first
    async fn list(&self) -> Result<Vec<FormInstance>, RepositoryError>;

    /// Save form (insert or update)
    async fn save(&self, form: &FormInstance) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &FormId) -> Result<(), RepositoryError>;
}

/// Fleet register used for prefill
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Equipment>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Equipment>, RepositoryError>;

    async fn save(&self, equipment: &Equipment) -> Result<(), RepositoryError>;
}

/// Job card repository port
#[async_trait]
pub trait JobCardRepository: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<JobCard>, RepositoryError>;

    async fn find_by_status(&self, status: JobCardStatus) -> Result<Vec<JobCard>, RepositoryError>;

    async fn find_by_equipment(&self, equipment_id: &EntityId) -> Result<Vec<JobCard>, RepositoryError>;

    async fn save(&self, job_card: &JobCard) -> Result<(), RepositoryError>;
}

/// Source of template definitions beyond the built-in set
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Load every template the source holds
    async fn load_templates(&self) -> Result<Vec<FormTemplate>, RepositoryError>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
