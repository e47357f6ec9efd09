//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces.

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::dto::CreateJobCardCommand;
use crate::domain::aggregates::{FormInstance, JobCard, JobCardStatus};
use crate::domain::store::ValidationErrors;
use crate::domain::template::FormTemplate;
use crate::domain::value_objects::{EntityId, FieldValue, FormId};

/// Form lifecycle as seen by the rendering layer.
///
/// Draft and submit outcomes are not returned; they are published through
/// the session status channel.
#[async_trait]
pub trait FormLifecycle: Send {
    /// Start a new form. Unknown codes yield the default template.
    fn initialize_form(&mut self, form_type: &str) -> Arc<FormTemplate>;

    /// Set or clear one field. Undeclared ids and mismatched values are
    /// dropped.
    fn update_field(&mut self, field_id: &str, value: Option<FieldValue>);

    /// Recompute the error set from scratch
    fn validate(&mut self) -> &ValidationErrors;

    async fn save_draft(&mut self);

    async fn submit_form(&mut self);

    /// Open a saved form for editing
    async fn load_form(&mut self, form_id: &FormId) -> Result<FormInstance, UseCaseError>;

    /// Prefill equipment fields, returning how many were written
    async fn load_equipment_data(&mut self, equipment_id: &EntityId) -> Result<usize, UseCaseError>;
}

/// Job card management use cases
#[async_trait]
pub trait JobCardUseCases: Send + Sync {
    async fn create_job_card(&self, command: CreateJobCardCommand) -> Result<JobCard, UseCaseError>;

    /// Assign or reassign a technician
    async fn assign(&self, id: &EntityId, assignee: String) -> Result<JobCard, UseCaseError>;

    async fn start(&self, id: &EntityId) -> Result<JobCard, UseCaseError>;

    async fn hold(&self, id: &EntityId, reason: String) -> Result<JobCard, UseCaseError>;

    async fn resume(&self, id: &EntityId) -> Result<JobCard, UseCaseError>;

    async fn complete(&self, id: &EntityId) -> Result<JobCard, UseCaseError>;

    async fn cancel(&self, id: &EntityId) -> Result<JobCard, UseCaseError>;

    /// Record a form filled for the job
    async fn link_form(&self, id: &EntityId, form_id: FormId) -> Result<JobCard, UseCaseError>;

    async fn get_job_card(&self, id: &EntityId) -> Result<Option<JobCard>, UseCaseError>;

    async fn list_by_status(&self, status: JobCardStatus) -> Result<Vec<JobCard>, UseCaseError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UseCaseError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("domain error: {0}")]
    DomainError(String),

    #[error("repository error: {0}")]
    RepositoryError(#[from] crate::ports::outbound::RepositoryError),

    #[error("no form is active in this session")]
    NoActiveForm,
}
