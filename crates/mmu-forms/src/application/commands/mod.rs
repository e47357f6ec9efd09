//! Command handlers
//!
//! Application services that orchestrate use cases.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dto::*;
use crate::application::session::FormSession;
use crate::config::FormsConfig;
use crate::domain::aggregates::{FormInstance, JobCard, JobCardStatus};
use crate::domain::services::TemplateCatalog;
use crate::domain::value_objects::{EntityId, FormId};
use crate::error::FormsResult;
use crate::ports::inbound::{JobCardUseCases, UseCaseError};
use crate::ports::outbound::{
    EquipmentRepository, EventPublisher, FormRepository, JobCardRepository, TemplateSource,
};

/// Form application service
///
/// Holds the shared catalog and adapters and hands out editing sessions.
pub struct FormService {
    catalog: Arc<TemplateCatalog>,
    form_repo: Arc<dyn FormRepository>,
    equipment_repo: Arc<dyn EquipmentRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    config: Arc<FormsConfig>,
}

impl FormService {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        form_repo: Arc<dyn FormRepository>,
        equipment_repo: Arc<dyn EquipmentRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        config: FormsConfig,
    ) -> Self {
        Self {
            catalog,
            form_repo,
            equipment_repo,
            event_publisher,
            config: Arc::new(config),
        }
    }

    /// Build the catalog from the built-in templates plus any overrides the
    /// source provides, then wire the service
    pub async fn bootstrap(
        config: FormsConfig,
        source: Option<&dyn TemplateSource>,
        form_repo: Arc<dyn FormRepository>,
        equipment_repo: Arc<dyn EquipmentRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> FormsResult<Self> {
        let mut catalog = TemplateCatalog::builtin()?;

        if let Some(source) = source {
            let overrides = source.load_templates().await?;
            let count = catalog.extend(overrides);
            info!(count, "template overrides loaded");
        }

        if !catalog.set_fallback(config.default_form_type) {
            warn!(form_type = %config.default_form_type, "default form type has no template, keeping generic");
        }

        Ok(Self::new(
            Arc::new(catalog),
            form_repo,
            equipment_repo,
            event_publisher,
            config,
        ))
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &FormsConfig {
        &self.config
    }

    /// New editing session sharing this service's catalog and adapters
    pub fn session(&self) -> FormSession {
        FormSession::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.form_repo),
            Arc::clone(&self.equipment_repo),
            Arc::clone(&self.event_publisher),
            Arc::clone(&self.config),
        )
    }

    pub fn templates(&self) -> Vec<TemplateSummary> {
        self.catalog.templates().map(|t| TemplateSummary::from(t.as_ref())).collect()
    }

    pub async fn list_forms(&self) -> Result<Vec<FormInstanceView>, UseCaseError> {
        let forms = self.form_repo.list().await?;
        Ok(forms.iter().map(|f| self.view(f)).collect())
    }

    pub async fn get_form(&self, id: &FormId) -> Result<FormInstanceView, UseCaseError> {
        let form = self.find(id).await?;
        Ok(self.view(&form))
    }

    pub async fn forms_for_equipment(&self, equipment_id: &EntityId) -> Result<Vec<FormInstanceView>, UseCaseError> {
        let forms = self.form_repo.find_by_equipment(equipment_id).await?;
        Ok(forms.iter().map(|f| self.view(f)).collect())
    }

    /// Admin action: reopen a submitted form for correction
    pub async fn reopen_form(&self, id: &FormId) -> Result<FormInstance, UseCaseError> {
        let mut form = self.find(id).await?;

        form.reopen()
            .map_err(|e| UseCaseError::DomainError(e.to_string()))?;

        self.form_repo.save(&form).await?;
        self.event_publisher.publish(form.take_events()).await?;

        info!(form_id = %id, "form reopened");
        Ok(form)
    }

    pub async fn delete_form(&self, id: &FormId) -> Result<(), UseCaseError> {
        self.form_repo.delete(id).await?;
        info!(form_id = %id, "form deleted");
        Ok(())
    }

    async fn find(&self, id: &FormId) -> Result<FormInstance, UseCaseError> {
        self.form_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("form {id}")))
    }

    fn view(&self, form: &FormInstance) -> FormInstanceView {
        let template = self.catalog.get(form.form_type());
        FormInstanceView::new(form, template.as_deref())
    }
}

/// Job card application service
pub struct JobCardService {
    job_card_repo: Arc<dyn JobCardRepository>,
    equipment_repo: Arc<dyn EquipmentRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl JobCardService {
    pub fn new(
        job_card_repo: Arc<dyn JobCardRepository>,
        equipment_repo: Arc<dyn EquipmentRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            job_card_repo,
            equipment_repo,
            event_publisher,
        }
    }

    async fn load(&self, id: &EntityId) -> Result<JobCard, UseCaseError> {
        self.job_card_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("job card {id}")))
    }

    async fn store(&self, mut card: JobCard) -> Result<JobCard, UseCaseError> {
        self.job_card_repo.save(&card).await?;
        self.event_publisher.publish(card.take_events()).await?;
        Ok(card)
    }

    /// Load, apply a transition, persist
    async fn transition<F>(&self, id: &EntityId, apply: F) -> Result<JobCard, UseCaseError>
    where
        F: FnOnce(&mut JobCard) -> Result<(), crate::domain::aggregates::JobCardError> + Send,
    {
        let mut card = self.load(id).await?;
        apply(&mut card).map_err(|e| UseCaseError::DomainError(e.to_string()))?;
        self.store(card).await
    }
}

#[async_trait]
impl JobCardUseCases for JobCardService {
    async fn create_job_card(&self, command: CreateJobCardCommand) -> Result<JobCard, UseCaseError> {
        let mut card = JobCard::create(command.title, command.description, command.priority)
            .map_err(|e| UseCaseError::ValidationError(e.to_string()))?;

        if let Some(equipment_id) = command.equipment_id {
            let equipment_id = EntityId::from_string(equipment_id);
            if self.equipment_repo.find_by_id(&equipment_id).await?.is_none() {
                return Err(UseCaseError::NotFound(format!("equipment {equipment_id}")));
            }
            card.for_equipment(equipment_id);
        }

        if let Some(assignee) = command.assignee {
            card.assign(assignee)
                .map_err(|e| UseCaseError::DomainError(e.to_string()))?;
        }

        let card = self.store(card).await?;
        info!(job_card_id = %card.id(), priority = ?card.priority(), "job card created");
        Ok(card)
    }

    async fn assign(&self, id: &EntityId, assignee: String) -> Result<JobCard, UseCaseError> {
        self.transition(id, |c| c.assign(assignee)).await
    }

    async fn start(&self, id: &EntityId) -> Result<JobCard, UseCaseError> {
        self.transition(id, JobCard::start).await
    }

    async fn hold(&self, id: &EntityId, reason: String) -> Result<JobCard, UseCaseError> {
        self.transition(id, |c| c.hold(reason)).await
    }

    async fn resume(&self, id: &EntityId) -> Result<JobCard, UseCaseError> {
        self.transition(id, JobCard::resume).await
    }

    async fn complete(&self, id: &EntityId) -> Result<JobCard, UseCaseError> {
        self.transition(id, JobCard::complete).await
    }

    async fn cancel(&self, id: &EntityId) -> Result<JobCard, UseCaseError> {
        self.transition(id, JobCard::cancel).await
    }

    async fn link_form(&self, id: &EntityId, form_id: FormId) -> Result<JobCard, UseCaseError> {
        self.transition(id, |c| {
            c.link_form(form_id);
            Ok(())
        })
        .await
    }

    async fn get_job_card(&self, id: &EntityId) -> Result<Option<JobCard>, UseCaseError> {
        Ok(self.job_card_repo.find_by_id(id).await?)
    }

    async fn list_by_status(&self, status: JobCardStatus) -> Result<Vec<JobCard>, UseCaseError> {
        Ok(self.job_card_repo.find_by_status(status).await?)
    }
}
