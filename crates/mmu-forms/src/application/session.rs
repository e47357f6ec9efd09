//! Form session
//!
//! Lifecycle controller for one editing screen. Owns the active template,
//! the value store, the error set and the widget state. Long operations
//! report through a [`watch`] channel of [`SessionStatus`] rather than
//! through their return values.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::FormsConfig;
use crate::domain::aggregates::FormInstance;
use crate::domain::binding::{render_form, FieldBinder, FormView, Interaction, WidgetState};
use crate::domain::services::{EquipmentPrefill, TemplateCatalog};
use crate::domain::store::{FieldValueStore, ValidationErrors};
use crate::domain::template::FormTemplate;
use crate::domain::validation::Validator;
use crate::domain::value_objects::{EntityId, FieldValue, FormId};
use crate::ports::inbound::{FormLifecycle, UseCaseError};
use crate::ports::outbound::{EquipmentRepository, EventPublisher, FormRepository};

/// Observable status flags
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub is_loading: bool,
    pub is_submitted: bool,
    pub last_error: Option<String>,
}

pub struct FormSession {
    catalog: Arc<TemplateCatalog>,
    forms: Arc<dyn FormRepository>,
    equipment: Arc<dyn EquipmentRepository>,
    publisher: Arc<dyn EventPublisher>,
    config: Arc<FormsConfig>,
    binder: FieldBinder,

    template: Option<Arc<FormTemplate>>,
    store: FieldValueStore,
    errors: ValidationErrors,
    widgets: WidgetState,
    instance: Option<FormInstance>,
    status: watch::Sender<SessionStatus>,
}

impl FormSession {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        forms: Arc<dyn FormRepository>,
        equipment: Arc<dyn EquipmentRepository>,
        publisher: Arc<dyn EventPublisher>,
        config: Arc<FormsConfig>,
    ) -> Self {
        let (status, _) = watch::channel(SessionStatus::default());
        Self {
            binder: config.binder(),
            catalog,
            forms,
            equipment,
            publisher,
            config,
            template: None,
            store: FieldValueStore::new(),
            errors: ValidationErrors::new(),
            widgets: WidgetState::default(),
            instance: None,
            status,
        }
    }

    /// Receiver that observes every status change
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn template(&self) -> Option<&Arc<FormTemplate>> {
        self.template.as_ref()
    }

    pub fn values(&self) -> &FieldValueStore {
        &self.store
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn widgets(&self) -> &WidgetState {
        &self.widgets
    }

    pub fn instance(&self) -> Option<&FormInstance> {
        self.instance.as_ref()
    }

    pub fn form_id(&self) -> Option<&FormId> {
        self.instance.as_ref().map(FormInstance::id)
    }

    /// Current view of the form, or `None` before initialization
    pub fn render(&self) -> Option<FormView> {
        self.template
            .as_ref()
            .map(|t| render_form(t, &self.store, &self.errors, &self.widgets))
    }

    /// Route an interaction on a rendered control. Returns whether the value
    /// store changed.
    pub fn handle(&mut self, field_id: &str, interaction: Interaction) -> bool {
        let Some(template) = self.template.clone() else {
            debug!(field = field_id, "interaction before form initialized");
            return false;
        };
        let Some(field) = template.field(field_id) else {
            debug!(field = field_id, "interaction on undeclared field");
            return false;
        };

        match self.binder.bind(field, interaction, &mut self.widgets) {
            Some(change) => {
                self.update_field(change.field_id.as_str(), Some(change.value));
                true
            }
            None => {
                debug!(field = field_id, "interaction produced no value");
                false
            }
        }
    }

    fn begin(&self) {
        self.status.send_modify(|s| {
            s.is_loading = true;
            s.last_error = None;
        });
    }

    fn finish(&self, result: Result<bool, UseCaseError>) {
        self.status.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(submitted) => s.is_submitted = submitted,
                Err(e) => s.last_error = Some(e.to_string()),
            }
        });
    }

    /// Save `next` and adopt it as the session's instance, then publish its
    /// events. Once the save lands the session follows the repository even
    /// if publishing fails; undelivered events are re-queued on the instance.
    async fn commit(&mut self, mut next: FormInstance, submitted: bool) -> Result<(), UseCaseError> {
        let events = next.take_events();
        self.forms.save(&next).await?;

        self.instance = Some(next);
        self.status.send_modify(|s| s.is_submitted = submitted);

        if let Err(e) = self.publisher.publish(events.clone()).await {
            if let Some(instance) = self.instance.as_mut() {
                instance.requeue_events(events);
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn template_for(&self, instance: &FormInstance) -> Arc<FormTemplate> {
        match self.catalog.get(instance.form_type()) {
            Some(template) => template,
            None => {
                warn!(form_type = %instance.form_type(), "no template for saved form, using default");
                self.catalog.fallback()
            }
        }
    }
}

#[async_trait]
impl FormLifecycle for FormSession {
    fn initialize_form(&mut self, form_type: &str) -> Arc<FormTemplate> {
        let resolved = self.catalog.resolve(form_type);
        let template = resolved.template;

        self.store = FieldValueStore::from_template(&template);
        self.errors = ValidationErrors::new();
        self.widgets = WidgetState::default();
        self.instance = Some(FormInstance::create(
            template.form_type(),
            template.version(),
            self.config.created_by.clone(),
        ));
        self.template = Some(Arc::clone(&template));
        self.status.send_replace(SessionStatus::default());

        info!(
            requested = form_type,
            form_type = %template.form_type(),
            fallback = resolved.fallback,
            "form initialized"
        );
        template
    }

    fn update_field(&mut self, field_id: &str, value: Option<FieldValue>) {
        let Some(template) = self.template.as_ref() else {
            debug!(field = field_id, "update before form initialized");
            return;
        };

        if let Err(e) = self.store.update(template, field_id, value) {
            debug!(field = field_id, error = %e, "field update dropped");
            return;
        }

        if self.config.validate_on_change {
            self.validate();
        }
    }

    fn validate(&mut self) -> &ValidationErrors {
        self.errors = match self.template.as_ref() {
            Some(template) => Validator::validate(template, &self.store),
            None => ValidationErrors::new(),
        };
        &self.errors
    }

    async fn save_draft(&mut self) {
        let Some(current) = self.instance.as_ref() else {
            self.finish(Err(UseCaseError::NoActiveForm));
            return;
        };
        let mut next = current.clone();
        let form_id = next.id().clone();
        let was_submitted = self.status.borrow().is_submitted;

        self.begin();
        let result = match next.save_draft(self.store.snapshot()) {
            Ok(()) => self.commit(next, was_submitted).await,
            Err(e) => Err(UseCaseError::DomainError(e.to_string())),
        };

        match result {
            Ok(()) => {
                info!(form_id = %form_id, fields = self.store.len(), "draft saved");
                self.finish(Ok(was_submitted));
            }
            Err(e) => {
                warn!(error = %e, "draft save failed");
                self.finish(Err(e));
            }
        }
    }

    async fn submit_form(&mut self) {
        let Some(current) = self.instance.as_ref() else {
            self.finish(Err(UseCaseError::NoActiveForm));
            return;
        };
        let mut next = current.clone();
        let form_id = next.id().clone();
        let form_type = next.form_type();

        self.begin();
        let failures = self.validate().len();
        if failures > 0 {
            info!(form_id = %form_id, failures, "submit blocked by validation");
            self.finish(Err(UseCaseError::ValidationError(format!(
                "{failures} field(s) need attention"
            ))));
            return;
        }

        let result = match next.submit(self.store.snapshot()) {
            Ok(()) => self.commit(next, true).await,
            Err(e) => Err(UseCaseError::DomainError(e.to_string())),
        };

        match result {
            Ok(()) => {
                info!(form_id = %form_id, form_type = %form_type, "form submitted");
                self.finish(Ok(true));
            }
            Err(e) => {
                warn!(error = %e, "submit failed");
                self.finish(Err(e));
            }
        }
    }

    async fn load_form(&mut self, form_id: &FormId) -> Result<FormInstance, UseCaseError> {
        self.begin();

        let found = match self.forms.find_by_id(form_id).await {
            Ok(Some(instance)) => Ok(instance),
            Ok(None) => Err(UseCaseError::NotFound(format!("form {form_id}"))),
            Err(e) => Err(e.into()),
        };
        let instance = match found {
            Ok(instance) => instance,
            Err(e) => {
                self.finish(Err(e.clone()));
                return Err(e);
            }
        };

        let template = self.template_for(&instance);
        if template.version() != instance.template_version() {
            warn!(
                form_id = %form_id,
                saved = instance.template_version(),
                current = template.version(),
                "template version changed since the form was saved"
            );
        }

        self.store = FieldValueStore::restore(&template, instance.values());
        self.errors = ValidationErrors::new();
        self.widgets = WidgetState::default();
        self.template = Some(template);
        self.instance = Some(instance.clone());
        self.finish(Ok(instance.is_completed()));

        debug!(form_id = %form_id, fields = self.store.len(), "form loaded");
        Ok(instance)
    }

    async fn load_equipment_data(&mut self, equipment_id: &EntityId) -> Result<usize, UseCaseError> {
        let Some(template) = self.template.clone() else {
            return Err(UseCaseError::NoActiveForm);
        };

        let was_submitted = self.status.borrow().is_submitted;
        self.begin();

        let equipment = match self.equipment.find_by_id(equipment_id).await {
            Ok(Some(equipment)) => equipment,
            Ok(None) => {
                let e = UseCaseError::NotFound(format!("equipment {equipment_id}"));
                self.finish(Err(e.clone()));
                return Err(e);
            }
            Err(e) => {
                let e = UseCaseError::from(e);
                self.finish(Err(e.clone()));
                return Err(e);
            }
        };

        let written = EquipmentPrefill::apply(&template, &mut self.store, &equipment);
        if let Some(instance) = self.instance.as_mut() {
            instance.attach_equipment(equipment.id.clone());
        }
        if self.config.validate_on_change {
            self.validate();
        }
        self.finish(Ok(was_submitted));

        info!(equipment_id = %equipment_id, written, "equipment data loaded");
        Ok(written)
    }
}
