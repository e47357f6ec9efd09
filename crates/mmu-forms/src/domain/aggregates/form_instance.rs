//! Form Instance Aggregate
//!
//! A saved form: the template it was filled against, a snapshot of the
//! value store, its status and audit metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::events::{DomainEvent, FormEvent};
use crate::domain::value_objects::{EntityId, FieldId, FieldValue, FormId, FormType};

/// Form instance aggregate root
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormInstance {
    id: FormId,
    form_type: FormType,
    template_version: u32,
    values: BTreeMap<FieldId, FieldValue>,
    status: FormStatus,
    audit: AuditInfo,
    equipment_id: Option<EntityId>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FormInstance {
    /// Create a new draft (factory method)
    pub fn create(form_type: FormType, template_version: u32, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        let id = FormId::new();

        let mut instance = Self {
            id: id.clone(),
            form_type,
            template_version,
            values: BTreeMap::new(),
            status: FormStatus::Draft,
            audit: AuditInfo {
                created_by: created_by.into(),
                created_at: now,
                updated_at: now,
                submitted_at: None,
            },
            equipment_id: None,
            events: vec![],
        };

        instance.raise_event(DomainEvent::Form(FormEvent::Created {
            form_id: id,
            form_type,
            created_at: now,
        }));

        instance
    }

    pub fn id(&self) -> &FormId { &self.id }
    pub fn form_type(&self) -> FormType { self.form_type }
    pub fn template_version(&self) -> u32 { self.template_version }
    pub fn values(&self) -> &BTreeMap<FieldId, FieldValue> { &self.values }
    pub fn status(&self) -> &FormStatus { &self.status }
    pub fn audit(&self) -> &AuditInfo { &self.audit }
    pub fn equipment_id(&self) -> Option<&EntityId> { self.equipment_id.as_ref() }
    pub fn is_completed(&self) -> bool { self.status == FormStatus::Completed }

    /// Replace the snapshot and keep the form editable
    pub fn save_draft(&mut self, values: BTreeMap<FieldId, FieldValue>) -> Result<(), FormInstanceError> {
        if self.is_completed() {
            return Err(FormInstanceError::AlreadyCompleted);
        }

        self.status = if values.is_empty() { FormStatus::Draft } else { FormStatus::InProgress };
        self.values = values;
        self.touch();

        self.raise_event(DomainEvent::Form(FormEvent::DraftSaved {
            form_id: self.id.clone(),
            field_count: self.values.len(),
        }));

        Ok(())
    }

    /// Record the final snapshot and complete the form
    pub fn submit(&mut self, values: BTreeMap<FieldId, FieldValue>) -> Result<(), FormInstanceError> {
        if self.is_completed() {
            return Err(FormInstanceError::AlreadyCompleted);
        }

        let now = Utc::now();
        self.values = values;
        self.status = FormStatus::Completed;
        self.audit.submitted_at = Some(now);
        self.touch();

        self.raise_event(DomainEvent::Form(FormEvent::Submitted {
            form_id: self.id.clone(),
            form_type: self.form_type,
            submitted_at: now,
        }));

        Ok(())
    }

    /// Admin action: reopen a completed form for correction
    pub fn reopen(&mut self) -> Result<(), FormInstanceError> {
        if !self.is_completed() {
            return Err(FormInstanceError::NotCompleted);
        }

        self.status = FormStatus::InProgress;
        self.audit.submitted_at = None;
        self.touch();

        self.raise_event(DomainEvent::Form(FormEvent::Reopened {
            form_id: self.id.clone(),
        }));

        Ok(())
    }

    pub fn attach_equipment(&mut self, equipment_id: EntityId) {
        self.equipment_id = Some(equipment_id);
        self.touch();
    }

    /// Get and clear accumulated domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    /// Put undelivered events back ahead of any raised since
    pub fn requeue_events(&mut self, mut events: Vec<DomainEvent>) {
        events.append(&mut self.events);
        self.events = events;
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.audit.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormInstanceError {
    #[error("form has already been submitted")]
    AlreadyCompleted,

    #[error("form has not been submitted")]
    NotCompleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> BTreeMap<FieldId, FieldValue> {
        let mut v = BTreeMap::new();
        v.insert(FieldId::new("temperature").unwrap(), FieldValue::Number(23.5));
        v
    }

    #[test]
    fn test_create_raises_event() {
        let mut f = FormInstance::create(FormType::PumpInspection, 2, "tech01");
        assert_eq!(f.status(), &FormStatus::Draft);
        assert_eq!(f.audit().created_by, "tech01");
        let events = f.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DomainEvent::Form(FormEvent::Created { .. })));
    }

    #[test]
    fn test_draft_status_follows_snapshot() {
        let mut f = FormInstance::create(FormType::PumpInspection, 1, "tech01");
        f.save_draft(BTreeMap::new()).unwrap();
        assert_eq!(f.status(), &FormStatus::Draft);
        f.save_draft(values()).unwrap();
        assert_eq!(f.status(), &FormStatus::InProgress);
        assert_eq!(f.values().len(), 1);
    }

    #[test]
    fn test_submit_completes() {
        let mut f = FormInstance::create(FormType::PumpInspection, 1, "tech01");
        f.take_events();
        f.submit(values()).unwrap();
        assert!(f.is_completed());
        assert!(f.audit().submitted_at.is_some());
        let events = f.take_events();
        assert!(matches!(events[0], DomainEvent::Form(FormEvent::Submitted { .. })));
    }

    #[test]
    fn test_completed_form_is_frozen() {
        let mut f = FormInstance::create(FormType::PumpInspection, 1, "tech01");
        f.submit(values()).unwrap();
        assert_eq!(f.save_draft(BTreeMap::new()), Err(FormInstanceError::AlreadyCompleted));
        assert_eq!(f.submit(values()), Err(FormInstanceError::AlreadyCompleted));
    }

    #[test]
    fn test_reopen() {
        let mut f = FormInstance::create(FormType::PumpInspection, 1, "tech01");
        assert_eq!(f.reopen(), Err(FormInstanceError::NotCompleted));
        f.submit(values()).unwrap();
        f.reopen().unwrap();
        assert_eq!(f.status(), &FormStatus::InProgress);
        assert!(f.audit().submitted_at.is_none());
    }

    #[test]
    fn test_serialization_skips_events() {
        let f = FormInstance::create(FormType::TyreInspection, 1, "tech01");
        let json = serde_json::to_value(&f).unwrap();
        assert!(json.get("events").is_none());
        let back: FormInstance = serde_json::from_value(json).unwrap();
        assert_eq!(back.id(), f.id());
    }
}
