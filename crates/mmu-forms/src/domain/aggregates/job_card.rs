//! Job Card Aggregate
//!
//! Work-order record tracked with status, priority and assignment. Job
//! cards are separate from forms but may link the forms filled for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::events::{DomainEvent, JobCardEvent};
use crate::domain::value_objects::{EntityId, FormId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobCard {
    id: EntityId,
    title: String,
    description: String,
    equipment_id: Option<EntityId>,
    priority: Priority,
    status: JobCardStatus,
    assignee: Option<String>,
    hold_reason: Option<String>,
    linked_forms: Vec<FormId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCardStatus {
    #[default]
    Open,
    Assigned,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl JobCardStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl JobCard {
    pub fn create(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, JobCardError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(JobCardError::EmptyTitle);
        }

        let now = Utc::now();
        let id = EntityId::new();
        let mut card = Self {
            id: id.clone(),
            title,
            description: description.into(),
            equipment_id: None,
            priority,
            status: JobCardStatus::Open,
            assignee: None,
            hold_reason: None,
            linked_forms: vec![],
            created_at: now,
            updated_at: now,
            completed_at: None,
            events: vec![],
        };

        card.raise_event(DomainEvent::JobCard(JobCardEvent::Created {
            job_card_id: id,
            priority,
            created_at: now,
        }));

        Ok(card)
    }

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn equipment_id(&self) -> Option<&EntityId> { self.equipment_id.as_ref() }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn status(&self) -> JobCardStatus { self.status }
    pub fn assignee(&self) -> Option<&str> { self.assignee.as_deref() }
    pub fn hold_reason(&self) -> Option<&str> { self.hold_reason.as_deref() }
    pub fn linked_forms(&self) -> &[FormId] { &self.linked_forms }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn completed_at(&self) -> Option<DateTime<Utc>> { self.completed_at }
    pub fn is_open(&self) -> bool { !self.status.is_terminal() }

    pub fn for_equipment(&mut self, equipment_id: EntityId) {
        self.equipment_id = Some(equipment_id);
        self.touch();
    }

    /// Assign or reassign a technician
    pub fn assign(&mut self, assignee: impl Into<String>) -> Result<(), JobCardError> {
        self.require(&[JobCardStatus::Open, JobCardStatus::Assigned], "assign")?;

        let assignee = assignee.into();
        self.assignee = Some(assignee.clone());
        self.transition(JobCardStatus::Assigned);
        self.raise_event(DomainEvent::JobCard(JobCardEvent::Assigned {
            job_card_id: self.id.clone(),
            assignee,
        }));
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), JobCardError> {
        self.require(&[JobCardStatus::Assigned], "start")?;
        self.transition(JobCardStatus::InProgress);
        Ok(())
    }

    pub fn hold(&mut self, reason: impl Into<String>) -> Result<(), JobCardError> {
        self.require(&[JobCardStatus::InProgress], "hold")?;
        self.hold_reason = Some(reason.into());
        self.transition(JobCardStatus::OnHold);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), JobCardError> {
        self.require(&[JobCardStatus::OnHold], "resume")?;
        self.hold_reason = None;
        self.transition(JobCardStatus::InProgress);
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), JobCardError> {
        self.require(&[JobCardStatus::InProgress], "complete")?;
        let now = Utc::now();
        self.completed_at = Some(now);
        self.transition(JobCardStatus::Completed);
        self.raise_event(DomainEvent::JobCard(JobCardEvent::Completed {
            job_card_id: self.id.clone(),
            completed_at: now,
        }));
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), JobCardError> {
        if self.status.is_terminal() {
            return Err(JobCardError::InvalidTransition {
                from: self.status,
                action: "cancel",
            });
        }
        self.transition(JobCardStatus::Cancelled);
        Ok(())
    }

    /// Link a form filled for this job
    pub fn link_form(&mut self, form_id: FormId) {
        if !self.linked_forms.contains(&form_id) {
            self.linked_forms.push(form_id);
            self.touch();
        }
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn require(&self, allowed: &[JobCardStatus], action: &'static str) -> Result<(), JobCardError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(JobCardError::InvalidTransition { from: self.status, action })
        }
    }

    fn transition(&mut self, to: JobCardStatus) {
        let from = self.status;
        self.status = to;
        self.touch();
        if from != to {
            self.raise_event(DomainEvent::JobCard(JobCardEvent::StatusChanged {
                job_card_id: self.id.clone(),
                from,
                to,
            }));
        }
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobCardError {
    #[error("job card title cannot be empty")]
    EmptyTitle,

    #[error("cannot {action} a job card that is {from:?}")]
    InvalidTransition { from: JobCardStatus, action: &'static str },
}
