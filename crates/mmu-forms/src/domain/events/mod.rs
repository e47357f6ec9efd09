//! Domain Events
//!
//! Events raised by aggregates to communicate state changes.

use chrono::{DateTime, Utc};

use crate::domain::aggregates::job_card::{JobCardStatus, Priority};
use crate::domain::value_objects::{EntityId, FormId, FormType};

/// All domain events raised by the forms engine
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Form(FormEvent),
    JobCard(JobCardEvent),
}

/// Form-instance events
#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    Created {
        form_id: FormId,
        form_type: FormType,
        created_at: DateTime<Utc>,
    },

    DraftSaved {
        form_id: FormId,
        field_count: usize,
    },

    Submitted {
        form_id: FormId,
        form_type: FormType,
        submitted_at: DateTime<Utc>,
    },

    Reopened {
        form_id: FormId,
    },
}

/// Job-card events
#[derive(Clone, Debug, PartialEq)]
pub enum JobCardEvent {
    Created {
        job_card_id: EntityId,
        priority: Priority,
        created_at: DateTime<Utc>,
    },

    Assigned {
        job_card_id: EntityId,
        assignee: String,
    },

    StatusChanged {
        job_card_id: EntityId,
        from: JobCardStatus,
        to: JobCardStatus,
    },

    Completed {
        job_card_id: EntityId,
        completed_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Get the aggregate ID this event belongs to
    pub fn aggregate_id(&self) -> &str {
        match self {
            DomainEvent::Form(e) => match e {
                FormEvent::Created { form_id, .. }
                | FormEvent::DraftSaved { form_id, .. }
                | FormEvent::Submitted { form_id, .. }
                | FormEvent::Reopened { form_id } => form_id.as_str(),
            },
            DomainEvent::JobCard(e) => match e {
                JobCardEvent::Created { job_card_id, .. }
                | JobCardEvent::Assigned { job_card_id, .. }
                | JobCardEvent::StatusChanged { job_card_id, .. }
                | JobCardEvent::Completed { job_card_id, .. } => job_card_id.as_str(),
            },
        }
    }

    /// Get event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Form(e) => match e {
                FormEvent::Created { .. } => "form.created",
                FormEvent::DraftSaved { .. } => "form.draft_saved",
                FormEvent::Submitted { .. } => "form.submitted",
                FormEvent::Reopened { .. } => "form.reopened",
            },
            DomainEvent::JobCard(e) => match e {
                JobCardEvent::Created { .. } => "job_card.created",
                JobCardEvent::Assigned { .. } => "job_card.assigned",
                JobCardEvent::StatusChanged { .. } => "job_card.status_changed",
                JobCardEvent::Completed { .. } => "job_card.completed",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let event = DomainEvent::Form(FormEvent::Reopened { form_id: FormId::from_string("f-1") });
        assert_eq!(event.event_type(), "form.reopened");
        assert_eq!(event.aggregate_id(), "f-1");

        let event = DomainEvent::JobCard(JobCardEvent::Assigned {
            job_card_id: EntityId::from_string("jc-9"),
            assignee: "tech01".into(),
        });
        assert_eq!(event.event_type(), "job_card.assigned");
        assert_eq!(event.aggregate_id(), "jc-9");
    }
}
