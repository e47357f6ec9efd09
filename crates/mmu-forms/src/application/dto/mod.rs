//! Data Transfer Objects (DTOs)
//!
//! Objects for transferring data across boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::aggregates::{FormInstance, FormStatus, JobCard, JobCardStatus, Priority};
use crate::domain::template::FormTemplate;
use crate::domain::value_objects::FormType;

// =============================================================================
// Job Card Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateJobCardCommand {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub equipment_id: Option<String>,
    pub assignee: Option<String>,
}

// =============================================================================
// Views (Read Models)
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormInstanceView {
    pub id: String,
    pub form_type: FormType,
    pub title: String,
    pub template_version: u32,
    pub status: FormStatus,
    pub equipment_id: Option<String>,
    /// Field id to display text
    pub values: BTreeMap<String, String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FormInstanceView {
    /// Build a view, taking the title from the template the form was filled against
    pub fn new(instance: &FormInstance, template: Option<&FormTemplate>) -> Self {
        let audit = instance.audit();
        Self {
            id: instance.id().to_string(),
            form_type: instance.form_type(),
            title: template
                .map(|t| t.title().to_string())
                .unwrap_or_else(|| instance.form_type().title().to_string()),
            template_version: instance.template_version(),
            status: instance.status().clone(),
            equipment_id: instance.equipment_id().map(ToString::to_string),
            values: instance
                .values()
                .iter()
                .map(|(k, v)| (k.to_string(), v.display()))
                .collect(),
            created_by: audit.created_by.clone(),
            created_at: audit.created_at,
            updated_at: audit.updated_at,
            submitted_at: audit.submitted_at,
        }
    }
}

impl From<&FormInstance> for FormInstanceView {
    fn from(instance: &FormInstance) -> Self {
        Self::new(instance, None)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobCardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: JobCardStatus,
    pub equipment_id: Option<String>,
    pub assignee: Option<String>,
    pub hold_reason: Option<String>,
    pub linked_forms: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&JobCard> for JobCardView {
    fn from(card: &JobCard) -> Self {
        Self {
            id: card.id().to_string(),
            title: card.title().to_string(),
            description: card.description().to_string(),
            priority: card.priority(),
            status: card.status(),
            equipment_id: card.equipment_id().map(ToString::to_string),
            assignee: card.assignee().map(str::to_string),
            hold_reason: card.hold_reason().map(str::to_string),
            linked_forms: card.linked_forms().iter().map(ToString::to_string).collect(),
            created_at: card.created_at(),
            completed_at: card.completed_at(),
        }
    }
}

/// Summary row for template listings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub code: String,
    pub title: String,
    pub version: u32,
    pub sections: usize,
    pub fields: usize,
}

impl From<&FormTemplate> for TemplateSummary {
    fn from(t: &FormTemplate) -> Self {
        Self {
            code: t.form_type().code().to_string(),
            title: t.title().to_string(),
            version: t.version(),
            sections: t.sections().len(),
            fields: t.field_count(),
        }
    }
}
