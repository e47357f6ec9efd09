//! MMU Companion Forms Engine
//!
//! Headless form engine behind the MMU field companion: inspection,
//! maintenance, production and safety documents described by templates,
//! edited through typed field bindings, validated, and saved as drafts or
//! submitted records.
//!
//! ## Architecture
//!
//! - **Domain Layer**: templates, value store, validation, field binding,
//!   aggregates (FormInstance, JobCard), domain events
//! - **Application Layer**: the form session controller, use case services, DTOs
//! - **Ports Layer**: hexagonal interfaces for repositories and publishers
//! - **Infrastructure Layer**: in-memory and file-backed adapters
//!
//! ## Data flow
//!
//! Rendering flows one way (template + values + errors -> [`FormView`]),
//! events flow back the other way (interaction -> value change -> store
//! update -> re-render).

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use domain::aggregates::{Equipment, FormInstance, FormStatus, JobCard, JobCardStatus, Priority};
pub use domain::binding::{
    render_field, render_form, Control, FieldBinder, FieldView, FormView, Interaction, SectionView,
    ValueChange, WidgetState,
};
pub use domain::services::{EquipmentPrefill, ResolvedTemplate, TemplateCatalog};
pub use domain::store::{FieldValueStore, ValidationErrors};
pub use domain::template::{FieldConstraints, FormField, FormSection, FormTemplate};
pub use domain::validation::Validator;
pub use domain::value_objects::{
    AttachmentRef, EntityId, FieldId, FieldType, FieldValue, FormId, FormType,
};
pub use domain::events::{DomainEvent, FormEvent, JobCardEvent};
pub use application::{FormService, FormSession, JobCardService, SessionStatus};
pub use ports::inbound::{FormLifecycle, JobCardUseCases, UseCaseError};
pub use ports::outbound::{
    EquipmentRepository, EventPublisher, FormRepository, JobCardRepository, RepositoryError,
    TemplateSource,
};
pub use config::FormsConfig;
pub use error::{FormsError, FormsResult};
