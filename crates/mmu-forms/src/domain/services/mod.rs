//! Domain services module

pub mod builtin;
mod catalog;
mod prefill;

pub use catalog::{ResolvedTemplate, TemplateCatalog};
pub use prefill::EquipmentPrefill;
