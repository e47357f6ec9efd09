//! Template catalog
//!
//! Registry of templates keyed by form type. Resolution never fails: an
//! unknown or unregistered code resolves to the fallback template.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use super::builtin;
use crate::domain::template::{FormTemplate, TemplateError};
use crate::domain::value_objects::FormType;

/// Outcome of resolving a form-type code
#[derive(Clone, Debug)]
pub struct ResolvedTemplate {
    pub template: Arc<FormTemplate>,
    /// `true` when the requested code could not be honoured
    pub fallback: bool,
}

#[derive(Clone, Debug)]
pub struct TemplateCatalog {
    templates: HashMap<FormType, Arc<FormTemplate>>,
    fallback: Arc<FormTemplate>,
}

impl TemplateCatalog {
    /// Catalog holding only the given fallback template
    pub fn new(fallback: FormTemplate) -> Self {
        let fallback = Arc::new(fallback);
        let mut templates = HashMap::new();
        templates.insert(fallback.form_type(), Arc::clone(&fallback));
        Self { templates, fallback }
    }

    /// Catalog with the built-in template of every form type
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut catalog = Self::new(builtin::generic()?);
        catalog.extend(builtin::all()?);
        Ok(catalog)
    }

    /// Register a template, returning the one it replaces
    pub fn register(&mut self, template: FormTemplate) -> Option<Arc<FormTemplate>> {
        let template = Arc::new(template);
        if template.form_type() == self.fallback.form_type() {
            self.fallback = Arc::clone(&template);
        }
        self.templates.insert(template.form_type(), template)
    }

    pub fn extend<I>(&mut self, templates: I) -> usize
    where
        I: IntoIterator<Item = FormTemplate>,
    {
        templates
            .into_iter()
            .map(|t| self.register(t))
            .count()
    }

    /// Switch the fallback to another registered form type
    pub fn set_fallback(&mut self, form_type: FormType) -> bool {
        match self.templates.get(&form_type) {
            Some(template) => {
                self.fallback = Arc::clone(template);
                true
            }
            None => false,
        }
    }

    pub fn fallback(&self) -> Arc<FormTemplate> {
        Arc::clone(&self.fallback)
    }

    pub fn get(&self, form_type: FormType) -> Option<Arc<FormTemplate>> {
        self.templates.get(&form_type).cloned()
    }

    /// Resolve a form-type code to a template
    pub fn resolve(&self, code: &str) -> ResolvedTemplate {
        let found = code
            .parse::<FormType>()
            .ok()
            .and_then(|form_type| self.get(form_type));

        match found {
            Some(template) => ResolvedTemplate { template, fallback: false },
            None => {
                warn!(code = %code, fallback = %self.fallback.form_type(), "unknown form type, using default template");
                ResolvedTemplate {
                    template: self.fallback(),
                    fallback: true,
                }
            }
        }
    }

    /// Registered form types in catalog order
    pub fn form_types(&self) -> Vec<FormType> {
        FormType::ALL
            .iter()
            .copied()
            .filter(|t| self.templates.contains_key(t))
            .collect()
    }

    pub fn templates(&self) -> impl Iterator<Item = Arc<FormTemplate>> + '_ {
        self.form_types()
            .into_iter()
            .filter_map(move |t| self.get(t))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::{FormField, FormSection};

    #[test]
    fn test_builtin_covers_all_types() {
        let catalog = TemplateCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), FormType::ALL.len());
        assert_eq!(catalog.form_types(), FormType::ALL.to_vec());
    }

    #[test]
    fn test_resolve_known_code() {
        let catalog = TemplateCatalog::builtin().unwrap();
        let resolved = catalog.resolve("pump_inspection");
        assert!(!resolved.fallback);
        assert_eq!(resolved.template.form_type(), FormType::PumpInspection);
    }

    #[test]
    fn test_resolve_unknown_code_falls_back() {
        let catalog = TemplateCatalog::builtin().unwrap();
        let resolved = catalog.resolve("crusher_audit");
        assert!(resolved.fallback);
        assert_eq!(resolved.template.form_type(), FormType::Generic);
    }

    #[test]
    fn test_resolve_unregistered_type_falls_back() {
        let catalog = TemplateCatalog::new(builtin::generic().unwrap());
        let resolved = catalog.resolve("tyre_inspection");
        assert!(resolved.fallback);
        assert_eq!(resolved.template.form_type(), FormType::Generic);
    }

    #[test]
    fn test_register_replaces_template() {
        let mut catalog = TemplateCatalog::builtin().unwrap();
        let custom = FormTemplate::new(
            FormType::PumpInspection,
            "Pump Inspection (site variant)",
            vec![FormSection::new("Readings").field(FormField::number("temperature", "Temperature"))],
        )
        .unwrap()
        .with_version(2);

        let previous = catalog.register(custom);
        assert!(previous.is_some());
        let current = catalog.get(FormType::PumpInspection).unwrap();
        assert_eq!(current.version(), 2);
        assert_eq!(current.field_count(), 1);
    }

    #[test]
    fn test_set_fallback_requires_registered_type() {
        let mut catalog = TemplateCatalog::new(builtin::generic().unwrap());
        assert!(!catalog.set_fallback(FormType::IncidentReport));
        catalog.register(builtin::incident_report().unwrap());
        assert!(catalog.set_fallback(FormType::IncidentReport));
        assert_eq!(catalog.resolve("nope").template.form_type(), FormType::IncidentReport);
    }
}
