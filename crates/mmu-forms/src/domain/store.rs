//! Field Value Store and Validation Error Set
//!
//! Both are keyed by [`FieldId`] and only ever hold ids the active template
//! declares. The value store changes through [`FieldValueStore::update`]
//! alone; the error set is replaced wholesale on each validation pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::template::{FormField, FormTemplate};
use crate::domain::value_objects::{FieldId, FieldType, FieldValue};

/// Live mapping of field id to user-entered value for one editing session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValueStore {
    values: BTreeMap<FieldId, FieldValue>,
}

impl FieldValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the template's declared defaults and nothing else
    pub fn from_template(template: &FormTemplate) -> Self {
        let values = template
            .defaults()
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect();
        Self { values }
    }

    /// Rebuild a store from a saved snapshot, dropping keys the template no
    /// longer declares or whose values no longer fit
    pub fn restore(template: &FormTemplate, snapshot: &BTreeMap<FieldId, FieldValue>) -> Self {
        let values = snapshot
            .iter()
            .filter(|(id, value)| match template.field(id.as_str()) {
                Some(field) => accepts(field, value),
                None => {
                    tracing::debug!(field = %id, "dropping stale field from snapshot");
                    false
                }
            })
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect();
        Self { values }
    }

    /// Set (`Some`) or clear (`None`) a field value, returning the previous one
    pub fn update(
        &mut self,
        template: &FormTemplate,
        id: &str,
        value: Option<FieldValue>,
    ) -> Result<Option<FieldValue>, StoreError> {
        let field = template
            .field(id)
            .ok_or_else(|| StoreError::UnknownField(id.to_string()))?;

        match value {
            Some(value) => {
                if !value.fits(field.field_type) {
                    return Err(StoreError::TypeMismatch {
                        field: id.to_string(),
                        expected: field.field_type,
                    });
                }
                if !accepts(field, &value) {
                    return Err(StoreError::NotAnOption {
                        field: id.to_string(),
                        value: value.display(),
                    });
                }
                Ok(self.values.insert(field.id.clone(), value))
            }
            None => Ok(self.values.remove(id)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldValue)> {
        self.values.iter()
    }

    /// Copy of the current values for persistence
    pub fn snapshot(&self) -> BTreeMap<FieldId, FieldValue> {
        self.values.clone()
    }
}

/// Dropdowns only hold members of their option list
fn accepts(field: &FormField, value: &FieldValue) -> bool {
    if !value.fits(field.field_type) {
        return false;
    }
    match field.field_type {
        FieldType::Dropdown => value.as_text().map(|o| field.has_option(o)).unwrap_or(false),
        _ => true,
    }
}

/// Mapping of field id to human-readable validation message
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<FieldId, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: FieldId, message: impl Into<String>) {
        self.errors.insert(id, message.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &str)> {
        self.errors.iter().map(|(k, v)| (k, v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("field {0} is not declared by the template")]
    UnknownField(String),

    #[error("value does not fit field {field} of type {expected:?}")]
    TypeMismatch { field: String, expected: FieldType },

    #[error("'{value}' is not an option of field {field}")]
    NotAnOption { field: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::FormSection;
    use crate::domain::value_objects::FormType;

    fn template() -> FormTemplate {
        FormTemplate::new(
            FormType::PumpInspection,
            "Pump",
            vec![FormSection::new("Readings")
                .field(FormField::number("temperature", "Temperature").with_unit("°C"))
                .field(FormField::dropdown("status", "Status", ["SAT", "ATT", "ACT"]).with_default(FieldValue::text("SAT")))
                .field(FormField::text("notes", "Notes"))],
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_store_holds_only_defaults() {
        let t = template();
        let store = FieldValueStore::from_template(&t);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("status"), Some(&FieldValue::text("SAT")));
        assert!(store.get("temperature").is_none());
    }

    #[test]
    fn test_update_and_clear() {
        let t = template();
        let mut store = FieldValueStore::new();
        assert_eq!(store.update(&t, "temperature", Some(FieldValue::Number(23.5))), Ok(None));
        assert_eq!(
            store.update(&t, "temperature", Some(FieldValue::Number(24.0))),
            Ok(Some(FieldValue::Number(23.5)))
        );
        assert_eq!(store.update(&t, "temperature", None), Ok(Some(FieldValue::Number(24.0))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_field_never_written() {
        let t = template();
        let mut store = FieldValueStore::new();
        assert_eq!(
            store.update(&t, "pressure", Some(FieldValue::Number(1.0))),
            Err(StoreError::UnknownField("pressure".into()))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let t = template();
        let mut store = FieldValueStore::new();
        assert!(matches!(
            store.update(&t, "temperature", Some(FieldValue::text("hot"))),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert!(store.get("temperature").is_none());
    }

    #[test]
    fn test_dropdown_refuses_values_outside_options() {
        let t = template();
        let mut store = FieldValueStore::from_template(&t);
        assert_eq!(
            store.update(&t, "status", Some(FieldValue::text("BROKEN"))),
            Err(StoreError::NotAnOption { field: "status".into(), value: "BROKEN".into() })
        );
        assert_eq!(store.get("status"), Some(&FieldValue::text("SAT")));
        assert_eq!(
            store.update(&t, "status", Some(FieldValue::text("ACT"))),
            Ok(Some(FieldValue::text("SAT")))
        );
    }

    #[test]
    fn test_restore_drops_stale_keys() {
        let t = template();
        let mut snapshot = BTreeMap::new();
        snapshot.insert(FieldId::new("temperature").unwrap(), FieldValue::Number(30.0));
        snapshot.insert(FieldId::new("removed_field").unwrap(), FieldValue::text("x"));
        snapshot.insert(FieldId::new("notes").unwrap(), FieldValue::Boolean(true));
        snapshot.insert(FieldId::new("status").unwrap(), FieldValue::text("retired option"));

        let store = FieldValueStore::restore(&t, &snapshot);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("temperature"), Some(&FieldValue::Number(30.0)));
    }
}
