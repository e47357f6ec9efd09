//! Form template schema
//!
//! A [`FormTemplate`] is the static description of one kind of document:
//! ordered sections, each holding ordered fields. Templates are immutable
//! once built and every field id is unique across the whole template.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::value_objects::{FieldId, FieldType, FieldValue, FormType};

/// Declarative validation constraints for a field
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Replaces the default message for constraint failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldConstraints {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One data point on a form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub id: FieldId,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "FieldConstraints::is_empty")]
    pub constraints: FieldConstraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
}

impl FormField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: FieldId::new_unchecked(id),
            label: label.into(),
            field_type,
            unit: None,
            options: vec![],
            required: false,
            constraints: FieldConstraints::default(),
            placeholder: None,
            default_value: None,
        }
    }

    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::ShortText)
    }

    pub fn multiline(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::MultilineText)
    }

    pub fn number(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Number)
    }

    pub fn integer(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Integer)
    }

    pub fn dropdown<I, S>(id: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(id, label, FieldType::Dropdown);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    pub fn checkbox(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Checkbox)
    }

    pub fn date(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Date)
    }

    pub fn time(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Time)
    }

    pub fn photo(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Photo)
    }

    pub fn signature(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Signature)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.constraints.min = min;
        self.constraints.max = max;
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.constraints.min_length = min;
        self.constraints.max_length = max;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.pattern = Some(pattern.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.constraints.message = Some(message.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Titled grouping of fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FormField>,
}

impl FormSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: vec![],
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Complete schema for one form type
///
/// # Invariants
/// - At least one field
/// - Field ids are valid and unique across all sections
/// - Dropdowns declare at least one option
/// - Constraints are coherent and patterns compile
/// - Default values fit their field type
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TemplateDefinition")]
pub struct FormTemplate {
    form_type: FormType,
    title: String,
    version: u32,
    sections: Vec<FormSection>,
    #[serde(skip)]
    patterns: HashMap<FieldId, Regex>,
}

impl FormTemplate {
    /// Build a template, enforcing its invariants
    pub fn new(
        form_type: FormType,
        title: impl Into<String>,
        sections: Vec<FormSection>,
    ) -> Result<Self, TemplateError> {
        let mut seen = HashSet::new();
        let mut patterns = HashMap::new();

        for field in sections.iter().flat_map(|s| s.fields.iter()) {
            let id = FieldId::new(field.id.as_str()).map_err(|e| TemplateError::InvalidFieldId {
                id: field.id.to_string(),
                reason: e.to_string(),
            })?;

            if !seen.insert(id.clone()) {
                return Err(TemplateError::DuplicateField(id.to_string()));
            }

            if field.field_type == FieldType::Dropdown && field.options.is_empty() {
                return Err(TemplateError::MissingOptions(id.to_string()));
            }

            let c = &field.constraints;
            if let (Some(min), Some(max)) = (c.min, c.max) {
                if min > max {
                    return Err(TemplateError::InvalidRange(id.to_string()));
                }
            }
            if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
                if min > max {
                    return Err(TemplateError::InvalidRange(id.to_string()));
                }
            }

            if let Some(pattern) = &c.pattern {
                let regex = Regex::new(pattern).map_err(|e| TemplateError::InvalidPattern {
                    field: id.to_string(),
                    reason: e.to_string(),
                })?;
                patterns.insert(id.clone(), regex);
            }

            if let Some(default) = &field.default_value {
                let fits = default.fits(field.field_type)
                    && (field.field_type != FieldType::Dropdown
                        || default.as_text().map(|o| field.has_option(o)).unwrap_or(false));
                if !fits {
                    return Err(TemplateError::DefaultMismatch(id.to_string()));
                }
            }
        }

        if seen.is_empty() {
            return Err(TemplateError::NoFields);
        }

        Ok(Self {
            form_type,
            title: title.into(),
            version: 1,
            sections,
            patterns,
        })
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn form_type(&self) -> FormType { self.form_type }
    pub fn title(&self) -> &str { &self.title }
    pub fn version(&self) -> u32 { self.version }
    pub fn sections(&self) -> &[FormSection] { &self.sections }

    /// All fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields().find(|f| f.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Compiled pattern constraint for a field
    pub fn pattern(&self, id: &str) -> Option<&Regex> {
        self.patterns.get(id)
    }

    /// Template-declared default values
    pub fn defaults(&self) -> impl Iterator<Item = (&FieldId, &FieldValue)> {
        self.fields()
            .filter_map(|f| f.default_value.as_ref().map(|v| (&f.id, v)))
    }
}

/// Serialized shape of a template, validated on conversion
#[derive(Deserialize)]
struct TemplateDefinition {
    form_type: FormType,
    title: String,
    #[serde(default = "default_version")]
    version: u32,
    sections: Vec<FormSection>,
}

fn default_version() -> u32 {
    1
}

impl TryFrom<TemplateDefinition> for FormTemplate {
    type Error = TemplateError;

    fn try_from(def: TemplateDefinition) -> Result<Self, Self::Error> {
        Ok(FormTemplate::new(def.form_type, def.title, def.sections)?.with_version(def.version))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template declares no fields")]
    NoFields,

    #[error("duplicate field id: {0}")]
    DuplicateField(String),

    #[error("invalid field id {id:?}: {reason}")]
    InvalidFieldId { id: String, reason: String },

    #[error("dropdown {0} declares no options")]
    MissingOptions(String),

    #[error("field {0} has min greater than max")]
    InvalidRange(String),

    #[error("field {field} has an invalid pattern: {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("default value of {0} does not fit the field")]
    DefaultMismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> FormSection {
        FormSection::new("Readings")
            .field(FormField::number("temperature", "Temperature").with_unit("°C"))
            .field(FormField::dropdown("status", "Status", ["SAT", "ATT", "ACT"]))
    }

    #[test]
    fn test_template_creation() {
        let t = FormTemplate::new(FormType::PumpInspection, "Pump", vec![section()]).unwrap();
        assert_eq!(t.field_count(), 2);
        assert_eq!(t.version(), 1);
        assert!(t.contains("temperature"));
        assert_eq!(t.field("temperature").unwrap().unit.as_deref(), Some("°C"));
        assert!(t.field("pressure").is_none());
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let second = FormSection::new("Sign-off").field(FormField::signature("sig", "Signature"));
        let t = FormTemplate::new(FormType::Generic, "T", vec![section(), second]).unwrap();
        let ids: Vec<_> = t.fields().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["temperature", "status", "sig"]);
    }

    #[test]
    fn test_empty_template_fails() {
        let err = FormTemplate::new(FormType::Generic, "T", vec![FormSection::new("Empty")]).unwrap_err();
        assert_eq!(err, TemplateError::NoFields);
    }

    #[test]
    fn test_duplicate_field_across_sections_fails() {
        let other = FormSection::new("Again").field(FormField::text("temperature", "Temp"));
        let err = FormTemplate::new(FormType::Generic, "T", vec![section(), other]).unwrap_err();
        assert_eq!(err, TemplateError::DuplicateField("temperature".into()));
    }

    #[test]
    fn test_invalid_field_id_fails() {
        let s = FormSection::new("S").field(FormField::text("bad id", "Bad"));
        assert!(matches!(
            FormTemplate::new(FormType::Generic, "T", vec![s]),
            Err(TemplateError::InvalidFieldId { .. })
        ));
    }

    #[test]
    fn test_dropdown_without_options_fails() {
        let s = FormSection::new("S").field(FormField::dropdown("status", "Status", Vec::<String>::new()));
        assert_eq!(
            FormTemplate::new(FormType::Generic, "T", vec![s]).unwrap_err(),
            TemplateError::MissingOptions("status".into())
        );
    }

    #[test]
    fn test_inverted_range_fails() {
        let s = FormSection::new("S").field(FormField::number("p", "P").with_range(Some(10.0), Some(1.0)));
        assert_eq!(
            FormTemplate::new(FormType::Generic, "T", vec![s]).unwrap_err(),
            TemplateError::InvalidRange("p".into())
        );
    }

    #[test]
    fn test_bad_pattern_fails() {
        let s = FormSection::new("S").field(FormField::text("serial", "Serial").with_pattern("("));
        assert!(matches!(
            FormTemplate::new(FormType::Generic, "T", vec![s]),
            Err(TemplateError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_default_must_fit_field() {
        let s = FormSection::new("S")
            .field(FormField::dropdown("status", "Status", ["SAT"]).with_default(FieldValue::text("NO")));
        assert_eq!(
            FormTemplate::new(FormType::Generic, "T", vec![s]).unwrap_err(),
            TemplateError::DefaultMismatch("status".into())
        );
    }

    #[test]
    fn test_patterns_compiled_once() {
        let s = FormSection::new("S").field(FormField::text("serial", "Serial").with_pattern("^[A-Z]{2}[0-9]+$"));
        let t = FormTemplate::new(FormType::Generic, "T", vec![s]).unwrap();
        assert!(t.pattern("serial").unwrap().is_match("PU1234"));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::json!({
            "form_type": "pump_inspection",
            "title": "Pump",
            "version": 3,
            "sections": [{
                "title": "Readings",
                "fields": [
                    { "id": "flow", "label": "Flow", "field_type": "number", "unit": "L/min",
                      "constraints": { "min": 0.0, "pattern": "^[0-9.]+$" } }
                ]
            }]
        });
        let t: FormTemplate = serde_json::from_value(json).unwrap();
        assert_eq!(t.version(), 3);
        assert!(t.pattern("flow").is_some());

        let dup = serde_json::json!({
            "form_type": "generic",
            "title": "Dup",
            "sections": [{ "title": "S", "fields": [
                { "id": "a", "label": "A", "field_type": "short_text" },
                { "id": "a", "label": "A", "field_type": "short_text" }
            ]}]
        });
        assert!(serde_json::from_value::<FormTemplate>(dup).is_err());
    }
}
