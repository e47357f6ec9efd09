//! Validation engine
//!
//! Computes the complete [`ValidationErrors`] set for a template and its
//! current values. Each pass starts from an empty set.

use crate::domain::store::{FieldValueStore, ValidationErrors};
use crate::domain::template::{FormField, FormTemplate};
use crate::domain::value_objects::{FieldType, FieldValue};
use regex::Regex;

pub struct Validator;

impl Validator {
    /// Validate every declared field, in declaration order
    pub fn validate(template: &FormTemplate, store: &FieldValueStore) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in template.fields() {
            let value = store.get(field.id.as_str());
            let pattern = template.pattern(field.id.as_str());
            if let Some(message) = Self::validate_field(field, value, pattern) {
                errors.insert(field.id.clone(), message);
            }
        }
        errors
    }

    /// Message for the first rule a single field breaks, if any
    pub fn validate_field(
        field: &FormField,
        value: Option<&FieldValue>,
        pattern: Option<&Regex>,
    ) -> Option<String> {
        let value = match value {
            Some(v) if !v.is_blank() => v,
            _ => {
                return field.required.then(|| format!("{} is required", field.label));
            }
        };

        if !value.fits(field.field_type) {
            return Some(format!("{} has an invalid value", field.label));
        }

        let failure = match field.field_type {
            FieldType::Number | FieldType::Integer => Self::check_range(field, value),
            FieldType::ShortText | FieldType::MultilineText => Self::check_text(field, value, pattern),
            FieldType::Dropdown => Self::check_option(field, value),
            FieldType::Checkbox => {
                // A required checkbox is an acknowledgement: it must be ticked
                if field.required && value.as_bool() == Some(false) {
                    return Some(format!("{} is required", field.label));
                }
                None
            }
            FieldType::Date | FieldType::Time => Self::check_pattern(field, value, pattern),
            FieldType::Photo | FieldType::Signature => None,
        };

        failure.map(|default| field.constraints.message.clone().unwrap_or(default))
    }

    fn check_range(field: &FormField, value: &FieldValue) -> Option<String> {
        let n = value.as_number()?;
        let c = &field.constraints;
        let unit = field.unit.as_deref().map(|u| format!(" {}", u)).unwrap_or_default();

        if let Some(min) = c.min {
            if n < min {
                return Some(format!("{} must be at least {}{}", field.label, min, unit));
            }
        }
        if let Some(max) = c.max {
            if n > max {
                return Some(format!("{} must be at most {}{}", field.label, max, unit));
            }
        }
        None
    }

    fn check_text(field: &FormField, value: &FieldValue, pattern: Option<&Regex>) -> Option<String> {
        let text = value.as_text()?;
        let len = text.chars().count();
        let c = &field.constraints;

        if let Some(min) = c.min_length {
            if len < min {
                return Some(format!("{} must be at least {} characters", field.label, min));
            }
        }
        if let Some(max) = c.max_length {
            if len > max {
                return Some(format!("{} must be at most {} characters", field.label, max));
            }
        }
        Self::check_pattern(field, value, pattern)
    }

    fn check_pattern(field: &FormField, value: &FieldValue, pattern: Option<&Regex>) -> Option<String> {
        let (text, regex) = (value.as_text()?, pattern?);
        (!regex.is_match(text)).then(|| format!("{} has an invalid format", field.label))
    }

    fn check_option(field: &FormField, value: &FieldValue) -> Option<String> {
        let text = value.as_text()?;
        (!field.has_option(text))
            .then(|| format!("{} must be one of: {}", field.label, field.options.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::FormSection;
    use crate::domain::value_objects::{AttachmentRef, FormType};

    fn template() -> FormTemplate {
        FormTemplate::new(
            FormType::PumpInspection,
            "Pump",
            vec![
                FormSection::new("Readings")
                    .field(FormField::number("temperature", "Temperature").with_unit("°C").with_range(Some(-10.0), Some(90.0)).required())
                    .field(FormField::integer("strokes", "Strokes").with_range(Some(0.0), None))
                    .field(FormField::dropdown("status", "Status", ["SAT", "ATT", "ACT"]).required())
                    .field(FormField::text("serial", "Serial").with_pattern("^[A-Z]{2}[0-9]{4}$"))
                    .field(FormField::multiline("notes", "Notes").with_length(None, Some(10)).with_message("Keep notes short")),
                FormSection::new("Sign-off")
                    .field(FormField::checkbox("ppe_ok", "PPE checked").required())
                    .field(FormField::signature("signature", "Inspector signature").required()),
            ],
        )
        .unwrap()
    }

    fn set(store: &mut FieldValueStore, t: &FormTemplate, id: &str, v: FieldValue) {
        store.update(t, id, Some(v)).unwrap();
    }

    #[test]
    fn test_empty_store_reports_required_fields_only() {
        let t = template();
        let errors = Validator::validate(&t, &FieldValueStore::new());
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("temperature"), Some("Temperature is required"));
        assert_eq!(errors.get("signature"), Some("Inspector signature is required"));
        assert!(errors.get("strokes").is_none());
    }

    #[test]
    fn test_range_messages_include_unit() {
        let t = template();
        let mut store = FieldValueStore::new();
        set(&mut store, &t, "temperature", FieldValue::Number(95.5));
        set(&mut store, &t, "strokes", FieldValue::Integer(-1));
        let errors = Validator::validate(&t, &store);
        assert_eq!(errors.get("temperature"), Some("Temperature must be at most 90 °C"));
        assert_eq!(errors.get("strokes"), Some("Strokes must be at least 0"));
    }

    #[test]
    fn test_pattern_and_custom_message() {
        let t = template();
        let mut store = FieldValueStore::new();
        set(&mut store, &t, "serial", FieldValue::text("pu12"));
        set(&mut store, &t, "notes", FieldValue::text("far too many characters"));
        let errors = Validator::validate(&t, &store);
        assert_eq!(errors.get("serial"), Some("Serial has an invalid format"));
        assert_eq!(errors.get("notes"), Some("Keep notes short"));
    }

    #[test]
    fn test_unticked_required_checkbox() {
        let t = template();
        let mut store = FieldValueStore::new();
        set(&mut store, &t, "ppe_ok", FieldValue::Boolean(false));
        assert_eq!(Validator::validate(&t, &store).get("ppe_ok"), Some("PPE checked is required"));
        set(&mut store, &t, "ppe_ok", FieldValue::Boolean(true));
        assert!(Validator::validate(&t, &store).get("ppe_ok").is_none());
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let field = FormField::text("site", "Site").required();
        assert_eq!(
            Validator::validate_field(&field, Some(&FieldValue::text("  ")), None),
            Some("Site is required".to_string())
        );
    }

    #[test]
    fn test_complete_form_is_valid() {
        let t = template();
        let mut store = FieldValueStore::new();
        set(&mut store, &t, "temperature", FieldValue::Number(23.5));
        set(&mut store, &t, "status", FieldValue::text("ATT"));
        set(&mut store, &t, "serial", FieldValue::text("PU1234"));
        set(&mut store, &t, "ppe_ok", FieldValue::Boolean(true));
        set(&mut store, &t, "signature", FieldValue::Attachment(AttachmentRef::new("/sig/1.png")));
        assert!(Validator::validate(&t, &store).is_empty());
    }

    #[test]
    fn test_option_membership() {
        let field = FormField::dropdown("status", "Status", ["SAT", "ATT"]);
        assert_eq!(
            Validator::validate_field(&field, Some(&FieldValue::text("ACT")), None),
            Some("Status must be one of: SAT, ATT".to_string())
        );
    }
}
