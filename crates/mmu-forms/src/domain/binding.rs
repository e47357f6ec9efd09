//! Section/field renderer
//!
//! Headless rendering of a template: each field becomes a [`FieldView`]
//! describing the control to show, bound to the current value and error.
//! User interactions go back through [`FieldBinder::bind`], which yields at
//! most one typed [`ValueChange`]. Rendering and binding are stateless; the
//! only state they touch is the caller-owned [`WidgetState`].

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt::{self, Write};

use crate::domain::store::{FieldValueStore, ValidationErrors};
use crate::domain::template::{FormField, FormTemplate};
use crate::domain::value_objects::{AttachmentRef, FieldId, FieldType, FieldValue, FormType};

/// Picker delegated to the host for date/time acquisition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    Date,
    Time,
}

/// Capture flow delegated to the host (camera, signature pad)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    Photo,
    Signature,
}

/// Interactive control a field renders as
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    TextInput { multiline: bool },
    NumericInput { integer: bool },
    Dropdown { options: Vec<String>, selected: Option<String>, expanded: bool },
    Checkbox { checked: bool },
    DateTimePicker { picker: PickerKind },
    Capture { capture: CaptureKind, captured: bool },
}

/// Rendered field, ready for a host UI to draw
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldView {
    pub id: FieldId,
    pub label: String,
    pub unit: Option<String>,
    pub required: bool,
    pub placeholder: Option<String>,
    pub control: Control,
    pub display_value: String,
    /// Exactly the error-set entry for this field
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionView {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormView {
    pub form_type: FormType,
    pub title: String,
    pub sections: Vec<SectionView>,
}

impl FormView {
    pub fn fields(&self) -> impl Iterator<Item = &FieldView> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FieldView> {
        self.fields().find(|f| f.id.as_str() == id)
    }
}

/// Transient per-screen widget state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidgetState {
    expanded_dropdown: Option<FieldId>,
}

impl WidgetState {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_dropdown.as_ref().map(|f| f.as_str() == id).unwrap_or(false)
    }

    pub fn expanded(&self) -> Option<&FieldId> {
        self.expanded_dropdown.as_ref()
    }

    fn toggle(&mut self, id: &FieldId) {
        if self.is_expanded(id.as_str()) {
            self.expanded_dropdown = None;
        } else {
            self.expanded_dropdown = Some(id.clone());
        }
    }

    fn collapse(&mut self, id: &FieldId) {
        if self.is_expanded(id.as_str()) {
            self.expanded_dropdown = None;
        }
    }
}

/// User interaction with a rendered control
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    TextChanged(String),
    ToggleDropdown,
    OptionSelected(String),
    Toggled(bool),
    DatePicked(NaiveDate),
    TimePicked(NaiveTime),
    Captured(AttachmentRef),
}

/// Typed value-change event produced by a binding
#[derive(Clone, Debug, PartialEq)]
pub struct ValueChange {
    pub field_id: FieldId,
    pub value: FieldValue,
}

/// Translates interactions into value changes
#[derive(Clone, Debug)]
pub struct FieldBinder {
    date_format: String,
    time_format: String,
}

impl Default for FieldBinder {
    fn default() -> Self {
        Self::new("%Y-%m-%d", "%H:%M")
    }
}

impl FieldBinder {
    pub fn new(date_format: impl Into<String>, time_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            time_format: time_format.into(),
        }
    }

    pub fn date_format(&self) -> &str { &self.date_format }
    pub fn time_format(&self) -> &str { &self.time_format }

    /// Whether chrono understands every specifier in `format`
    pub fn is_valid_format(format: &str) -> bool {
        !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    }

    /// Bind one interaction to a field. Returns `None` when the interaction
    /// produces no value: unparsable numeric text, an option outside the
    /// declared list, a dropdown toggle, or an interaction the control does
    /// not accept.
    pub fn bind(
        &self,
        field: &FormField,
        interaction: Interaction,
        widgets: &mut WidgetState,
    ) -> Option<ValueChange> {
        let value = match (field.field_type, interaction) {
            (FieldType::ShortText | FieldType::MultilineText, Interaction::TextChanged(s)) => {
                FieldValue::Text(s)
            }
            (FieldType::Number, Interaction::TextChanged(s)) => {
                let n = s.trim().parse::<f64>().ok().filter(|n| n.is_finite())?;
                FieldValue::Number(n)
            }
            (FieldType::Integer, Interaction::TextChanged(s)) => {
                FieldValue::Integer(s.trim().parse::<i64>().ok()?)
            }
            (FieldType::Dropdown, Interaction::ToggleDropdown) => {
                widgets.toggle(&field.id);
                return None;
            }
            (FieldType::Dropdown, Interaction::OptionSelected(option)) => {
                if !field.has_option(&option) {
                    return None;
                }
                widgets.collapse(&field.id);
                FieldValue::Text(option)
            }
            (FieldType::Checkbox, Interaction::Toggled(checked)) => FieldValue::Boolean(checked),
            (FieldType::Date, Interaction::DatePicked(date)) => {
                FieldValue::Text(render_text(date.format(&self.date_format))?)
            }
            (FieldType::Time, Interaction::TimePicked(time)) => {
                FieldValue::Text(render_text(time.format(&self.time_format))?)
            }
            (FieldType::Photo | FieldType::Signature, Interaction::Captured(reference)) => {
                FieldValue::Attachment(reference)
            }
            _ => return None,
        };

        Some(ValueChange {
            field_id: field.id.clone(),
            value,
        })
    }
}

/// `None` when the formatter rejects its pattern, e.g. `%z` on a bare date
fn render_text(value: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{value}").ok()?;
    Some(out)
}

/// Render one field bound to its current value and error
pub fn render_field(
    field: &FormField,
    value: Option<&FieldValue>,
    error: Option<&str>,
    widgets: &WidgetState,
) -> FieldView {
    let control = match field.field_type {
        FieldType::ShortText => Control::TextInput { multiline: false },
        FieldType::MultilineText => Control::TextInput { multiline: true },
        FieldType::Number => Control::NumericInput { integer: false },
        FieldType::Integer => Control::NumericInput { integer: true },
        FieldType::Dropdown => Control::Dropdown {
            options: field.options.clone(),
            selected: value.and_then(FieldValue::as_text).map(str::to_string),
            expanded: widgets.is_expanded(field.id.as_str()),
        },
        FieldType::Checkbox => Control::Checkbox {
            checked: value.and_then(FieldValue::as_bool).unwrap_or(false),
        },
        FieldType::Date => Control::DateTimePicker { picker: PickerKind::Date },
        FieldType::Time => Control::DateTimePicker { picker: PickerKind::Time },
        FieldType::Photo => Control::Capture {
            capture: CaptureKind::Photo,
            captured: value.is_some(),
        },
        FieldType::Signature => Control::Capture {
            capture: CaptureKind::Signature,
            captured: value.is_some(),
        },
    };

    FieldView {
        id: field.id.clone(),
        label: field.label.clone(),
        unit: field.unit.clone(),
        required: field.required,
        placeholder: field.placeholder.clone(),
        control,
        display_value: value.map(FieldValue::display).unwrap_or_default(),
        error: error.map(str::to_string),
    }
}

/// Render the whole template, section by section
pub fn render_form(
    template: &FormTemplate,
    store: &FieldValueStore,
    errors: &ValidationErrors,
    widgets: &WidgetState,
) -> FormView {
    let sections = template
        .sections()
        .iter()
        .map(|section| SectionView {
            title: section.title.clone(),
            description: section.description.clone(),
            fields: section
                .fields
                .iter()
                .map(|f| {
                    let id = f.id.as_str();
                    render_field(f, store.get(id), errors.get(id), widgets)
                })
                .collect(),
        })
        .collect();

    FormView {
        form_type: template.form_type(),
        title: template.title().to_string(),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::FormSection;
    use crate::domain::validation::Validator;
    use proptest::prelude::*;

    fn template() -> FormTemplate {
        FormTemplate::new(
            FormType::PumpInspection,
            "Pump Inspection",
            vec![
                FormSection::new("Readings")
                    .field(FormField::number("temperature", "Temperature").with_unit("°C").required())
                    .field(FormField::integer("strokes", "Strokes"))
                    .field(FormField::dropdown("status", "Status", ["SAT", "ATT", "ACT"])),
                FormSection::new("Evidence")
                    .field(FormField::photo("photo", "Photo"))
                    .field(FormField::date("inspected_on", "Inspected on"))
                    .field(FormField::time("inspected_at", "Inspected at"))
                    .field(FormField::checkbox("ppe_ok", "PPE checked"))
                    .field(FormField::multiline("notes", "Notes")),
            ],
        )
        .unwrap()
    }

    /// Feed an interaction through binding into the store, as a session does
    fn apply(t: &FormTemplate, store: &mut FieldValueStore, widgets: &mut WidgetState, id: &str, i: Interaction) {
        let binder = FieldBinder::default();
        if let Some(change) = binder.bind(t.field(id).unwrap(), i, widgets) {
            store.update(t, change.field_id.as_str(), Some(change.value)).unwrap();
        }
    }

    #[test]
    fn test_numeric_scenario_keeps_last_valid_value() {
        let t = template();
        let mut store = FieldValueStore::from_template(&t);
        let mut widgets = WidgetState::default();

        apply(&t, &mut store, &mut widgets, "temperature", Interaction::TextChanged("23.5".into()));
        assert_eq!(store.get("temperature"), Some(&FieldValue::Number(23.5)));

        apply(&t, &mut store, &mut widgets, "temperature", Interaction::TextChanged("abc".into()));
        assert_eq!(store.get("temperature"), Some(&FieldValue::Number(23.5)));
    }

    #[test]
    fn test_integer_rejects_decimals() {
        let t = template();
        let mut store = FieldValueStore::new();
        let mut widgets = WidgetState::default();
        apply(&t, &mut store, &mut widgets, "strokes", Interaction::TextChanged(" 42 ".into()));
        apply(&t, &mut store, &mut widgets, "strokes", Interaction::TextChanged("42.5".into()));
        assert_eq!(store.get("strokes"), Some(&FieldValue::Integer(42)));
    }

    #[test]
    fn test_non_finite_numbers_dropped() {
        let binder = FieldBinder::default();
        let field = FormField::number("t", "T");
        let mut widgets = WidgetState::default();
        for input in ["NaN", "inf", "-infinity"] {
            assert!(binder.bind(&field, Interaction::TextChanged(input.into()), &mut widgets).is_none());
        }
    }

    #[test]
    fn test_dropdown_scenario_selects_and_closes() {
        let t = template();
        let binder = FieldBinder::default();
        let field = t.field("status").unwrap();
        let mut widgets = WidgetState::default();

        assert!(binder.bind(field, Interaction::ToggleDropdown, &mut widgets).is_none());
        assert!(widgets.is_expanded("status"));

        let change = binder
            .bind(field, Interaction::OptionSelected("ATT".into()), &mut widgets)
            .unwrap();
        assert_eq!(change.field_id.as_str(), "status");
        assert_eq!(change.value, FieldValue::text("ATT"));
        assert!(!widgets.is_expanded("status"));
    }

    #[test]
    fn test_dropdown_ignores_unknown_option() {
        let t = template();
        let binder = FieldBinder::default();
        let mut widgets = WidgetState::default();
        let field = t.field("status").unwrap();
        binder.bind(field, Interaction::ToggleDropdown, &mut widgets);
        assert!(binder.bind(field, Interaction::OptionSelected("OK".into()), &mut widgets).is_none());
        assert!(widgets.is_expanded("status"));
    }

    #[test]
    fn test_date_time_use_display_formats() {
        let t = template();
        let binder = FieldBinder::new("%d/%m/%Y", "%H:%M");
        let mut widgets = WidgetState::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let time = NaiveTime::from_hms_opt(6, 5, 0).unwrap();

        let d = binder.bind(t.field("inspected_on").unwrap(), Interaction::DatePicked(date), &mut widgets).unwrap();
        let tm = binder.bind(t.field("inspected_at").unwrap(), Interaction::TimePicked(time), &mut widgets).unwrap();
        assert_eq!(d.value, FieldValue::text("07/03/2024"));
        assert_eq!(tm.value, FieldValue::text("06:05"));
    }

    #[test]
    fn test_unusable_date_format_yields_nothing() {
        let t = template();
        let mut widgets = WidgetState::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        for format in ["%Q", "%Y-%m-%d %z"] {
            let binder = FieldBinder::new(format, "%H:%M");
            let change = binder.bind(t.field("inspected_on").unwrap(), Interaction::DatePicked(date), &mut widgets);
            assert!(change.is_none(), "{format}");
        }
        assert!(!FieldBinder::is_valid_format("%Q"));
        assert!(FieldBinder::is_valid_format("%d/%m/%Y"));
    }

    #[test]
    fn test_mismatched_interaction_yields_nothing() {
        let t = template();
        let binder = FieldBinder::default();
        let mut widgets = WidgetState::default();
        assert!(binder.bind(t.field("inspected_on").unwrap(), Interaction::TextChanged("today".into()), &mut widgets).is_none());
        assert!(binder.bind(t.field("ppe_ok").unwrap(), Interaction::TextChanged("yes".into()), &mut widgets).is_none());
        assert!(binder.bind(t.field("notes").unwrap(), Interaction::ToggleDropdown, &mut widgets).is_none());
        assert_eq!(widgets, WidgetState::default());
    }

    #[test]
    fn test_text_passes_through_raw() {
        let t = template();
        let binder = FieldBinder::default();
        let mut widgets = WidgetState::default();
        let change = binder
            .bind(t.field("notes").unwrap(), Interaction::TextChanged("  leak at gland\n".into()), &mut widgets)
            .unwrap();
        assert_eq!(change.value, FieldValue::text("  leak at gland\n"));
    }

    #[test]
    fn test_capture_control_before_and_after() {
        let t = template();
        let mut store = FieldValueStore::new();
        let widgets = WidgetState::default();
        let field = t.field("photo").unwrap();

        let before = render_field(field, store.get("photo"), None, &widgets);
        assert_eq!(before.control, Control::Capture { capture: CaptureKind::Photo, captured: false });
        assert_eq!(before.display_value, "");

        store
            .update(&t, "photo", Some(FieldValue::Attachment(AttachmentRef::new("/dcim/pump.jpg"))))
            .unwrap();
        let after = render_field(field, store.get("photo"), None, &widgets);
        assert_eq!(after.control, Control::Capture { capture: CaptureKind::Photo, captured: true });
        assert_eq!(after.display_value, "/dcim/pump.jpg");
    }

    #[test]
    fn test_render_form_structure() {
        let t = template();
        let store = FieldValueStore::from_template(&t);
        let errors = Validator::validate(&t, &store);
        let view = render_form(&t, &store, &errors, &WidgetState::default());

        assert_eq!(view.title, "Pump Inspection");
        assert_eq!(view.sections.len(), 2);
        assert_eq!(view.fields().count(), t.field_count());
        let temp = view.field("temperature").unwrap();
        assert_eq!(temp.unit.as_deref(), Some("°C"));
        assert_eq!(temp.error.as_deref(), Some("Temperature is required"));
        assert_eq!(temp.control, Control::NumericInput { integer: false });
    }

    #[test]
    fn test_untouched_form_has_no_values() {
        let t = template();
        let store = FieldValueStore::from_template(&t);
        assert!(store.is_empty());
        let view = render_form(&t, &store, &ValidationErrors::new(), &WidgetState::default());
        assert!(view.fields().all(|f| f.display_value.is_empty()));
    }

    proptest! {
        #[test]
        fn prop_unparsable_numeric_input_leaves_value(input in "[^0-9]*[a-zA-Z_ ]+[^0-9]*", start in -1.0e6f64..1.0e6) {
            prop_assume!(input.trim().parse::<f64>().is_err());
            let t = template();
            let mut store = FieldValueStore::new();
            let mut widgets = WidgetState::default();
            store.update(&t, "temperature", Some(FieldValue::Number(start))).unwrap();
            store.update(&t, "strokes", Some(FieldValue::Integer(7))).unwrap();

            apply(&t, &mut store, &mut widgets, "temperature", Interaction::TextChanged(input.clone()));
            apply(&t, &mut store, &mut widgets, "strokes", Interaction::TextChanged(input));

            prop_assert_eq!(store.get("temperature"), Some(&FieldValue::Number(start)));
            prop_assert_eq!(store.get("strokes"), Some(&FieldValue::Integer(7)));
        }

        #[test]
        fn prop_dropdown_emits_only_declared_options(choice in ".*") {
            let t = template();
            let field = t.field("status").unwrap();
            let mut widgets = WidgetState::default();
            if let Some(change) = FieldBinder::default().bind(field, Interaction::OptionSelected(choice), &mut widgets) {
                let selected = change.value.as_text().unwrap().to_string();
                prop_assert!(field.options.contains(&selected));
            }
        }

        #[test]
        fn prop_rendered_error_is_error_set_entry(temp in proptest::option::of(-50.0f64..150.0)) {
            let t = FormTemplate::new(
                FormType::Generic,
                "T",
                vec![FormSection::new("S")
                    .field(FormField::number("temperature", "Temperature").with_range(Some(0.0), Some(90.0)).required())
                    .field(FormField::text("notes", "Notes"))],
            ).unwrap();
            let mut store = FieldValueStore::new();
            store.update(&t, "temperature", temp.map(FieldValue::Number)).unwrap();
            let errors = Validator::validate(&t, &store);
            let view = render_form(&t, &store, &errors, &WidgetState::default());
            for field in view.fields() {
                prop_assert_eq!(field.error.as_deref(), errors.get(field.id.as_str()));
            }
        }
    }
}
