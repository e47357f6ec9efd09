//! Render command

use anyhow::Context;
use colored::Colorize;
use tabled::Tabled;

use mmu_forms::{Control, FieldView, FormLifecycle};

use super::{apply_values, Settings};
use crate::output::{or_dash, table};

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    label: String,
    #[tabled(rename = "Control")]
    control: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&FieldView> for FieldRow {
    fn from(f: &FieldView) -> Self {
        let label = if f.required { format!("{} *", f.label) } else { f.label.clone() };
        Self {
            label,
            control: describe(&f.control),
            value: f.display_value.clone(),
            unit: or_dash(f.unit.as_ref()),
            error: f.error.as_deref().map(|e| e.red().to_string()).unwrap_or_default(),
        }
    }
}

fn describe(control: &Control) -> String {
    match control {
        Control::TextInput { multiline: true } => "text (multiline)".into(),
        Control::TextInput { multiline: false } => "text".into(),
        Control::NumericInput { integer: true } => "integer".into(),
        Control::NumericInput { integer: false } => "number".into(),
        Control::Dropdown { options, .. } => format!("dropdown [{}]", options.join("/")),
        Control::Checkbox { checked } => (if *checked { "[x]" } else { "[ ]" }).into(),
        Control::DateTimePicker { picker } => format!("{picker:?} picker").to_lowercase(),
        Control::Capture { capture, captured } => {
            let state = if *captured { "captured" } else { "pending" };
            format!("{capture:?} ({state})").to_lowercase()
        }
    }
}

pub async fn handle(code: &str, values: &[String], settings: &Settings) -> anyhow::Result<()> {
    let service = settings.service().await?;
    let binder = settings.forms.binder();
    let mut session = service.session();

    session.initialize_form(code);
    apply_values(&mut session, values, &binder)?;
    if !values.is_empty() {
        session.validate();
    }

    let view = session.render().context("no form initialized")?;

    if !settings.format.is_table() {
        return settings.format.print(&view, Vec::<FieldRow>::new);
    }

    println!("{}", view.title.bold());
    for section in &view.sections {
        println!("\n{}", section.title.cyan().bold());
        if let Some(description) = &section.description {
            println!("{}", description.dimmed());
        }
        println!("{}", table(section.fields.iter().map(FieldRow::from).collect()));
    }

    let errors = session.errors();
    if !errors.is_empty() {
        println!("\n{} {} field(s) need attention", "!".yellow().bold(), errors.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmu_forms::domain::binding::PickerKind;

    #[test]
    fn test_describe_controls() {
        assert_eq!(describe(&Control::NumericInput { integer: false }), "number");
        assert_eq!(describe(&Control::Checkbox { checked: true }), "[x]");
        assert_eq!(
            describe(&Control::DateTimePicker { picker: PickerKind::Date }),
            "date picker"
        );
        assert_eq!(
            describe(&Control::Dropdown {
                options: vec!["SAT".into(), "ATT".into(), "ACT".into()],
                selected: None,
                expanded: false,
            }),
            "dropdown [SAT/ATT/ACT]"
        );
    }
}
