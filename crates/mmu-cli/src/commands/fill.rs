//! Fill command: enter values, then save a draft or submit

use anyhow::{anyhow, Context};
use colored::Colorize;

use mmu_forms::application::FormInstanceView;
use mmu_forms::{EntityId, FormLifecycle, FormSession};

use super::{apply_values, Settings};
use crate::output::{or_dash, KeyValue};

fn details(view: &FormInstanceView) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("ID", &view.id),
        KeyValue::new("Form", &view.title),
        KeyValue::new("Template version", view.template_version),
        KeyValue::new("Status", format!("{:?}", view.status)),
        KeyValue::new("Equipment", or_dash(view.equipment_id.as_ref())),
        KeyValue::new("Created by", &view.created_by),
        KeyValue::new("Updated", view.updated_at.format("%Y-%m-%d %H:%M:%S")),
        KeyValue::new("Submitted", or_dash(view.submitted_at.map(|t| t.format("%Y-%m-%d %H:%M:%S")))),
    ];
    rows.extend(view.values.iter().map(|(id, value)| KeyValue::new(id.as_str(), value)));
    rows
}

fn print_errors(session: &FormSession) {
    let Some(template) = session.template() else { return };
    for (id, message) in session.errors().iter() {
        let label = template
            .field(id.as_str())
            .map(|f| f.label.as_str())
            .unwrap_or(id.as_str());
        eprintln!("  {} {}: {}", "-".red(), label.bold(), message);
    }
}

pub async fn handle(
    code: &str,
    values: &[String],
    equipment: Option<&str>,
    submit: bool,
    settings: &Settings,
) -> anyhow::Result<()> {
    let service = settings.service().await?;
    let binder = settings.forms.binder();
    let mut session = service.session();

    session.initialize_form(code);

    if let Some(id) = equipment {
        let written = session
            .load_equipment_data(&EntityId::from_string(id))
            .await
            .with_context(|| format!("loading equipment {id}"))?;
        tracing::debug!(equipment = id, written, "equipment prefill applied");
    }

    apply_values(&mut session, values, &binder)?;

    if submit {
        session.submit_form().await;
    } else {
        session.save_draft().await;
    }

    if let Some(error) = session.status().last_error {
        print_errors(&session);
        return Err(anyhow!(error));
    }

    let id = session.form_id().cloned().context("no form initialized")?;
    let view = service.get_form(&id).await?;

    settings.format.print(&view, || details(&view))?;
    if settings.format.is_table() {
        let verb = if submit { "submitted" } else { "saved as draft" };
        println!("{} form {} {}", "✓".green().bold(), view.id, verb);
    }
    Ok(())
}
