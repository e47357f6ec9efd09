//! Template commands

use colored::Colorize;
use tabled::Tabled;

use mmu_forms::application::TemplateSummary;
use mmu_forms::FormTemplate;

use super::Settings;
use crate::output::{or_dash, table};
use crate::TemplateCommands;

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Version")]
    version: u32,
    #[tabled(rename = "Sections")]
    sections: usize,
    #[tabled(rename = "Fields")]
    fields: usize,
}

impl From<&TemplateSummary> for TemplateRow {
    fn from(s: &TemplateSummary) -> Self {
        Self {
            code: s.code.clone(),
            title: s.title.clone(),
            version: s.version,
            sections: s.sections,
            fields: s.fields,
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    field_type: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Required")]
    required: &'static str,
    #[tabled(rename = "Options / Constraints")]
    detail: String,
}

fn field_rows(template: &FormTemplate, section: usize) -> Vec<FieldRow> {
    template.sections()[section]
        .fields
        .iter()
        .map(|f| {
            let c = &f.constraints;
            let mut detail = Vec::new();
            if !f.options.is_empty() {
                detail.push(f.options.join(" | "));
            }
            match (c.min, c.max) {
                (Some(min), Some(max)) => detail.push(format!("{min}..{max}")),
                (Some(min), None) => detail.push(format!(">= {min}")),
                (None, Some(max)) => detail.push(format!("<= {max}")),
                (None, None) => {}
            }
            if let Some(pattern) = &c.pattern {
                detail.push(format!("/{pattern}/"));
            }
            FieldRow {
                id: f.id.to_string(),
                label: f.label.clone(),
                field_type: format!("{:?}", f.field_type),
                unit: or_dash(f.unit.as_ref()),
                required: if f.required { "yes" } else { "" },
                detail: detail.join(", "),
            }
        })
        .collect()
}

pub async fn handle(action: TemplateCommands, settings: &Settings) -> anyhow::Result<()> {
    let service = settings.service().await?;

    match action {
        TemplateCommands::List => {
            let summaries = service.templates();
            settings
                .format
                .print(&summaries, || summaries.iter().map(TemplateRow::from).collect())?;
        }
        TemplateCommands::Show { code } => {
            let resolved = service.catalog().resolve(&code);
            let template = resolved.template;
            if resolved.fallback {
                eprintln!(
                    "{} unknown form type '{}', showing {}",
                    "warning:".yellow().bold(),
                    code,
                    template.form_type()
                );
            }

            if settings.format.is_table() {
                println!("{} (v{})", template.title().bold(), template.version());
                for (i, section) in template.sections().iter().enumerate() {
                    println!("\n{}", section.title.cyan().bold());
                    if let Some(description) = &section.description {
                        println!("{}", description.dimmed());
                    }
                    println!("{}", table(field_rows(&template, i)));
                }
            } else {
                settings.format.print(template.as_ref(), Vec::<FieldRow>::new)?;
            }
        }
    }
    Ok(())
}
