//! CLI Commands

pub mod config;
pub mod equipment;
pub mod fill;
pub mod render;
pub mod templates;

use anyhow::{anyhow, bail, Context};
use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mmu_forms::infrastructure::{
    InMemoryEquipmentRepository, InMemoryFormRepository, JsonTemplateSource, TracingEventPublisher,
};
use mmu_forms::{
    AttachmentRef, FieldBinder, FieldType, FormField, FormService, FormSession, FormsConfig, Interaction,
    TemplateSource,
};

use crate::output::OutputFormat;

/// Effective settings after merging the profile, the engine config file and flags
pub struct Settings {
    pub format: OutputFormat,
    pub forms: FormsConfig,
}

impl Settings {
    /// Flags win over the profile; the profile wins over the engine config file
    pub fn resolve(
        profile: &crate::config::Config,
        format: Option<OutputFormat>,
        forms_config: Option<&Path>,
        template_dir: Option<PathBuf>,
        user: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut forms = match forms_config.or(profile.forms_config.as_deref()) {
            Some(path) => FormsConfig::load(path)?,
            None => FormsConfig::default(),
        };

        if let Some(dir) = template_dir.or_else(|| profile.template_dir.clone()) {
            forms.template_dir = Some(dir);
        }
        if let Some(user) = user.or_else(|| profile.created_by.clone()) {
            forms.created_by = user;
        }
        if let Some(validate) = profile.validate_on_change {
            forms.validate_on_change = validate;
        }

        let format = match (format, profile.default_format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => OutputFormat::from_str(name, true)
                .map_err(|e| anyhow!("default_format in profile: {e}"))?,
            (None, None) => OutputFormat::default(),
        };

        Ok(Self { format, forms })
    }

    /// Form service over in-memory storage and the demonstration fleet
    pub async fn service(&self) -> anyhow::Result<FormService> {
        let source = self.forms.template_dir.clone().map(JsonTemplateSource::new);
        let service = FormService::bootstrap(
            self.forms.clone(),
            source.as_ref().map(|s| s as &dyn TemplateSource),
            Arc::new(InMemoryFormRepository::new()),
            Arc::new(InMemoryEquipmentRepository::with_sample_fleet()),
            Arc::new(TracingEventPublisher::new()),
        )
        .await?;
        Ok(service)
    }
}

/// Split `id=value` at the first `=`
pub fn parse_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    let (id, value) = raw
        .split_once('=')
        .with_context(|| format!("expected ID=VALUE, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        bail!("missing field id in '{raw}'");
    }
    Ok((id, value))
}

/// The interaction a user would perform to enter `text` into `field`
pub fn interaction_for(field: &FormField, text: &str, binder: &FieldBinder) -> anyhow::Result<Interaction> {
    let interaction = match field.field_type {
        FieldType::ShortText | FieldType::MultilineText | FieldType::Number | FieldType::Integer => {
            Interaction::TextChanged(text.to_string())
        }
        FieldType::Dropdown => Interaction::OptionSelected(text.to_string()),
        FieldType::Checkbox => Interaction::Toggled(parse_flag(text)?),
        FieldType::Date => {
            let date = NaiveDate::parse_from_str(text, binder.date_format())
                .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
                .with_context(|| format!("{}: '{text}' is not a date", field.id))?;
            Interaction::DatePicked(date)
        }
        FieldType::Time => {
            let time = NaiveTime::parse_from_str(text, binder.time_format())
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                .with_context(|| format!("{}: '{text}' is not a time", field.id))?;
            Interaction::TimePicked(time)
        }
        FieldType::Photo | FieldType::Signature => Interaction::Captured(AttachmentRef::new(text)),
    };
    Ok(interaction)
}

fn parse_flag(text: &str) -> anyhow::Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Ok(true),
        "n" | "no" | "false" | "0" | "off" => Ok(false),
        other => bail!("'{other}' is not yes/no"),
    }
}

/// Apply every `--set` to the session, warning about values the form ignored
pub fn apply_values(session: &mut FormSession, values: &[String], binder: &FieldBinder) -> anyhow::Result<usize> {
    let template = session
        .template()
        .cloned()
        .context("no form initialized")?;
    let mut applied = 0;

    for raw in values {
        let (id, text) = parse_assignment(raw)?;
        let Some(field) = template.field(id) else {
            eprintln!("{} {} is not a field of {}", "warning:".yellow().bold(), id, template.form_type());
            continue;
        };

        let interaction = interaction_for(field, text, binder)?;
        if session.handle(id, interaction) {
            applied += 1;
        } else {
            eprintln!("{} value '{}' for {} was not accepted", "warning:".yellow().bold(), text, id);
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("site=Pit North").unwrap(), ("site", "Pit North"));
        assert_eq!(parse_assignment("note=a=b").unwrap(), ("note", "a=b"));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_interaction_for_field_types() {
        let binder = FieldBinder::default();

        let checkbox = FormField::checkbox("ppe_worn", "PPE worn");
        assert_eq!(interaction_for(&checkbox, "yes", &binder).unwrap(), Interaction::Toggled(true));
        assert!(interaction_for(&checkbox, "maybe", &binder).is_err());

        let date = FormField::date("shift_date", "Shift date");
        assert_eq!(
            interaction_for(&date, "2024-06-30", &binder).unwrap(),
            Interaction::DatePicked(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
        );

        let dropdown = FormField::dropdown("status", "Status", ["SAT", "ATT", "ACT"]);
        assert_eq!(
            interaction_for(&dropdown, "ATT", &binder).unwrap(),
            Interaction::OptionSelected("ATT".into())
        );

        let number = FormField::number("temperature", "Temperature");
        assert_eq!(
            interaction_for(&number, "abc", &binder).unwrap(),
            Interaction::TextChanged("abc".into())
        );
    }

    #[test]
    fn test_settings_flags_override_profile() {
        let profile = crate::config::Config {
            created_by: Some("profile-user".into()),
            default_format: Some("yaml".into()),
            validate_on_change: Some(true),
            ..Default::default()
        };

        let settings = Settings::resolve(&profile, None, None, None, Some("flag-user".into())).unwrap();
        assert_eq!(settings.forms.created_by, "flag-user");
        assert_eq!(settings.format, OutputFormat::Yaml);
        assert!(settings.forms.validate_on_change);

        let settings = Settings::resolve(&profile, Some(OutputFormat::Json), None, None, None).unwrap();
        assert_eq!(settings.forms.created_by, "profile-user");
        assert_eq!(settings.format, OutputFormat::Json);
    }
}
