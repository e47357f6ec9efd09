//! Config commands

use anyhow::bail;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::Config;
use crate::output::{or_dash, table, KeyValue};
use crate::ConfigCommands;

const KEYS: [&str; 5] = ["default_format", "created_by", "template_dir", "forms_config", "validate_on_change"];

fn get(config: &Config, key: &str) -> anyhow::Result<String> {
    let value = match key {
        "default_format" => or_dash(config.default_format.as_ref()),
        "created_by" => or_dash(config.created_by.as_ref()),
        "template_dir" => or_dash(config.template_dir.as_ref().map(|p| p.display())),
        "forms_config" => or_dash(config.forms_config.as_ref().map(|p| p.display())),
        "validate_on_change" => or_dash(config.validate_on_change),
        _ => bail!("unknown key '{key}' (expected one of: {})", KEYS.join(", ")),
    };
    Ok(value)
}

fn set(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "default_format" => {
            if !["table", "json", "yaml"].contains(&value) {
                bail!("default_format must be table, json or yaml");
            }
            config.default_format = Some(value.to_string());
        }
        "created_by" => config.created_by = Some(value.to_string()),
        "template_dir" => config.template_dir = Some(PathBuf::from(value)),
        "forms_config" => config.forms_config = Some(PathBuf::from(value)),
        "validate_on_change" => {
            config.validate_on_change = Some(
                value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("validate_on_change must be true or false"))?,
            )
        }
        _ => bail!("unknown key '{key}' (expected one of: {})", KEYS.join(", ")),
    }
    Ok(())
}

pub fn handle(action: ConfigCommands, profile: Option<&str>) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Init => {
            let config = Config {
                default_format: Some("table".into()),
                created_by: Some(whoami()),
                ..Default::default()
            };
            let path = config.save(profile)?;
            println!("{} configuration written to {}", "✓".green().bold(), path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(profile)?;
            set(&mut config, &key, &value)?;
            config.save(profile)?;
            println!("{} {} = {}", "✓".green().bold(), key, value);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(profile)?;
            println!("{}", get(&config, &key)?);
        }
        ConfigCommands::List => {
            let config = Config::load(profile)?;
            let rows = KEYS
                .iter()
                .map(|key| Ok(KeyValue::new(*key, get(&config, key)?)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            println!("{}", table(rows));
        }
    }
    Ok(())
}

fn whoami() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "operator".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut config = Config::default();
        set(&mut config, "created_by", "j.moyo").unwrap();
        set(&mut config, "validate_on_change", "true").unwrap();
        set(&mut config, "template_dir", "/srv/mmu/templates").unwrap();

        assert_eq!(get(&config, "created_by").unwrap(), "j.moyo");
        assert_eq!(get(&config, "validate_on_change").unwrap(), "true");
        assert_eq!(get(&config, "template_dir").unwrap(), "/srv/mmu/templates");
        assert_eq!(get(&config, "forms_config").unwrap(), "-");
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut config = Config::default();
        assert!(set(&mut config, "default_format", "xml").is_err());
        assert!(set(&mut config, "validate_on_change", "sometimes").is_err());
        assert!(set(&mut config, "colour", "red").is_err());
        assert!(get(&config, "colour").is_err());
    }
}
