//! Engine Configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::binding::FieldBinder;
use crate::domain::value_objects::FormType;

/// Forms engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Re-run validation after every field change
    pub validate_on_change: bool,
    /// chrono format for date fields
    pub date_format: String,
    /// chrono format for time fields
    pub time_format: String,
    /// Template used when a form type cannot be resolved
    pub default_form_type: FormType,
    /// Directory of JSON template overrides
    pub template_dir: Option<PathBuf>,
    /// Recorded as the author of new forms
    pub created_by: String,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            validate_on_change: false,
            date_format: "%Y-%m-%d".into(),
            time_format: "%H:%M".into(),
            default_form_type: FormType::Generic,
            template_dir: None,
            created_by: "operator".into(),
        }
    }
}

impl FormsConfig {
    /// Load from a JSON file; absent keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Reject date/time formats chrono cannot render
    pub fn check(&self) -> Result<(), ConfigError> {
        for (key, format) in [("date_format", &self.date_format), ("time_format", &self.time_format)] {
            if !FieldBinder::is_valid_format(format) {
                return Err(ConfigError::Parse(format!("{key} '{format}' is not a valid chrono format")));
            }
        }
        Ok(())
    }

    /// Save to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Field binder using the configured display formats
    pub fn binder(&self) -> FieldBinder {
        FieldBinder::new(&self.date_format, &self.time_format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}
