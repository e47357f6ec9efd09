//! JSON template source
//!
//! Reads template definitions from a directory, one `*.json` file per form
//! type. Files that fail to parse or break a template invariant are skipped.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::template::FormTemplate;
use crate::ports::outbound::{RepositoryError, TemplateSource};

pub struct JsonTemplateSource {
    dir: PathBuf,
}

impl JsonTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_template(path: &Path) -> Result<FormTemplate, String> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl TemplateSource for JsonTemplateSource {
    async fn load_templates(&self) -> Result<Vec<FormTemplate>, RepositoryError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| RepositoryError::Storage(format!("{}: {}", self.dir.display(), e)))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut templates = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_template(&path).await {
                Ok(template) => {
                    debug!(path = %path.display(), form_type = %template.form_type(), "loaded template");
                    templates.push(template);
                }
                Err(error) => warn!(path = %path.display(), %error, "skipping template file"),
            }
        }

        Ok(templates)
    }
}
