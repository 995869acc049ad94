// ============================================================
// RUN CONFIGURATION
// ============================================================
// Defaults -> TOML file -> OUTREACH_MERGE_* environment

use std::env;
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::merge_config::{MergeConfig, OutputShape, DEFAULT_BLANK_FILL, DEFAULT_IDENTITY_FIELD};
use crate::domain::template::TemplateSet;

pub const ENV_PREFIX: &str = "OUTREACH_MERGE_";

/// Template lists per role, as written by the operator. Required roles are
/// checked by the merge run against the selected output shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub subject: Vec<String>,

    #[serde(default)]
    pub body: Vec<String>,

    #[serde(default)]
    pub chaser: Vec<String>,
}

impl TemplateConfig {
    pub fn to_template_set(&self) -> TemplateSet {
        TemplateSet::from_texts(&self.subject, &self.body, &self.chaser)
    }
}

/// Everything one invocation needs besides the input table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub blank_fill: String,
    pub output_shape: OutputShape,
    pub identity_field: String,

    #[serde(default)]
    pub templates: TemplateConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            blank_fill: DEFAULT_BLANK_FILL.to_string(),
            output_shape: OutputShape::default(),
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            templates: TemplateConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig {
            blank_fill: self.blank_fill.clone(),
            output_shape: self.output_shape,
            identity_field: self.identity_field.clone(),
        }
    }
}

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(RunConfig::default())),
        }
    }

    /// Layer a TOML file over the defaults
    pub fn with_file(mut self, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        self.figment = self.figment.merge(Toml::file(path));
        Ok(self)
    }

    /// Layer `OUTREACH_MERGE_*` variables (e.g. `OUTREACH_MERGE_BLANK_FILL`).
    /// Blank-fill is taken verbatim: `[MISSING]`, `0` or `true` stay text.
    pub fn with_env(mut self) -> Self {
        self.figment = self
            .figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["blank_fill"]));
        if let Ok(blank_fill) = env::var(format!("{}BLANK_FILL", ENV_PREFIX)) {
            self.figment = self
                .figment
                .merge(Serialized::default("blank_fill", blank_fill));
        }
        self
    }

    pub fn load(&self) -> Result<RunConfig> {
        let config: RunConfig = self
            .figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        tracing::debug!(
            "Loaded config: shape={:?}, {} subject / {} body / {} chaser templates",
            config.output_shape,
            config.templates.subject.len(),
            config.templates.body.len(),
            config.templates.chaser.len()
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = ConfigService::new().load().unwrap();
        assert_eq!(config.blank_fill, "[MISSING]");
        assert_eq!(config.output_shape, OutputShape::Outreach);
        assert!(config.templates.subject.is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
blank_fill = ""
output_shape = "minimal"

[templates]
body = ["Hi {{name}}", "Hello {{name}}"]
"#,
        );
        let config = ConfigService::new().with_file(file.path()).unwrap().load().unwrap();

        assert_eq!(config.blank_fill, "");
        assert_eq!(config.output_shape, OutputShape::Minimal);
        assert_eq!(config.templates.body.len(), 2);
        assert_eq!(config.identity_field, "email");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ConfigService::new()
            .with_file(Path::new("/no/such/merge.toml"))
            .err()
            .unwrap();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_env_blank_fill_is_verbatim_text() {
        let key = format!("{}BLANK_FILL", ENV_PREFIX);
        for value in ["[N/A]", "0", "true", ""] {
            env::set_var(&key, value);
            let config = ConfigService::new().with_env().load();
            env::remove_var(&key);

            assert_eq!(config.unwrap().blank_fill, value, "value {:?}", value);
        }
    }
}
