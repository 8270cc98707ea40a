use crate::core::artifact::DEFAULT_ARTIFACT_PATH;
use crate::core::form::SessionDraft;
use crate::utils::error::{HydrationError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HydrationConfig {
    pub artifact: Option<ArtifactConfig>,
    pub logging: Option<LoggingConfig>,
    pub defaults: Option<SessionDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl HydrationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HydrationError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HydrationError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HydrationError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn artifact_path(&self) -> &str {
        self.artifact
            .as_ref()
            .map(|a| a.path.as_str())
            .unwrap_or(DEFAULT_ARTIFACT_PATH)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn session_defaults(&self) -> SessionDraft {
        self.defaults.clone().unwrap_or_default()
    }
}

impl Validate for HydrationConfig {
    fn validate(&self) -> Result<()> {
        if let Some(artifact) = &self.artifact {
            validate_path("artifact.path", &artifact.path)?;
        }

        if let Some(defaults) = &self.defaults {
            if let Some(gender) = &defaults.gender {
                validate_non_empty_string("defaults.gender", gender)?;
            }
            if let Some(exercise_type) = &defaults.exercise_type {
                validate_non_empty_string("defaults.exercise_type", exercise_type)?;
            }
            defaults.check_bounds()?;
        }

        Ok(())
    }
}
