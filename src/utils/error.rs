use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydrationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Model artifact error: {message}")]
    ArtifactError { message: String },

    #[error("Unknown category '{value}' for '{field}'")]
    UnknownCategoryError { field: String, value: String },

    #[error("Prediction failed: {message}")]
    PredictionError { message: String },
}

pub type Result<T> = std::result::Result<T, HydrationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Artifact,
    Input,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the CLI for an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl HydrationError {
    pub fn artifact(message: impl Into<String>) -> Self {
        HydrationError::ArtifactError {
            message: message.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        HydrationError::PredictionError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HydrationError::IoError(_) => ErrorCategory::Io,
            HydrationError::SerializationError(_) | HydrationError::ArtifactError { .. } => {
                ErrorCategory::Artifact
            }
            HydrationError::CsvError(_) => ErrorCategory::Io,
            HydrationError::ConfigError { .. }
            | HydrationError::ConfigValidationError { .. }
            | HydrationError::MissingConfigError { .. } => ErrorCategory::Configuration,
            HydrationError::InvalidConfigValueError { .. }
            | HydrationError::UnknownCategoryError { .. } => ErrorCategory::Input,
            HydrationError::PredictionError { .. } => ErrorCategory::Model,
        }
    }

    /// Artifact and model failures leave the process with nothing to serve.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Artifact | ErrorCategory::Model => ErrorSeverity::Critical,
            ErrorCategory::Io | ErrorCategory::Configuration | ErrorCategory::Input => {
                ErrorSeverity::High
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HydrationError::IoError(e) => format!("Could not read a required file: {}", e),
            HydrationError::SerializationError(e) => {
                format!("The model artifact is not valid JSON: {}", e)
            }
            HydrationError::CsvError(e) => format!("Could not write the feature table: {}", e),
            HydrationError::ConfigError { message } => format!("Configuration problem: {}", message),
            HydrationError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            HydrationError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("{} = {} is not accepted: {}", field, value, reason),
            HydrationError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            HydrationError::ArtifactError { message } => {
                format!("The model artifact cannot be used: {}", message)
            }
            HydrationError::UnknownCategoryError { field, value } => format!(
                "'{}' is not an option for {} in the loaded model",
                value, field
            ),
            HydrationError::PredictionError { message } => {
                format!("The model could not produce an estimate: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HydrationError::IoError(_) => "Check that the path exists and is readable",
            HydrationError::SerializationError(_) | HydrationError::ArtifactError { .. } => {
                "Re-export the hydration pipeline bundle and point --artifact at it"
            }
            HydrationError::CsvError(_) => "Check that stdout is writable",
            HydrationError::ConfigError { .. }
            | HydrationError::ConfigValidationError { .. }
            | HydrationError::MissingConfigError { .. } => {
                "Review the TOML configuration file against the documented keys"
            }
            HydrationError::InvalidConfigValueError { .. } => {
                "Pick a value inside the allowed range shown in the message"
            }
            HydrationError::UnknownCategoryError { .. } => {
                "Run with --list-options to see the categories the model accepts"
            }
            HydrationError::PredictionError { .. } => {
                "The model artifact is likely inconsistent; re-export it"
            }
        }
    }
}
