use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagelynError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error in {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Failed to load location file: {path}")]
    LoadFailed { path: String },

    #[error("Unknown client: {name}")]
    UnknownClient { name: String },

    #[error("Unknown location: {name}")]
    UnknownLocation { name: String },

    #[error("Unknown preference: {name}")]
    UnknownPreference { name: String },

    #[error("Unknown activity {index} in location {location}")]
    UnknownActivity { location: usize, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    System,
    Configuration,
    Input,
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ImagelynError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImagelynError::IoError(_) | ImagelynError::SerializationError(_) => {
                ErrorCategory::System
            }
            ImagelynError::TomlError(_)
            | ImagelynError::ConfigError { .. }
            | ImagelynError::ValidationError { .. } => ErrorCategory::Configuration,
            ImagelynError::LoadFailed { .. } => ErrorCategory::Input,
            ImagelynError::UnknownClient { .. }
            | ImagelynError::UnknownLocation { .. }
            | ImagelynError::UnknownPreference { .. }
            | ImagelynError::UnknownActivity { .. } => ErrorCategory::Lookup,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::System => ErrorSeverity::Critical,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Lookup => ErrorSeverity::Medium,
        }
    }

    /// Process exit code; never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImagelynError::IoError(e) => format!("Could not read or write a file: {}", e),
            ImagelynError::LoadFailed { path } => {
                format!("The location file '{}' could not be interpreted", path)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::Input => "Fix the reported line in the location file and retry",
            ErrorCategory::Lookup => {
                "Make sure the name is defined in one of the loaded location files"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ImagelynError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let err = ImagelynError::LoadFailed {
            path: "park.loc".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = ImagelynError::UnknownClient { name: "Ada".into() };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Unknown client: Ada");
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = [
            ImagelynError::IoError(std::io::Error::other("disk")),
            ImagelynError::ConfigError {
                message: "bad".into(),
            },
            ImagelynError::LoadFailed {
                path: "park.loc".into(),
            },
            ImagelynError::UnknownActivity {
                location: 0,
                index: 3,
            },
        ];
        let codes: Vec<i32> = errors.iter().map(ImagelynError::exit_code).collect();
        assert_eq!(codes, vec![3, 1, 1, 2]);
    }
}
