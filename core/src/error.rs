use serde::Serialize;
use thiserror::Error;

/// Unified error type for the triage library.
///
/// Serializes to JSON so `--format json` callers get structured failures.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Config error: {message} ({path})")]
    Config { message: String, path: String },

    #[error("Invalid target: {message}")]
    InvalidTarget { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

impl AppError {
    /// Create an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a Config error for the file at `path`
    pub fn config(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create an Invalid Target error
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            message: message.into(),
        }
    }

    /// Create a Not Found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if this error is recoverable (user can retry or take action)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO issues may be transient
            // Missing files can be created
            Self::Io { .. } | Self::NotFound { .. } => true,
            // Bad input won't change on retry
            Self::Parse { .. } | Self::Config { .. } | Self::InvalidTarget { .. } => false,
        }
    }
}

// Convert from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}

// Convert from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::parse(err.to_string())
    }
}

// Convert from serde_yaml::Error
impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::parse(err.to_string())
    }
}

// Convert to String for CLI command errors
impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}
