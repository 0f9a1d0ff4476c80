//! Error types for permguard
//!
//! This module defines the error hierarchy used throughout the crate.
//! Evaluation itself never fails: anomalies in permission data are
//! described by [`EvaluationAnomaly`] and folded into a deny decision.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Session snapshot errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read session file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid session data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Access denied for a requested permission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Access denied for '{permission}': {reason}")]
pub struct AccessDeniedError {
    pub permission: String,
    pub reason: String,
}

impl AccessDeniedError {
    pub fn new(permission: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_source(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            reason: "no permission data available for this session".into(),
        }
    }
}

/// Anomalies found while evaluating permission data.
///
/// These are never returned across the evaluator boundary; they are logged
/// and turned into a deny.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationAnomaly {
    #[error("permission source is missing")]
    MissingPermissionSource,

    #[error("malformed permission token '{token}'")]
    MalformedToken { token: String },

    #[error("empty permission query")]
    EmptyQuery,
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_constructors() {
        let err = AccessDeniedError::missing_source("personas");
        assert_eq!(err.permission, "personas");
        assert!(err.reason.contains("no permission data"));

        let err = AccessDeniedError::new("reportes", "custom");
        assert_eq!(
            err.to_string(),
            "Access denied for 'reportes': custom".to_string()
        );
    }

    #[test]
    fn test_app_error_from_conversions() {
        let err: AppError = AccessDeniedError::missing_source("x").into();
        assert!(matches!(err, AppError::AccessDenied(_)));

        let err: AppError = ConfigError::Load("boom".into()).into();
        assert!(err.to_string().contains("boom"));

        let err: AppError = SessionError::Read {
            path: "session.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert!(matches!(err, AppError::Session(_)));
        assert!(err.to_string().starts_with("Session error:"));
    }

    #[test]
    fn test_anomaly_messages() {
        let anomaly = EvaluationAnomaly::MalformedToken {
            token: "a::b".into(),
        };
        assert!(anomaly.to_string().contains("a::b"));
        assert_eq!(
            EvaluationAnomaly::EmptyQuery.to_string(),
            "empty permission query"
        );
    }
}
