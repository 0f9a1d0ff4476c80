//! Configuration types for permguard
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::{PermissionEvaluator, UserContext};
use crate::session::Session;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment; only production enforces permissions
    pub environment: Environment,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Route requirements, first match wins
    pub routes: Vec<RouteRule>,
}

impl AppConfig {
    /// Whether permissions are enforced at all
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Derive the evaluation context for a session
    pub fn user_context(&self, session: &Session) -> UserContext {
        UserContext::new(session.super_admin, self.is_production())
    }

    /// Build a per-request evaluator for a session
    pub fn evaluator_for(&self, session: &Session) -> PermissionEvaluator {
        PermissionEvaluator::from_source(self.user_context(session), session.permissions.as_deref())
    }
}

/// Deployment environment
///
/// Every source (file, `PERMGUARD__ENVIRONMENT`, `APP_ENV`, CLI) accepts the
/// same names, see [`Environment::try_parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    /// Permissions are enforced
    #[default]
    Production,
    /// Every permission is granted
    Development,
}

impl Environment {
    /// Parse an environment name, accepting common short forms
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" | "test" => Some(Environment::Development),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Environment::try_parse(&value).ok_or_else(|| {
            format!(
                "unknown environment '{}', expected production or development",
                value
            )
        })
    }
}

/// A navigable path and the permission it requires
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteRule {
    /// Regex matched against the requested path
    pub pattern: String,

    /// Permission query checked as a route (`personas`, `reportes:ventas:ver`)
    pub permission: String,
}

impl RouteRule {
    pub fn new(pattern: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            permission: permission.into(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
