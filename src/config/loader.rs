//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (PERMGUARD__*)
//! 2. `APP_ENV`, for the environment only
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::access_control::permission_set::is_well_formed;
use crate::config::types::{AppConfig, Environment};
use crate::error::ConfigError;
use config::{Config, Environment as EnvSource, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "permguard.toml",
    ".permguard.toml",
    "~/.config/permguard/config.toml",
    "/etc/permguard/config.toml",
];

/// Prefix for environment overrides, e.g. `PERMGUARD__LOGGING__LEVEL`
const ENV_PREFIX: &str = "PERMGUARD";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Defaults come from serde defaults on AppConfig

    // 2. Configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. APP_ENV, unless the prefixed variable is set
    if std::env::var(format!("{ENV_PREFIX}__ENVIRONMENT")).is_err()
        && let Ok(value) = std::env::var("APP_ENV")
    {
        let environment = Environment::try_parse(&value).ok_or_else(|| ConfigError::Invalid {
            message: format!("APP_ENV must be production or development, got: {}", value),
        })?;
        builder = builder
            .set_override("environment", environment.as_str())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    // 4. PERMGUARD__ variables; double underscore maps to nested keys
    builder = builder.add_source(EnvSource::with_prefix(ENV_PREFIX).separator("__"));

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "logging.level".to_string(),
        });
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(e) = regex::Regex::new(&route.pattern) {
            return Err(ConfigError::InvalidPattern {
                pattern: route.pattern.clone(),
                reason: format!("in routes[{}]: {}", index, e),
            });
        }

        if route.permission.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: format!("routes[{}].permission", index),
            });
        }

        if !is_well_formed(&route.permission) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "routes[{}].permission is not a valid permission: {}",
                    index, route.permission
                ),
            });
        }
    }

    Ok(())
}
