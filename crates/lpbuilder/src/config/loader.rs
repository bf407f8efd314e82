use std::path::{Path, PathBuf};

use crate::config::schema::BuilderConfig;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/builder-config-v1.json");

pub const ENV_ENDPOINT: &str = "LPBUILDER_ENDPOINT";
pub const ENV_DOWNLOAD_BASE_URL: &str = "LPBUILDER_DOWNLOAD_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LPBUILDER_REQUEST_TIMEOUT_SECS";

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BuilderConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<BuilderConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: BuilderConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Resolves the effective configuration for a host.
///
/// An explicit `path` must exist. Without one, the platform default path is
/// used if present, otherwise built-in defaults. Environment overrides are
/// applied last and the result is validated again.
pub fn resolve_config(path: Option<&Path>) -> Result<BuilderConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => match default_config_path() {
            Some(default_path) if default_path.is_file() => {
                tracing::debug!(path = %default_path.display(), "Loading default config");
                load_config(&default_path)?
            }
            _ => BuilderConfig::default(),
        },
    };

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// `<platform config dir>/lpbuilder/config.json`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lpbuilder").join("config.json"))
}

pub fn apply_env_overrides(config: &mut BuilderConfig) -> Result<(), ConfigError> {
    if let Some(endpoint) = read_env(ENV_ENDPOINT) {
        config.endpoint = endpoint;
    }

    if let Some(base) = read_env(ENV_DOWNLOAD_BASE_URL) {
        config.download_base_url = base;
    }

    if let Some(raw) = read_env(ENV_REQUEST_TIMEOUT_SECS) {
        config.request_timeout_secs =
            raw.trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnv {
                    name: ENV_REQUEST_TIMEOUT_SECS.to_string(),
                    reason: e.to_string(),
                })?;
    }

    Ok(())
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

pub fn validate_config(config: &BuilderConfig) -> Result<(), ConfigError> {
    if !SUPPORTED_VERSIONS.contains(&config.version.as_str()) {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    validate_http_url("endpoint", &config.endpoint)?;
    validate_http_url("download_base_url", &config.download_base_url)?;

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "connect_timeout_secs must be at least 1".to_string(),
        });
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(value).map_err(|e| ConfigError::Validation {
        message: format!("{} '{}' is not a valid URL: {}", field, value, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation {
            message: format!("{} must use http or https, got '{}'", field, other),
        }),
    }
}
