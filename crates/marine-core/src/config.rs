use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Prediction model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Dashboard defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the StormGlass API (without the `/v2/...` path)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for a single observation request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.stormglass.io".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained classifier artifact
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/marine_model.json")
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    /// Number of trailing rows shown in the table preview
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_latitude() -> f64 {
    37.7749
}

fn default_longitude() -> f64 {
    -122.4194
}

fn default_preview_rows() -> usize {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            preview_rows: default_preview_rows(),
        }
    }
}

/// Sort a `load_from` failure into the application error hierarchy.
fn load_error(err: anyhow::Error) -> AppError {
    if let Some(parse) = err.downcast_ref::<toml::de::Error>() {
        return ConfigError::ParseError(parse.message().to_string()).into();
    }
    match err.downcast::<std::io::Error>() {
        Ok(io) => AppError::Io(io),
        Err(other) => ConfigError::Invalid(format!("{:#}", other)).into(),
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Created default configuration at {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; any validation error fails the load.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when there is no user config directory,
    /// [`ConfigError::ParseError`] for malformed TOML,
    /// [`ConfigError::Invalid`] when validation reports errors, and
    /// [`AppError::Io`] when the file cannot be read or created.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult), AppError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()
                .map_err(|e| ConfigError::NotFound(format!("{:#}", e)))?,
        };
        let config = Self::load_from(&path).map_err(load_error)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "Configuration validation failed: {}",
                validation.error_summary()
            ))
            .into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.provider.base_url, "provider.base_url", &mut result);

        if self.provider.timeout_secs == 0 {
            result.add_error("provider.timeout_secs", "Timeout must be greater than 0");
        } else if self.provider.timeout_secs > 120 {
            result.add_warning(
                "provider.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        let lat = self.dashboard.default_latitude;
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            result.add_error(
                "dashboard.default_latitude",
                format!("Latitude must be within [-90, 90], got {}", lat),
            );
        }

        let lng = self.dashboard.default_longitude;
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            result.add_error(
                "dashboard.default_longitude",
                format!("Longitude must be within [-180, 180], got {}", lng),
            );
        }

        if self.dashboard.preview_rows == 0 {
            result.add_warning("dashboard.preview_rows", "Table preview disabled (0 rows)");
        }

        // Missing model is only fatal once loading is attempted
        if !self.model.path.exists() {
            result.add_warning(
                "model.path",
                format!("Model file does not exist: {}", self.model.path.display()),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("marine-dashboard");

        Ok(config_dir.join("config.toml"))
    }
}
