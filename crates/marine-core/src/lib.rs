pub mod config;
pub mod error;

pub use config::{Config, DashboardConfig, ModelConfig, ProviderConfig, ValidationResult};
pub use error::{AppError, ConfigError, InputError, ModelError, NetworkError};

use anyhow::Result;

/// Initialize logging for the dashboard.
///
/// Log output goes to stderr so stdout stays reserved for the rendered
/// dashboard (or its JSON form).
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("Marine dashboard core initialized");
    Ok(())
}
