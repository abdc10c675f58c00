//! Centralized error types for the marine dashboard.
//!
//! Crate-local errors (fetching, normalization, model loading) are mapped
//! into [`AppError`] at the service boundary. Use `user_message()` to get a
//! message suitable for the terminal front end.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Model(e) => e.user_message(),
            AppError::Input(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
        }
    }

    /// Whether the process can keep serving predictions after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Model(_) | AppError::Config(_))
    }
}

/// Network-related errors (HTTP, connectivity, provider payloads).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key")]
    MissingCredential,

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to reach the weather provider. Check your internet connection."
            }
            NetworkError::Timeout => "The weather provider did not answer in time.",
            NetworkError::ServerError { status, .. } if *status == 401 || *status == 403 => {
                "The StormGlass API key was rejected. Check the key and try again."
            }
            NetworkError::ServerError { status, .. } if *status == 402 || *status == 429 => {
                "The StormGlass request quota is exhausted. Try again later."
            }
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather provider is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The weather request failed.",
            NetworkError::InvalidResponse(_) => {
                "Received unexpected data from the weather provider."
            }
            NetworkError::MissingCredential => "Please enter a valid StormGlass API key!",
            NetworkError::ClientSetup(_) => "Failed to initialize the HTTP client.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration location: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => {
                "No configuration directory is available. Pass a configuration file explicitly."
            }
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Prediction model errors. All of them stop the dashboard.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model artifact not found: {0}")]
    ArtifactMissing(String),

    #[error("Model artifact is corrupt: {0}")]
    ArtifactCorrupt(String),

    #[error("Model artifact is incompatible: {0}")]
    Incompatible(String),

    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

impl ModelError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ModelError::ArtifactMissing(_) => {
                "The prediction model file was not found. Check the model path."
            }
            ModelError::ArtifactCorrupt(_) => {
                "The prediction model file could not be read. Replace the model file."
            }
            ModelError::Incompatible(_) => {
                "The prediction model does not match the expected features."
            }
            ModelError::InferenceFailed(_) => "The prediction model could not classify the data.",
        }
    }
}

/// User input errors, raised before any network call.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl InputError {
    pub fn user_message(&self) -> &'static str {
        match self {
            InputError::LatitudeOutOfRange(_) => "Latitude must be between -90 and 90.",
            InputError::LongitudeOutOfRange(_) => "Longitude must be between -180 and 180.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let model_err = ModelError::ArtifactMissing("marine_model.json".into());
        let app_err: AppError = model_err.into();
        assert!(matches!(app_err, AppError::Model(ModelError::ArtifactMissing(_))));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Network(NetworkError::MissingCredential);
        assert_eq!(
            app_err.user_message(),
            "Please enter a valid StormGlass API key!"
        );
    }

    #[test]
    fn test_server_error_messages_by_status() {
        let unauthorized = NetworkError::ServerError {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert!(unauthorized.user_message().contains("API key"));

        let quota = NetworkError::ServerError {
            status: 402,
            message: "Payment required".into(),
        };
        assert!(quota.user_message().contains("quota"));

        let outage = NetworkError::ServerError {
            status: 503,
            message: "Unavailable".into(),
        };
        assert!(outage.user_message().contains("later"));
    }

    #[test]
    fn test_inference_failure_is_fatal() {
        let err = AppError::Model(ModelError::InferenceFailed("no prediction".into()));
        assert!(err.is_fatal());
        assert!(err.user_message().contains("could not classify"));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(AppError::Model(ModelError::ArtifactCorrupt("x".into())).is_fatal());
        assert!(!AppError::Network(NetworkError::Timeout).is_fatal());
        assert!(!AppError::Input(InputError::LatitudeOutOfRange(91.0)).is_fatal());
    }
}
