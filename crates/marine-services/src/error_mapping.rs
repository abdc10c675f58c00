//! Conversions from crate-local errors into [`AppError`].

use marine_core::{AppError, InputError, ModelError as CoreModelError, NetworkError};
use marine_model::ModelError;
use marine_weather::{CoordinateError, FetchError, NormalizeError};

/// Extension trait for lifting crate-local errors into the application hierarchy.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for FetchError {
    fn into_app_error(self) -> AppError {
        let network = match self {
            FetchError::MissingCredential => NetworkError::MissingCredential,
            FetchError::Status { status, body } => NetworkError::ServerError {
                status,
                message: body,
            },
            FetchError::Timeout => NetworkError::Timeout,
            FetchError::Network(msg) => NetworkError::ConnectionFailed(msg),
            FetchError::Malformed(msg) => NetworkError::InvalidResponse(msg),
        };
        AppError::Network(network)
    }
}

impl IntoAppError for NormalizeError {
    fn into_app_error(self) -> AppError {
        AppError::Network(NetworkError::InvalidResponse(self.to_string()))
    }
}

impl IntoAppError for CoordinateError {
    fn into_app_error(self) -> AppError {
        let input = match self {
            CoordinateError::LatitudeOutOfRange(v) => InputError::LatitudeOutOfRange(v),
            CoordinateError::LongitudeOutOfRange(v) => InputError::LongitudeOutOfRange(v),
        };
        AppError::Input(input)
    }
}

impl IntoAppError for ModelError {
    fn into_app_error(self) -> AppError {
        let model = match self {
            ModelError::NotFound(path) => CoreModelError::ArtifactMissing(path.display().to_string()),
            e @ ModelError::Io { .. } => CoreModelError::ArtifactCorrupt(e.to_string()),
            e @ ModelError::Parse(_) => CoreModelError::ArtifactCorrupt(e.to_string()),
            ModelError::Invalid(msg) => CoreModelError::Incompatible(msg),
            e @ (ModelError::Training(_) | ModelError::Prediction(_)) => {
                CoreModelError::InferenceFailed(e.to_string())
            }
        };
        AppError::Model(model)
    }
}
