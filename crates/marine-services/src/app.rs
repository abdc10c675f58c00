use std::sync::Arc;
use std::time::Duration;

use marine_core::{AppError, Config, NetworkError};
use marine_model::{ConditionModel, ForestClassifier, Predictor};
use marine_weather::StormGlassProvider;

use crate::error_mapping::IntoAppError;
use crate::pipeline::{Forecast, Pipeline};

/// Application state: configuration plus the ready-to-run pipeline.
///
/// The model is loaded exactly once, here. Failing to load it is fatal:
/// no `App` exists without a usable model.
pub struct App {
    config: Arc<Config>,
    pipeline: Pipeline,
}

impl App {
    /// Load the model named by `config` and build the pipeline.
    ///
    /// # Errors
    ///
    /// [`AppError::Model`] when the artifact is missing or unusable,
    /// [`AppError::Network`] when the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let model = ForestClassifier::load(&config.model.path).map_err(|e| {
            tracing::error!("Failed to load model: {}", e);
            e.into_app_error()
        })?;
        Self::with_model(config, Arc::new(model))
    }

    /// Build the pipeline around an already-loaded model.
    pub fn with_model(config: Config, model: Arc<dyn ConditionModel>) -> Result<Self, AppError> {
        let provider = StormGlassProvider::with_base_url(
            &config.provider.base_url,
            Duration::from_secs(config.provider.timeout_secs),
        )
        .map_err(|e| AppError::Network(NetworkError::ClientSetup(e.to_string())))?;

        tracing::info!(
            "Dashboard ready (model {} v{}, provider {})",
            model.name(),
            model.version(),
            provider.base_url()
        );

        Ok(Self {
            config: Arc::new(config),
            pipeline: Pipeline::new(provider, Predictor::new(model)),
        })
    }

    /// Run one prediction request.
    pub async fn predict(
        &self,
        latitude: f64,
        longitude: f64,
        credential: Option<&str>,
    ) -> Result<Forecast, AppError> {
        self.pipeline.run_at(latitude, longitude, credential).await
    }

    /// Run one prediction request at the configured default coordinates.
    pub async fn predict_default(&self, credential: Option<&str>) -> Result<Forecast, AppError> {
        let dashboard = &self.config.dashboard;
        self.predict(dashboard.default_latitude, dashboard.default_longitude, credential)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marine_core::ModelError as CoreModelError;

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.model.path = dir.path().join("marine_model.json");

        let err = App::new(config).err().unwrap();

        assert!(err.is_fatal());
        assert!(matches!(
            err,
            AppError::Model(CoreModelError::ArtifactMissing(_))
        ));
    }

    #[test]
    fn test_corrupt_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marine_model.json");
        std::fs::write(&path, "{\"name\": \"half a model\"").unwrap();
        let mut config = Config::default();
        config.model.path = path;

        let err = App::new(config).err().unwrap();

        assert!(matches!(
            err,
            AppError::Model(CoreModelError::ArtifactCorrupt(_))
        ));
    }
}
