use std::sync::Arc;

use marine_weather::ExtendedObservation;
use serde::Serialize;

use crate::error::ModelError;
use crate::forest::ForestClassifier;
use crate::vector::FeatureVector;

/// A trained classifier: one feature row in, one condition label out.
pub trait ConditionModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<String, ModelError>;

    /// Model name/type
    fn name(&self) -> &str;

    /// Model version/id
    fn version(&self) -> &str;
}

impl ConditionModel for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<String, ModelError> {
        self.classify(features).map(str::to_string)
    }

    fn name(&self) -> &str {
        ForestClassifier::name(self)
    }

    fn version(&self) -> &str {
        ForestClassifier::version(self)
    }
}

/// Label predicted for one observation, with the exact row the model saw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: String,
    pub features: FeatureVector,
}

/// Adapts extended observations to the injected model.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn ConditionModel>,
}

impl Predictor {
    pub fn new(model: Arc<dyn ConditionModel>) -> Self {
        Self { model }
    }

    /// Predict from the latest observation only.
    ///
    /// # Errors
    ///
    /// Propagates the model's [`ModelError`] when inference fails.
    pub fn predict(&self, latest: &ExtendedObservation) -> Result<PredictionResult, ModelError> {
        let features = FeatureVector::from(latest);
        let label = self.model.predict(&features)?;
        tracing::debug!(
            "Model {} v{} predicted {}",
            self.model.name(),
            self.model.version(),
            label
        );
        Ok(PredictionResult { label, features })
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("model", &self.model.name())
            .field("version", &self.model.version())
            .finish()
    }
}
