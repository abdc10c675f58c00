//! One dashboard request: acquire observations, derive features, predict.
//!
//! Acquisition failures never escape this module. A missing credential, a
//! failed fetch, or an unusable payload all switch the request onto the
//! synthetic fallback sample, so a label is produced regardless of network
//! reachability.

use marine_core::AppError;
use marine_model::{PredictionResult, Predictor};
use marine_weather::{
    derive_all, fallback, normalize, CanonicalObservation, Coordinates, ExtendedObservation,
    FetchError, NormalizeError, ObservationSequence, StormGlassProvider,
};
use serde::Serialize;

use crate::error_mapping::IntoAppError;

/// Why live observations were not used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum FallbackReason {
    MissingCredential,
    FetchFailed { notice: String, detail: String },
    NormalizeFailed { notice: String, detail: String },
}

impl FallbackReason {
    /// Message suitable for a warning banner.
    pub fn notice(&self) -> &str {
        match self {
            FallbackReason::MissingCredential => "Please enter a valid StormGlass API key!",
            FallbackReason::FetchFailed { notice, .. }
            | FallbackReason::NormalizeFailed { notice, .. } => notice.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Fallback { reason: FallbackReason },
}

/// Failure to obtain live observations.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl From<AcquisitionError> for FallbackReason {
    fn from(e: AcquisitionError) -> Self {
        let detail = e.to_string();
        match e {
            AcquisitionError::Fetch(FetchError::MissingCredential) => {
                FallbackReason::MissingCredential
            }
            AcquisitionError::Fetch(fetch) => FallbackReason::FetchFailed {
                notice: fetch.into_app_error().user_message().to_string(),
                detail,
            },
            AcquisitionError::Normalize(norm) => FallbackReason::NormalizeFailed {
                notice: norm.into_app_error().user_message().to_string(),
                detail,
            },
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub coordinates: Coordinates,
    pub source: DataSource,
    pub prediction: PredictionResult,
    pub observations: ObservationSequence<ExtendedObservation>,
}

impl Forecast {
    pub fn is_live(&self) -> bool {
        matches!(self.source, DataSource::Live)
    }

    pub fn label(&self) -> &str {
        &self.prediction.label
    }

    /// The row the prediction was made from.
    pub fn latest(&self) -> &ExtendedObservation {
        self.observations.latest()
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    provider: StormGlassProvider,
    predictor: Predictor,
}

impl Pipeline {
    pub fn new(provider: StormGlassProvider, predictor: Predictor) -> Self {
        Self {
            provider,
            predictor,
        }
    }

    /// Validate raw coordinates, then run the pipeline.
    ///
    /// # Errors
    ///
    /// Out-of-range coordinates fail before any network call is made;
    /// otherwise as [`Pipeline::run`].
    pub async fn run_at(
        &self,
        latitude: f64,
        longitude: f64,
        credential: Option<&str>,
    ) -> Result<Forecast, AppError> {
        let coords =
            Coordinates::new(latitude, longitude).map_err(IntoAppError::into_app_error)?;
        self.run(coords, credential).await
    }

    /// Run the pipeline for validated coordinates.
    ///
    /// # Errors
    ///
    /// [`AppError::Model`] when the model cannot classify the latest row.
    /// Acquisition problems never fail a run.
    pub async fn run(
        &self,
        coords: Coordinates,
        credential: Option<&str>,
    ) -> Result<Forecast, AppError> {
        let (canonical, source) = self.observations(coords, credential).await;

        let observations = derive_all(&canonical);
        let prediction = self
            .predictor
            .predict(observations.latest())
            .map_err(|e| {
                tracing::error!("Prediction failed: {}", e);
                e.into_app_error()
            })?;
        tracing::info!(
            "Predicted marine condition at {}: {} ({} rows, live: {})",
            coords,
            prediction.label,
            observations.len(),
            matches!(source, DataSource::Live)
        );

        Ok(Forecast {
            coordinates: coords,
            source,
            prediction,
            observations,
        })
    }

    /// Live observations when possible, the fallback sample otherwise.
    pub async fn observations(
        &self,
        coords: Coordinates,
        credential: Option<&str>,
    ) -> (ObservationSequence<CanonicalObservation>, DataSource) {
        let credential = match credential.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => c,
            None => {
                tracing::warn!("No StormGlass API key supplied, using fallback observation");
                return (
                    fallback(),
                    DataSource::Fallback {
                        reason: FallbackReason::MissingCredential,
                    },
                );
            }
        };

        match self.acquire(coords, credential).await {
            Ok(seq) => {
                tracing::info!("Fetched {} hourly observations", seq.len());
                (seq, DataSource::Live)
            }
            Err(e) => {
                tracing::warn!("Could not fetch data: {}; using fallback observation", e);
                (
                    fallback(),
                    DataSource::Fallback { reason: e.into() },
                )
            }
        }
    }

    /// Fetch and normalize; errors are returned for the caller to branch on.
    pub async fn acquire(
        &self,
        coords: Coordinates,
        credential: &str,
    ) -> Result<ObservationSequence<CanonicalObservation>, AcquisitionError> {
        let payload = self.provider.fetch(coords, credential).await?;
        Ok(normalize(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_reason_notice() {
        let reason = FallbackReason::from(AcquisitionError::Fetch(FetchError::MissingCredential));
        assert_eq!(reason, FallbackReason::MissingCredential);
        assert!(reason.notice().contains("API key"));
    }

    #[test]
    fn test_normalize_reason_keeps_detail() {
        let reason = FallbackReason::from(AcquisitionError::Normalize(NormalizeError::MissingHours));
        match &reason {
            FallbackReason::NormalizeFailed { detail, .. } => {
                assert!(detail.contains("hours"));
            }
            other => panic!("unexpected reason {:?}", other),
        }
        assert!(reason.notice().contains("unexpected data"));
    }

    #[test]
    fn test_fetch_reason_uses_user_message() {
        let reason = FallbackReason::from(AcquisitionError::Fetch(FetchError::Timeout));
        assert_eq!(
            reason.notice(),
            "The weather provider did not answer in time."
        );
    }

    #[test]
    fn test_data_source_serialization() {
        let source = DataSource::Fallback {
            reason: FallbackReason::MissingCredential,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "fallback", "reason": {"cause": "missing_credential"}})
        );
    }
}
