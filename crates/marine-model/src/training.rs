//! Labelled observations for fitting the condition forest.

use chrono::{DateTime, Utc};
use marine_weather::{derive, CanonicalObservation};
use serde::Deserialize;

use crate::vector::FeatureVector;

/// One labelled row of the training set (`models/training_samples.csv`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingSample {
    pub wave_height: f64,
    pub wind_speed: f64,
    pub swell_height: f64,
    pub swell_period: f64,
    pub label: String,
}

impl TrainingSample {
    /// Features derived the same way as at prediction time.
    pub fn features(&self) -> FeatureVector {
        let observation = CanonicalObservation {
            timestamp: DateTime::<Utc>::default(),
            wave_height: self.wave_height,
            wind_speed: self.wind_speed,
            swell_height: self.swell_height,
            swell_period: self.swell_period,
        };
        FeatureVector::from(&derive(&observation))
    }
}
