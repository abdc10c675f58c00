use marine_weather::ExtendedObservation;
use serde::Serialize;

pub const FEATURE_COUNT: usize = 7;

/// Feature names in the order the model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "wave_height",
    "wind_speed",
    "swell_height",
    "swell_period",
    "wind_x",
    "wind_y",
    "wave_energy",
];

/// The fixed-order numeric row handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }
}

impl From<&ExtendedObservation> for FeatureVector {
    fn from(obs: &ExtendedObservation) -> Self {
        Self([
            obs.base.wave_height,
            obs.base.wind_speed,
            obs.base.swell_height,
            obs.base.swell_period,
            obs.wind_component_x,
            obs.wind_component_y,
            obs.wave_energy_density,
        ])
    }
}
