//! Derived model features.
//!
//! The wind decomposition uses a fixed 45° reference direction: the provider
//! query carries no wind heading, so the components are a modeling
//! simplification rather than a true vector.

use crate::types::{CanonicalObservation, ExtendedObservation, ObservationSequence};

/// Seawater density, kg/m³
pub const SEAWATER_DENSITY: f64 = 1025.0;
/// Gravitational acceleration, m/s²
pub const GRAVITY: f64 = 9.81;
/// Reference wind direction in degrees
pub const REFERENCE_WIND_DIRECTION_DEG: f64 = 45.0;

/// Wave energy per unit surface area: ½ρgH².
pub fn wave_energy_density(wave_height: f64) -> f64 {
    0.5 * SEAWATER_DENSITY * GRAVITY * wave_height.powi(2)
}

/// Resolves `wind_speed` onto the reference direction, returning (x, y).
pub fn wind_components(wind_speed: f64) -> (f64, f64) {
    let theta = REFERENCE_WIND_DIRECTION_DEG.to_radians();
    (wind_speed * theta.cos(), wind_speed * theta.sin())
}

pub fn derive(obs: &CanonicalObservation) -> ExtendedObservation {
    let (wind_component_x, wind_component_y) = wind_components(obs.wind_speed);
    ExtendedObservation {
        base: obs.clone(),
        wind_component_x,
        wind_component_y,
        wave_energy_density: wave_energy_density(obs.wave_height),
    }
}

pub fn derive_all(
    seq: &ObservationSequence<CanonicalObservation>,
) -> ObservationSequence<ExtendedObservation> {
    seq.map(derive)
}
