//! Synthetic sample used when live observations are unavailable.

use chrono::Utc;

use crate::types::{CanonicalObservation, ObservationSequence};

pub const FALLBACK_WAVE_HEIGHT: f64 = 1.2;
pub const FALLBACK_WIND_SPEED: f64 = 6.5;
pub const FALLBACK_SWELL_HEIGHT: f64 = 0.8;
pub const FALLBACK_SWELL_PERIOD: f64 = 10.0;

/// A single fixed observation stamped with the current time.
pub fn fallback() -> ObservationSequence<CanonicalObservation> {
    ObservationSequence::single(CanonicalObservation {
        timestamp: Utc::now(),
        wave_height: FALLBACK_WAVE_HEIGHT,
        wind_speed: FALLBACK_WIND_SPEED,
        swell_height: FALLBACK_SWELL_HEIGHT,
        swell_period: FALLBACK_SWELL_PERIOD,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_single_literal_row() {
        let before = Utc::now();
        let seq = fallback();
        let after = Utc::now();

        assert_eq!(seq.len(), 1);
        let obs = seq.latest();
        assert_eq!(obs.wave_height, 1.2);
        assert_eq!(obs.wind_speed, 6.5);
        assert_eq!(obs.swell_height, 0.8);
        assert_eq!(obs.swell_period, 10.0);
        assert!(obs.timestamp >= before && obs.timestamp <= after);
    }
}
