//! Maps provider payloads onto canonical observations.

use chrono::{DateTime, Utc};

use crate::types::{
    CanonicalObservation, NormalizeError, ObservationSequence, ProviderHour, ProviderPayload,
    SourceValues,
};

/// Converts every hourly record, preserving the provider's order.
///
/// # Errors
///
/// Fails on the first record that is missing a measurement or carries an
/// unparseable timestamp, and when `hours` is absent or empty.
pub fn normalize(
    payload: &ProviderPayload,
) -> Result<ObservationSequence<CanonicalObservation>, NormalizeError> {
    let hours = payload.hours.as_ref().ok_or(NormalizeError::MissingHours)?;

    let observations = hours
        .iter()
        .enumerate()
        .map(|(index, hour)| normalize_hour(index, hour))
        .collect::<Result<Vec<_>, _>>()?;

    ObservationSequence::new(observations).ok_or(NormalizeError::Empty)
}

fn normalize_hour(index: usize, hour: &ProviderHour) -> Result<CanonicalObservation, NormalizeError> {
    let raw_time = hour
        .time
        .as_deref()
        .ok_or(NormalizeError::MissingField { index, field: "time" })?;
    let timestamp = DateTime::parse_from_rfc3339(raw_time)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| NormalizeError::InvalidTimestamp {
            index,
            value: raw_time.to_string(),
        })?;

    Ok(CanonicalObservation {
        timestamp,
        wave_height: sg_value(index, "waveHeight.sg", hour.wave_height.as_ref())?,
        wind_speed: sg_value(index, "windSpeed.sg", hour.wind_speed.as_ref())?,
        swell_height: sg_value(index, "swellHeight.sg", hour.swell_height.as_ref())?,
        swell_period: sg_value(index, "swellPeriod.sg", hour.swell_period.as_ref())?,
    })
}

fn sg_value(
    index: usize,
    field: &'static str,
    values: Option<&SourceValues>,
) -> Result<f64, NormalizeError> {
    values
        .and_then(|v| v.sg)
        .ok_or(NormalizeError::MissingField { index, field })
}
