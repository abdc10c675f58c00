use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marine conditions at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalObservation {
    pub timestamp: DateTime<Utc>,
    /// Significant wave height in meters
    pub wave_height: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Swell height in meters
    pub swell_height: f64,
    /// Swell period in seconds
    pub swell_period: f64,
}

/// A canonical observation plus the derived model features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedObservation {
    #[serde(flatten)]
    pub base: CanonicalObservation,
    /// Wind speed resolved onto the 45° reference axis (x)
    pub wind_component_x: f64,
    /// Wind speed resolved onto the 45° reference axis (y)
    pub wind_component_y: f64,
    /// Wave energy per unit area, J/m²
    pub wave_energy_density: f64,
}

/// Chronologically ordered observations. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObservationSequence<T> {
    items: Vec<T>,
}

impl<T> ObservationSequence<T> {
    /// Returns `None` for an empty vector.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self { items })
        }
    }

    pub fn single(item: T) -> Self {
        Self { items: vec![item] }
    }

    /// The last element in chronological order.
    pub fn latest(&self) -> &T {
        &self.items[self.items.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The last `n` elements (all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[T] {
        let start = self.items.len().saturating_sub(n);
        &self.items[start..]
    }

    /// Applies `f` to every element, preserving order and length.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> ObservationSequence<U> {
        ObservationSequence {
            items: self.items.iter().map(f).collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a ObservationSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Raw StormGlass point response.
///
/// Every field is optional so that shape problems surface as
/// [`NormalizeError`]s naming the offending record and field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderPayload {
    #[serde(default)]
    pub hours: Option<Vec<ProviderHour>>,
}

/// One hourly record as returned by StormGlass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHour {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub wave_height: Option<SourceValues>,
    #[serde(default)]
    pub wind_speed: Option<SourceValues>,
    #[serde(default)]
    pub swell_height: Option<SourceValues>,
    #[serde(default)]
    pub swell_period: Option<SourceValues>,
}

/// Per-source values of one measurement. Only the StormGlass blend (`sg`)
/// is authoritative; other sources (noaa, icon, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceValues {
    #[serde(default)]
    pub sg: Option<f64>,
}

/// Coordinate validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Observation fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("No API key supplied")]
    MissingCredential,
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Malformed(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Provider payload normalization errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("Payload has no `hours` collection")]
    MissingHours,
    #[error("Payload `hours` collection is empty")]
    Empty,
    #[error("Hour {index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("Hour {index} has an unparseable timestamp: {value}")]
    InvalidTimestamp { index: usize, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_rejects_empty() {
        assert!(ObservationSequence::<u32>::new(Vec::new()).is_none());
    }

    #[test]
    fn test_sequence_latest_is_last() {
        let seq = ObservationSequence::new(vec![1, 2, 3]).unwrap();
        assert_eq!(*seq.latest(), 3);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_sequence_tail() {
        let seq = ObservationSequence::new((1..=8).collect()).unwrap();
        assert_eq!(seq.tail(5), &[4, 5, 6, 7, 8]);
        assert_eq!(seq.tail(20).len(), 8);
        assert!(seq.tail(0).is_empty());
    }

    #[test]
    fn test_sequence_map_preserves_order() {
        let seq = ObservationSequence::new(vec![1, 2, 3]).unwrap();
        let doubled = seq.map(|x| x * 2);
        assert_eq!(doubled.as_slice(), &[2, 4, 6]);
    }

    #[test]
    fn test_payload_ignores_other_sources() {
        let payload: ProviderPayload = serde_json::from_value(serde_json::json!({
            "hours": [{
                "time": "2024-01-01T00:00:00+00:00",
                "waveHeight": {"noaa": 1.4, "sg": 1.1},
                "windSpeed": {"sg": 4.0}
            }],
            "meta": {"cost": 1, "dailyQuota": 10}
        }))
        .unwrap();

        let hours = payload.hours.unwrap();
        assert_eq!(hours[0].wave_height.as_ref().unwrap().sg, Some(1.1));
        assert!(hours[0].swell_period.is_none());
    }

    #[test]
    fn test_payload_without_hours() {
        let payload: ProviderPayload =
            serde_json::from_value(serde_json::json!({"errors": {"key": "API key is invalid"}}))
                .unwrap();
        assert!(payload.hours.is_none());
    }
}
