//! Presentation data for a forecast: chart series, table preview and the
//! plain-text dashboard built from them.

use chrono::{DateTime, Utc};
use marine_weather::{ExtendedObservation, ObservationSequence};
use serde::Serialize;

use crate::pipeline::{DataSource, Forecast};

pub const PREVIEW_HEADERS: [&str; 8] = [
    "Time",
    "Wave Height (m)",
    "Wind Speed (m/s)",
    "Swell Height (m)",
    "Swell Period (s)",
    "wind_x",
    "wind_y",
    "wave_energy",
];

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub const LIVE_CAPTION: &str = "Condition derived using real-time wave, wind, and swell parameters.";
pub const FALLBACK_CAPTION: &str =
    "Condition derived from a synthetic sample (wave 1.2 m, wind 6.5 m/s, swell 0.8 m @ 10 s).";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub wave_height: f64,
    pub wind_speed: f64,
}

/// Wave height and wind speed over the returned time range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn from_observations(seq: &ObservationSequence<ExtendedObservation>) -> Self {
        Self {
            points: seq
                .iter()
                .map(|o| ChartPoint {
                    timestamp: o.base.timestamp,
                    wave_height: o.base.wave_height,
                    wind_speed: o.base.wind_speed,
                })
                .collect(),
        }
    }

    pub fn wave_heights(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.wave_height).collect()
    }

    pub fn wind_speeds(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.wind_speed).collect()
    }
}

/// One formatted table row, cells in [`PREVIEW_HEADERS`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub cells: [String; 8],
}

impl From<&ExtendedObservation> for PreviewRow {
    fn from(o: &ExtendedObservation) -> Self {
        Self {
            cells: [
                o.base.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                format!("{:.2}", o.base.wave_height),
                format!("{:.2}", o.base.wind_speed),
                format!("{:.2}", o.base.swell_height),
                format!("{:.2}", o.base.swell_period),
                format!("{:.3}", o.wind_component_x),
                format!("{:.3}", o.wind_component_y),
                format!("{:.1}", o.wave_energy_density),
            ],
        }
    }
}

/// The last `rows` observations, formatted.
pub fn preview(seq: &ObservationSequence<ExtendedObservation>, rows: usize) -> Vec<PreviewRow> {
    seq.tail(rows).iter().map(PreviewRow::from).collect()
}

pub fn caption(source: &DataSource) -> &'static str {
    match source {
        DataSource::Live => LIVE_CAPTION,
        DataSource::Fallback { .. } => FALLBACK_CAPTION,
    }
}

/// Scales `values` onto block characters between their min and max.
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = min_max(values);
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Joins `lines`, each terminated by a newline.
fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

pub fn render_chart(series: &ChartSeries) -> String {
    let mut lines = Vec::new();
    if let (Some(first), Some(last)) = (series.points.first(), series.points.last()) {
        lines.push(format!(
            "{} → {} ({} points)",
            first.timestamp.format("%Y-%m-%d %H:%M"),
            last.timestamp.format("%Y-%m-%d %H:%M"),
            series.points.len()
        ));
    }
    for (name, values) in [
        ("Wave Height (m)", series.wave_heights()),
        ("Wind Speed (m/s)", series.wind_speeds()),
    ] {
        let (min, max) = min_max(&values);
        lines.push(format!(
            "{:<17} {}  [{:.2} .. {:.2}]",
            name,
            sparkline(&values),
            min,
            max
        ));
    }
    join_lines(&lines)
}

pub fn render_table(rows: &[PreviewRow]) -> String {
    let mut widths = PREVIEW_HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = PREVIEW_HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![
        header.join(" | ").trim_end().to_string(),
        rule.join("-+-"),
    ];
    for row in rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (c, w))| {
                if i == 0 {
                    format!("{:<w$}", c, w = *w)
                } else {
                    format!("{:>w$}", c, w = *w)
                }
            })
            .collect();
        lines.push(cells.join(" | "));
    }
    join_lines(&lines)
}

/// Full text dashboard for one forecast.
pub fn render_dashboard(forecast: &Forecast, preview_rows: usize) -> String {
    let mut lines = Vec::new();

    if let DataSource::Fallback { reason } = &forecast.source {
        lines.push(format!("⚠️  {}", reason.notice()));
        lines.push("Using fallback data.".to_string());
        lines.push(String::new());
    }

    lines.push(format!("🌊 Marine Weather Predictor @ {}", forecast.coordinates));
    lines.push(format!("Predicted Marine Condition: {}", forecast.label()));
    lines.push(caption(&forecast.source).to_string());
    lines.push(String::new());

    let mut out = join_lines(&lines);
    out.push_str(&render_chart(&ChartSeries::from_observations(
        &forecast.observations,
    )));

    if preview_rows > 0 {
        out.push('\n');
        out.push_str(&render_table(&preview(&forecast.observations, preview_rows)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use marine_weather::{derive, CanonicalObservation};

    fn sequence(n: usize) -> ObservationSequence<ExtendedObservation> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let rows = (0..n)
            .map(|i| {
                derive(&CanonicalObservation {
                    timestamp: start + Duration::hours(i as i64),
                    wave_height: 1.0 + i as f64 * 0.1,
                    wind_speed: 5.0 + i as f64,
                    swell_height: 0.5,
                    swell_period: 8.0,
                })
            })
            .collect();
        ObservationSequence::new(rows).unwrap()
    }

    #[test]
    fn test_preview_takes_last_rows() {
        let rows = preview(&sequence(8), 5);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].cells[0], "2024-01-01 03:00");
        assert_eq!(rows[4].cells[0], "2024-01-01 07:00");
        assert_eq!(rows[4].cells[2], "12.00");
    }

    #[test]
    fn test_preview_short_sequence() {
        assert_eq!(preview(&sequence(2), 5).len(), 2);
    }

    #[test]
    fn test_chart_series_covers_all_rows() {
        let series = ChartSeries::from_observations(&sequence(4));
        assert_eq!(series.points.len(), 4);
        assert_eq!(series.wind_speeds(), vec![5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_sparkline_scales_to_extremes() {
        let line = sparkline(&[0.0, 0.5, 1.0]);
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars.len(), 3);
        assert_eq!(chars[0], '▁');
        assert_eq!(chars[2], '█');
    }

    #[test]
    fn test_sparkline_flat_series() {
        assert_eq!(sparkline(&[2.0, 2.0]), "▅▅");
    }

    #[test]
    fn test_render_chart_lines() {
        let chart = render_chart(&ChartSeries::from_observations(&sequence(3)));
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "2024-01-01 00:00 → 2024-01-01 02:00 (3 points)");
        assert!(lines[1].starts_with("Wave Height (m)"));
        assert!(lines[2].ends_with("[5.00 .. 7.00]"));
        assert!(chart.ends_with('\n'));
    }

    #[test]
    fn test_render_table_has_headers_and_rows() {
        let table = render_table(&preview(&sequence(3), 5));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Time"));
        assert!(lines[0].contains("Wave Height (m)"));
        assert!(lines[0].contains("wave_energy"));
    }
}
