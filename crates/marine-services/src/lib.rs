//! Marine dashboard services.
//!
//! Wires the observation provider, the fallback policy, feature derivation
//! and the condition model into a single request pipeline, and prepares its
//! result for display.

pub mod app;
pub mod error_mapping;
pub mod pipeline;
pub mod report;

pub use app::App;
pub use error_mapping::IntoAppError;
pub use pipeline::{AcquisitionError, DataSource, FallbackReason, Forecast, Pipeline};
pub use report::{ChartPoint, ChartSeries, PreviewRow};
