//! Marine observations for the dashboard
//!
//! Fetches hourly observations from the StormGlass point API, normalizes
//! them into canonical records, and derives the features the condition
//! model consumes. A fixed synthetic sample stands in when live data is
//! unavailable.

pub mod types;
pub mod fallback;
pub mod features;
pub mod location;
pub mod normalize;
pub mod provider;

pub use types::*;
pub use fallback::fallback;
pub use features::{derive, derive_all};
pub use location::Coordinates;
pub use normalize::normalize;
pub use provider::StormGlassProvider;
