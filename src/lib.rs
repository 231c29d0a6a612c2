//! `Skycast` - multi-source weather aggregation and derivation engine
//!
//! This library fans out concurrent queries to the KMA forecast, living-index,
//! hazard and particulate providers, merges the partial results into one
//! unified per-request record, and derives secondary metrics (apparent
//! temperature, discomfort index, solar irradiance, hazard-proximity safety
//! narratives) with a deterministic fallback for every remotely-scored value.

pub mod aggregate;
pub mod config;
pub mod derive;
pub mod error;
pub mod fallback;
pub mod geo;
pub mod providers;
pub mod record;
pub mod scoring;
pub mod solar;
pub mod window;

// Re-export core types for public API
pub use aggregate::{AggregationRequest, Aggregator};
pub use config::SkycastConfig;
pub use error::{FetchError, FetchResult};
pub use geo::{GeoPoint, GridPoint};
pub use record::{
    EarthquakeEvent, HazardEvent, HazardKind, HourlyForecast, TyphoonEvent, WeatherRecord,
};
pub use scoring::ScoringClient;
pub use solar::TomorrowOutlook;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
