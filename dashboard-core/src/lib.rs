//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - The backend abstraction (`/weather`, `/suggestions`) and its HTTP client
//! - Weather-code classification and forecast aggregation into chart series
//! - The debounced suggestion engine and the lookup view-state machine
//!
//! It is used by `dashboard-cli`, but a GUI front end can drive the same types.

pub mod aggregate;
pub mod backend;
pub mod condition;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod series;
pub mod session;
pub mod suggest;

#[cfg(test)]
mod testing;

pub use aggregate::{Aggregate, aggregate, build_snapshot};
pub use backend::{HttpBackend, WeatherBackend, backend_from_config};
pub use condition::{Condition, classify};
pub use config::Config;
pub use controller::{ViewState, WeatherSearchController};
pub use error::DashboardError;
pub use model::{ForecastDay, Suggestion, WeatherPayload, WeatherSnapshot, compose_label};
pub use series::{ChartKind, ChartProjection, DerivedSeries, SeriesPoint, Summary};
pub use session::{Dashboard, Key};
pub use suggest::{SuggestSettings, SuggestionEngine, SuggestionPhase};
