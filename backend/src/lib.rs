//! # Geodash Rust Backend
//!
//! Data core of a housing-price geodashboard.
//!
//! A user selects an area on a map; the backend turns the area's raw feature
//! properties into typed records, derives the chart series and the amenity
//! working set for the chosen housing type, requests a forecast from an
//! external prediction service and merges the three series onto one year
//! axis for rendering.
//!
//! ## Architecture
//!
//! - [`parsing`]: tolerant decoding of price blobs and raw feature properties
//! - [`models`]: areas, series, amenities and prediction service payloads
//! - [`services`]: derived state engine, series aligner, forecast orchestration
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based HTTP API for the frontend
//!
//! ## Forecast consistency
//!
//! Forecast responses may arrive out of order. Each request is tagged with the
//! inputs it was built from and a response is only accepted while those inputs
//! are still live, so a slow response for an old selection never overwrites
//! the forecast for the current one.

pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use config::DashboardConfig;
pub use error::{ConfigError, ForecastError, ForecastResult};
