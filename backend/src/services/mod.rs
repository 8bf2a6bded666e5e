//! Service layer: derived state, chart alignment and forecast orchestration.
//!
//! Everything here except the session store and the HTTP transport is
//! synchronous and free of I/O.

pub mod aligner;
pub mod dashboard;
pub mod engine;
pub mod forecast;
#[cfg(feature = "http-server")]
pub mod session_store;
pub mod transport;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;


pub use aligner::{align, align_chart, AlignedDataset, AlignedSeriesTable, SeriesKind};
pub use dashboard::{complete_forecast, Dashboard, DashboardView};
pub use engine::{ChangeSet, DerivedState, DerivedStateEngine, Node, Recomputation};
pub use forecast::{
    fetch_forecast, request_forecast, stitch_continuity, AcceptedForecast, ForecastStatus,
    ForecastTicket, PredictionRequestOrchestrator, Resolution,
};
#[cfg(feature = "http-server")]
pub use session_store::{SessionHandle, SessionStore};
pub use transport::{ForecastTransport, HttpForecastTransport};
