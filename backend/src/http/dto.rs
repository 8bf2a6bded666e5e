//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

pub use crate::services::{AlignedSeriesTable, DashboardView, Resolution};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: usize,
}

/// Response for session creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub view: DashboardView,
}

/// Request body for `PUT /v1/sessions/{id}/housing-type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetHousingTypeRequest {
    pub housing_type: String,
}

/// Response for a manual forecast run.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRunResponse {
    /// `None` when no area was selected and nothing was requested.
    pub resolution: Option<Resolution>,
    pub view: DashboardView,
}

/// Chart payload. A `null` chart renders as "no data".
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub chart: Option<AlignedSeriesTable>,
}
