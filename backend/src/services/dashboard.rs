//! One user's dashboard: derived state plus forecast orchestration.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use super::aligner::{align_chart, AlignedSeriesTable};
use super::engine::{DerivedStateEngine, Recomputation};
use super::forecast::{
    fetch_forecast, ForecastStatus, ForecastTicket, PredictionRequestOrchestrator, Resolution,
};
use super::transport::ForecastTransport;
use crate::error::ForecastResult;
use crate::models::{AmenityCounts, AmenityKind, Area, HousingType, TimeSeriesPoint};
use crate::parsing::{normalize_area, RawProperties};

/// Serializable snapshot of everything the frontend renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selected_feature_id: Option<String>,
    pub area_name: Option<String>,
    pub zone_index: Option<i64>,
    pub housing_type: HousingType,
    pub housing_type_options: Vec<HousingType>,
    pub amenities: AmenityCounts,
    pub actual_series: Vec<TimeSeriesPoint>,
    pub predicted_series: Vec<TimeSeriesPoint>,
    pub forecast_series: Vec<TimeSeriesPoint>,
    pub forecast_status: ForecastStatus,
    /// `None` renders as "no data".
    pub chart: Option<AlignedSeriesTable>,
}

/// Explicit context object for a dashboard session.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    engine: DerivedStateEngine,
    orchestrator: PredictionRequestOrchestrator,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize raw map-feature properties and select the result.
    pub fn select_area(&mut self, raw: &RawProperties) -> Option<ForecastTicket> {
        let area = normalize_area(raw);
        info!(feature = %area.id(), "Selected area");
        self.select_normalized(Some(area))
    }

    /// Select an already normalized area, or deselect with `None`.
    pub fn select_normalized(&mut self, area: Option<Area>) -> Option<ForecastTicket> {
        let deselect = area.is_none();
        let recomputation = self.engine.select_area(area);
        if deselect {
            self.orchestrator.clear();
        }
        self.dispatch(recomputation)
    }

    pub fn clear_selection(&mut self) {
        self.select_normalized(None);
    }

    /// Deselect, restore the default housing type and drop the forecast.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.orchestrator.clear();
        info!("Dashboard reset");
    }

    pub fn set_housing_type(&mut self, housing_type: impl Into<HousingType>) -> Option<ForecastTicket> {
        let recomputation = self.engine.set_housing_type(housing_type.into());
        self.dispatch(recomputation)
    }

    pub fn increment_amenity(&mut self, kind: AmenityKind) -> Option<ForecastTicket> {
        let recomputation = self.engine.increment_amenity(kind);
        self.dispatch(recomputation)
    }

    pub fn decrement_amenity(&mut self, kind: AmenityKind) -> Option<ForecastTicket> {
        let recomputation = self.engine.decrement_amenity(kind);
        self.dispatch(recomputation)
    }

    /// Issue a request for the live inputs regardless of what changed.
    ///
    /// `None` when no area is selected.
    pub fn run_forecast(&mut self) -> Option<ForecastTicket> {
        let request = self.engine.forecast_request()?.clone();
        let snapshot = self.engine.snapshot()?;
        Some(self.orchestrator.issue(request, snapshot))
    }

    /// Apply a response. Returns whether it was accepted.
    pub fn resolve_forecast(
        &mut self,
        ticket: &ForecastTicket,
        outcome: ForecastResult<Vec<TimeSeriesPoint>>,
    ) -> Resolution {
        let live = self.engine.snapshot();
        self.orchestrator.resolve(ticket, outcome, live.as_ref())
    }

    pub fn engine(&self) -> &DerivedStateEngine {
        &self.engine
    }

    pub fn orchestrator(&self) -> &PredictionRequestOrchestrator {
        &self.orchestrator
    }

    pub fn housing_type_options(&self) -> Vec<HousingType> {
        self.engine.housing_type_options()
    }

    pub fn forecast_series(&self) -> &[TimeSeriesPoint] {
        self.orchestrator.forecast_series()
    }

    pub fn forecast_status(&self) -> ForecastStatus {
        self.orchestrator.status(self.engine.snapshot().as_ref())
    }

    /// Actual, predicted and forecast series on one year axis.
    pub fn chart(&self) -> Option<AlignedSeriesTable> {
        align_chart(
            self.engine.actual_series(),
            self.engine.predicted_series(),
            self.forecast_series(),
        )
    }

    pub fn view(&self) -> DashboardView {
        let area = self.engine.area();
        DashboardView {
            selected_feature_id: area.map(|a| a.id().feature_id()),
            area_name: area.map(|a| a.area_name.clone()),
            zone_index: area.map(|a| a.zone_index),
            housing_type: self.engine.housing_type().clone(),
            housing_type_options: self.housing_type_options(),
            amenities: *self.engine.active_amenities(),
            actual_series: self.engine.actual_series().to_vec(),
            predicted_series: self.engine.predicted_series().to_vec(),
            forecast_series: self.forecast_series().to_vec(),
            forecast_status: self.forecast_status(),
            chart: self.chart(),
        }
    }

    fn dispatch(&mut self, recomputation: Recomputation) -> Option<ForecastTicket> {
        if !recomputation.requests_forecast() {
            return None;
        }
        self.run_forecast()
    }
}

/// Fetch the forecast for `ticket` and resolve it against the session's live inputs.
///
/// The session lock is released while the request is in flight.
pub async fn complete_forecast(
    session: Arc<Mutex<Dashboard>>,
    transport: Arc<dyn ForecastTransport>,
    ticket: ForecastTicket,
) -> Resolution {
    let outcome = fetch_forecast(transport.as_ref(), ticket.request()).await;
    session.lock().resolve_forecast(&ticket, outcome)
}
