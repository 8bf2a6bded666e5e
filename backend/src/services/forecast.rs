//! Prediction request orchestration.
//!
//! Requests are tagged with the input snapshot they were built from. When a
//! response arrives it is compared against the live snapshot: a match is
//! written to the single accepted-forecast slot, a mismatch is dropped. There
//! is no cancellation of in-flight requests, only discard on arrival, so the
//! slot always holds the last *resolved* response for the live inputs.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::transport::ForecastTransport;
use crate::error::ForecastResult;
use crate::models::{
    AmenityCounts, Area, ForecastSnapshot, HousingType, PredictionRequest, TimeSeriesPoint,
};

/// An issued request awaiting its response.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTicket {
    id: u64,
    snapshot: ForecastSnapshot,
    request: PredictionRequest,
    issued_at: DateTime<Utc>,
}

impl ForecastTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn snapshot(&self) -> &ForecastSnapshot {
        &self.snapshot
    }

    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// What happened to a resolved ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Written to the accepted slot.
    Accepted,
    /// Inputs changed since the request was issued; dropped.
    Stale,
}

/// Lifecycle of the externally forecasted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastStatus {
    /// Nothing requested yet, or cleared.
    Idle,
    /// At least one request in flight and nothing accepted for the live inputs.
    Pending,
    /// A response with data was accepted.
    Ready,
    /// The accepted outcome was a failure; the series is empty.
    Unavailable,
}

/// Contents of the single accepted-forecast slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedForecast {
    pub ticket_id: u64,
    pub snapshot: ForecastSnapshot,
    pub series: Vec<TimeSeriesPoint>,
    pub failed: bool,
    pub resolved_at: DateTime<Utc>,
}

/// Issues tickets and merges responses under the staleness rule.
#[derive(Debug, Clone, Default)]
pub struct PredictionRequestOrchestrator {
    next_id: u64,
    in_flight: BTreeSet<u64>,
    accepted: Option<AcceptedForecast>,
}

impl PredictionRequestOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag `request` with `snapshot` and register it as in flight.
    pub fn issue(&mut self, request: PredictionRequest, snapshot: ForecastSnapshot) -> ForecastTicket {
        self.next_id += 1;
        let ticket = ForecastTicket {
            id: self.next_id,
            snapshot,
            request,
            issued_at: Utc::now(),
        };
        self.in_flight.insert(ticket.id);
        info!(
            ticket = ticket.id,
            area = %ticket.snapshot.area,
            housing_type = %ticket.snapshot.housing_type,
            "Issued forecast request"
        );
        ticket
    }

    /// Apply the outcome of `ticket` if its snapshot still matches `live`.
    ///
    /// A failure for the live inputs is accepted as an empty series.
    pub fn resolve(
        &mut self,
        ticket: &ForecastTicket,
        outcome: ForecastResult<Vec<TimeSeriesPoint>>,
        live: Option<&ForecastSnapshot>,
    ) -> Resolution {
        self.in_flight.remove(&ticket.id);

        if live != Some(&ticket.snapshot) {
            debug!(ticket = ticket.id, "Discarding stale forecast response");
            return Resolution::Stale;
        }

        let (series, failed) = match outcome {
            Ok(series) => (series, false),
            Err(e) => {
                warn!(ticket = ticket.id, error = %e, "Forecast request failed; showing no forecast");
                (Vec::new(), true)
            }
        };

        info!(ticket = ticket.id, points = series.len(), "Accepted forecast response");
        self.accepted = Some(AcceptedForecast {
            ticket_id: ticket.id,
            snapshot: ticket.snapshot.clone(),
            series,
            failed,
            resolved_at: Utc::now(),
        });
        Resolution::Accepted
    }

    /// Empty the accepted slot. In-flight tickets will later resolve as stale
    /// unless the same inputs are selected again.
    pub fn clear(&mut self) {
        self.accepted = None;
    }

    pub fn accepted(&self) -> Option<&AcceptedForecast> {
        self.accepted.as_ref()
    }

    /// The externally forecasted series to render.
    pub fn forecast_series(&self) -> &[TimeSeriesPoint] {
        self.accepted
            .as_ref()
            .map(|a| a.series.as_slice())
            .unwrap_or_default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Status as seen from the `live` inputs. Nothing is pending without a selection.
    pub fn status(&self, live: Option<&ForecastSnapshot>) -> ForecastStatus {
        if live.is_none() {
            return ForecastStatus::Idle;
        }

        let accepted_live = self
            .accepted
            .as_ref()
            .filter(|a| Some(&a.snapshot) == live);

        match accepted_live {
            Some(a) if a.failed => ForecastStatus::Unavailable,
            Some(_) => ForecastStatus::Ready,
            None if !self.in_flight.is_empty() => ForecastStatus::Pending,
            None if self.accepted.is_some() => ForecastStatus::Ready,
            None => ForecastStatus::Idle,
        }
    }
}

/// Prepend the latest predicted point unless the forecast already has its year.
///
/// Joins the predicted line to the forecast line at their boundary.
pub fn stitch_continuity(
    mut forecast: Vec<TimeSeriesPoint>,
    latest_predicted: Option<TimeSeriesPoint>,
) -> Vec<TimeSeriesPoint> {
    if let Some(point) = latest_predicted {
        if !forecast.iter().any(|p| p.year == point.year) {
            forecast.insert(0, point);
        }
    }
    forecast
}

/// Send `request` and return the stitched forecast series.
pub async fn fetch_forecast(
    transport: &dyn ForecastTransport,
    request: &PredictionRequest,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    let response = transport.fetch(request).await?;
    Ok(stitch_continuity(
        response.into_series(),
        request.latest_predicted_point(),
    ))
}

/// Build the request for `(area, housing_type, amenities)`, send it, and stitch the result.
pub async fn request_forecast(
    transport: &dyn ForecastTransport,
    area: &Area,
    housing_type: &HousingType,
    amenities: &AmenityCounts,
) -> ForecastResult<Vec<TimeSeriesPoint>> {
    let request = PredictionRequest::build(area, housing_type, amenities);
    fetch_forecast(transport, &request).await
}
