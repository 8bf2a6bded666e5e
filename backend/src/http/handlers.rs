//! HTTP handlers for the REST API.
//!
//! Handlers never hold a session lock across an `.await`. Mutations that
//! trigger a forecast spawn the request in the background and return the
//! current view immediately; the response is merged later under the
//! staleness rule.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use super::dto::{
    ChartResponse, CreateSessionResponse, ForecastRunResponse, HealthResponse,
    SetHousingTypeRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::AmenityKind;
use crate::parsing::RawProperties;
use crate::services::{complete_forecast, DashboardView, ForecastTicket, SessionHandle};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn find_session(state: &AppState, session_id: &str) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))
}

fn parse_amenity(kind: &str) -> Result<AmenityKind, AppError> {
    kind.parse().map_err(AppError::BadRequest)
}

/// Resolve `ticket` in the background if a mutation produced one.
fn spawn_forecast(state: &AppState, session: &SessionHandle, ticket: Option<ForecastTicket>) {
    let Some(ticket) = ticket else {
        return;
    };

    let session = session.clone();
    let transport = state.transport.clone();
    tokio::spawn(async move {
        let id = ticket.id();
        let resolution = complete_forecast(session, transport, ticket).await;
        debug!(ticket = id, ?resolution, "Background forecast resolved");
    });
}

/// Apply `mutate` to the session, dispatch any forecast and return the new view.
fn mutate_session<F>(state: &AppState, session_id: &str, mutate: F) -> HandlerResult<DashboardView>
where
    F: FnOnce(&mut crate::services::Dashboard) -> Option<ForecastTicket>,
{
    let session = find_session(state, session_id)?;
    let (ticket, view) = {
        let mut dashboard = session.lock();
        let ticket = mutate(&mut dashboard);
        (ticket, dashboard.view())
    };
    spawn_forecast(state, &session, ticket);
    Ok(Json(view))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        sessions: state.sessions.len(),
    }))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let (session_id, session) = state.sessions.create_session();
    let view = session.lock().view();
    info!(session = %session_id, "Created dashboard session");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse { session_id, view }),
    ))
}

/// GET /v1/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<DashboardView> {
    let session = find_session(&state, &session_id)?;
    let view = session.lock().view();
    Ok(Json(view))
}

/// DELETE /v1/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&session_id) {
        info!(session = %session_id, "Deleted dashboard session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", session_id)))
    }
}

// =============================================================================
// Dashboard inputs
// =============================================================================

/// POST /v1/sessions/{session_id}/selection
///
/// Body is the raw property bag of the clicked map feature.
pub async fn select_area(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(properties): Json<RawProperties>,
) -> HandlerResult<DashboardView> {
    mutate_session(&state, &session_id, |dashboard| {
        dashboard.select_area(&properties)
    })
}

/// DELETE /v1/sessions/{session_id}/selection
pub async fn clear_selection(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<DashboardView> {
    mutate_session(&state, &session_id, |dashboard| {
        dashboard.clear_selection();
        None
    })
}

/// POST /v1/sessions/{session_id}/reset
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<DashboardView> {
    mutate_session(&state, &session_id, |dashboard| {
        dashboard.reset();
        None
    })
}

/// PUT /v1/sessions/{session_id}/housing-type
pub async fn set_housing_type(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SetHousingTypeRequest>,
) -> HandlerResult<DashboardView> {
    mutate_session(&state, &session_id, |dashboard| {
        dashboard.set_housing_type(request.housing_type)
    })
}

/// POST /v1/sessions/{session_id}/amenities/{kind}/increment
pub async fn increment_amenity(
    State(state): State<AppState>,
    Path((session_id, kind)): Path<(String, String)>,
) -> HandlerResult<DashboardView> {
    let kind = parse_amenity(&kind)?;
    mutate_session(&state, &session_id, |dashboard| {
        dashboard.increment_amenity(kind)
    })
}

/// POST /v1/sessions/{session_id}/amenities/{kind}/decrement
pub async fn decrement_amenity(
    State(state): State<AppState>,
    Path((session_id, kind)): Path<(String, String)>,
) -> HandlerResult<DashboardView> {
    let kind = parse_amenity(&kind)?;
    mutate_session(&state, &session_id, |dashboard| {
        dashboard.decrement_amenity(kind)
    })
}

// =============================================================================
// Forecast and chart
// =============================================================================

/// POST /v1/sessions/{session_id}/forecast
///
/// Manual forecast run, awaited inline.
pub async fn run_forecast(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<ForecastRunResponse> {
    let session = find_session(&state, &session_id)?;
    let ticket = session.lock().run_forecast();

    let resolution = match ticket {
        Some(ticket) => {
            Some(complete_forecast(session.clone(), state.transport.clone(), ticket).await)
        }
        None => None,
    };

    let view = session.lock().view();
    Ok(Json(ForecastRunResponse { resolution, view }))
}

/// GET /v1/sessions/{session_id}/chart
pub async fn get_chart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<ChartResponse> {
    let session = find_session(&state, &session_id)?;
    let chart = session.lock().chart();
    Ok(Json(ChartResponse { chart }))
}
