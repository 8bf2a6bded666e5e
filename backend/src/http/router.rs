//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The map frontend is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/sessions/{session_id}/selection",
            post(handlers::select_area).delete(handlers::clear_selection),
        )
        .route("/sessions/{session_id}/reset", post(handlers::reset_session))
        .route(
            "/sessions/{session_id}/housing-type",
            put(handlers::set_housing_type),
        )
        .route(
            "/sessions/{session_id}/amenities/{kind}/increment",
            post(handlers::increment_amenity),
        )
        .route(
            "/sessions/{session_id}/amenities/{kind}/decrement",
            post(handlers::decrement_amenity),
        )
        .route("/sessions/{session_id}/forecast", post(handlers::run_forecast))
        .route("/sessions/{session_id}/chart", get(handlers::get_chart));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
