//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! returns the axum router ready for serving.

use axum::{
    routing::{delete, get, patch, post, put},
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
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Landing page
        .route("/buildings", get(handlers::list_buildings))
        .route("/buildings/{building_id}/sessions", post(handlers::create_session))
        // Building pages
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/{session_id}/metrics/{metric}", put(handlers::edit_metric))
        .route("/sessions/{session_id}/focus/{metric}", post(handlers::toggle_focus))
        .route("/sessions/{session_id}/simulate", post(handlers::simulate))
        .route("/sessions/{session_id}/reset", post(handlers::reset))
        .route("/sessions/{session_id}/warning", delete(handlers::dismiss_warning))
        .route("/sessions/{session_id}/tab", post(handlers::toggle_view))
        .route("/sessions/{session_id}/details", patch(handlers::update_details));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
