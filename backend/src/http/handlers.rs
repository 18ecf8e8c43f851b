//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Page state lives in the session tracker; handlers only resolve the
//! session, call one operation and return the recomposed view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::info;

use super::dto::{
    BuildingDetailView, CreateSessionResponse, DetailsUpdate, EditMetricRequest, HealthResponse,
    RosterView, SessionResponse, SimulateResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{BuildingId, Metric};
use crate::services::{self, BuildingSession, LoadPhase, SimulationOutcome};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_building_id(raw: i64) -> Result<BuildingId, AppError> {
    BuildingId::new(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid building id: {}", raw)))
}

fn parse_metric(raw: &str) -> Result<Metric, AppError> {
    raw.parse().map_err(AppError::BadRequest)
}

/// Resolve a session whose page finished loading.
fn ready_session(state: &AppState, session_id: &str) -> Result<BuildingSession, AppError> {
    let slot = state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;
    match slot.phase {
        LoadPhase::Ready(session) => Ok(session),
        LoadPhase::Loading => Err(AppError::Conflict(format!(
            "Session {} is still loading",
            session_id
        ))),
        LoadPhase::Failed { message } => Err(AppError::Conflict(format!(
            "Session {} failed to load: {}",
            session_id, message
        ))),
    }
}

fn outcome_response(outcome: SimulationOutcome, session: &BuildingSession) -> SimulateResponse {
    let outcome = match outcome {
        SimulationOutcome::Applied(_) => "applied",
        SimulationOutcome::Failed(_) => "failed",
        SimulationOutcome::Stale => "stale",
    };
    SimulateResponse {
        outcome: outcome.to_string(),
        view: session.view(),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let gateway = match state.gateway.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "unreachable".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        gateway,
    }))
}

// =============================================================================
// Landing page
// =============================================================================

/// GET /v1/buildings
pub async fn list_buildings(State(state): State<AppState>) -> HandlerResult<RosterView> {
    let roster = services::load_roster(state.gateway.as_ref()).await?;
    Ok(Json(services::compose_roster(&roster)))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/buildings/{building_id}/sessions
///
/// Open a building page. The detail load runs in the background; poll the
/// session until its phase leaves `loading`.
pub async fn create_session(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let building_id = parse_building_id(building_id)?;
    let session_id = state.sessions.create(building_id);
    info!("Opened session {} for building {}", session_id, building_id);

    tokio::spawn(services::load_session(
        state.sessions.clone(),
        state.gateway.clone(),
        session_id.clone(),
        building_id,
    ));

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateSessionResponse {
            message: format!("Loading building {}. Poll /v1/sessions/{}", building_id, session_id),
            session_id,
            building_id,
        }),
    ))
}

/// GET /v1/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<SessionResponse> {
    let slot = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;

    let phase = slot.phase.name().to_string();
    let (message, view) = match slot.phase {
        LoadPhase::Loading => (None, None),
        LoadPhase::Failed { message } => (Some(message), None),
        LoadPhase::Ready(session) => (None, Some(session.view())),
    };

    Ok(Json(SessionResponse {
        session_id: slot.session_id,
        building_id: slot.building_id,
        phase,
        message,
        view,
        created_at: slot.created_at,
    }))
}

/// DELETE /v1/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", session_id)))
    }
}

// =============================================================================
// Page actions
// =============================================================================

/// PUT /v1/sessions/{session_id}/metrics/{metric}
pub async fn edit_metric(
    State(state): State<AppState>,
    Path((session_id, metric)): Path<(String, String)>,
    Json(request): Json<EditMetricRequest>,
) -> HandlerResult<BuildingDetailView> {
    let metric = parse_metric(&metric)?;
    let session = ready_session(&state, &session_id)?;
    session.edit(metric, request.value)?;
    Ok(Json(session.view()))
}

/// POST /v1/sessions/{session_id}/focus/{metric}
pub async fn toggle_focus(
    State(state): State<AppState>,
    Path((session_id, metric)): Path<(String, String)>,
) -> HandlerResult<BuildingDetailView> {
    let metric = parse_metric(&metric)?;
    let session = ready_session(&state, &session_id)?;
    session.toggle_focus(metric);
    Ok(Json(session.view()))
}

/// POST /v1/sessions/{session_id}/simulate
///
/// A backend failure is not an HTTP error: the page keeps its values and the
/// returned view carries the warning.
pub async fn simulate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<SimulateResponse> {
    let session = ready_session(&state, &session_id)?;
    let outcome = session.simulate().await;
    Ok(Json(outcome_response(outcome, &session)))
}

/// POST /v1/sessions/{session_id}/reset
pub async fn reset(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<SimulateResponse> {
    let session = ready_session(&state, &session_id)?;
    let outcome = session.reset().await;
    Ok(Json(outcome_response(outcome, &session)))
}

/// DELETE /v1/sessions/{session_id}/warning
pub async fn dismiss_warning(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<BuildingDetailView> {
    let session = ready_session(&state, &session_id)?;
    session.dismiss_warning();
    Ok(Json(session.view()))
}

/// POST /v1/sessions/{session_id}/tab
pub async fn toggle_view(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<BuildingDetailView> {
    let session = ready_session(&state, &session_id)?;
    session.toggle_view();
    Ok(Json(session.view()))
}

/// PATCH /v1/sessions/{session_id}/details
pub async fn update_details(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(update): Json<DetailsUpdate>,
) -> HandlerResult<BuildingDetailView> {
    let session = ready_session(&state, &session_id)?;
    session.update_details(update);
    Ok(Json(session.view()))
}
