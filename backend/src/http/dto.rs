//! Data Transfer Objects for the HTTP API.
//!
//! View payloads are re-exported from the API module; this file only adds
//! request bodies and the envelopes specific to the REST surface.

use serde::{Deserialize, Serialize};

pub use crate::api::{ActiveView, BuildingDetailView, DetailsUpdate, RosterView};
use crate::api::BuildingId;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Reachability of the upstream services
    pub gateway: String,
}

/// Response for opening a building page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub building_id: BuildingId,
    pub message: String,
}

/// Current state of an opened building page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub building_id: BuildingId,
    /// `loading`, `error` or `ready`
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<BuildingDetailView>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Request body for setting one overlay value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EditMetricRequest {
    pub value: f64,
}

/// Outcome of a simulate or reset action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateResponse {
    /// `applied`, `failed` or `stale`
    pub outcome: String,
    pub view: BuildingDetailView,
}
