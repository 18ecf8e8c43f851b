//! Session tracking for opened building pages.
//!
//! Simple in-memory store keyed by a random session id. A session starts in
//! the loading phase while its detail load runs in the background, then
//! becomes ready or failed. Sessions nobody has looked at for longer than
//! the idle TTL are evicted.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::BuildingId;
use crate::gateway::DashboardGateway;
use crate::services::session::BuildingSession;

/// Load phase of a session.
#[derive(Clone)]
pub enum LoadPhase {
    Loading,
    Failed { message: String },
    Ready(BuildingSession),
}

impl LoadPhase {
    pub fn name(&self) -> &'static str {
        match self {
            LoadPhase::Loading => "loading",
            LoadPhase::Failed { .. } => "error",
            LoadPhase::Ready(_) => "ready",
        }
    }
}

/// Session metadata plus its phase.
#[derive(Clone)]
pub struct SessionSlot {
    pub session_id: String,
    pub building_id: BuildingId,
    pub phase: LoadPhase,
    pub created_at: DateTime<Utc>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_access: DateTime<Utc>,
}

/// Idle time after which a session is dropped.
pub const DEFAULT_IDLE_TTL_SECS: i64 = 30 * 60;

/// In-memory session tracker.
#[derive(Clone)]
pub struct SessionTracker {
    sessions: Arc<RwLock<HashMap<String, SessionSlot>>>,
    idle_ttl: Duration,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::seconds(DEFAULT_IDLE_TTL_SECS))
    }
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    fn is_expired(&self, slot: &SessionSlot, now: DateTime<Utc>) -> bool {
        now - slot.last_access > self.idle_ttl
    }

    /// Register a loading session for `building_id` and return its id.
    /// Expired sessions are evicted on the way.
    pub fn create(&self, building_id: BuildingId) -> String {
        let now = Utc::now();
        let session_id = Uuid::new_v4().to_string();
        let slot = SessionSlot {
            session_id: session_id.clone(),
            building_id,
            phase: LoadPhase::Loading,
            created_at: now,
            loaded_at: None,
            last_access: now,
        };

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, slot| !self.is_expired(slot, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }
        sessions.insert(session_id.clone(), slot);
        session_id
    }

    pub fn mark_ready(&self, session_id: &str, session: BuildingSession) {
        if let Some(slot) = self.sessions.write().get_mut(session_id) {
            slot.phase = LoadPhase::Ready(session);
            slot.loaded_at = Some(Utc::now());
        }
    }

    pub fn mark_failed(&self, session_id: &str, message: impl Into<String>) {
        if let Some(slot) = self.sessions.write().get_mut(session_id) {
            slot.phase = LoadPhase::Failed {
                message: message.into(),
            };
            slot.loaded_at = Some(Utc::now());
        }
    }

    /// Look up a session and refresh its idle clock. An expired session is
    /// dropped and reported as missing.
    pub fn get(&self, session_id: &str) -> Option<SessionSlot> {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let expired = self.is_expired(sessions.get(session_id)?, now);
        if expired {
            sessions.remove(session_id);
            return None;
        }
        let slot = sessions.get_mut(session_id)?;
        slot.last_access = now;
        Some(slot.clone())
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Load the detail page behind `session_id` and record the outcome.
///
/// Meant to be spawned as a background task. A session removed before the
/// load finishes stays removed.
pub async fn load_session(
    tracker: SessionTracker,
    gateway: Arc<dyn DashboardGateway>,
    session_id: String,
    building_id: BuildingId,
) {
    match BuildingSession::open(gateway, building_id).await {
        Ok(session) => tracker.mark_ready(&session_id, session),
        Err(err) => {
            warn!("Failed to load building {}: {}", building_id, err);
            tracker.mark_failed(&session_id, err.user_message());
        }
    }
}
