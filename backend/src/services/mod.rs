//! Service layer for page loads, simulation and view composition.
//!
//! Services sit between the gateway and the HTTP layer: they orchestrate
//! gateway calls, hold per-page state and shape what the client renders.

pub mod loader;
pub mod session;
pub mod session_tracker;
pub mod simulation;
pub mod trends;
pub mod view;

pub use loader::{load_building_detail, load_roster, BuildingDetailData, NormalizedTrends};
pub use session::BuildingSession;
pub use session_tracker::{load_session, LoadPhase, SessionSlot, SessionTracker};
pub use simulation::{SimulationOutcome, SimulationState};
pub use trends::{normalize_histogram, normalize_trend, TrendError};
pub use view::{compose_detail, compose_roster};

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod simulation_tests;
