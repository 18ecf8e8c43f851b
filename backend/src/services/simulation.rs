//! Simulation state machine for the building detail view.
//!
//! Holds the editable overlay on top of the loaded averages and the score and
//! cost currently displayed. The machine itself is synchronous: a simulate
//! request is split into [`SimulationState::begin_simulate`], which snapshots
//! the overlay into a [`SimulationTicket`], and
//! [`SimulationState::complete_simulate`], which applies the backend outcome.
//! Edits made between the two never reach the in-flight payload.
//!
//! ```text
//!            edit                     simulate ok
//! BASELINE ───────► EDITED ────────────────────────► SIMULATED
//!    ▲                 │ ▲                                │
//!    │ reset           │ └────────────── edit ────────────┘
//!    └─────────────────┴──────────── (then re-simulate)
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::BuildingId;
use crate::gateway::GatewayError;
use crate::models::{
    BuildingAverageRecord, BuildingDetails, DetailsUpdate, Metric, MetricOverlay, MetricValues,
    OverlayError, SimulationResult, SustainabilityBaseline,
};

/// Where the displayed values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationPhase {
    /// Overlay equals the loaded averages.
    Baseline,
    /// Overlay changed since the displayed result was fetched.
    Edited,
    /// Displayed result is the backend's answer for the current overlay.
    Simulated,
}

/// Which tab of the detail page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    #[default]
    Metrics,
    Details,
}

impl ActiveView {
    pub fn toggled(self) -> Self {
        match self {
            ActiveView::Metrics => ActiveView::Details,
            ActiveView::Details => ActiveView::Metrics,
        }
    }
}

/// Snapshot of one simulate submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationTicket {
    pub seq: u64,
    pub building_id: BuildingId,
    pub overlay: MetricValues,
}

/// What [`SimulationState::complete_simulate`] did with an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    /// New result displayed.
    Applied(SimulationResult),
    /// Request failed; displayed values kept, warning stored.
    Failed(String),
    /// A newer submission was already applied; outcome ignored.
    Stale,
}

/// Detail-view state for one building.
#[derive(Debug, Clone)]
pub struct SimulationState {
    record: BuildingAverageRecord,
    baseline: SustainabilityBaseline,
    overlay: MetricOverlay,
    result: SimulationResult,
    simulated: bool,
    phase: SimulationPhase,
    focused: Option<Metric>,
    warning: Option<String>,
    active_view: ActiveView,
    details: BuildingDetails,
    next_seq: u64,
    last_applied_seq: Option<u64>,
}

impl SimulationState {
    /// State right after a successful load: overlay seeded from the averages,
    /// displayed result taken from the baseline report.
    pub fn new(record: BuildingAverageRecord, baseline: SustainabilityBaseline) -> Self {
        let overlay = MetricOverlay::seeded_from(&record.averages);
        let details = BuildingDetails::from_record(&record);
        Self {
            result: baseline.result(),
            record,
            baseline,
            overlay,
            simulated: false,
            phase: SimulationPhase::Baseline,
            focused: None,
            warning: None,
            active_view: ActiveView::default(),
            details,
            next_seq: 0,
            last_applied_seq: None,
        }
    }

    pub fn building_id(&self) -> BuildingId {
        self.record.building_id
    }

    pub fn record(&self) -> &BuildingAverageRecord {
        &self.record
    }

    /// The averages snapshot from the last successful load.
    pub fn averages(&self) -> &MetricValues {
        &self.record.averages
    }

    pub fn baseline(&self) -> &SustainabilityBaseline {
        &self.baseline
    }

    pub fn overlay(&self) -> &MetricOverlay {
        &self.overlay
    }

    pub fn result(&self) -> SimulationResult {
        self.result
    }

    pub fn simulated(&self) -> bool {
        self.simulated
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn focused(&self) -> Option<Metric> {
        self.focused
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn details(&self) -> &BuildingDetails {
        &self.details
    }

    /// Set one overlay value. No network call; the displayed result and the
    /// `simulated` flag are left as they are.
    pub fn edit(&mut self, metric: Metric, value: f64) -> Result<(), OverlayError> {
        self.overlay.set(metric, value)?;
        self.phase = SimulationPhase::Edited;
        Ok(())
    }

    /// Open the editor for `metric`, or close it if it is already open.
    /// Opening one editor closes any other.
    pub fn toggle_focus(&mut self, metric: Metric) -> Option<Metric> {
        self.focused = if self.focused == Some(metric) {
            None
        } else {
            Some(metric)
        };
        self.focused
    }

    /// Snapshot the overlay for submission.
    pub fn begin_simulate(&mut self) -> SimulationTicket {
        self.next_seq += 1;
        SimulationTicket {
            seq: self.next_seq,
            building_id: self.building_id(),
            overlay: *self.overlay.values(),
        }
    }

    /// Restore the overlay to the loaded averages and snapshot it for the
    /// follow-up simulate that re-scores the unchanged building.
    pub fn begin_reset(&mut self) -> SimulationTicket {
        self.overlay.reset_to(&self.record.averages);
        self.simulated = false;
        self.phase = SimulationPhase::Baseline;
        self.begin_simulate()
    }

    /// Apply the backend outcome of a submission.
    ///
    /// On failure nothing displayed changes and the message becomes the
    /// current warning. A success older than the last applied one is dropped.
    pub fn complete_simulate(
        &mut self,
        ticket: &SimulationTicket,
        outcome: Result<SimulationResult, GatewayError>,
    ) -> SimulationOutcome {
        if self.last_applied_seq.is_some_and(|seq| ticket.seq < seq) {
            debug!(
                "Dropping stale simulation #{} for building {}",
                ticket.seq, ticket.building_id
            );
            return SimulationOutcome::Stale;
        }

        match outcome {
            Ok(result) => {
                self.result = result;
                self.simulated = true;
                self.warning = None;
                self.last_applied_seq = Some(ticket.seq);
                self.phase = if self.overlay.matches(&ticket.overlay) {
                    SimulationPhase::Simulated
                } else {
                    SimulationPhase::Edited
                };
                SimulationOutcome::Applied(result)
            }
            Err(err) => {
                warn!(
                    "Simulation #{} for building {} failed: {}",
                    ticket.seq, ticket.building_id, err
                );
                let message = format!("Failed to simulate changes: {}", err.user_message());
                self.warning = Some(message.clone());
                SimulationOutcome::Failed(message)
            }
        }
    }

    pub fn dismiss_warning(&mut self) {
        self.warning = None;
    }

    pub fn toggle_view(&mut self) -> ActiveView {
        self.active_view = self.active_view.toggled();
        self.active_view
    }

    /// Local-only edit of the details tab.
    pub fn update_details(&mut self, update: DetailsUpdate) {
        self.details.apply(update);
    }
}
