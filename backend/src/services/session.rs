//! Async driver for one building's detail page.
//!
//! Binds a [`SimulationState`] to a gateway. The state lock is only taken for
//! the synchronous begin/complete steps; gateway calls run without it, so
//! edits stay possible while a simulation is in flight.

use log::info;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::api::BuildingId;
use crate::gateway::{DashboardGateway, GatewayResult};
use crate::models::{DetailsUpdate, Metric, OverlayError};
use crate::services::loader::{load_building_detail, BuildingDetailData, NormalizedTrends};
use crate::services::simulation::{
    ActiveView, SimulationOutcome, SimulationState, SimulationTicket,
};
use crate::services::view::{compose_detail, BuildingDetailView};

/// Loaded detail page plus its editable state.
#[derive(Clone)]
pub struct BuildingSession {
    gateway: Arc<dyn DashboardGateway>,
    state: Arc<Mutex<SimulationState>>,
    trends: Arc<NormalizedTrends>,
}

impl BuildingSession {
    pub fn new(gateway: Arc<dyn DashboardGateway>, data: BuildingDetailData) -> Self {
        let BuildingDetailData {
            record,
            baseline,
            trends,
        } = data;
        Self {
            gateway,
            state: Arc::new(Mutex::new(SimulationState::new(record, baseline))),
            trends: Arc::new(trends),
        }
    }

    /// Run the all-or-nothing detail load and wrap the result.
    pub async fn open(gateway: Arc<dyn DashboardGateway>, id: BuildingId) -> GatewayResult<Self> {
        let data = load_building_detail(gateway.as_ref(), id).await?;
        Ok(Self::new(gateway, data))
    }

    pub fn building_id(&self) -> BuildingId {
        self.state.lock().building_id()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SimulationState {
        self.state.lock().clone()
    }

    pub fn view(&self) -> BuildingDetailView {
        compose_detail(&self.state.lock(), &self.trends)
    }

    pub fn edit(&self, metric: Metric, value: f64) -> Result<(), OverlayError> {
        self.state.lock().edit(metric, value)
    }

    pub fn toggle_focus(&self, metric: Metric) -> Option<Metric> {
        self.state.lock().toggle_focus(metric)
    }

    pub fn dismiss_warning(&self) {
        self.state.lock().dismiss_warning();
    }

    pub fn toggle_view(&self) -> ActiveView {
        self.state.lock().toggle_view()
    }

    pub fn update_details(&self, update: DetailsUpdate) {
        self.state.lock().update_details(update);
    }

    /// Submit the current overlay and apply the answer.
    pub async fn simulate(&self) -> SimulationOutcome {
        let ticket = self.state.lock().begin_simulate();
        self.submit(ticket).await
    }

    /// Restore the averages, then re-score them.
    pub async fn reset(&self) -> SimulationOutcome {
        let ticket = self.state.lock().begin_reset();
        info!("Reset overlay for building {}", ticket.building_id);
        self.submit(ticket).await
    }

    async fn submit(&self, ticket: SimulationTicket) -> SimulationOutcome {
        let outcome = self
            .gateway
            .simulate(ticket.building_id, &ticket.overlay)
            .await;
        self.state.lock().complete_simulate(&ticket, outcome)
    }
}
