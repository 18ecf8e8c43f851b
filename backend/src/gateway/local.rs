//! In-memory gateway implementation.
//!
//! Holds canned backend responses in memory, suitable for unit tests and
//! local development. Individual endpoints can be made to fail so that error
//! paths can be exercised without a network.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use super::error::{ErrorContext, GatewayError, GatewayResult};
use super::{DashboardGateway, Endpoint};
use crate::api::BuildingId;
use crate::models::{
    BuildingAverageRecord, BuildingSummary, HistogramBucket, MetricValues, SimulationResult,
    SustainabilityBaseline, TrendRecord, TrendSeries,
};

/// Canned responses for a single building.
#[derive(Debug, Clone, Default)]
pub struct LocalBuilding {
    pub average: Option<BuildingAverageRecord>,
    pub trends: HashMap<TrendSeries, Vec<TrendRecord>>,
    pub histogram: Vec<HistogramBucket>,
    pub sustainability: Option<SustainabilityBaseline>,
    /// Responses handed out by successive simulate calls; the last one repeats.
    pub simulation_results: VecDeque<GatewayResult<SimulationResult>>,
}

/// Most recent calls and submissions kept for inspection.
pub const RECORD_LIMIT: usize = 1024;

#[derive(Default)]
struct LocalData {
    roster: Vec<BuildingSummary>,
    buildings: HashMap<BuildingId, LocalBuilding>,
    failing: HashSet<Endpoint>,
    submissions: VecDeque<(BuildingId, MetricValues)>,
    calls: VecDeque<Endpoint>,
}

fn push_capped<T>(log: &mut VecDeque<T>, item: T) {
    if log.len() == RECORD_LIMIT {
        log.pop_front();
    }
    log.push_back(item);
}

/// In-memory gateway.
///
/// # Example
/// ```ignore
/// let gateway = LocalGateway::new();
/// gateway.insert_average(record);
/// gateway.push_simulation_result(id, Ok(result));
/// gateway.fail_endpoint(Endpoint::Trend(TrendSeries::Carbon));
/// ```
#[derive(Clone, Default)]
pub struct LocalGateway {
    data: Arc<RwLock<LocalData>>,
}

impl LocalGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_roster(&self, roster: Vec<BuildingSummary>) {
        self.data.write().roster = roster;
    }

    pub fn insert_average(&self, record: BuildingAverageRecord) {
        let id = record.building_id;
        self.data.write().buildings.entry(id).or_default().average = Some(record);
    }

    pub fn insert_trend(&self, id: BuildingId, series: TrendSeries, records: Vec<TrendRecord>) {
        self.data
            .write()
            .buildings
            .entry(id)
            .or_default()
            .trends
            .insert(series, records);
    }

    pub fn insert_histogram(&self, id: BuildingId, buckets: Vec<HistogramBucket>) {
        self.data.write().buildings.entry(id).or_default().histogram = buckets;
    }

    pub fn insert_sustainability(&self, id: BuildingId, baseline: SustainabilityBaseline) {
        self.data.write().buildings.entry(id).or_default().sustainability = Some(baseline);
    }

    /// Queue the response for the next simulate call on `id`.
    pub fn push_simulation_result(&self, id: BuildingId, result: GatewayResult<SimulationResult>) {
        self.data
            .write()
            .buildings
            .entry(id)
            .or_default()
            .simulation_results
            .push_back(result);
    }

    /// Make every call to `endpoint` fail with an HTTP 500 style error.
    pub fn fail_endpoint(&self, endpoint: Endpoint) {
        self.data.write().failing.insert(endpoint);
    }

    pub fn restore_endpoint(&self, endpoint: Endpoint) {
        self.data.write().failing.remove(&endpoint);
    }

    /// Overlays received by `simulate`, oldest first, at most
    /// [`RECORD_LIMIT`] entries.
    pub fn submissions(&self) -> Vec<(BuildingId, MetricValues)> {
        self.data.read().submissions.iter().copied().collect()
    }

    /// Endpoints called so far, oldest first, at most [`RECORD_LIMIT`] entries.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.data.read().calls.iter().copied().collect()
    }

    /// Record the call and apply failure injection.
    fn enter(&self, endpoint: Endpoint, id: Option<BuildingId>) -> GatewayResult<()> {
        let mut data = self.data.write();
        push_capped(&mut data.calls, endpoint);
        if data.failing.contains(&endpoint) {
            return Err(GatewayError::fetch(
                "HTTP 500 Internal Server Error",
                ErrorContext::new(endpoint).with_building(id).with_status(500),
            ));
        }
        Ok(())
    }

    fn building<T>(
        &self,
        endpoint: Endpoint,
        id: BuildingId,
        pick: impl FnOnce(&LocalBuilding) -> Option<T>,
    ) -> GatewayResult<T> {
        self.data
            .read()
            .buildings
            .get(&id)
            .and_then(pick)
            .ok_or_else(|| {
                GatewayError::fetch(
                    "HTTP 404 Not Found",
                    ErrorContext::new(endpoint).with_building(Some(id)).with_status(404),
                )
            })
    }
}

#[async_trait]
impl DashboardGateway for LocalGateway {
    async fn list_buildings(&self) -> GatewayResult<Vec<BuildingSummary>> {
        self.enter(Endpoint::Roster, None)?;
        Ok(self.data.read().roster.clone())
    }

    async fn fetch_average(&self, id: BuildingId) -> GatewayResult<BuildingAverageRecord> {
        let endpoint = Endpoint::Average;
        self.enter(endpoint, Some(id))?;
        self.building(endpoint, id, |b| b.average.clone())
    }

    async fn fetch_trend(
        &self,
        id: BuildingId,
        series: TrendSeries,
    ) -> GatewayResult<Vec<TrendRecord>> {
        let endpoint = Endpoint::Trend(series);
        self.enter(endpoint, Some(id))?;
        self.building(endpoint, id, |b| Some(b.trends.get(&series).cloned().unwrap_or_default()))
    }

    async fn fetch_energy_vs_occupancy(
        &self,
        id: BuildingId,
    ) -> GatewayResult<Vec<HistogramBucket>> {
        let endpoint = Endpoint::EnergyVsOccupancy;
        self.enter(endpoint, Some(id))?;
        self.building(endpoint, id, |b| Some(b.histogram.clone()))
    }

    async fn fetch_sustainability(&self, id: BuildingId) -> GatewayResult<SustainabilityBaseline> {
        let endpoint = Endpoint::Sustainability;
        self.enter(endpoint, Some(id))?;
        self.building(endpoint, id, |b| b.sustainability.clone())
    }

    async fn simulate(
        &self,
        id: BuildingId,
        overlay: &MetricValues,
    ) -> GatewayResult<SimulationResult> {
        let endpoint = Endpoint::Simulate;
        self.enter(endpoint, Some(id))?;

        let mut data = self.data.write();
        push_capped(&mut data.submissions, (id, *overlay));
        let building = data.buildings.get_mut(&id).ok_or_else(|| {
            GatewayError::fetch(
                "HTTP 404 Not Found",
                ErrorContext::new(endpoint).with_building(Some(id)).with_status(404),
            )
        })?;
        let queued = if building.simulation_results.len() > 1 {
            building.simulation_results.pop_front()
        } else {
            building.simulation_results.front().cloned()
        };
        queued.unwrap_or_else(|| {
            Err(GatewayError::malformed(
                "no simulation result configured",
                ErrorContext::new(endpoint).with_building(Some(id)),
            ))
        })
    }

    async fn health_check(&self) -> GatewayResult<bool> {
        Ok(true)
    }
}
