//! Remote data gateway for the two backend services.
//!
//! The dashboard computes nothing itself: averages, trends, scores and costs
//! all come from external services. This module abstracts those calls behind
//! the [`DashboardGateway`] trait so the service layer can run against the
//! real HTTP services or an in-memory stand-in.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services/) - load, simulate, compose    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  DashboardGateway trait                                  │
//! └─────────┬───────────────────────────────────┬───────────┘
//!           │                                   │
//!   ┌───────▼────────┐                  ┌───────▼────────┐
//!   │  HttpGateway   │                  │  LocalGateway  │
//!   │  (reqwest)     │                  │  (in-memory)   │
//!   └────────────────┘                  └────────────────┘
//! ```
//!
//! Two logical backends are addressed, each through one configurable base
//! URL: the buildings service (roster, averages, trends, histogram) and the
//! sustainability service (baseline score and simulation).

pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod local;

pub use config::{BackendSettings, DashboardConfig, GatewaySettings};
pub use error::{ErrorContext, GatewayError, GatewayResult};
pub use factory::{GatewayFactory, GatewayType};
pub use http::HttpGateway;
pub use local::LocalGateway;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::BuildingId;
use crate::models::{
    BuildingAverageRecord, BuildingSummary, HistogramBucket, MetricValues, SimulationResult,
    SustainabilityBaseline, TrendRecord, TrendSeries,
};

/// Which upstream service answers an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Buildings,
    Sustainability,
}

/// Logical endpoints consumed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Roster,
    Average,
    Trend(TrendSeries),
    EnergyVsOccupancy,
    Sustainability,
    Simulate,
}

impl Endpoint {
    /// Stable name used in logs and error contexts.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Roster => "buildings",
            Endpoint::Average => "average",
            Endpoint::Trend(series) => series.endpoint_name(),
            Endpoint::EnergyVsOccupancy => "energy_vs_occupancy",
            Endpoint::Sustainability => "sustainability",
            Endpoint::Simulate => "simulate",
        }
    }

    /// Human wording for user-facing messages.
    pub fn description(self) -> &'static str {
        match self {
            Endpoint::Roster => "buildings data",
            Endpoint::Average => "data",
            Endpoint::Trend(TrendSeries::Energy) => "energy trends",
            Endpoint::Trend(TrendSeries::Occupancy) => "occupancy trends",
            Endpoint::Trend(TrendSeries::Carbon) => "carbon emissions trends",
            Endpoint::Trend(TrendSeries::Hvac) => "HVAC usage trends",
            Endpoint::Trend(TrendSeries::Water) => "water usage trends",
            Endpoint::EnergyVsOccupancy => "energy vs occupancy data",
            Endpoint::Sustainability => "sustainability data",
            Endpoint::Simulate => "simulated sustainability score",
        }
    }

    pub fn backend(self) -> Backend {
        match self {
            Endpoint::Sustainability | Endpoint::Simulate => Backend::Sustainability,
            _ => Backend::Buildings,
        }
    }

    /// Request path relative to the backend's base URL.
    pub fn path(self, id: Option<BuildingId>) -> String {
        let id = id.map(|i| i.to_string()).unwrap_or_default();
        match self {
            Endpoint::Roster => "/buildings".to_string(),
            Endpoint::Average => format!("/buildings/{}/average", id),
            Endpoint::Trend(series) => format!("/graphs/{}/{}", series.endpoint_name(), id),
            Endpoint::EnergyVsOccupancy => format!("/graphs/energy_vs_occupancy/{}", id),
            Endpoint::Sustainability => format!("/buildings/{}/sustainability", id),
            Endpoint::Simulate => format!("/{}/sustainability", id),
        }
    }
}

impl Serialize for Endpoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Typed access to every remote call the dashboard makes.
///
/// Implementations perform exactly one attempt per call; retries are not
/// part of the contract.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    /// `GET /buildings`
    async fn list_buildings(&self) -> GatewayResult<Vec<BuildingSummary>>;

    /// `GET /buildings/{id}/average`
    async fn fetch_average(&self, id: BuildingId) -> GatewayResult<BuildingAverageRecord>;

    /// `GET /graphs/<series>_trends/{id}`
    async fn fetch_trend(&self, id: BuildingId, series: TrendSeries)
        -> GatewayResult<Vec<TrendRecord>>;

    /// `GET /graphs/energy_vs_occupancy/{id}`
    async fn fetch_energy_vs_occupancy(&self, id: BuildingId)
        -> GatewayResult<Vec<HistogramBucket>>;

    /// `GET /buildings/{id}/sustainability`
    async fn fetch_sustainability(&self, id: BuildingId) -> GatewayResult<SustainabilityBaseline>;

    /// `POST /{id}/sustainability` with the six-metric overlay as body.
    async fn simulate(&self, id: BuildingId, overlay: &MetricValues)
        -> GatewayResult<SimulationResult>;

    /// Whether both backends answer at all.
    async fn health_check(&self) -> GatewayResult<bool>;
}
