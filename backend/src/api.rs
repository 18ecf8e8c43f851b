//! Public API surface for the dashboard crate.
//!
//! This file consolidates the identifier and DTO types shared by the gateway,
//! the service layer and the HTTP API. All types derive Serialize/Deserialize
//! for JSON serialization.

pub use crate::models::building::{BuildingAverageRecord, BuildingDetails, BuildingSummary, DetailsUpdate};
pub use crate::models::metrics::{Metric, MetricOverlay, MetricValues, OverlayError};
pub use crate::models::sustainability::{AnomalyLevel, SimulationResult, SustainabilityBaseline};
pub use crate::models::trends::{
    HistogramBucket, HistogramPoint, TrendPoint, TrendRecord, TrendSeries,
};
pub use crate::services::simulation::{ActiveView, SimulationPhase, SimulationTicket};
pub use crate::services::view::{
    BarChart, BuildingDetailView, BuildingHeader, GaugeView, MetricRow, RosterEntry,
    RosterView, ScatterChart, ScoreCard, SliderEditor, TrendCharts,
};

crate::define_positive_id!(BuildingId);
