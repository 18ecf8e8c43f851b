use serde::{Deserialize, Serialize};

use crate::models::metrics::Metric;

/// The five per-metric time series served by the buildings service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSeries {
    Energy,
    Occupancy,
    Carbon,
    Hvac,
    Water,
}

impl TrendSeries {
    pub const ALL: [TrendSeries; 5] = [
        TrendSeries::Energy,
        TrendSeries::Occupancy,
        TrendSeries::Carbon,
        TrendSeries::Hvac,
        TrendSeries::Water,
    ];

    pub fn metric(self) -> Metric {
        match self {
            TrendSeries::Energy => Metric::Energy,
            TrendSeries::Occupancy => Metric::Occupancy,
            TrendSeries::Carbon => Metric::Carbon,
            TrendSeries::Hvac => Metric::Hvac,
            TrendSeries::Water => Metric::Water,
        }
    }

    /// Field holding the value in each raw record.
    pub fn value_field(self) -> &'static str {
        self.metric().label()
    }

    /// Last path segment before the building id, e.g. `energy_trends`.
    pub fn endpoint_name(self) -> &'static str {
        match self {
            TrendSeries::Energy => "energy_trends",
            TrendSeries::Occupancy => "occupancy_trends",
            TrendSeries::Carbon => "carbon_emissions_trends",
            TrendSeries::Hvac => "hvac_usage_trends",
            TrendSeries::Water => "water_usage_trends",
        }
    }
}

/// One raw `{Date, "<Metric> (<Unit>)"}` record, value field already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub date: String,
    pub value: f64,
}

/// Chart coordinate: epoch milliseconds against a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub x: i64,
    pub y: f64,
}

/// Energy-vs-occupancy bucket as served (`range` is `"<low>-<high>"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    pub range: String,
    pub total_energy: f64,
    #[serde(default)]
    pub count: u64,
}

impl HistogramBucket {
    /// `totalEnergy / max(count, 1)`; an empty bucket averages over one.
    pub fn average_energy(&self) -> f64 {
        self.total_energy / self.count.max(1) as f64
    }
}

/// Normalised histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramPoint {
    /// Lower bound of the occupancy range.
    pub x: i64,
    /// Total energy in the bucket.
    pub y: f64,
    pub range: String,
    pub count: u64,
    pub average_energy: f64,
}
