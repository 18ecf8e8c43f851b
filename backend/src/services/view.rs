//! View composition: turns a simulation state plus normalised trends into
//! serialisable structures a thin client renders as-is.
//!
//! Nothing here fetches or computes domain values; every number shown was
//! produced by a backend service and is only formatted.

use serde::{Deserialize, Serialize};

use crate::api::BuildingId;
use crate::models::{
    AnomalyLevel, BuildingDetails, BuildingSummary, HistogramPoint, Metric, TrendPoint,
    TrendSeries,
};
use crate::services::loader::NormalizedTrends;
use crate::services::simulation::{ActiveView, SimulationPhase, SimulationState};

/// Title of the energy-by-occupancy bar chart.
pub const HISTOGRAM_TITLE: &str = "Energy Consumption by Occupancy Ranges";

const HISTOGRAM_COLOR: &str = "#8884d8";
const GAUGE_MAX: f64 = 100.0;

/// Identity block at the top of the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingHeader {
    pub building_id: BuildingId,
    pub name: String,
    pub location: String,
    pub description: String,
}

/// Inline editor for the focused metric row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderEditor {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

/// One of the six editable metric rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: Metric,
    pub label: String,
    /// Current overlay value, two decimals.
    pub value: String,
    /// Loaded average, two decimals.
    pub baseline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<SliderEditor>,
}

/// Circular sustainability gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeView {
    /// Fill value on a 0-100 scale.
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub title: String,
    pub score: Option<String>,
    pub anomaly: Option<AnomalyLevel>,
    pub is_normal: bool,
}

/// One scatter plot of a metric over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub series: TrendSeries,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub color: String,
    pub bars: Vec<HistogramPoint>,
}

/// The six charts of the detail page. Each one renders independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendCharts {
    pub scatter: Vec<ScatterChart>,
    pub histogram: BarChart,
}

/// Everything the detail page shows for one building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDetailView {
    pub header: BuildingHeader,
    pub phase: SimulationPhase,
    /// Drives the "Simulated Data" badge.
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub active_view: ActiveView,
    pub metrics: Vec<MetricRow>,
    pub gauge: GaugeView,
    pub total_cost: String,
    pub score_cards: Vec<ScoreCard>,
    pub recommendations: String,
    pub charts: TrendCharts,
    pub details: BuildingDetails,
}

/// Sidebar entry linking to a building page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub building_id: BuildingId,
    pub name: String,
    pub location: String,
    pub href: String,
}

/// Landing page: sidebar list plus one map marker per building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterView {
    pub buildings: Vec<RosterEntry>,
    /// `[latitude, longitude]` in roster order.
    pub markers: Vec<[f64; 2]>,
}

fn two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

fn chart_title(series: TrendSeries) -> &'static str {
    match series {
        TrendSeries::Energy => "Energy Trends",
        TrendSeries::Occupancy => "Occupancy Trends",
        TrendSeries::Carbon => "Carbon Emissions Trends",
        TrendSeries::Hvac => "HVAC Usage Trends",
        TrendSeries::Water => "Water Usage Trends",
    }
}

fn chart_color(series: TrendSeries) -> &'static str {
    match series {
        TrendSeries::Energy => "#8884d8",
        TrendSeries::Occupancy => "#82ca9d",
        TrendSeries::Carbon => "#FF6347",
        TrendSeries::Hvac => "#4B0082",
        TrendSeries::Water => "#00BFFF",
    }
}

/// Gauge for a sustainability score. The fill is clamped to the 0-100 scale,
/// the label shows the score as received.
pub fn gauge(score: f64) -> GaugeView {
    GaugeView {
        value: score.clamp(0.0, GAUGE_MAX),
        label: format!("{:.2}%", score),
    }
}

pub fn metric_rows(state: &SimulationState) -> Vec<MetricRow> {
    Metric::ALL
        .into_iter()
        .map(|metric| {
            let value = state.overlay().get(metric);
            MetricRow {
                metric,
                label: metric.label().to_string(),
                value: two_decimals(value),
                baseline: two_decimals(state.averages().get(metric)),
                editor: (state.focused() == Some(metric)).then(|| SliderEditor {
                    min: 0.0,
                    max: metric.max(),
                    value,
                }),
            }
        })
        .collect()
}

fn score_card(title: &str, score: Option<f64>, anomaly: Option<AnomalyLevel>) -> ScoreCard {
    ScoreCard {
        title: title.to_string(),
        score: score.map(|s| format!("{:.1}", s)),
        anomaly,
        is_normal: anomaly.is_some_and(AnomalyLevel::is_normal),
    }
}

pub fn trend_charts(trends: &NormalizedTrends) -> TrendCharts {
    let scatter = TrendSeries::ALL
        .into_iter()
        .map(|series| ScatterChart {
            series,
            title: chart_title(series).to_string(),
            x_label: "Date".to_string(),
            y_label: series.metric().label().to_string(),
            color: chart_color(series).to_string(),
            points: trends.series(series).to_vec(),
        })
        .collect();

    TrendCharts {
        scatter,
        histogram: BarChart {
            title: HISTOGRAM_TITLE.to_string(),
            color: HISTOGRAM_COLOR.to_string(),
            bars: trends.histogram.clone(),
        },
    }
}

/// Compose the full detail page.
pub fn compose_detail(state: &SimulationState, trends: &NormalizedTrends) -> BuildingDetailView {
    let record = state.record();
    let baseline = state.baseline();
    let result = state.result();

    BuildingDetailView {
        header: BuildingHeader {
            building_id: record.building_id,
            name: record.name.clone(),
            location: record.location.clone(),
            description: record.description.clone(),
        },
        phase: state.phase(),
        simulated: state.simulated(),
        warning: state.warning().map(str::to_string),
        active_view: state.active_view(),
        metrics: metric_rows(state),
        gauge: gauge(result.sustainability_score),
        total_cost: two_decimals(result.total_cost),
        score_cards: vec![
            score_card("Carbon Score", baseline.carbon_score, baseline.carbon_anomaly),
            score_card("Water Score", baseline.water_score, baseline.water_anomaly),
            score_card("Energy Score", baseline.energy_score, baseline.energy_anomaly),
        ],
        recommendations: baseline.recommendations_text().to_string(),
        charts: trend_charts(trends),
        details: state.details().clone(),
    }
}

/// Compose the landing page from the roster.
pub fn compose_roster(buildings: &[BuildingSummary]) -> RosterView {
    RosterView {
        buildings: buildings
            .iter()
            .map(|b| RosterEntry {
                building_id: b.building_id,
                name: b.name.clone(),
                location: b.location.clone(),
                href: format!("/buildings/{}", b.building_id),
            })
            .collect(),
        markers: buildings.iter().map(|b| [b.latitude, b.longitude]).collect(),
    }
}
