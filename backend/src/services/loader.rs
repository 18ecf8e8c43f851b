//! Page loads against the gateway.
//!
//! The detail load issues all eight reads concurrently and is all-or-nothing:
//! the first failure aborts the load and no partial page is produced.

use futures::try_join;
use log::{debug, info};
use std::collections::HashMap;

use crate::api::BuildingId;
use crate::gateway::{DashboardGateway, Endpoint, ErrorContext, GatewayError, GatewayResult};
use crate::models::{
    BuildingAverageRecord, BuildingSummary, HistogramPoint, SustainabilityBaseline, TrendPoint,
    TrendSeries,
};
use crate::services::trends::{normalize_histogram, normalize_trend, TrendError};

/// The five trend series and the histogram, already in chart coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTrends {
    series: HashMap<TrendSeries, Vec<TrendPoint>>,
    pub histogram: Vec<HistogramPoint>,
}

impl NormalizedTrends {
    pub fn new(series: HashMap<TrendSeries, Vec<TrendPoint>>, histogram: Vec<HistogramPoint>) -> Self {
        Self { series, histogram }
    }

    /// Points of one series; empty when the backend returned none.
    pub fn series(&self, series: TrendSeries) -> &[TrendPoint] {
        self.series.get(&series).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Everything a detail page needs, fetched in one load.
#[derive(Debug, Clone)]
pub struct BuildingDetailData {
    pub record: BuildingAverageRecord,
    pub baseline: SustainabilityBaseline,
    pub trends: NormalizedTrends,
}

fn trend_failure(endpoint: Endpoint, id: BuildingId, err: TrendError) -> GatewayError {
    GatewayError::malformed(
        err.to_string(),
        ErrorContext::new(endpoint).with_building(Some(id)),
    )
}

async fn load_series(
    gateway: &dyn DashboardGateway,
    id: BuildingId,
    series: TrendSeries,
) -> GatewayResult<Vec<TrendPoint>> {
    let records = gateway.fetch_trend(id, series).await?;
    normalize_trend(&records).map_err(|e| trend_failure(Endpoint::Trend(series), id, e))
}

async fn load_histogram(
    gateway: &dyn DashboardGateway,
    id: BuildingId,
) -> GatewayResult<Vec<HistogramPoint>> {
    let buckets = gateway.fetch_energy_vs_occupancy(id).await?;
    normalize_histogram(&buckets).map_err(|e| trend_failure(Endpoint::EnergyVsOccupancy, id, e))
}

/// Load the detail page for `id`.
///
/// Fetches the averages, the baseline sustainability report, the five trend
/// series and the histogram concurrently. Any fetch failure, malformed body or
/// unnormalisable series fails the whole load.
pub async fn load_building_detail(
    gateway: &dyn DashboardGateway,
    id: BuildingId,
) -> GatewayResult<BuildingDetailData> {
    debug!("Loading detail page for building {}", id);

    let (record, baseline, energy, occupancy, carbon, hvac, water, histogram) = try_join!(
        gateway.fetch_average(id),
        gateway.fetch_sustainability(id),
        load_series(gateway, id, TrendSeries::Energy),
        load_series(gateway, id, TrendSeries::Occupancy),
        load_series(gateway, id, TrendSeries::Carbon),
        load_series(gateway, id, TrendSeries::Hvac),
        load_series(gateway, id, TrendSeries::Water),
        load_histogram(gateway, id),
    )?;

    if record.building_id != id {
        return Err(GatewayError::malformed(
            format!("record is for building {}", record.building_id),
            ErrorContext::new(Endpoint::Average).with_building(Some(id)),
        ));
    }

    let series = HashMap::from([
        (TrendSeries::Energy, energy),
        (TrendSeries::Occupancy, occupancy),
        (TrendSeries::Carbon, carbon),
        (TrendSeries::Hvac, hvac),
        (TrendSeries::Water, water),
    ]);

    info!(
        "Loaded building {} ({}): {} histogram buckets",
        id,
        record.name,
        histogram.len()
    );

    Ok(BuildingDetailData {
        record,
        baseline,
        trends: NormalizedTrends::new(series, histogram),
    })
}

/// Load the building roster for the landing page.
pub async fn load_roster(gateway: &dyn DashboardGateway) -> GatewayResult<Vec<BuildingSummary>> {
    let buildings = gateway.list_buildings().await?;
    info!("Loaded roster with {} buildings", buildings.len());
    Ok(buildings)
}
