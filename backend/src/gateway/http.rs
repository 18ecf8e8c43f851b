//! HTTP gateway talking to the buildings and sustainability services.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::config::BackendSettings;
use super::error::{ErrorContext, GatewayError, GatewayResult};
use super::{Backend, DashboardGateway, Endpoint};
use crate::api::BuildingId;
use crate::models::{
    BuildingAverageRecord, BuildingSummary, HistogramBucket, MetricValues, RawSimulationResponse,
    SimulationResult, SustainabilityBaseline, TrendRecord, TrendSeries,
};

const DATE_FIELD: &str = "Date";

/// Gateway backed by `reqwest`.
///
/// One attempt per call. A non-2xx status or a transport failure becomes
/// [`GatewayError::FetchError`]; a body that does not decode into the
/// documented shape becomes [`GatewayError::MalformedResponse`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    buildings_url: Url,
    sustainability_url: Url,
}

impl HttpGateway {
    pub fn new(settings: &BackendSettings) -> GatewayResult<Self> {
        let parse = |name: &str, raw: &str| {
            Url::parse(raw).map_err(|e| {
                GatewayError::configuration(format!("Invalid {} {:?}: {}", name, raw, e))
            })
        };
        let buildings_url = parse("buildings_url", &settings.buildings_url)?;
        let sustainability_url = parse("sustainability_url", &settings.sustainability_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            GatewayError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            buildings_url,
            sustainability_url,
        })
    }

    fn base(&self, backend: Backend) -> &Url {
        match backend {
            Backend::Buildings => &self.buildings_url,
            Backend::Sustainability => &self.sustainability_url,
        }
    }

    fn url(&self, endpoint: Endpoint, id: Option<BuildingId>) -> String {
        let base = self.base(endpoint.backend()).as_str().trim_end_matches('/');
        format!("{}{}", base, endpoint.path(id))
    }

    /// Send the request and return the body of a 2xx response.
    async fn send(
        &self,
        endpoint: Endpoint,
        id: Option<BuildingId>,
        request: RequestBuilder,
    ) -> GatewayResult<Vec<u8>> {
        let context = || ErrorContext::new(endpoint).with_building(id);

        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("request timed out: {}", e)
            } else {
                format!("request failed: {}", e)
            };
            GatewayError::fetch(message, context())
        })?;

        let status = response.status();
        debug!("{} {} -> {}", endpoint.name(), response.url(), status);
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unexpected status");
            return Err(GatewayError::fetch(
                format!("HTTP {} {}", status.as_u16(), reason),
                context().with_status(status.as_u16()),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            GatewayError::fetch(format!("failed to read response body: {}", e), context())
        })?;
        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        id: Option<BuildingId>,
    ) -> GatewayResult<T> {
        let request = self.client.get(self.url(endpoint, id));
        let body = self.send(endpoint, id, request).await?;
        decode(endpoint, id, &body)
    }
}

/// Decode a JSON body, reporting the failing path on error.
fn decode<T: DeserializeOwned>(
    endpoint: Endpoint,
    id: Option<BuildingId>,
    body: &[u8],
) -> GatewayResult<T> {
    let deserializer = &mut serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        let path = e.path().to_string();
        GatewayError::malformed(
            e.into_inner().to_string(),
            ErrorContext::new(endpoint)
                .with_building(id)
                .with_details(format!("path={}", path)),
        )
    })
}

/// Resolve the `Date` and metric fields of each raw trend record.
fn extract_trend_records(
    series: TrendSeries,
    id: BuildingId,
    rows: Vec<Map<String, Value>>,
) -> GatewayResult<Vec<TrendRecord>> {
    let field = series.value_field();
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let malformed = |what: String| {
                GatewayError::malformed(
                    what,
                    ErrorContext::new(Endpoint::Trend(series))
                        .with_building(Some(id))
                        .with_details(format!("record={}", index)),
                )
            };
            let date = row
                .get(DATE_FIELD)
                .and_then(Value::as_str)
                .ok_or_else(|| malformed(format!("missing string field {:?}", DATE_FIELD)))?;
            let value = row
                .get(field)
                .and_then(Value::as_f64)
                .ok_or_else(|| malformed(format!("missing numeric field {:?}", field)))?;
            Ok(TrendRecord {
                date: date.to_string(),
                value,
            })
        })
        .collect()
}

#[async_trait]
impl DashboardGateway for HttpGateway {
    async fn list_buildings(&self) -> GatewayResult<Vec<BuildingSummary>> {
        self.get_json(Endpoint::Roster, None).await
    }

    async fn fetch_average(&self, id: BuildingId) -> GatewayResult<BuildingAverageRecord> {
        let record: BuildingAverageRecord = self.get_json(Endpoint::Average, Some(id)).await?;
        record.averages.validate_measured().map_err(|message| {
            GatewayError::malformed(message, ErrorContext::new(Endpoint::Average).with_building(Some(id)))
        })?;
        Ok(record)
    }

    async fn fetch_trend(
        &self,
        id: BuildingId,
        series: TrendSeries,
    ) -> GatewayResult<Vec<TrendRecord>> {
        let rows: Vec<Map<String, Value>> =
            self.get_json(Endpoint::Trend(series), Some(id)).await?;
        extract_trend_records(series, id, rows)
    }

    async fn fetch_energy_vs_occupancy(
        &self,
        id: BuildingId,
    ) -> GatewayResult<Vec<HistogramBucket>> {
        self.get_json(Endpoint::EnergyVsOccupancy, Some(id)).await
    }

    async fn fetch_sustainability(&self, id: BuildingId) -> GatewayResult<SustainabilityBaseline> {
        self.get_json(Endpoint::Sustainability, Some(id)).await
    }

    async fn simulate(
        &self,
        id: BuildingId,
        overlay: &MetricValues,
    ) -> GatewayResult<SimulationResult> {
        let endpoint = Endpoint::Simulate;
        let request = self.client.post(self.url(endpoint, Some(id))).json(overlay);
        let body = self.send(endpoint, Some(id), request).await?;
        let raw: RawSimulationResponse = decode(endpoint, Some(id), &body)?;
        raw.into_result().map_err(|field| {
            GatewayError::malformed(
                format!("missing required field {:?}", field),
                ErrorContext::new(endpoint).with_building(Some(id)),
            )
        })
    }

    async fn health_check(&self) -> GatewayResult<bool> {
        for backend in [Backend::Buildings, Backend::Sustainability] {
            if self.client.get(self.base(backend).clone()).send().await.is_err() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
