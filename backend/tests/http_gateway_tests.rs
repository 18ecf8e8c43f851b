//! HttpGateway against in-process fake backends.

mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use sdash_rust::api::{BuildingId, Metric, MetricValues, TrendSeries};
use sdash_rust::gateway::{BackendSettings, DashboardGateway, Endpoint, GatewayError, HttpGateway};
use sdash_rust::services::load_building_detail;
use support::{base_url, spawn_fake_backend};

#[derive(Clone, Default)]
struct Fake {
    failing_series: Option<&'static str>,
    bad_date: bool,
    simulate_response: Value,
    submissions: Arc<Mutex<Vec<Value>>>,
}

fn series_label(name: &str) -> Option<&'static str> {
    TrendSeries::ALL
        .into_iter()
        .find(|s| s.endpoint_name() == name)
        .map(|s| s.value_field())
}

async fn roster() -> Json<Value> {
    Json(json!([
        {"Building ID": 1, "Building Name": "Lakeside", "Location": "Chicago",
         "Latitude": "41.8781", "Longitude": "-87.6298"},
        {"Building ID": 2, "Building Name": "Harbor", "Location": "Boston",
         "Latitude": 42.36, "Longitude": -71.06, "Description": "Office"}
    ]))
}

async fn average(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "Building ID": id,
        "Building Name": "Lakeside",
        "Location": "Chicago",
        "Description": "Mixed use",
        "Averages": {
            "Energy Consumption (kWh)": 450.5,
            "Occupancy (People)": 150.0,
            "Carbon Emissions (kg CO2)": 220.0,
            "HVAC Usage (Hours)": 10.0,
            "Renewable Energy Contribution (%)": 30.0,
            "Water Usage (Gallons)": 2500.0
        }
    }))
}

async fn graph(
    State(fake): State<Fake>,
    Path((name, _id)): Path<(String, i64)>,
) -> impl IntoResponse {
    if name == "energy_vs_occupancy" {
        return Json(json!([
            {"range": "500-1000", "totalEnergy": 9000.0, "count": 3},
            {"range": "1000-1500", "totalEnergy": 400.0}
        ]))
        .into_response();
    }
    if fake.failing_series == Some(name.as_str()) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let Some(label) = series_label(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let date = if fake.bad_date && name == "water_usage_trends" {
        "last tuesday"
    } else {
        "Mon, 01 Jan 2024 00:00:00 GMT"
    };
    Json(json!([
        {"Date": date, label: 1.5},
        {"Date": "Tue, 02 Jan 2024 00:00:00 GMT", label: 2.5}
    ]))
    .into_response()
}

async fn baseline(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({
        "Sustainability Score": 61.25,
        "Total Costs ($)": 75.5,
        "Carbon Score": 70.0,
        "Carbon Emissions (kg CO2) Anomaly": "Normal",
        "Recommendations": "Install LED lighting."
    }))
}

async fn simulate(
    State(fake): State<Fake>,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    fake.submissions.lock().unwrap().push(body);
    Json(fake.simulate_response.clone())
}

fn buildings_router(fake: Fake) -> Router {
    Router::new()
        .route("/buildings", get(roster))
        .route("/buildings/{id}/average", get(average))
        .route("/graphs/{name}/{id}", get(graph))
        .with_state(fake)
}

fn sustainability_router(fake: Fake) -> Router {
    Router::new()
        .route("/buildings/{id}/sustainability", get(baseline))
        .route("/{id}/sustainability", post(simulate))
        .with_state(fake)
}

async fn gateway_for(fake: Fake) -> HttpGateway {
    let buildings = spawn_fake_backend(buildings_router(fake.clone())).await;
    let sustainability = spawn_fake_backend(sustainability_router(fake)).await;
    HttpGateway::new(&BackendSettings {
        buildings_url: base_url(buildings),
        sustainability_url: base_url(sustainability),
        request_timeout_secs: 5,
    })
    .unwrap()
}

fn id(value: i64) -> BuildingId {
    BuildingId::new(value).unwrap()
}

#[tokio::test]
async fn roster_accepts_string_and_numeric_coordinates() {
    let gateway = gateway_for(Fake::default()).await;
    let roster = gateway.list_buildings().await.unwrap();

    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].latitude, 41.8781);
    assert_eq!(roster[0].longitude, -87.6298);
    assert_eq!(roster[1].description.as_deref(), Some("Office"));
}

#[tokio::test]
async fn detail_load_decodes_every_endpoint() {
    let gateway = gateway_for(Fake::default()).await;
    let data = load_building_detail(&gateway, id(12)).await.unwrap();

    assert_eq!(data.record.averages.energy, 450.5);
    // Above the slider range, kept as measured.
    assert_eq!(data.record.averages.water, 2500.0);
    assert_eq!(data.baseline.recommendations_text(), "Install LED lighting.");

    let energy = data.trends.series(TrendSeries::Energy);
    assert_eq!(energy.len(), 2);
    assert_eq!(energy[0].x, 1_704_067_200_000);
    assert_eq!(energy[0].y, 1.5);

    assert_eq!(data.trends.histogram[0].x, 500);
    assert_eq!(data.trends.histogram[1].count, 0);
    assert_eq!(data.trends.histogram[1].average_energy, 400.0);
}

#[tokio::test]
async fn failing_trend_endpoint_fails_load_with_context() {
    let fake = Fake {
        failing_series: Some("carbon_emissions_trends"),
        ..Fake::default()
    };
    let gateway = gateway_for(fake).await;

    let err = load_building_detail(&gateway, id(12)).await.unwrap_err();
    let context = err.context().unwrap();
    assert!(matches!(err, GatewayError::FetchError { .. }));
    assert_eq!(context.endpoint, Some(Endpoint::Trend(TrendSeries::Carbon)));
    assert_eq!(context.building_id, Some(id(12)));
    assert_eq!(context.status, Some(500));
    assert_eq!(
        err.user_message(),
        "Failed to fetch carbon emissions trends for Building ID 12"
    );
}

#[tokio::test]
async fn unparseable_date_fails_load_as_malformed() {
    let fake = Fake {
        bad_date: true,
        ..Fake::default()
    };
    let gateway = gateway_for(fake).await;

    let err = load_building_detail(&gateway, id(3)).await.unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.endpoint(), Some(Endpoint::Trend(TrendSeries::Water)));
}

#[tokio::test]
async fn simulate_posts_six_labelled_metrics() {
    let fake = Fake {
        simulate_response: json!({"Sustainability Score": 72.3, "Total Costs ($)": 1850.0}),
        ..Fake::default()
    };
    let submissions = fake.submissions.clone();
    let gateway = gateway_for(fake).await;

    let overlay = MetricValues {
        energy: 300.0,
        occupancy: 150.0,
        carbon: 220.0,
        hvac: 10.0,
        renewable: 30.0,
        water: 900.0,
    };
    let result = gateway.simulate(id(4), &overlay).await.unwrap();
    assert_eq!(result.sustainability_score, 72.3);
    assert_eq!(result.total_cost, 1850.0);

    let bodies = submissions.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let body = bodies[0].as_object().unwrap();
    assert_eq!(body.len(), 6);
    for metric in Metric::ALL {
        assert_eq!(body[metric.label()], json!(overlay.get(metric)));
    }
}

#[tokio::test]
async fn simulate_missing_cost_is_malformed() {
    let fake = Fake {
        simulate_response: json!({"Sustainability Score": 72.3}),
        ..Fake::default()
    };
    let gateway = gateway_for(fake).await;

    let err = gateway
        .simulate(id(4), &MetricValues::default())
        .await
        .unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("Total Costs ($)"), "{}", err);
}

#[tokio::test]
async fn unreachable_backend_is_fetch_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = HttpGateway::new(&BackendSettings {
        buildings_url: base_url(addr),
        sustainability_url: base_url(addr),
        request_timeout_secs: 5,
    })
    .unwrap();

    let err = gateway.list_buildings().await.unwrap_err();
    assert!(matches!(err, GatewayError::FetchError { .. }));
    assert_eq!(err.context().unwrap().status, None);
    assert!(!gateway.health_check().await.unwrap());
}

#[tokio::test]
async fn stalled_backend_times_out() {
    let router = Router::new().route(
        "/buildings",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!([]))
        }),
    );
    let addr = spawn_fake_backend(router).await;
    let gateway = HttpGateway::new(&BackendSettings {
        buildings_url: base_url(addr),
        sustainability_url: base_url(addr),
        request_timeout_secs: 1,
    })
    .unwrap();

    let err = gateway.list_buildings().await.unwrap_err();
    assert!(err.to_string().contains("timed out"), "{}", err);
}

#[tokio::test]
async fn wrong_shape_reports_json_path() {
    let router = Router::new().route(
        "/buildings/{id}/average",
        get(|| async {
            Json(json!({
                "Building ID": 5,
                "Building Name": "X",
                "Location": "Y",
                "Averages": {"Energy Consumption (kWh)": "lots"}
            }))
        }),
    );
    let addr = spawn_fake_backend(router).await;
    let gateway = HttpGateway::new(&BackendSettings {
        buildings_url: base_url(addr),
        sustainability_url: base_url(addr),
        request_timeout_secs: 5,
    })
    .unwrap();

    let err = gateway.fetch_average(id(5)).await.unwrap_err();
    assert!(err.is_malformed());
    let details = err.context().unwrap().details.clone().unwrap();
    assert!(details.contains("Averages"), "{}", details);
}
