//! Sustainability score payloads returned by the sustainability service.

use serde::{Deserialize, Serialize};

/// Text shown when the service sends no recommendation.
pub const NO_RECOMMENDATIONS: &str = "No immediate actions required.";

/// Anomaly classification attached to each sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyLevel {
    Normal,
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl AnomalyLevel {
    pub fn is_normal(self) -> bool {
        self == AnomalyLevel::Normal
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyLevel::Normal => "Normal",
            AnomalyLevel::Low => "Low",
            AnomalyLevel::Medium => "Medium",
            AnomalyLevel::High => "High",
            AnomalyLevel::Unknown => "Unknown",
        }
    }
}

/// Score and cost recomputed by the sustainability service.
///
/// Always replaced in full; never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(rename = "Sustainability Score")]
    pub sustainability_score: f64,
    #[serde(rename = "Total Costs ($)")]
    pub total_cost: f64,
}

/// Wire shape of the simulate response, with the two required fields left
/// optional so that a missing one can be reported by name.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSimulationResponse {
    #[serde(rename = "Sustainability Score", default)]
    pub sustainability_score: Option<f64>,
    #[serde(rename = "Total Costs ($)", default)]
    pub total_cost: Option<f64>,
}

impl RawSimulationResponse {
    /// Returns the name of the first missing field on failure.
    pub fn into_result(self) -> Result<SimulationResult, &'static str> {
        let sustainability_score = self.sustainability_score.ok_or("Sustainability Score")?;
        let total_cost = self.total_cost.ok_or("Total Costs ($)")?;
        Ok(SimulationResult {
            sustainability_score,
            total_cost,
        })
    }
}

/// Baseline sustainability report (`GET /buildings/{id}/sustainability`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityBaseline {
    #[serde(rename = "Sustainability Score")]
    pub sustainability_score: f64,
    #[serde(rename = "Total Costs ($)")]
    pub total_cost: f64,

    #[serde(rename = "Carbon Score", default)]
    pub carbon_score: Option<f64>,
    #[serde(rename = "Water Score", default)]
    pub water_score: Option<f64>,
    #[serde(rename = "Energy Score", default)]
    pub energy_score: Option<f64>,

    #[serde(rename = "Carbon Emissions (kg CO2) Anomaly", default)]
    pub carbon_anomaly: Option<AnomalyLevel>,
    #[serde(rename = "Water Usage (Gallons) Anomaly", default)]
    pub water_anomaly: Option<AnomalyLevel>,
    #[serde(rename = "Energy Consumption (kWh) Anomaly", default)]
    pub energy_anomaly: Option<AnomalyLevel>,

    #[serde(rename = "Recommendations", default)]
    pub recommendations: Option<String>,
}

impl SustainabilityBaseline {
    /// The score/cost pair shown before any simulation.
    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            sustainability_score: self.sustainability_score,
            total_cost: self.total_cost,
        }
    }

    pub fn recommendations_text(&self) -> &str {
        self.recommendations
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(NO_RECOMMENDATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_complete() {
        let raw: RawSimulationResponse = serde_json::from_str(
            r#"{"Sustainability Score": 72.3, "Total Costs ($)": 1850.0, "Energy Score": 60.1}"#,
        )
        .unwrap();
        let result = raw.into_result().unwrap();
        assert_eq!(result.sustainability_score, 72.3);
        assert_eq!(result.total_cost, 1850.0);
    }

    #[test]
    fn test_raw_response_missing_cost() {
        let raw: RawSimulationResponse =
            serde_json::from_str(r#"{"Sustainability Score": 72.3}"#).unwrap();
        assert_eq!(raw.into_result().unwrap_err(), "Total Costs ($)");
    }

    #[test]
    fn test_baseline_parses_full_payload() {
        let json = r#"{
            "Sustainability Score": 64.2,
            "Total Costs ($)": 91.5,
            "Carbon Score": 58.0,
            "Water Score": 77.1,
            "Energy Score": 61.9,
            "Carbon Emissions (kg CO2) Anomaly": "Low",
            "Water Usage (Gallons) Anomaly": "Normal",
            "Energy Consumption (kWh) Anomaly": "Severe",
            "Recommendations": "Install energy-efficient lighting and appliances.",
            "Revenue ($)": 21000.0
        }"#;
        let baseline: SustainabilityBaseline = serde_json::from_str(json).unwrap();
        assert_eq!(baseline.carbon_anomaly, Some(AnomalyLevel::Low));
        assert_eq!(baseline.energy_anomaly, Some(AnomalyLevel::Unknown));
        assert!(baseline.water_anomaly.unwrap().is_normal());
        assert_eq!(baseline.result().total_cost, 91.5);
    }

    #[test]
    fn test_recommendations_default() {
        let baseline: SustainabilityBaseline = serde_json::from_str(
            r#"{"Sustainability Score": 50.0, "Total Costs ($)": 10.0, "Recommendations": "  "}"#,
        )
        .unwrap();
        assert_eq!(baseline.recommendations_text(), NO_RECOMMENDATIONS);
    }
}
