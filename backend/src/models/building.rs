//! Building identity, averages and the locally edited details record.

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::BuildingId;
use crate::models::metrics::MetricValues;

const DEFAULT_ADDRESS: &str = "955 Main Street";
const DEFAULT_YEAR_BUILT: i32 = 2015;
const DEFAULT_FLOORS: u32 = 18;

/// One entry of the building roster (`GET /buildings`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSummary {
    #[serde(rename = "Building ID")]
    pub building_id: BuildingId,
    #[serde(rename = "Building Name")]
    pub name: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Latitude", deserialize_with = "coordinate")]
    pub latitude: f64,
    #[serde(rename = "Longitude", deserialize_with = "coordinate")]
    pub longitude: f64,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Coordinates arrive either as JSON numbers or as numeric strings.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate: {:?}", s)))?,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("coordinate must be finite"))
    }
}

/// Per-building averages (`GET /buildings/{id}/average`).
///
/// Immutable once fetched; a reload replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingAverageRecord {
    #[serde(rename = "Building ID")]
    pub building_id: BuildingId,
    #[serde(rename = "Building Name")]
    pub name: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Averages")]
    pub averages: MetricValues,

    // Optional descriptive fields some deployments attach to the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "squareFootage", default, skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<u64>,
    #[serde(rename = "yearBuilt", default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<u32>,
}

/// Free-form building details shown on the details tab.
///
/// Edited locally only; nothing in the dashboard submits these to a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDetails {
    pub square_footage: u64,
    pub address: String,
    pub year_built: i32,
    pub floors: u32,
}

impl Default for BuildingDetails {
    fn default() -> Self {
        Self {
            square_footage: 0,
            address: DEFAULT_ADDRESS.to_string(),
            year_built: DEFAULT_YEAR_BUILT,
            floors: DEFAULT_FLOORS,
        }
    }
}

impl BuildingDetails {
    /// Seed from the optional fields of an averages record, falling back to
    /// the defaults for anything absent (or empty, for the address).
    pub fn from_record(record: &BuildingAverageRecord) -> Self {
        let defaults = Self::default();
        Self {
            square_footage: record.square_footage.unwrap_or(defaults.square_footage),
            address: record
                .address
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(defaults.address),
            year_built: record.year_built.unwrap_or(defaults.year_built),
            floors: record.floors.unwrap_or(defaults.floors),
        }
    }

    pub fn apply(&mut self, update: DetailsUpdate) {
        if let Some(square_footage) = update.square_footage {
            self.square_footage = square_footage;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(year_built) = update.year_built {
            self.year_built = year_built;
        }
        if let Some(floors) = update.floors {
            self.floors = floors;
        }
    }
}

/// Partial update of [`BuildingDetails`]; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailsUpdate {
    #[serde(default)]
    pub square_footage: Option<u64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub floors: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVERAGE_JSON: &str = r#"{
        "Building ID": 3,
        "Building Name": "Harbor Point",
        "Location": "Boston",
        "Description": "Office tower",
        "Averages": {
            "Energy Consumption (kWh)": 450.5,
            "Occupancy (People)": 210.0,
            "Carbon Emissions (kg CO2)": 120.75,
            "HVAC Usage (Hours)": 11.2,
            "Renewable Energy Contribution (%)": 18.0,
            "Water Usage (Gallons)": 640.0
        }
    }"#;

    #[test]
    fn test_parse_average_record() {
        let record: BuildingAverageRecord = serde_json::from_str(AVERAGE_JSON).unwrap();
        assert_eq!(record.building_id.value(), 3);
        assert_eq!(record.name, "Harbor Point");
        assert_eq!(record.averages.energy, 450.5);
        assert_eq!(record.address, None);
    }

    #[test]
    fn test_average_record_rejects_missing_metric() {
        let broken = AVERAGE_JSON.replace("\"Water Usage (Gallons)\": 640.0", "\"Other\": 1.0");
        assert!(serde_json::from_str::<BuildingAverageRecord>(&broken).is_err());
    }

    #[test]
    fn test_roster_accepts_string_coordinates() {
        let json = r#"[
            {"Building ID": 1, "Building Name": "A", "Location": "X", "Latitude": "42.36", "Longitude": -71.05},
            {"Building ID": 2, "Building Name": "B", "Location": "Y", "Latitude": 40.7, "Longitude": "-74.0", "Description": "d"}
        ]"#;
        let roster: Vec<BuildingSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(roster[0].latitude, 42.36);
        assert_eq!(roster[1].longitude, -74.0);
        assert_eq!(roster[1].description.as_deref(), Some("d"));
    }

    #[test]
    fn test_roster_rejects_bad_coordinate() {
        let json = r#"{"Building ID": 1, "Building Name": "A", "Location": "X", "Latitude": "north", "Longitude": 1}"#;
        assert!(serde_json::from_str::<BuildingSummary>(json).is_err());
    }

    #[test]
    fn test_roster_rejects_non_positive_id() {
        let json = r#"{"Building ID": 0, "Building Name": "A", "Location": "X", "Latitude": 1, "Longitude": 1}"#;
        assert!(serde_json::from_str::<BuildingSummary>(json).is_err());
    }

    #[test]
    fn test_details_defaults_and_seeding() {
        let mut record: BuildingAverageRecord = serde_json::from_str(AVERAGE_JSON).unwrap();
        assert_eq!(BuildingDetails::from_record(&record), BuildingDetails::default());

        record.floors = Some(4);
        record.address = Some("1 Dock Sq".to_string());
        let details = BuildingDetails::from_record(&record);
        assert_eq!(details.floors, 4);
        assert_eq!(details.address, "1 Dock Sq");
        assert_eq!(details.year_built, 2015);
    }

    #[test]
    fn test_details_partial_update() {
        let mut details = BuildingDetails::default();
        details.apply(DetailsUpdate {
            square_footage: Some(52_000),
            ..Default::default()
        });
        assert_eq!(details.square_footage, 52_000);
        assert_eq!(details.address, "955 Main Street");
        assert_eq!(details.floors, 18);
    }
}
