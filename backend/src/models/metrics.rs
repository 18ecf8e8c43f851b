//! The six building metrics shared by averages, the editable overlay and the
//! simulate request body.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper slider bound for every metric except the renewable share.
pub const DEFAULT_METRIC_MAX: f64 = 2000.0;

/// Upper slider bound for the renewable share, a percentage.
pub const RENEWABLE_METRIC_MAX: f64 = 100.0;

/// One of the six per-building metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Energy,
    Occupancy,
    Carbon,
    Hvac,
    Renewable,
    Water,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 6] = [
        Metric::Energy,
        Metric::Occupancy,
        Metric::Carbon,
        Metric::Hvac,
        Metric::Renewable,
        Metric::Water,
    ];

    /// Short key used in URLs and view payloads.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Energy => "energy",
            Metric::Occupancy => "occupancy",
            Metric::Carbon => "carbon",
            Metric::Hvac => "hvac",
            Metric::Renewable => "renewable",
            Metric::Water => "water",
        }
    }

    /// Field name used by the backend services, unit included.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Energy => "Energy Consumption (kWh)",
            Metric::Occupancy => "Occupancy (People)",
            Metric::Carbon => "Carbon Emissions (kg CO2)",
            Metric::Hvac => "HVAC Usage (Hours)",
            Metric::Renewable => "Renewable Energy Contribution (%)",
            Metric::Water => "Water Usage (Gallons)",
        }
    }

    /// Inclusive upper bound accepted by [`MetricOverlay::set`].
    pub fn max(self) -> f64 {
        match self {
            Metric::Renewable => RENEWABLE_METRIC_MAX,
            _ => DEFAULT_METRIC_MAX,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts the short key (`"hvac"`) or the full backend label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(trimmed) || m.label() == trimmed)
            .ok_or_else(|| format!("Unknown metric: {}", s))
    }
}

/// Errors raised when editing the overlay.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OverlayError {
    #[error("{metric} value {value} is outside the allowed range [0, {max}]")]
    OutOfBounds { metric: Metric, value: f64, max: f64 },

    #[error("{metric} value must be a finite number")]
    NotFinite { metric: Metric },
}

/// A value for each of the six metrics.
///
/// Serialises with the backend's labelled field names, which is both the
/// `Averages` shape returned by the buildings service and the body expected
/// by the simulate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricValues {
    #[serde(rename = "Energy Consumption (kWh)")]
    pub energy: f64,
    #[serde(rename = "Occupancy (People)")]
    pub occupancy: f64,
    #[serde(rename = "Carbon Emissions (kg CO2)")]
    pub carbon: f64,
    #[serde(rename = "HVAC Usage (Hours)")]
    pub hvac: f64,
    #[serde(rename = "Renewable Energy Contribution (%)")]
    pub renewable: f64,
    #[serde(rename = "Water Usage (Gallons)")]
    pub water: f64,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Energy => self.energy,
            Metric::Occupancy => self.occupancy,
            Metric::Carbon => self.carbon,
            Metric::Hvac => self.hvac,
            Metric::Renewable => self.renewable,
            Metric::Water => self.water,
        }
    }

    fn slot_mut(&mut self, metric: Metric) -> &mut f64 {
        match metric {
            Metric::Energy => &mut self.energy,
            Metric::Occupancy => &mut self.occupancy,
            Metric::Carbon => &mut self.carbon,
            Metric::Hvac => &mut self.hvac,
            Metric::Renewable => &mut self.renewable,
            Metric::Water => &mut self.water,
        }
    }

    /// Iterate `(metric, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// Check the physical domain of measured averages: finite, non-negative,
    /// and the renewable share within `[0, 100]`.
    pub fn validate_measured(&self) -> Result<(), String> {
        for (metric, value) in self.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", metric.label(), value));
            }
        }
        if self.renewable > RENEWABLE_METRIC_MAX {
            return Err(format!(
                "{} must not exceed {}, got {}",
                Metric::Renewable.label(),
                RENEWABLE_METRIC_MAX,
                self.renewable
            ));
        }
        Ok(())
    }
}

/// The user's proposed values, seeded from the building averages.
///
/// The six keys are fixed by construction. Values written through
/// [`MetricOverlay::set`] are bound-checked; seeding copies the averages
/// verbatim, even when a measured value lies above the slider range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricOverlay(MetricValues);

impl MetricOverlay {
    pub fn seeded_from(averages: &MetricValues) -> Self {
        MetricOverlay(*averages)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.0.get(metric)
    }

    pub fn values(&self) -> &MetricValues {
        &self.0
    }

    /// Set one metric, leaving the other five untouched.
    pub fn set(&mut self, metric: Metric, value: f64) -> Result<(), OverlayError> {
        if !value.is_finite() {
            return Err(OverlayError::NotFinite { metric });
        }
        let max = metric.max();
        if !(0.0..=max).contains(&value) {
            return Err(OverlayError::OutOfBounds { metric, value, max });
        }
        *self.0.slot_mut(metric) = value;
        Ok(())
    }

    /// Restore every metric to the given snapshot.
    pub fn reset_to(&mut self, averages: &MetricValues) {
        self.0 = *averages;
    }

    /// Whether the overlay still holds exactly these values.
    pub fn matches(&self, values: &MetricValues) -> bool {
        self.0 == *values
    }
}
