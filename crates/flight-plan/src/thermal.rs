//! Synthetic thermal risk assessment for a named zone.

use crate::{PlannerConfig, RandomSource};
use core::fmt;
use serde::{Deserialize, Serialize};

const HIGH_ABOVE_C: f64 = 42.0;
const MEDIUM_ABOVE_C: f64 = 38.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_temperature(celsius: f64) -> Self {
        if celsius > HIGH_ABOVE_C {
            RiskLevel::High
        } else if celsius > MEDIUM_ABOVE_C {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::High => {
                "Deploy cooling measures and increase UAV patrol frequency over this zone."
            }
            RiskLevel::Medium => "Keep the zone under regular monitoring and schedule a follow-up flight.",
            RiskLevel::Low => "Conditions are normal; routine monitoring is sufficient.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Arguments of an `analyze_thermal_zone` request. Any supplied field wins
/// over the derived value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneQuery {
    pub zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl ZoneQuery {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalAnalysis {
    pub zone: String,
    pub temperature: f64,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

pub fn analyze_zone<R: RandomSource + ?Sized>(
    query: &ZoneQuery,
    config: &PlannerConfig,
    rng: &mut R,
) -> ThermalAnalysis {
    let temperature = query.temperature.unwrap_or_else(|| {
        config.base_temperature_c + rng.uniform(0.0, config.temperature_spread_c)
    });
    let risk_level = query
        .risk_level
        .unwrap_or_else(|| RiskLevel::from_temperature(temperature));
    let recommendation = query
        .recommendation
        .clone()
        .unwrap_or_else(|| risk_level.recommendation().to_string());

    ThermalAnalysis {
        zone: query.zone.clone(),
        temperature,
        risk_level,
        recommendation,
    }
}
