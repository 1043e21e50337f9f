use crate::{PlanError, Result, MAP_MAX, MAP_MIN};
use serde::{Deserialize, Serialize};

/// Tunables for waypoint generation and thermal analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Radius range (map percent) drawn per path
    pub radius_range: (f64, f64),
    /// Altitude jitter applied to each waypoint, +/- meters
    pub altitude_jitter_m: f64,
    /// Vertical wobble for the line pattern, +/- map percent
    pub line_offset: f64,
    /// Clamp bounds applied to every coordinate
    pub bounds: (f64, f64),
    /// Upper limit on waypoints per path, generated or custom
    pub max_waypoints: u32,
    /// Base of the synthetic temperature draw, Celsius
    pub base_temperature_c: f64,
    /// Width of the synthetic temperature draw, Celsius
    pub temperature_spread_c: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            radius_range: (8.0, 12.0),
            altitude_jitter_m: 10.0,
            line_offset: 2.0,
            bounds: (MAP_MIN, MAP_MAX),
            max_waypoints: 200,
            base_temperature_c: 35.0,
            temperature_spread_c: 15.0,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.radius_range;
        if !(lo > 0.0 && lo <= hi) {
            return Err(PlanError::Config(format!("radius_range {lo}..{hi}")));
        }
        let (min, max) = self.bounds;
        if !(min < max) {
            return Err(PlanError::Config(format!("bounds {min}..{max}")));
        }
        if self.max_waypoints == 0 {
            return Err(PlanError::Config("max_waypoints must be at least 1".to_string()));
        }
        if self.altitude_jitter_m < 0.0 || self.line_offset < 0.0 {
            return Err(PlanError::Config("jitter must be non-negative".to_string()));
        }
        Ok(())
    }

    /// Reject counts above `max_waypoints`.
    pub fn check_waypoint_count(&self, requested: u64) -> Result<()> {
        if requested > u64::from(self.max_waypoints) {
            return Err(PlanError::TooManyWaypoints {
                requested,
                max: self.max_waypoints,
            });
        }
        Ok(())
    }
}
