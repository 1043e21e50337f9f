//! Waypoint synthesis around an area anchor.

use crate::types::unix_millis;
use crate::{areas, uav_color, FlightPath, PathSource, PathStatus, Pattern, PlanError};
use crate::{PlannerConfig, Result, Waypoint};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use time::OffsetDateTime;

pub const DEFAULT_WAYPOINTS: u32 = 10;
pub const DEFAULT_ALTITUDE_M: f64 = 100.0;

/// Source of uniform random draws.
pub trait RandomSource {
    /// Uniform draw in `[low, high)`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// Adapts any `rand` generator.
pub struct RngSource<R>(pub R);

impl<R: rand::Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.0.gen_range(low..high)
        } else {
            low
        }
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

fn default_waypoints() -> u32 {
    DEFAULT_WAYPOINTS
}

fn default_altitude() -> f64 {
    DEFAULT_ALTITUDE_M
}

/// Arguments of a `generate_flight_path` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRequest {
    pub uav_id: String,
    /// Area slug
    pub area: String,
    #[serde(default = "default_waypoints")]
    pub num_waypoints: u32,
    #[serde(default = "default_altitude")]
    pub altitude: f64,
    #[serde(default)]
    pub pattern: Pattern,
}

impl PathRequest {
    pub fn new(uav_id: &str, area: &str) -> Self {
        Self {
            uav_id: uav_id.to_string(),
            area: area.to_string(),
            num_waypoints: DEFAULT_WAYPOINTS,
            altitude: DEFAULT_ALTITUDE_M,
            pattern: Pattern::Circle,
        }
    }

    pub fn with_waypoints(mut self, n: u32) -> Self {
        self.num_waypoints = n;
        self
    }

    pub fn with_altitude(mut self, meters: f64) -> Self {
        self.altitude = meters;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }
}

pub struct PathGenerator<R> {
    rng: R,
    config: PlannerConfig,
}

impl<R: RandomSource> PathGenerator<R> {
    pub fn new(rng: R, config: PlannerConfig) -> Self {
        Self { rng, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Build an agent path for `request`. Fails on an unknown area slug or an
    /// oversized count without producing anything.
    pub fn generate(&mut self, request: &PathRequest) -> Result<FlightPath> {
        let area = areas::lookup(&request.area)
            .ok_or_else(|| PlanError::UnknownArea(request.area.clone()))?;

        let waypoints = self.generate_waypoints(
            area.anchor(),
            request.num_waypoints,
            request.altitude,
            request.pattern,
        )?;
        let created_at = OffsetDateTime::now_utc();

        tracing::debug!(
            uav = %request.uav_id,
            area = area.slug,
            pattern = %request.pattern,
            count = waypoints.len(),
            "generated waypoints"
        );

        Ok(FlightPath {
            id: format!("agent-{}-{}", request.uav_id, unix_millis(created_at)),
            uav_id: request.uav_id.clone(),
            name: format!("{} {} - {}", request.uav_id, request.pattern, area.name),
            waypoints,
            color: uav_color(&request.uav_id).to_string(),
            status: PathStatus::Planned,
            source: PathSource::Agent,
            created_at,
        })
    }

    /// Lay out `count` waypoints around `anchor`. A count of zero is treated
    /// as one; counts above `max_waypoints` are rejected before any draw.
    pub fn generate_waypoints(
        &mut self,
        anchor: (f64, f64),
        count: u32,
        altitude: f64,
        pattern: Pattern,
    ) -> Result<Vec<Waypoint>> {
        self.config.check_waypoint_count(u64::from(count))?;
        let n = count.max(1) as usize;
        let nf = n as f64;
        let (ax, ay) = anchor;
        let (r_min, r_max) = self.config.radius_range;
        let radius = self.rng.uniform(r_min, r_max);

        let cols = (nf.sqrt().ceil() as usize).max(1);
        let grid_step = 2.0 * radius / (cols.saturating_sub(1).max(1) as f64);
        let line_step = 2.0 * radius / ((n - 1).max(1) as f64);

        let jitter = self.config.altitude_jitter_m;
        let wobble = self.config.line_offset;

        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let fi = i as f64;
            let (x, y) = match pattern {
                Pattern::Circle => {
                    let angle = 2.0 * PI * fi / nf;
                    (ax + radius * angle.cos(), ay + radius * angle.sin())
                }
                Pattern::Grid => {
                    let row = (i / cols) as f64;
                    let col = (i % cols) as f64;
                    (ax - radius + col * grid_step, ay - radius + row * grid_step)
                }
                Pattern::Spiral => {
                    let angle = 4.0 * PI * fi / nf;
                    let r = radius * fi / nf;
                    (ax + r * angle.cos(), ay + r * angle.sin())
                }
                Pattern::Line => {
                    let offset = self.rng.uniform(-wobble, wobble);
                    (ax - radius + fi * line_step, ay + offset)
                }
            };
            let alt = altitude + self.rng.uniform(-jitter, jitter);
            out.push(Waypoint::new(i, self.clamp(x), self.clamp(y), alt));
        }
        Ok(out)
    }

    fn clamp(&self, v: f64) -> f64 {
        let (min, max) = self.config.bounds;
        v.clamp(min, max)
    }
}
