use core::fmt;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lower bound of the on-map margin, in map-percentage units.
pub const MAP_MIN: f64 = 5.0;
/// Upper bound of the on-map margin, in map-percentage units.
pub const MAP_MAX: f64 = 95.0;

/// Colour used for UAVs missing from the colour table.
pub const FALLBACK_COLOR: &str = "#06b6d4";

const UAV_COLORS: &[(&str, &str)] = &[
    ("UAV-01", "#ef4444"),
    ("UAV-02", "#3b82f6"),
    ("UAV-03", "#22c55e"),
    ("UAV-04", "#f59e0b"),
    ("UAV-05", "#a855f7"),
];

/// Display colour for a UAV's path.
pub fn uav_color(uav_id: &str) -> &'static str {
    UAV_COLORS
        .iter()
        .find(|(id, _)| *id == uav_id)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// A single stop on a flight path. Its sequence index is its position in
/// [`FlightPath::waypoints`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    /// Map x in percent (0-100)
    pub x: f64,
    /// Map y in percent (0-100)
    pub y: f64,
    /// Altitude in meters
    pub altitude: f64,
}

impl Waypoint {
    pub fn new(index: usize, x: f64, y: f64, altitude: f64) -> Self {
        Self {
            id: format!("wp-{}", index + 1),
            x,
            y,
            altitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Planned,
    Active,
    Completed,
}

impl PathStatus {
    /// Lifecycle only moves forward, one step at a time.
    pub fn can_transition_to(self, next: PathStatus) -> bool {
        matches!(
            (self, next),
            (PathStatus::Planned, PathStatus::Active) | (PathStatus::Active, PathStatus::Completed)
        )
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStatus::Planned => write!(f, "planned"),
            PathStatus::Active => write!(f, "active"),
            PathStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Who produced a flight path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSource {
    Manual,
    Agent,
}

/// Geometric layout used to place waypoints around an anchor.
///
/// Unknown names resolve to [`Pattern::Line`], mirroring the generator's
/// fall-through branch; an absent pattern defaults to [`Pattern::Circle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pattern {
    #[default]
    Circle,
    Grid,
    Spiral,
    Line,
}

impl Pattern {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "circle" => Pattern::Circle,
            "grid" => Pattern::Grid,
            "spiral" => Pattern::Spiral,
            _ => Pattern::Line,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pattern::Circle => "circle",
            Pattern::Grid => "grid",
            Pattern::Spiral => "spiral",
            Pattern::Line => "line",
        }
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::from_name(&s)
    }
}

impl From<Pattern> for String {
    fn from(p: Pattern) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A UAV flight path. At most one exists per UAV in a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    pub id: String,
    pub uav_id: String,
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    pub color: String,
    pub status: PathStatus,
    pub source: PathSource,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl FlightPath {
    /// Build a path drawn by hand on the map, clamping coordinates into
    /// `(min, max)` the same way generated paths are.
    pub fn manual(
        uav_id: &str,
        name: &str,
        waypoints: Vec<Waypoint>,
        (min, max): (f64, f64),
    ) -> Self {
        let created_at = OffsetDateTime::now_utc();
        Self {
            id: format!("manual-{}-{}", uav_id, unix_millis(created_at)),
            uav_id: uav_id.to_string(),
            name: name.to_string(),
            waypoints: waypoints
                .into_iter()
                .map(|wp| Waypoint {
                    x: wp.x.clamp(min, max),
                    y: wp.y.clamp(min, max),
                    ..wp
                })
                .collect(),
            color: uav_color(uav_id).to_string(),
            status: PathStatus::Planned,
            source: PathSource::Manual,
            created_at,
        }
    }
}

pub(crate) fn unix_millis(ts: OffsetDateTime) -> i128 {
    ts.unix_timestamp_nanos() / 1_000_000
}
