//! Executes function calls against the flight-path registry.

use crate::actions::{ClearRequest, CustomPathRequest};
use crate::generator::DEFAULT_ALTITUDE_M;
use crate::thermal::analyze_zone;
use crate::types::unix_millis;
use crate::{
    areas, uav_color, ActionResult, FlightPath, FlightPathRegistry, FunctionCall, PathGenerator,
    PathRequest, PathSource, PathStatus, PlanError, PlannerConfig, RandomSource, Result,
    Waypoint, ZoneQuery,
};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};

const DEFAULT_CUSTOM_COORD: f64 = 50.0;

/// Owns the registry and the generator and applies one action at a time.
/// Every mutating action either fully applies or leaves the registry as it was.
pub struct Dispatcher<R> {
    registry: FlightPathRegistry,
    generator: PathGenerator<R>,
}

impl<R: RandomSource> Dispatcher<R> {
    pub fn new(rng: R, config: PlannerConfig) -> Self {
        Self {
            registry: FlightPathRegistry::new(),
            generator: PathGenerator::new(rng, config),
        }
    }

    pub fn registry(&self) -> &FlightPathRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FlightPathRegistry {
        &mut self.registry
    }

    pub fn execute(&mut self, call: &FunctionCall) -> ActionResult {
        tracing::debug!(function = call.name(), "dispatching");
        match call {
            FunctionCall::GenerateFlightPath(req) => self.generate_flight_path(req),
            FunctionCall::ClearFlightPath(req) => self.clear_flight_path(req),
            FunctionCall::AnalyzeThermalZone(query) => self.analyze_thermal_zone(query),
            FunctionCall::GenerateCustomPath(req) => self.generate_custom_path(req),
        }
    }

    /// Dispatch a call given as a bare name plus JSON arguments, as emitted by
    /// a remote model. Never panics; bad input becomes a failed result.
    pub fn dispatch_raw(&mut self, name: &str, arguments: Value) -> ActionResult {
        if !FunctionCall::is_known(name) {
            warn!(function = name, "unknown function");
            return ActionResult::failed(format!("Unknown function: {name}"));
        }
        let envelope = serde_json::json!({ "function_name": name, "arguments": arguments });
        match serde_json::from_value::<FunctionCall>(envelope) {
            Ok(call) => self.execute(&call),
            Err(e) => {
                warn!(function = name, error = %e, "invalid arguments");
                ActionResult::failed(format!("Invalid arguments for {name}: {e}"))
            }
        }
    }

    /// Store a path drawn by hand, clamped to the configured bounds. Replaces
    /// any existing path for the UAV.
    pub fn add_manual_path(
        &mut self,
        uav_id: &str,
        name: &str,
        waypoints: Vec<Waypoint>,
    ) -> ActionResult {
        let config = self.generator.config();
        if waypoints.is_empty() {
            return ActionResult::failed(format!("Manual path for {uav_id} has no waypoints."));
        }
        if let Err(e) = config.check_waypoint_count(waypoints.len() as u64) {
            return ActionResult::failed(format!("Cannot store the path for {uav_id}: {e}"));
        }
        let path = FlightPath::manual(uav_id, name, waypoints, config.bounds);
        info!(uav = uav_id, path = %path.id, "manual flight path stored");
        self.registry.upsert(path.clone());
        ActionResult::ok(format!("Stored manual flight path for {uav_id}.")).with_path(path)
    }

    pub fn clear_all(&mut self) -> ActionResult {
        let n = self.registry.clear();
        ActionResult::ok(format!("Cleared {n} flight path(s)."))
    }

    fn generate_flight_path(&mut self, req: &PathRequest) -> ActionResult {
        match self.generator.generate(req) {
            Ok(path) => {
                let area_name = areas::lookup(&req.area)
                    .map(|a| a.name.to_string())
                    .unwrap_or_else(|| req.area.clone());
                let message = format!(
                    "Generated a {}-waypoint {} flight path for {} around {} at ~{}m.",
                    path.waypoints.len(),
                    req.pattern,
                    req.uav_id,
                    area_name,
                    req.altitude
                );
                info!(uav = %req.uav_id, path = %path.id, "agent flight path planned");
                self.registry.upsert(path.clone());
                ActionResult::ok(message).with_path(path)
            }
            Err(PlanError::UnknownArea(area)) => {
                warn!(uav = %req.uav_id, area = %area, "unknown area");
                ActionResult::failed(format!(
                    "Unknown area '{}'. Available areas: {}",
                    area,
                    areas::names().join(", ")
                ))
            }
            Err(e) => {
                warn!(uav = %req.uav_id, error = %e, "flight path rejected");
                ActionResult::failed(format!("Cannot plan a flight path for {}: {e}", req.uav_id))
            }
        }
    }

    fn clear_flight_path(&mut self, req: &ClearRequest) -> ActionResult {
        match self.registry.remove_by_uav(&req.uav_id) {
            Some(_) => ActionResult::ok(format!("Cleared the flight path for {}.", req.uav_id)),
            None => ActionResult::ok(format!(
                "{} has no flight path; nothing to clear.",
                req.uav_id
            )),
        }
    }

    fn analyze_thermal_zone(&mut self, query: &ZoneQuery) -> ActionResult {
        let config = self.generator.config().clone();
        let analysis = analyze_zone(query, &config, self.generator.rng_mut());
        let message = format!(
            "Thermal analysis for {}: {:.1}°C, risk {}. {}",
            analysis.zone, analysis.temperature, analysis.risk_level, analysis.recommendation
        );
        ActionResult::ok(message).with_analysis(analysis)
    }

    fn generate_custom_path(&mut self, req: &CustomPathRequest) -> ActionResult {
        let waypoints = match custom_waypoints(req.waypoints.as_ref(), self.generator.config()) {
            Ok(w) => w,
            Err(e) => {
                warn!(uav = %req.uav_id, error = %e, "rejected custom path");
                return ActionResult::failed(format!(
                    "Cannot build a custom path for {}: {e}",
                    req.uav_id
                ));
            }
        };

        let created_at = OffsetDateTime::now_utc();
        let path = FlightPath {
            id: format!("custom-{}-{}", req.uav_id, unix_millis(created_at)),
            uav_id: req.uav_id.clone(),
            name: req
                .name
                .clone()
                .unwrap_or_else(|| format!("{} custom route", req.uav_id)),
            waypoints,
            color: uav_color(&req.uav_id).to_string(),
            status: PathStatus::Planned,
            source: PathSource::Agent,
            created_at,
        };
        let message = format!(
            "Created a custom {}-waypoint flight path for {}.",
            path.waypoints.len(),
            req.uav_id
        );
        self.registry.upsert(path.clone());
        ActionResult::ok(message).with_path(path)
    }
}

fn custom_waypoints(raw: Option<&Value>, config: &PlannerConfig) -> Result<Vec<Waypoint>> {
    let items = match raw {
        None | Some(Value::Null) => return Err(PlanError::InvalidWaypoints("waypoints missing")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(PlanError::InvalidWaypoints("waypoints must be an array")),
    };
    if items.is_empty() {
        return Err(PlanError::InvalidWaypoints("waypoints array is empty"));
    }
    config.check_waypoint_count(items.len() as u64)?;
    let (min, max) = config.bounds;

    let field = |item: &Value, key: &str, default: f64| {
        item.get(key).and_then(Value::as_f64).unwrap_or(default)
    };
    Ok(items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Waypoint::new(
                i,
                field(item, "x", DEFAULT_CUSTOM_COORD).clamp(min, max),
                field(item, "y", DEFAULT_CUSTOM_COORD).clamp(min, max),
                field(item, "altitude", DEFAULT_ALTITUDE_M),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MidpointSource, Pattern, RiskLevel, RngSource};
    use serde_json::json;

    fn dispatcher() -> Dispatcher<MidpointSource> {
        Dispatcher::new(MidpointSource, PlannerConfig::default())
    }

    fn generate(uav: &str, area: &str, pattern: Pattern) -> FunctionCall {
        FunctionCall::GenerateFlightPath(
            PathRequest::new(uav, area)
                .with_waypoints(6)
                .with_pattern(pattern),
        )
    }

    #[test]
    fn test_regenerate_replaces_path() {
        let mut d = dispatcher();
        let first = d.execute(&generate("UAV-01", "building_a", Pattern::Circle));
        assert!(first.success);
        let second = d.execute(&generate("UAV-01", "green_zone", Pattern::Grid));
        assert!(second.success);

        assert_eq!(d.registry().len(), 1);
        let stored = d.registry().get("UAV-01").unwrap();
        assert_eq!(Some(stored), second.data.as_ref());
    }

    #[test]
    fn test_unknown_area_leaves_registry_untouched() {
        let mut d = dispatcher();
        d.execute(&generate("UAV-02", "rooftop", Pattern::Line));
        let before = d.registry().snapshot();

        let result = d.execute(&generate("UAV-02", "not_a_real_place", Pattern::Line));
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.message.contains("Central Plaza"));
        assert_eq!(d.registry().snapshot(), before);
    }

    #[test]
    fn test_clear_is_noop_when_absent() {
        let mut d = dispatcher();
        let call = FunctionCall::ClearFlightPath(ClearRequest {
            uav_id: "UAV-04".to_string(),
        });
        assert!(d.execute(&call).success);

        d.execute(&generate("UAV-04", "entrance", Pattern::Spiral));
        assert_eq!(d.registry().len(), 1);
        assert!(d.execute(&call).success);
        assert!(d.registry().is_empty());
    }

    #[test]
    fn test_analyze_does_not_touch_registry() {
        let mut d = Dispatcher::new(RngSource::seeded(11), PlannerConfig::default());
        let result = d.execute(&FunctionCall::AnalyzeThermalZone(ZoneQuery::new("Rooftop")));
        assert!(result.success);
        let analysis = result.analysis.unwrap();
        assert_eq!(
            analysis.risk_level,
            RiskLevel::from_temperature(analysis.temperature)
        );
        assert!(d.registry().is_empty());
    }

    #[test]
    fn test_dispatch_raw_unknown_function() {
        let mut d = dispatcher();
        let result = d.dispatch_raw("launch_rockets", json!({}));
        assert!(!result.success);
        assert!(result.message.contains("launch_rockets"));
    }

    #[test]
    fn test_dispatch_raw_bad_arguments() {
        let mut d = dispatcher();
        let result = d.dispatch_raw("clear_flight_path", json!({"uav": 3}));
        assert!(!result.success);
    }

    #[test]
    fn test_dispatch_raw_generate() {
        let mut d = dispatcher();
        let result = d.dispatch_raw(
            "generate_flight_path",
            json!({"uav_id": "UAV-03", "area": "parking_area", "num_waypoints": 5}),
        );
        assert!(result.success);
        assert_eq!(result.data.unwrap().waypoints.len(), 5);
    }

    #[test]
    fn test_custom_path_defaults_and_clamps() {
        let mut d = dispatcher();
        let result = d.dispatch_raw(
            "generate_custom_path",
            json!({
                "uav_id": "UAV-05",
                "waypoints": [{"x": 120.0, "y": -4.0}, {"altitude": 60.0}, {}]
            }),
        );
        assert!(result.success);
        let path = result.data.unwrap();
        assert_eq!(path.source, PathSource::Agent);
        assert_eq!((path.waypoints[0].x, path.waypoints[0].y), (95.0, 5.0));
        assert_eq!(path.waypoints[0].altitude, 100.0);
        assert_eq!((path.waypoints[1].x, path.waypoints[1].y), (50.0, 50.0));
        assert_eq!(path.waypoints[1].altitude, 60.0);
        assert_eq!(d.registry().len(), 1);
    }

    #[test]
    fn test_custom_path_rejects_bad_waypoints() {
        let mut d = dispatcher();
        for waypoints in [None, Some(json!("nope")), Some(json!([])), Some(Value::Null)] {
            let call = FunctionCall::GenerateCustomPath(CustomPathRequest {
                uav_id: "UAV-01".to_string(),
                name: None,
                waypoints,
            });
            assert!(!d.execute(&call).success);
        }
        assert!(d.registry().is_empty());
    }

    #[test]
    fn test_oversized_request_fails_without_aborting() {
        let mut d = dispatcher();
        d.execute(&generate("UAV-01", "rooftop", Pattern::Circle));
        let before = d.registry().snapshot();

        let result = d.dispatch_raw(
            "generate_flight_path",
            json!({"uav_id": "UAV-01", "area": "rooftop", "num_waypoints": 4_000_000_000u64}),
        );
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.message.contains("too many waypoints"));
        assert_eq!(d.registry().snapshot(), before);
    }

    #[test]
    fn test_custom_path_over_limit() {
        let config = PlannerConfig {
            max_waypoints: 2,
            ..PlannerConfig::default()
        };
        let mut d = Dispatcher::new(MidpointSource, config);
        let result = d.dispatch_raw(
            "generate_custom_path",
            json!({"uav_id": "UAV-02", "waypoints": [{}, {}, {}]}),
        );
        assert!(!result.success);
        assert!(d.registry().is_empty());
    }

    #[test]
    fn test_manual_path_uses_configured_bounds() {
        let config = PlannerConfig {
            bounds: (20.0, 80.0),
            ..PlannerConfig::default()
        };
        let mut d = Dispatcher::new(MidpointSource, config);
        let result = d.add_manual_path(
            "UAV-03",
            "Hand drawn",
            vec![Waypoint::new(0, 2.0, 99.0, 90.0)],
        );
        assert!(result.success);
        let stored = d.registry().get("UAV-03").unwrap();
        assert_eq!(stored.source, PathSource::Manual);
        assert_eq!((stored.waypoints[0].x, stored.waypoints[0].y), (20.0, 80.0));

        let generated = d.execute(&generate("UAV-04", "entrance", Pattern::Circle));
        let path = generated.data.unwrap();
        assert!(path.waypoints.iter().all(|w| (20.0..=80.0).contains(&w.y)));

        assert!(!d.add_manual_path("UAV-05", "empty", Vec::new()).success);
    }

    #[test]
    fn test_clear_all() {
        let mut d = dispatcher();
        d.execute(&generate("UAV-01", "rooftop", Pattern::Circle));
        d.execute(&generate("UAV-02", "rooftop", Pattern::Circle));
        assert!(d.clear_all().success);
        assert!(d.registry().is_empty());
    }
}
