//! Function calls understood by the dispatcher and their results.

use crate::{FlightPath, PathRequest, ThermalAnalysis, ZoneQuery};
use serde::{Deserialize, Serialize};

/// Names accepted by [`crate::Dispatcher::dispatch_raw`].
pub const KNOWN_FUNCTIONS: [&str; 4] = [
    "generate_flight_path",
    "clear_flight_path",
    "analyze_thermal_zone",
    "generate_custom_path",
];

/// A resolved action, shaped like `{"function_name": ..., "arguments": {...}}`
/// on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function_name", content = "arguments", rename_all = "snake_case")]
pub enum FunctionCall {
    GenerateFlightPath(PathRequest),
    ClearFlightPath(ClearRequest),
    AnalyzeThermalZone(ZoneQuery),
    GenerateCustomPath(CustomPathRequest),
}

impl FunctionCall {
    pub fn name(&self) -> &'static str {
        match self {
            FunctionCall::GenerateFlightPath(_) => "generate_flight_path",
            FunctionCall::ClearFlightPath(_) => "clear_flight_path",
            FunctionCall::AnalyzeThermalZone(_) => "analyze_thermal_zone",
            FunctionCall::GenerateCustomPath(_) => "generate_custom_path",
        }
    }

    /// The argument object alone.
    pub fn arguments(&self) -> serde_json::Value {
        let value = match self {
            FunctionCall::GenerateFlightPath(a) => serde_json::to_value(a),
            FunctionCall::ClearFlightPath(a) => serde_json::to_value(a),
            FunctionCall::AnalyzeThermalZone(a) => serde_json::to_value(a),
            FunctionCall::GenerateCustomPath(a) => serde_json::to_value(a),
        };
        value.unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
    }

    pub fn is_known(name: &str) -> bool {
        KNOWN_FUNCTIONS.contains(&name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearRequest {
    pub uav_id: String,
}

/// Caller-supplied waypoints, typically from a remote model. `waypoints` is
/// kept as raw JSON and validated by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPathRequest {
    pub uav_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<serde_json::Value>,
}

/// Outcome of one dispatched action. Only `success`, `data` and `analysis`
/// are meant for machines; `message` is for people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FlightPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ThermalAnalysis>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            analysis: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            analysis: None,
        }
    }

    pub fn with_path(mut self, path: FlightPath) -> Self {
        self.data = Some(path);
        self
    }

    pub fn with_analysis(mut self, analysis: ThermalAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pattern;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let call: FunctionCall = serde_json::from_value(json!({
            "function_name": "generate_flight_path",
            "arguments": {"uav_id": "UAV-02", "area": "rooftop", "pattern": "spiral"}
        }))
        .unwrap();
        match &call {
            FunctionCall::GenerateFlightPath(req) => {
                assert_eq!(req.pattern, Pattern::Spiral);
                assert_eq!(req.num_waypoints, 10);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(call.name(), "generate_flight_path");
        assert_eq!(call.arguments()["area"], "rooftop");
    }

    #[test]
    fn test_known_names() {
        assert!(FunctionCall::is_known("clear_flight_path"));
        assert!(!FunctionCall::is_known("launch_rockets"));
    }
}
