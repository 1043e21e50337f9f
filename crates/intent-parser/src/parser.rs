//! Ordered rule cascade from utterance to function call

use crate::entities::{EntityExtractor, Extraction};
use crate::{IntentConfig, IntentError, Result};
use flight_plan::{areas, ClearRequest, FunctionCall, PathRequest, ZoneQuery};
use regex::Regex;
use serde_json::{json, Value};

/// Result of parsing one utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    /// The resolved call, if any rule fired
    pub call: Option<FunctionCall>,
    /// Evidence score (0.0 to 1.0); not a probability
    pub confidence: f64,
}

impl Intent {
    pub fn none() -> Self {
        Self {
            call: None,
            confidence: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.call.is_some()
    }

    pub fn function_name(&self) -> Option<&'static str> {
        self.call.as_ref().map(FunctionCall::name)
    }

    /// Argument object of the call; `{}` when nothing matched.
    pub fn arguments(&self) -> Value {
        self.call
            .as_ref()
            .map(FunctionCall::arguments)
            .unwrap_or_else(|| json!({}))
    }

    pub fn to_json(&self) -> Value {
        json!({
            "function_name": self.function_name(),
            "arguments": self.arguments(),
            "confidence": self.confidence,
        })
    }
}

struct Vocabulary {
    clear: Regex,
    analyze: Regex,
    thermal: Regex,
    generate: Regex,
}

impl Vocabulary {
    fn new() -> Result<Self> {
        Ok(Self {
            clear: Regex::new(r"(?i)clear|remove|delete|清除|删除")?,
            analyze: Regex::new(r"(?i)analy[sz]|分析")?,
            thermal: Regex::new(r"(?i)thermal|heat|热")?,
            generate: Regex::new(r"(?i)generate|create|plan|fly|patrol|生成|创建|规划|巡逻")?,
        })
    }
}

/// What a rule sees when it is evaluated.
struct RuleContext<'a> {
    text: &'a str,
    entities: &'a Extraction,
    vocab: &'a Vocabulary,
    fallback_area: Option<&'a str>,
}

/// One step of the decision policy. `resolve` is both the predicate and the
/// builder: it returns a call only when the rule applies.
struct IntentRule {
    name: &'static str,
    confidence: f64,
    resolve: fn(&RuleContext<'_>) -> Option<FunctionCall>,
}

fn path_request(e: &Extraction, uav_id: &str, area: &str) -> PathRequest {
    PathRequest::new(uav_id, area)
        .with_waypoints(e.num_waypoints)
        .with_altitude(e.altitude)
        .with_pattern(e.pattern)
}

fn rule_clear(ctx: &RuleContext<'_>) -> Option<FunctionCall> {
    if !ctx.vocab.clear.is_match(ctx.text) {
        return None;
    }
    let uav_id = ctx.entities.uav_id.clone()?;
    Some(FunctionCall::ClearFlightPath(ClearRequest { uav_id }))
}

fn rule_analyze(ctx: &RuleContext<'_>) -> Option<FunctionCall> {
    if !(ctx.vocab.analyze.is_match(ctx.text) && ctx.vocab.thermal.is_match(ctx.text)) {
        return None;
    }
    let area = ctx.entities.area?;
    Some(FunctionCall::AnalyzeThermalZone(ZoneQuery::new(area.name)))
}

fn rule_generate(ctx: &RuleContext<'_>) -> Option<FunctionCall> {
    let e = ctx.entities;
    let (uav_id, area) = (e.uav_id.as_deref()?, e.area?);
    Some(FunctionCall::GenerateFlightPath(path_request(
        e, uav_id, area.slug,
    )))
}

fn rule_generate_guess(ctx: &RuleContext<'_>) -> Option<FunctionCall> {
    let e = ctx.entities;
    let uav_id = e.uav_id.as_deref()?;
    let area = ctx.fallback_area?;
    if e.area.is_some() || !ctx.vocab.generate.is_match(ctx.text) {
        return None;
    }
    Some(FunctionCall::GenerateFlightPath(path_request(
        e, uav_id, area,
    )))
}

/// Decision policy, evaluated top to bottom; the first rule that resolves wins.
/// Reordering these changes behavior.
const RULES: [IntentRule; 4] = [
    IntentRule {
        name: "clear",
        confidence: 0.9,
        resolve: rule_clear,
    },
    IntentRule {
        name: "analyze",
        confidence: 0.85,
        resolve: rule_analyze,
    },
    IntentRule {
        name: "generate",
        confidence: 0.95,
        resolve: rule_generate,
    },
    IntentRule {
        name: "generate_guess",
        confidence: 0.6,
        resolve: rule_generate_guess,
    },
];

/// Main intent parser
pub struct IntentParser {
    config: IntentConfig,
    extractor: EntityExtractor,
    vocab: Vocabulary,
}

impl IntentParser {
    /// Create a new intent parser
    pub fn new(config: IntentConfig) -> Result<Self> {
        if let Some(area) = &config.fallback_area {
            if areas::lookup(area).is_none() {
                return Err(IntentError::UnknownArea(area.clone()));
            }
        }
        let extractor = EntityExtractor::new(config.default_waypoints, config.default_altitude)?;
        Ok(Self {
            config,
            extractor,
            vocab: Vocabulary::new()?,
        })
    }

    pub fn config(&self) -> &IntentConfig {
        &self.config
    }

    /// Rule names in evaluation order.
    pub fn rule_names() -> Vec<&'static str> {
        RULES.iter().map(|r| r.name).collect()
    }

    /// Parse a text command into a function call
    pub fn parse(&self, text: &str) -> Intent {
        let text = text.trim();
        let entities = self.extractor.extract(text);
        let ctx = RuleContext {
            text,
            entities: &entities,
            vocab: &self.vocab,
            fallback_area: self.config.fallback_area.as_deref(),
        };

        for rule in &RULES {
            if let Some(call) = (rule.resolve)(&ctx) {
                tracing::debug!(rule = rule.name, function = call.name(), "intent matched");
                return Intent {
                    call: Some(call),
                    confidence: rule.confidence,
                };
            }
        }

        tracing::debug!(text, "no intent matched");
        Intent::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_plan::Pattern;

    fn parser() -> IntentParser {
        IntentParser::new(IntentConfig::default()).unwrap()
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            IntentParser::rule_names(),
            vec!["clear", "analyze", "generate", "generate_guess"]
        );
    }

    #[test]
    fn test_clear() {
        let intent = parser().parse("Clear flight path for UAV-02");
        assert_eq!(intent.function_name(), Some("clear_flight_path"));
        assert_eq!(intent.arguments(), json!({"uav_id": "UAV-02"}));
        assert_eq!(intent.confidence, 0.9);
    }

    #[test]
    fn test_generate_full() {
        let intent = parser().parse("Generate 6 grid waypoints for UAV-01 around Parking Area");
        assert_eq!(intent.function_name(), Some("generate_flight_path"));
        assert_eq!(
            intent.arguments(),
            json!({
                "uav_id": "UAV-01",
                "area": "parking_area",
                "num_waypoints": 6,
                "altitude": 100.0,
                "pattern": "grid"
            })
        );
        assert_eq!(intent.confidence, 0.95);
    }

    #[test]
    fn test_confidence_survives_json() {
        let p = parser();
        let cases = [
            ("Generate 6 grid waypoints for UAV-01 around Parking Area", json!(0.95)),
            ("Clear flight path for UAV-02", json!(0.9)),
            ("Analyze the thermal situation at the rooftop", json!(0.85)),
            ("patrol with uav4", json!(0.6)),
        ];
        for (text, expected) in cases {
            assert_eq!(p.parse(text).to_json()["confidence"], expected, "{text}");
        }
    }

    #[test]
    fn test_uav_number_is_not_waypoint_count() {
        let intent = parser().parse("Plan UAV 3 patrol points around Rooftop");
        assert_eq!(intent.function_name(), Some("generate_flight_path"));
        assert_eq!(intent.arguments()["uav_id"], "UAV-03");
        assert_eq!(intent.arguments()["num_waypoints"], 10);
    }

    #[test]
    fn test_no_match() {
        let intent = parser().parse("hello there");
        assert_eq!(intent, Intent::none());
        assert_eq!(intent.function_name(), None);
        assert_eq!(intent.arguments(), json!({}));
        assert_eq!(intent.confidence, 0.0);
    }

    #[test]
    fn test_analyze() {
        let intent = parser().parse("Analyze the thermal situation at the rooftop");
        assert_eq!(intent.function_name(), Some("analyze_thermal_zone"));
        assert_eq!(intent.arguments(), json!({"zone": "Rooftop"}));
        assert_eq!(intent.confidence, 0.85);
    }

    #[test]
    fn test_clear_without_uav_falls_through() {
        // No UAV id: the clear rule cannot fire and nothing else applies.
        let intent = parser().parse("clear everything");
        assert!(!intent.is_match());
    }

    #[test]
    fn test_clear_outranks_generate() {
        let intent = parser().parse("remove the patrol of uav1 over building a");
        assert_eq!(intent.function_name(), Some("clear_flight_path"));
        assert_eq!(intent.arguments()["uav_id"], "UAV-01");
    }

    #[test]
    fn test_analyze_outranks_generate() {
        let intent = parser().parse("uav 2 analyze heat at green zone");
        assert_eq!(intent.function_name(), Some("analyze_thermal_zone"));
    }

    #[test]
    fn test_guess_uses_fallback_area() {
        let intent = parser().parse("patrol with uav4 in a spiral at 60m");
        assert_eq!(intent.confidence, 0.6);
        match intent.call {
            Some(FunctionCall::GenerateFlightPath(req)) => {
                assert_eq!(req.uav_id, "UAV-04");
                assert_eq!(req.area, "central_plaza");
                assert_eq!(req.pattern, Pattern::Spiral);
                assert_eq!(req.altitude, 60.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_uav_without_verb_or_area() {
        assert!(!parser().parse("status of uav3").is_match());
    }

    #[test]
    fn test_fallback_area_disabled() {
        let config = IntentConfig {
            fallback_area: None,
            ..IntentConfig::default()
        };
        let parser = IntentParser::new(config).unwrap();
        assert!(!parser.parse("patrol with uav4").is_match());
    }

    #[test]
    fn test_unknown_fallback_area_rejected() {
        let config = IntentConfig {
            fallback_area: Some("moon_base".to_string()),
            ..IntentConfig::default()
        };
        assert!(matches!(
            IntentParser::new(config),
            Err(IntentError::UnknownArea(_))
        ));
    }

    #[test]
    fn test_chinese_request() {
        let intent = parser().parse("为UAV3生成8个航点的网格航线，覆盖停车场 parking area，高度120米");
        assert_eq!(intent.function_name(), Some("generate_flight_path"));
        let args = intent.arguments();
        assert_eq!(args["uav_id"], "UAV-03");
        assert_eq!(args["num_waypoints"], 8);
        assert_eq!(args["pattern"], "grid");
        assert_eq!(args["altitude"], 120.0);
    }
}
