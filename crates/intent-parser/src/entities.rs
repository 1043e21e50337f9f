//! Entity extraction: UAV id, waypoint count, altitude, pattern and area

use crate::Result;
use flight_plan::{areas, Area, Pattern};
use regex::Regex;

/// Everything pulled out of one utterance. Each field is extracted
/// independently of the others.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Normalized as `UAV-0<digits>`
    pub uav_id: Option<String>,
    pub num_waypoints: u32,
    pub altitude: f64,
    pub pattern: Pattern,
    pub area: Option<&'static Area>,
}

struct AreaMatcher {
    area: &'static Area,
    by_name: Regex,
    by_slug: Regex,
}

impl AreaMatcher {
    fn new(area: &'static Area) -> Result<Self> {
        let slug = area
            .slug
            .split('_')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"[_\s]?");
        Ok(Self {
            area,
            by_name: Regex::new(&format!("(?i){}", regex::escape(area.name)))?,
            by_slug: Regex::new(&format!("(?i){slug}"))?,
        })
    }

    fn is_match(&self, text: &str) -> bool {
        self.by_name.is_match(text) || self.by_slug.is_match(text)
    }
}

/// Pattern keywords in priority order; the first hit wins.
const PATTERN_KEYWORDS: [(Pattern, &[&str]); 3] = [
    (Pattern::Grid, &["grid", "网格"]),
    (Pattern::Spiral, &["spiral", "螺旋"]),
    (Pattern::Line, &["line", "直线"]),
];

pub struct EntityExtractor {
    uav: Regex,
    count: Regex,
    altitude: Regex,
    areas: Vec<AreaMatcher>,
    default_waypoints: u32,
    default_altitude: f64,
}

impl EntityExtractor {
    pub fn new(default_waypoints: u32, default_altitude: f64) -> Result<Self> {
        let areas = areas::all()
            .iter()
            .map(AreaMatcher::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            uav: Regex::new(r"(?i)uav[-_\s]?0?(\d+)")?,
            // Only a pattern keyword may sit between the number and the noun
            // ("6 grid waypoints"); "UAV 3 patrol points" carries no count.
            count: Regex::new(
                r"(?i)(\d+)\s*(?:(?:grid|spiral|line|circle)\s+)?(?:waypoints?|points?|个?航点)",
            )?,
            altitude: Regex::new(
                r"(?i)(\d+)\s*(?:meters?|m|米)(?:\s*(?:altitude|高度))?(?:[^a-z]|$)",
            )?,
            areas,
            default_waypoints,
            default_altitude,
        })
    }

    pub fn extract(&self, text: &str) -> Extraction {
        let extraction = Extraction {
            uav_id: self.extract_uav(text),
            num_waypoints: self.extract_count(text),
            altitude: self.extract_altitude(text),
            pattern: extract_pattern(text),
            area: self.extract_area(text),
        };
        tracing::debug!(?extraction, "extracted entities");
        extraction
    }

    /// `uav3` -> `UAV-03`, `UAV-02` -> `UAV-02`, `UAV 12` -> `UAV-012`.
    /// The zero is a fixed one-character prefix, not a width.
    fn extract_uav(&self, text: &str) -> Option<String> {
        self.uav
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| format!("UAV-0{}", m.as_str()))
    }

    fn extract_count(&self, text: &str) -> u32 {
        self.count
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(self.default_waypoints)
    }

    fn extract_altitude(&self, text: &str) -> f64 {
        self.altitude
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(self.default_altitude)
    }

    fn extract_area(&self, text: &str) -> Option<&'static Area> {
        self.areas
            .iter()
            .find(|m| m.is_match(text))
            .map(|m| m.area)
    }
}

fn extract_pattern(text: &str) -> Pattern {
    let lower = text.to_lowercase();
    PATTERN_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(*w)))
        .map(|(pattern, _)| *pattern)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(10, 100.0).unwrap()
    }

    #[test]
    fn test_uav_normalization() {
        let ex = extractor();
        let cases = [
            ("send uav3 out", Some("UAV-03")),
            ("UAV-02 please", Some("UAV-02")),
            ("uav_4", Some("UAV-04")),
            ("UAV 12 now", Some("UAV-012")),
            ("no drone here", None),
        ];
        for (text, expected) in cases {
            assert_eq!(ex.extract(text).uav_id.as_deref(), expected, "{text}");
        }
    }

    #[test]
    fn test_count_and_altitude() {
        let ex = extractor();
        let e = ex.extract("plan 8 waypoints at 120m altitude");
        assert_eq!(e.num_waypoints, 8);
        assert_eq!(e.altitude, 120.0);

        let e = ex.extract("fly 5 points at 80 meters");
        assert_eq!(e.num_waypoints, 5);
        assert_eq!(e.altitude, 80.0);

        let e = ex.extract("生成12个航点 150米高度");
        assert_eq!(e.num_waypoints, 12);
        assert_eq!(e.altitude, 150.0);
    }

    #[test]
    fn test_defaults_when_absent() {
        let e = extractor().extract("patrol for 10 minutes");
        assert_eq!(e.num_waypoints, 10);
        assert_eq!(e.altitude, 100.0);
        assert_eq!(e.pattern, Pattern::Circle);
    }

    #[test]
    fn test_count_allows_pattern_word_between() {
        let ex = extractor();
        assert_eq!(ex.extract("6 grid waypoints").num_waypoints, 6);
        assert_eq!(ex.extract("4 Spiral points").num_waypoints, 4);
    }

    #[test]
    fn test_uav_digits_are_not_a_count() {
        let e = extractor().extract("Plan UAV 3 patrol points around Rooftop");
        assert_eq!(e.uav_id.as_deref(), Some("UAV-03"));
        assert_eq!(e.num_waypoints, 10);

        let e = extractor().extract("uav2 survey points");
        assert_eq!(e.num_waypoints, 10);
    }

    #[test]
    fn test_pattern_priority() {
        assert_eq!(extract_pattern("grid then spiral"), Pattern::Grid);
        assert_eq!(extract_pattern("a SPIRAL along the line"), Pattern::Spiral);
        assert_eq!(extract_pattern("straight line"), Pattern::Line);
        assert_eq!(extract_pattern("螺旋航线"), Pattern::Spiral);
        assert_eq!(extract_pattern("around it"), Pattern::Circle);
    }

    #[test]
    fn test_every_area_matches_by_name_and_slug() {
        let ex = extractor();
        for area in areas::all() {
            let by_name = ex.extract(&format!("survey {}", area.name.to_uppercase()));
            assert_eq!(by_name.area.map(|a| a.slug), Some(area.slug), "{}", area.name);

            let by_slug = ex.extract(&format!("survey {}", area.slug));
            assert_eq!(by_slug.area.map(|a| a.slug), Some(area.slug), "{}", area.slug);

            let spaced = ex.extract(&format!("survey {}", area.slug.replace('_', " ")));
            assert_eq!(spaced.area.map(|a| a.slug), Some(area.slug), "{}", area.slug);
        }
    }

    #[test]
    fn test_first_area_in_table_wins() {
        let e = extractor().extract("from the rooftop to the central plaza");
        assert_eq!(e.area.map(|a| a.slug), Some("central_plaza"));
    }
}
