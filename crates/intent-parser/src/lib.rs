//! Intent Parser for UAV flight requests
//!
//! This crate turns free-text chat requests ("generate 6 grid waypoints for
//! UAV-01 around Parking Area") into the function calls understood by the
//! `flight-plan` dispatcher, with a coarse confidence score.

mod entities;
mod error;
mod parser;

pub use entities::{EntityExtractor, Extraction};
pub use error::{IntentError, Result};
pub use parser::{Intent, IntentParser};

use flight_plan::generator::{DEFAULT_ALTITUDE_M, DEFAULT_WAYPOINTS};
use serde::{Deserialize, Serialize};

/// Configuration for intent parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Waypoint count when the text names none
    pub default_waypoints: u32,
    /// Altitude in meters when the text names none
    pub default_altitude: f64,
    /// Area assumed when a UAV and a generation verb appear without an area.
    /// `None` turns that guess off.
    pub fallback_area: Option<String>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            default_waypoints: DEFAULT_WAYPOINTS,
            default_altitude: DEFAULT_ALTITUDE_M,
            fallback_area: Some("central_plaza".to_string()),
        }
    }
}

/// Create a new intent parser with default configuration
pub fn create_parser() -> Result<IntentParser> {
    tracing::info!("Initializing Intent Parser");
    IntentParser::new(IntentConfig::default())
}

/// Parse a request with a default parser
pub fn parse_command(text: &str) -> Result<Intent> {
    let parser = create_parser()?;
    Ok(parser.parse(text))
}

/// Message shown when nothing in the text could be understood.
pub fn help_text() -> String {
    format!(
        "I can plan, clear or analyze UAV flights. Try:\n\
         - \"Generate 8 waypoints for UAV-01 around Central Plaza\"\n\
         - \"Plan a grid patrol for UAV-02 over Parking Area at 120m\"\n\
         - \"Clear flight path for UAV-03\"\n\
         - \"Analyze thermal risk at Rooftop\"\n\
         Known areas: {}",
        flight_plan::areas::names().join(", ")
    )
}
