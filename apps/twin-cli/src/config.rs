use anyhow::{Context, Result};
use flight_plan::PlannerConfig;
use intent_parser::IntentConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinConfig {
    pub planner: PlannerConfig,
    pub intent: IntentConfig,
    /// Fixed seed for reproducible waypoint and temperature draws
    pub seed: Option<u64>,
}

impl TwinConfig {
    /// Read `path` if it exists, defaults otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading config: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing config: {}", path.display()))
        } else {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing config: {}", path.display()))?;
        Ok(())
    }
}
