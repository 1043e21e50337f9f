//! flight-plan: UAV flight planning over the campus thermal map
//!
//! This crate holds the pieces that turn a resolved request into flight-path
//! state:
//! - the fixed table of named campus areas and their anchors
//! - waypoint generation (circle, grid, spiral, line) with injectable randomness
//! - the per-UAV flight-path registry
//! - synthetic thermal zone analysis
//! - the dispatcher that applies function calls to the registry

pub mod areas;
pub use areas::Area;

mod error;
pub use error::{PlanError, Result};

mod types;
pub use types::{
    uav_color, FlightPath, PathSource, PathStatus, Pattern, Waypoint,
    FALLBACK_COLOR, MAP_MAX, MAP_MIN,
};

mod config;
pub use config::PlannerConfig;

pub mod generator;
pub use generator::{PathGenerator, PathRequest, RandomSource, RngSource};

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::MidpointSource;

mod registry;
pub use registry::FlightPathRegistry;

pub mod thermal;
pub use thermal::{RiskLevel, ThermalAnalysis, ZoneQuery};

mod actions;
pub use actions::{ActionResult, ClearRequest, CustomPathRequest, FunctionCall, KNOWN_FUNCTIONS};

mod dispatcher;
pub use dispatcher::Dispatcher;

/// Dispatcher used outside of tests: OS-seeded unless `seed` pins the draws.
pub type DefaultDispatcher = Dispatcher<RngSource<rand::rngs::StdRng>>;

/// Create a dispatcher, optionally with reproducible draws.
pub fn create_dispatcher(config: PlannerConfig, seed: Option<u64>) -> Result<DefaultDispatcher> {
    config.validate()?;
    let rng = match seed {
        Some(seed) => {
            tracing::info!(seed, "Initializing flight planner (seeded)");
            RngSource::seeded(seed)
        }
        None => {
            tracing::info!("Initializing flight planner");
            RngSource::from_entropy()
        }
    };
    Ok(Dispatcher::new(rng, config))
}
