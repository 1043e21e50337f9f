use crate::PathStatus;
use thiserror::Error;

pub type Result<T, E = PlanError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("unknown area: {0}")]
    UnknownArea(String),
    #[error("invalid waypoints: {0}")]
    InvalidWaypoints(&'static str),
    #[error("too many waypoints: {requested} requested, at most {max} allowed")]
    TooManyWaypoints { requested: u64, max: u32 },
    #[error("no flight path for {0}")]
    NoPath(String),
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: PathStatus, to: PathStatus },
    #[error("config error: {0}")]
    Config(String),
}
