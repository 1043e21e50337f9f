use crate::{FlightPath, PathStatus, PlanError, Result};
use std::collections::HashMap;
use tracing::info;

/// Current flight paths, at most one per UAV.
#[derive(Debug, Default, Clone)]
pub struct FlightPathRegistry {
    paths: HashMap<String, FlightPath>,
}

impl FlightPathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path`, replacing whatever its UAV owned before.
    pub fn upsert(&mut self, path: FlightPath) -> Option<FlightPath> {
        let replaced = self.paths.insert(path.uav_id.clone(), path);
        if let Some(old) = &replaced {
            info!(uav = %old.uav_id, old_path = %old.id, "replaced flight path");
        }
        replaced
    }

    /// Remove the UAV's path. Absent paths are not an error.
    pub fn remove_by_uav(&mut self, uav_id: &str) -> Option<FlightPath> {
        let removed = self.paths.remove(uav_id);
        if removed.is_some() {
            info!(uav = uav_id, "removed flight path");
        }
        removed
    }

    pub fn clear(&mut self) -> usize {
        let n = self.paths.len();
        self.paths.clear();
        info!(count = n, "cleared all flight paths");
        n
    }

    pub fn get(&self, uav_id: &str) -> Option<&FlightPath> {
        self.paths.get(uav_id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths ordered by UAV id, for renderers.
    pub fn snapshot(&self) -> Vec<FlightPath> {
        let mut out: Vec<FlightPath> = self.paths.values().cloned().collect();
        out.sort_by(|a, b| a.uav_id.cmp(&b.uav_id));
        out
    }

    pub fn set_status(&mut self, uav_id: &str, status: PathStatus) -> Result<()> {
        let path = self
            .paths
            .get_mut(uav_id)
            .ok_or_else(|| PlanError::NoPath(uav_id.to_string()))?;
        if !path.status.can_transition_to(status) {
            return Err(PlanError::InvalidTransition {
                from: path.status,
                to: status,
            });
        }
        info!(uav = uav_id, from = %path.status, to = %status, "flight path status");
        path.status = status;
        Ok(())
    }
}
