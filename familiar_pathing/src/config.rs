// Pathfinder configuration.
//
// `PathfinderConfig` holds the worker-pool settings and the defaults applied
// to jobs submitted through the convenience constructors on `Pathfinder`:
// search range, debug capture and the capability profile. Loaded from JSON;
// every field has a default, so partial configs are fine.
//
// See also: `options.rs` for `PathingOptions`, `pathfinder.rs` which consumes
// this config.

use crate::error::PathError;
use crate::job::min_window_cells;
use crate::options::PathingOptions;
use crate::snapshot::MAX_SNAPSHOT_CELLS;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Size of the worker pool.
    pub worker_threads: usize,
    /// Prefix for worker thread names (`{thread_name}-{index}`).
    pub thread_name: String,
    /// Range used by `move_to` / `move_away`. The visit cap is `range²`.
    /// Even a job whose start and end coincide snapshots a cube of side
    /// `range + 1`, so the range is capped by `MAX_SNAPSHOT_CELLS`.
    pub default_range: u32,
    /// Capture discovered/visited/path sets for every job.
    pub debug_capture: bool,
    /// Capability profile for convenience-submitted jobs.
    pub options: PathingOptions,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            worker_threads: 1,
            thread_name: "familiar-pathing".into(),
            default_range: 64,
            debug_capture: false,
            options: PathingOptions::default(),
        }
    }
}

impl PathfinderConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, PathError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PathError> {
        if self.worker_threads == 0 {
            return Err(PathError::InvalidConfig("worker_threads must be at least 1".into()));
        }
        if self.default_range == 0 {
            return Err(PathError::InvalidConfig("default_range must be at least 1".into()));
        }
        let cells = min_window_cells(self.default_range);
        if cells > MAX_SNAPSHOT_CELLS {
            return Err(PathError::InvalidConfig(format!(
                "default_range {} needs a snapshot of {cells} cells, over the limit of {MAX_SNAPSHOT_CELLS}",
                self.default_range
            )));
        }
        for (name, value) in self.options.multipliers() {
            if !value.is_finite() || value < 0.0 {
                return Err(PathError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
