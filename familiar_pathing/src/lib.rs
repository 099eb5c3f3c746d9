// familiar_pathing: terrain-aware path jobs over a voxel world.
//
// A familiar (a pet that follows its owner around) asks for a walking route
// through a block world. Each request becomes a `PathJob`: an immutable
// snapshot of the surrounding blocks, a goal strategy and a capability
// profile. The job runs a bounded best-first search on a worker pool and
// publishes a `Path` (or a best-effort path toward the goal) through a
// shared `PathResult` handle the caller polls or waits on.
//
// Module overview:
// - `pathfinder.rs`: `Pathfinder`, rayon worker pool, job submission, fault isolation.
// - `job.rs`:        `PathJob`, the search loop, neighbour expansion, path finalization.
// - `result.rs`:     `PathResult`, cancellable handle shared between caller and worker;
//                    reports the outcome and the job's last `JobState`.
// - `goal.rs`:       `PathGoal` trait, `MoveToLocation`, `MoveAwayFromLocation`.
// - `node.rs`:       Search node arena entries and open-set ordering.
// - `ground.rs`:     Landing-height resolution (step up, drop, swim, climb).
// - `surface.rs`:    `BlockView`, classification into surface types; passability.
// - `cost.rs`:       Per-step cost model.
// - `options.rs`:    `PathingOptions`, capability flags and cost multipliers.
// - `snapshot.rs`:   `WorldSnapshot`, bounded immutable copy of states, fluids and shapes.
// - `start.rs`:      Start-block correction for an entity's float position.
// - `path.rs`:       `Path` / `PathPoint`, the produced route with annotations.
// - `debug.rs`:      Optional discovered/visited/path capture for one job.
// - `config.rs`:     `PathfinderConfig`, JSON-loadable pool and job defaults.
// - `error.rs`:      `PathError`, construction-time failures.
//
// **Critical constraint: determinism.** For a given snapshot, start, goal
// and options a job always expands nodes in the same order and produces the
// same path, whichever worker runs it and whatever else runs concurrently.

pub mod config;
pub mod cost;
pub mod debug;
pub mod error;
pub mod goal;
pub mod ground;
pub mod job;
pub mod node;
pub mod options;
pub mod path;
pub mod pathfinder;
pub mod result;
pub mod snapshot;
pub mod start;
pub mod surface;

pub use config::PathfinderConfig;
pub use cost::Step;
pub use debug::DebugCapture;
pub use error::PathError;
pub use goal::{MoveAwayFromLocation, MoveToLocation, PathGoal};
pub use job::{JobState, PathJob, Restriction, SearchOutcome, SearchStats, Termination};
pub use node::{Node, NodeId};
pub use options::PathingOptions;
pub use path::{Path, PathPoint};
pub use pathfinder::Pathfinder;
pub use result::{PathResult, ResultStatus};
pub use snapshot::WorldSnapshot;
pub use start::{EntitySnapshot, prepare_start};
pub use surface::{BlockView, SurfaceType};
