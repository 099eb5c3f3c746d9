// Asynchronous path job harness.
//
// `Pathfinder` owns a bounded rayon thread pool. Each submitted `PathJob`
// runs as one independent task on that pool; a single search is strictly
// sequential, parallelism only comes from running several jobs at once.
// Jobs share nothing mutable: each owns its snapshot, and the `PathResult`
// handle is the only object the caller and the worker both see.
//
// Failure isolation: the search runs inside `catch_unwind`. A panicking job
// is logged at `warn` and published as `Termination::Faulted` with no path;
// the worker thread and every other job carry on. Jobs never retry; callers
// submit a fresh job if they want another attempt. The convenience
// constructors capture the job's snapshot on the calling thread and return
// `PathError::SnapshotTooLarge` instead of queueing a job whose window is
// over the snapshot limit.
//
// See also: `job.rs` for the search itself, `result.rs` for the handle.

use crate::config::PathfinderConfig;
use crate::error::PathError;
use crate::goal::{MoveAwayFromLocation, MoveToLocation, PathGoal};
use crate::job::{JobState, PathJob, SearchOutcome, Termination};
use crate::result::PathResult;
use crate::start::{EntitySnapshot, prepare_start};
use familiar_voxel::{BlockPos, BlockReader};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub struct Pathfinder {
    pool: rayon::ThreadPool,
    config: PathfinderConfig,
}

impl std::fmt::Debug for Pathfinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pathfinder")
            .field("workers", &self.pool.current_num_threads())
            .field("config", &self.config)
            .finish()
    }
}

impl Pathfinder {
    pub fn new(config: PathfinderConfig) -> Result<Self, PathError> {
        config.validate()?;
        let prefix = config.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()?;
        Ok(Self { pool, config })
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queue `job` and return its handle.
    pub fn submit(&self, job: PathJob) -> PathResult {
        let result = PathResult::new();
        self.submit_with(job, result.clone());
        result
    }

    /// Queue `job`, publishing into an existing handle. A handle that was
    /// cancelled beforehand completes as cancelled without searching.
    pub fn submit_with(&self, job: PathJob, result: PathResult) {
        self.pool.spawn(move || run_job(job, &result));
    }

    /// Walk from `start` to exactly `destination`.
    pub fn move_to<R: BlockReader + ?Sized>(
        &self,
        reader: &R,
        start: BlockPos,
        destination: BlockPos,
    ) -> Result<PathResult, PathError> {
        let goal = MoveToLocation::exact(destination);
        Ok(self.submit(self.job(reader, start, destination, goal)?))
    }

    /// Walk an entity to `destination`, correcting its start block first.
    pub fn move_entity_to<R: BlockReader + ?Sized>(
        &self,
        reader: &R,
        entity: &EntitySnapshot,
        destination: BlockPos,
    ) -> Result<PathResult, PathError> {
        let start = prepare_start(reader, entity);
        self.move_to(reader, start, destination)
    }

    /// Flee from `avoid` until at least `distance` blocks away.
    pub fn move_away<R: BlockReader + ?Sized>(
        &self,
        reader: &R,
        start: BlockPos,
        avoid: BlockPos,
        distance: f64,
    ) -> Result<PathResult, PathError> {
        let goal = MoveAwayFromLocation::new(avoid, distance);
        Ok(self.submit(self.job(reader, start, avoid, goal)?))
    }

    /// Build a goal-directed job with this pathfinder's defaults.
    pub fn job<R, G>(&self, reader: &R, start: BlockPos, end: BlockPos, goal: G) -> Result<PathJob, PathError>
    where
        R: BlockReader + ?Sized,
        G: PathGoal + 'static,
    {
        let job = PathJob::new(reader, start, end, self.config.default_range, goal, self.config.options.clone())?;
        Ok(if self.config.debug_capture {
            job.with_debug_capture()
        } else {
            job
        })
    }
}

/// Worker body: run one job and publish its outcome.
fn run_job(mut job: PathJob, result: &PathResult) {
    let start = job.start();
    if result.is_cancel_requested() {
        log::trace!("path job from {start} cancelled before it started");
        result.publish(SearchOutcome::empty(Termination::Cancelled), JobState::Cancelled);
        return;
    }

    result.mark_computing();
    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| job.search(result.cancel_flag()))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            log::warn!("path job from {start} faulted: {}", panic_message(&*payload));
            SearchOutcome::empty(Termination::Faulted)
        }
    };
    result.publish(outcome, job.state());
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultStatus;
    use familiar_voxel::{BlockKind, VoxelWorld};

    fn plane() -> VoxelWorld {
        let mut world = VoxelWorld::with_origin(BlockPos::new(-16, 0, -16), 33, 8, 33);
        world.fill(BlockPos::new(-16, 0, -16), BlockPos::new(16, 0, 16), BlockKind::Solid);
        world
    }

    #[test]
    fn builds_named_pool() {
        let config = PathfinderConfig {
            worker_threads: 2,
            ..PathfinderConfig::default()
        };
        let pathfinder = Pathfinder::new(config).unwrap();
        assert_eq!(pathfinder.worker_threads(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PathfinderConfig {
            worker_threads: 0,
            ..PathfinderConfig::default()
        };
        assert!(matches!(Pathfinder::new(config), Err(PathError::InvalidConfig(_))));
    }

    #[test]
    fn move_to_completes() {
        let world = plane();
        let pathfinder = Pathfinder::new(PathfinderConfig::default()).unwrap();
        let result = pathfinder.move_to(&world, BlockPos::new(0, 1, 0), BlockPos::new(6, 1, 3)).unwrap();
        let outcome = result.wait();
        assert_eq!(outcome.termination, Termination::DestinationReached);
        assert_eq!(result.status(), ResultStatus::Completed);
        assert_eq!(result.job_state(), JobState::Finalized);
        assert!(result.path_reaches_destination());
        assert_eq!(result.path().unwrap().end(), Some(BlockPos::new(6, 1, 3)));
    }

    #[test]
    fn entity_start_is_corrected() {
        let world = plane();
        let pathfinder = Pathfinder::new(PathfinderConfig::default()).unwrap();
        let entity = EntitySnapshot::at(0.5, 5.0, 0.5);
        let path = pathfinder
            .move_entity_to(&world, &entity, BlockPos::new(2, 1, 0))
            .unwrap()
            .wait()
            .path
            .unwrap();
        assert_eq!(path.start(), Some(BlockPos::new(0, 1, 0)));
    }

    #[test]
    fn move_away_flees() {
        let world = plane();
        let pathfinder = Pathfinder::new(PathfinderConfig::default()).unwrap();
        let avoid = BlockPos::new(0, 1, 0);
        let outcome = pathfinder.move_away(&world, BlockPos::new(1, 1, 1), avoid, 5.0).unwrap().wait();
        assert!(outcome.reaches_destination());
        let end = outcome.path.unwrap().end().unwrap();
        assert!(end.distance(avoid) >= 5.0);
    }

    #[test]
    fn config_debug_capture_applies_to_jobs() {
        let world = plane();
        let config = PathfinderConfig {
            debug_capture: true,
            ..PathfinderConfig::default()
        };
        let pathfinder = Pathfinder::new(config).unwrap();
        let outcome = pathfinder.move_to(&world, BlockPos::new(0, 1, 0), BlockPos::new(3, 1, 0)).unwrap().wait();
        assert!(outcome.debug.is_some());
    }

    #[test]
    fn oversized_convenience_job_is_refused() {
        let world = plane();
        let pathfinder = Pathfinder::new(PathfinderConfig::default()).unwrap();
        // Far enough apart that the padded window is over the cell limit.
        let err = pathfinder
            .move_to(&world, BlockPos::new(0, 1, 0), BlockPos::new(4000, 1, 4000))
            .unwrap_err();
        assert!(matches!(err, PathError::SnapshotTooLarge { .. }));
    }

    #[test]
    fn panic_messages_are_extracted() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
