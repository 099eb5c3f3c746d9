// Worker-pool integration tests.
//
// These go through `Pathfinder` and `PathResult` the way a host would:
// submit jobs, poll or wait on handles, cancel. The key properties are that
// concurrent jobs do not influence each other (every job produces the same
// outcome it would produce alone) and that a faulting job is contained.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use familiar_pathing::{
    JobState, MoveToLocation, Node, PathGoal, PathJob, PathResult, Pathfinder, PathfinderConfig, PathingOptions,
    ResultStatus, SearchOutcome, Termination,
};
use familiar_voxel::{BlockKind, BlockPos, VoxelWorld};

/// Stone floor at y = 0 over x, z in `-16..=16`, with a few wall segments.
fn obstacle_world() -> VoxelWorld {
    let mut world = VoxelWorld::with_origin(BlockPos::new(-16, 0, -16), 33, 12, 33);
    world.fill(BlockPos::new(-16, 0, -16), BlockPos::new(16, 0, 16), BlockKind::Solid);
    world.fill(BlockPos::new(4, 1, -6), BlockPos::new(4, 2, 8), BlockKind::Solid);
    world.fill(BlockPos::new(-8, 1, 3), BlockPos::new(2, 2, 3), BlockKind::Solid);
    world.fill(BlockPos::new(-5, 1, -9), BlockPos::new(-5, 1, -2), BlockKind::Solid);
    world
}

fn pathfinder(workers: usize) -> Pathfinder {
    Pathfinder::new(PathfinderConfig {
        worker_threads: workers,
        default_range: 48,
        ..PathfinderConfig::default()
    })
    .unwrap()
}

fn goals() -> Vec<(BlockPos, BlockPos)> {
    vec![
        (BlockPos::new(0, 1, 0), BlockPos::new(10, 1, 2)),
        (BlockPos::new(-10, 1, -10), BlockPos::new(12, 1, 12)),
        (BlockPos::new(6, 1, 0), BlockPos::new(-6, 1, 6)),
        (BlockPos::new(-3, 1, 8), BlockPos::new(-3, 1, -8)),
        (BlockPos::new(14, 1, -14), BlockPos::new(-14, 1, 14)),
        (BlockPos::new(0, 1, -12), BlockPos::new(0, 1, 12)),
        (BlockPos::new(-12, 1, 0), BlockPos::new(12, 1, 0)),
        (BlockPos::new(2, 1, 2), BlockPos::new(3, 1, 9)),
    ]
}

fn job(world: &VoxelWorld, start: BlockPos, goal: BlockPos) -> PathJob {
    PathJob::new(world, start, goal, 48, MoveToLocation::exact(goal), PathingOptions::default()).unwrap()
}

#[test]
fn concurrent_jobs_match_sequential_runs() {
    let world = obstacle_world();
    let sequential: Vec<SearchOutcome> = goals()
        .into_iter()
        .map(|(start, goal)| job(&world, start, goal).search(&AtomicBool::new(false)))
        .collect();

    let pathfinder = pathfinder(4);
    let handles: Vec<PathResult> = goals()
        .into_iter()
        .map(|(start, goal)| pathfinder.submit(job(&world, start, goal)))
        .collect();

    for (handle, expected) in handles.iter().zip(&sequential) {
        let outcome = handle.wait();
        assert_eq!(&outcome, expected);
        assert_eq!(handle.status(), ResultStatus::Completed);
    }
}

#[test]
fn convenience_move_to_reaches_goal() {
    let world = obstacle_world();
    let pathfinder = pathfinder(2);
    let result = pathfinder
        .move_to(&world, BlockPos::new(0, 1, 0), BlockPos::new(10, 1, 2))
        .unwrap();
    let outcome = result.wait_timeout(Duration::from_secs(30)).unwrap();
    assert!(outcome.reaches_destination());
    assert!(result.is_done());
    assert!(result.path_reaches_destination());
    assert_eq!(result.job_state(), JobState::Finalized);
    let path = result.path().unwrap();
    assert_eq!(path.end(), Some(BlockPos::new(10, 1, 2)));
    // Never walks through the wall at x = 4.
    assert!(path.positions().all(|p| p.x != 4 || p.z < -6 || p.z > 8));
}

#[test]
fn cancelled_handle_completes_without_searching() {
    let world = obstacle_world();
    let pathfinder = pathfinder(1);
    let result = PathResult::new();
    result.cancel();
    pathfinder.submit_with(job(&world, BlockPos::new(0, 1, 0), BlockPos::new(10, 1, 2)), result.clone());

    let outcome = result.wait();
    assert_eq!(outcome.termination, Termination::Cancelled);
    assert!(outcome.path.is_none());
    assert_eq!(outcome.stats.nodes_visited, 0);
    assert_eq!(result.status(), ResultStatus::Cancelled);
    assert_eq!(result.job_state(), JobState::Cancelled);
    assert!(result.is_done());
    assert!(result.path().is_none());
    assert!(!result.path_reaches_destination());
}

/// Goal whose destination check panics.
struct Exploding;

impl PathGoal for Exploding {
    fn heuristic(&self, _pos: BlockPos) -> f64 {
        0.0
    }

    fn is_at_destination(&self, _node: &Node) -> bool {
        panic!("destination check failed");
    }

    fn node_result_score(&self, _node: &Node) -> f64 {
        0.0
    }
}

#[test]
fn faulting_job_is_contained() {
    let world = obstacle_world();
    let pathfinder = pathfinder(1);

    let start = BlockPos::new(0, 1, 0);
    let bad = PathJob::new(&world, start, start, 16, Exploding, PathingOptions::default()).unwrap();
    let handle = pathfinder.submit(bad);
    let faulted = handle.wait();
    assert_eq!(faulted.termination, Termination::Faulted);
    assert!(faulted.path.is_none());
    // The engine never got past searching.
    assert_eq!(handle.job_state(), JobState::Searching);

    // The single worker survived and still serves jobs.
    let good = pathfinder.submit(job(&world, start, BlockPos::new(2, 1, 0))).wait();
    assert_eq!(good.termination, Termination::DestinationReached);
}
