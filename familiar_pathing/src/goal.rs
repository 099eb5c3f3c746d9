// Goal strategies for path jobs.
//
// A `PathGoal` supplies the three search-type-specific functions the engine
// needs: the heuristic `h` for a position, the destination predicate, and a
// result score used to pick the best fallback node when no destination is
// reached (lower is better). Goals are plain values moved into the job, so
// they must be `Send`; the engine only ever calls them from the job's worker.
//
// Two strategies ship with the crate:
// - `MoveToLocation`: walk to (or near) a fixed block.
// - `MoveAwayFromLocation`: flee until at least `distance` blocks from a point.
//
// See also: `job.rs`, which drives the search and calls these per node.

use crate::node::Node;
use familiar_voxel::BlockPos;

/// Multiplier on the straight-line heuristic. Slightly inadmissible, which
/// breaks score ties in favour of nodes closer to the goal.
pub const TIE_BREAKER: f64 = 1.005;

/// Horizontal reach for a node standing one block below a slack destination.
pub const ADJACENT_SLACK: f64 = 1.5;

/// Search-type-specific callbacks injected into a path job.
pub trait PathGoal: Send {
    /// Estimated remaining cost from `pos`.
    fn heuristic(&self, pos: BlockPos) -> f64;

    /// Is `node` an acceptable end of the path?
    fn is_at_destination(&self, node: &Node) -> bool;

    /// Ranking for best-effort fallback; lower is better.
    fn node_result_score(&self, node: &Node) -> f64;

    /// Position the produced path reports as its target.
    fn path_target(&self, node: &Node) -> BlockPos {
        node.pos
    }
}

impl<G: PathGoal + ?Sized> PathGoal for Box<G> {
    fn heuristic(&self, pos: BlockPos) -> f64 {
        (**self).heuristic(pos)
    }

    fn is_at_destination(&self, node: &Node) -> bool {
        (**self).is_at_destination(node)
    }

    fn node_result_score(&self, node: &Node) -> f64 {
        (**self).node_result_score(node)
    }

    fn path_target(&self, node: &Node) -> BlockPos {
        (**self).path_target(node)
    }
}

// ---------------------------------------------------------------------------
// MoveToLocation
// ---------------------------------------------------------------------------

/// Walk to `destination`, or to within `slack` blocks of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveToLocation {
    pub destination: BlockPos,
    pub slack: f64,
}

impl MoveToLocation {
    pub fn exact(destination: BlockPos) -> Self {
        Self {
            destination,
            slack: 0.0,
        }
    }

    pub fn with_slack(destination: BlockPos, slack: f64) -> Self {
        Self { destination, slack }
    }
}

impl PathGoal for MoveToLocation {
    fn heuristic(&self, pos: BlockPos) -> f64 {
        pos.distance(self.destination) * TIE_BREAKER
    }

    fn is_at_destination(&self, node: &Node) -> bool {
        if self.slack <= 0.0 {
            return node.pos == self.destination;
        }
        if node.pos.y == self.destination.y - 1 {
            let level = BlockPos::new(node.pos.x, self.destination.y, node.pos.z);
            return level.distance(self.destination) < ADJACENT_SLACK;
        }
        node.pos.distance(self.destination) < self.slack
    }

    fn node_result_score(&self, node: &Node) -> f64 {
        node.pos.distance_squared(self.destination)
    }
}

// ---------------------------------------------------------------------------
// MoveAwayFromLocation
// ---------------------------------------------------------------------------

/// Flee from `avoid` until at least `distance` blocks away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveAwayFromLocation {
    pub avoid: BlockPos,
    pub distance: f64,
}

impl MoveAwayFromLocation {
    pub fn new(avoid: BlockPos, distance: f64) -> Self {
        Self { avoid, distance }
    }
}

impl PathGoal for MoveAwayFromLocation {
    fn heuristic(&self, pos: BlockPos) -> f64 {
        (self.distance - pos.distance(self.avoid)).max(0.0) * TIE_BREAKER
    }

    fn is_at_destination(&self, node: &Node) -> bool {
        node.pos.distance_squared(self.avoid) >= self.distance * self.distance
    }

    fn node_result_score(&self, node: &Node) -> f64 {
        -node.pos.distance_squared(self.avoid)
    }
}
