// Produced path: the ordered points a mover follows.
//
// A `Path` is built once by `job.rs` when the search ends, by walking
// parent links back from the final node. It is a plain value: it holds no
// reference to the job, the snapshot or the world, and cannot be resumed.
// To re-path, submit a new job.

use familiar_voxel::{BlockPos, Direction};
use serde::{Deserialize, Serialize};

/// One position along a path, with movement annotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPoint {
    pub pos: BlockPos,
    /// Climbing at this point.
    pub on_ladder: bool,
    /// Side the climbable faces, set only where the path climbs upward.
    pub ladder_facing: Option<Direction>,
    pub on_rails: bool,
    /// First point of a rail segment.
    pub rails_entry: bool,
    /// First point after leaving a rail segment.
    pub rails_exit: bool,
    pub swimming: bool,
}

impl PathPoint {
    pub fn new(pos: BlockPos) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Start first, final node last. Never empty.
    pub points: Vec<PathPoint>,
    /// Where the goal says this path leads.
    pub target: BlockPos,
    /// The final node satisfied the destination predicate.
    pub reaches_destination: bool,
    /// Accumulated cost of the final node.
    pub cost: f64,
}

impl Path {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of moves (points minus one).
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<BlockPos> {
        self.points.first().map(|p| p.pos)
    }

    pub fn end(&self) -> Option<BlockPos> {
        self.points.last().map(|p| p.pos)
    }

    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.points.iter().map(|p| p.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_steps() {
        let path = Path {
            points: vec![
                PathPoint::new(BlockPos::new(0, 1, 0)),
                PathPoint::new(BlockPos::new(1, 1, 0)),
                PathPoint::new(BlockPos::new(2, 1, 0)),
            ],
            target: BlockPos::new(2, 1, 0),
            reaches_destination: true,
            cost: 2.0,
        };
        assert_eq!(path.steps(), 2);
        assert_eq!(path.start(), Some(BlockPos::new(0, 1, 0)));
        assert_eq!(path.end(), Some(BlockPos::new(2, 1, 0)));
        assert_eq!(path.positions().count(), 3);
    }

    #[test]
    fn point_serializes_with_facing() {
        let point = PathPoint {
            on_ladder: true,
            ladder_facing: Some(Direction::South),
            ..PathPoint::new(BlockPos::new(0, 2, 0))
        };
        let json = serde_json::to_string(&point).unwrap();
        let back: PathPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }
}
