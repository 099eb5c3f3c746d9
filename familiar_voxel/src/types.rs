// Spatial types shared by the world model and the pathfinder.
//
// `BlockPos` is an integer block coordinate; `Direction` is one of the six
// axis-aligned facings. Both derive `Serialize`/`Deserialize` so they can
// appear in pathing configs and debug dumps.
//
// The coordinate system matches the host game:
// - X: east  (positive) / west  (negative)
// - Y: up    (positive) / down  (negative)
// - Z: south (positive) / north (negative)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// BlockPos
// ---------------------------------------------------------------------------

/// A position in the block grid. Each component is in block units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ZERO: BlockPos = BlockPos::new(0, 0, 0);
    pub const UP: BlockPos = BlockPos::new(0, 1, 0);
    pub const DOWN: BlockPos = BlockPos::new(0, -1, 0);
    pub const NORTH: BlockPos = BlockPos::new(0, 0, -1);
    pub const SOUTH: BlockPos = BlockPos::new(0, 0, 1);
    pub const EAST: BlockPos = BlockPos::new(1, 0, 0);
    pub const WEST: BlockPos = BlockPos::new(-1, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Block position containing the given world-space point.
    pub fn containing(x: f64, y: f64, z: f64) -> Self {
        Self::new(x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }

    pub const fn offset(self, delta: BlockPos) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }

    pub const fn above(self) -> Self {
        self.above_by(1)
    }

    pub const fn above_by(self, n: i32) -> Self {
        Self::new(self.x, self.y + n, self.z)
    }

    pub const fn below(self) -> Self {
        self.below_by(1)
    }

    pub const fn below_by(self, n: i32) -> Self {
        Self::new(self.x, self.y - n, self.z)
    }

    pub const fn relative(self, dir: Direction) -> Self {
        self.offset(dir.offset())
    }

    /// True when the move is purely horizontal or has any horizontal part.
    pub const fn has_horizontal(self) -> bool {
        self.x != 0 || self.z != 0
    }

    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        let dz = (self.z - other.z) as f64;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Euclidean length when treated as a delta vector.
    pub fn length(self) -> f64 {
        self.distance(Self::ZERO)
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs()
            + (self.y - other.y).unsigned_abs()
            + (self.z - other.z).unsigned_abs()
    }

    /// Chebyshev (king-move) distance between two coordinates.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
            .max((self.z - other.z).unsigned_abs())
    }
}

impl Add for BlockPos {
    type Output = BlockPos;

    fn add(self, rhs: BlockPos) -> BlockPos {
        self.offset(rhs)
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;

    fn sub(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the six axis-aligned facings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All facings in the host engine's canonical order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub const fn offset(self) -> BlockPos {
        match self {
            Direction::Down => BlockPos::DOWN,
            Direction::Up => BlockPos::UP,
            Direction::North => BlockPos::NORTH,
            Direction::South => BlockPos::SOUTH,
            Direction::West => BlockPos::WEST,
            Direction::East => BlockPos::EAST,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Down | Direction::Up)
    }

    /// The facing whose unit vector best matches `(dx, 0, dz)`.
    ///
    /// Ties resolve to the first facing in `ALL` order; a zero vector
    /// resolves to `North`.
    pub fn nearest_xz(dx: i32, dz: i32) -> Direction {
        let mut best = Direction::North;
        let mut best_dot = f32::MIN_POSITIVE;
        for dir in Direction::ALL {
            let o = dir.offset();
            let dot = (o.x * dx + o.z * dz) as f32;
            if dot > best_dot {
                best_dot = dot;
                best = dir;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_below_offsets() {
        let p = BlockPos::new(3, 10, -2);
        assert_eq!(p.above(), BlockPos::new(3, 11, -2));
        assert_eq!(p.below_by(3), BlockPos::new(3, 7, -2));
        assert_eq!(p.relative(Direction::North), BlockPos::new(3, 10, -3));
        assert_eq!(p - BlockPos::new(1, 1, 1), BlockPos::new(2, 9, -3));
    }

    #[test]
    fn distances() {
        let a = BlockPos::new(0, 0, 0);
        let b = BlockPos::new(3, 4, 0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.manhattan_distance(b), 7);
        assert_eq!(a.chebyshev_distance(b), 4);
    }

    #[test]
    fn nearest_xz_facing() {
        assert_eq!(Direction::nearest_xz(1, 0), Direction::East);
        assert_eq!(Direction::nearest_xz(-1, 0), Direction::West);
        assert_eq!(Direction::nearest_xz(0, 1), Direction::South);
        assert_eq!(Direction::nearest_xz(0, -3), Direction::North);
        // Zero vector falls back to north.
        assert_eq!(Direction::nearest_xz(0, 0), Direction::North);
    }

    #[test]
    fn opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }
}
