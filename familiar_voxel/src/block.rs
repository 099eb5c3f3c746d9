// Block state model.
//
// A `BlockState` is a `BlockKind` plus the handful of properties the
// pathfinder inspects (facing, half, open, snow layers, waterlogging).
// Collision shapes and fluid states are derived from the state rather than
// stored, so a world only has to hold `BlockState`s.
//
// Material predicates (`blocks_motion`, `is_solid`, `is_liquid`, `occludes`)
// mirror the host engine's material table for the kinds modelled here:
// e.g. a pressure plate is stone (blocks motion, solid) but has no collision
// shape, while a ladder is decoration (neither).
//
// See also: `world.rs` for the `BlockReader` trait that serves these states.

use crate::types::Direction;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Block kinds
// ---------------------------------------------------------------------------

/// Block classes distinguished by surface classification and passability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Air,
    /// Generic full opaque cube (stone, dirt, planks, ...).
    Solid,
    /// Full but non-occluding cube.
    Glass,
    /// Dirt path: solid, slightly lower than a full block.
    DirtPath,
    Water,
    Lava,
    Ladder,
    Vine,
    Fence,
    FenceGate,
    Wall,
    Fire,
    Campfire,
    Bamboo,
    Door,
    TrapDoor,
    Magma,
    /// Snow layer; thickness is `BlockState::layers` (1–8).
    Snow,
    Carpet,
    Slab,
    Stairs,
    PressurePlate,
    Sign,
    Banner,
    Rail,
    SweetBerryBush,
    /// Grass, flowers and other collision-free foliage.
    Plant,
}

impl BlockKind {
    /// Material blocks entity motion (before looking at the actual shape).
    pub const fn blocks_motion(self) -> bool {
        matches!(
            self,
            BlockKind::Solid
                | BlockKind::Glass
                | BlockKind::DirtPath
                | BlockKind::Fence
                | BlockKind::FenceGate
                | BlockKind::Wall
                | BlockKind::Campfire
                | BlockKind::Bamboo
                | BlockKind::Door
                | BlockKind::TrapDoor
                | BlockKind::Magma
                | BlockKind::Slab
                | BlockKind::Stairs
                | BlockKind::PressurePlate
                | BlockKind::Sign
                | BlockKind::Banner
        )
    }

    /// Material counts as solid ground.
    pub const fn is_solid(self) -> bool {
        self.blocks_motion()
    }

    pub const fn is_liquid(self) -> bool {
        matches!(self, BlockKind::Water | BlockKind::Lava)
    }

    /// Full opaque cube that hides its neighbours.
    pub const fn occludes(self) -> bool {
        matches!(self, BlockKind::Solid | BlockKind::Magma | BlockKind::DirtPath)
    }

    pub const fn is_air(self) -> bool {
        matches!(self, BlockKind::Air)
    }

    /// Climbable column block.
    pub const fn is_climbable(self) -> bool {
        matches!(self, BlockKind::Ladder | BlockKind::Vine)
    }

    /// Openable blocks that carry an `open` property.
    pub const fn has_open_property(self) -> bool {
        matches!(self, BlockKind::Door | BlockKind::TrapDoor | BlockKind::FenceGate)
    }
}

/// Vertical half for stairs, slabs and trapdoors. `Double` only applies to slabs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    #[default]
    Bottom,
    Top,
    Double,
}

// ---------------------------------------------------------------------------
// Collision shape
// ---------------------------------------------------------------------------

/// Vertical extent of a block's collision volume, in block-local units.
///
/// Horizontal extent is not modelled; every non-empty shape is treated as
/// covering the full cell footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionShape {
    extent: Option<(f64, f64)>,
}

impl CollisionShape {
    pub const EMPTY: CollisionShape = CollisionShape { extent: None };
    pub const FULL: CollisionShape = CollisionShape::new(0.0, 1.0);

    pub const fn new(min_y: f64, max_y: f64) -> Self {
        Self {
            extent: Some((min_y, max_y)),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Lowest point of the shape; `+inf` when empty.
    pub fn min_y(&self) -> f64 {
        self.extent.map_or(f64::INFINITY, |(lo, _)| lo)
    }

    /// Highest point of the shape; `-inf` when empty.
    pub fn max_y(&self) -> f64 {
        self.extent.map_or(f64::NEG_INFINITY, |(_, hi)| hi)
    }

    /// Lowest point, or `default` when empty.
    pub fn start_y(&self, default: f64) -> f64 {
        self.extent.map_or(default, |(lo, _)| lo)
    }

    /// Highest point, or `default` when empty.
    pub fn end_y(&self, default: f64) -> f64 {
        self.extent.map_or(default, |(_, hi)| hi)
    }
}

// ---------------------------------------------------------------------------
// Fluid state
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FluidState {
    #[default]
    Empty,
    Water,
    FlowingWater,
    Lava,
    FlowingLava,
}

impl FluidState {
    pub const fn is_empty(self) -> bool {
        matches!(self, FluidState::Empty)
    }

    pub const fn is_water(self) -> bool {
        matches!(self, FluidState::Water | FluidState::FlowingWater)
    }

    pub const fn is_lava(self) -> bool {
        matches!(self, FluidState::Lava | FluidState::FlowingLava)
    }
}

// ---------------------------------------------------------------------------
// Block state
// ---------------------------------------------------------------------------

/// A block kind plus the properties pathfinding reads.
///
/// Property meaning by kind:
/// - `facing`: stairs/trapdoor/door/ladder orientation; for vines, the side
///   the vine is attached to.
/// - `half`: stairs, slabs, trapdoors.
/// - `open`: doors, trapdoors, fence gates.
/// - `layers`: snow thickness, 1–8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub kind: BlockKind,
    pub facing: Direction,
    pub half: Half,
    pub open: bool,
    pub layers: u8,
    pub waterlogged: bool,
}

impl Default for BlockState {
    fn default() -> Self {
        Self::AIR
    }
}

impl From<BlockKind> for BlockState {
    fn from(kind: BlockKind) -> Self {
        Self::of(kind)
    }
}

impl BlockState {
    pub const AIR: BlockState = BlockState::of(BlockKind::Air);

    pub const fn of(kind: BlockKind) -> Self {
        Self {
            kind,
            facing: Direction::North,
            half: Half::Bottom,
            open: false,
            layers: 1,
            waterlogged: false,
        }
    }

    pub const fn facing(mut self, facing: Direction) -> Self {
        self.facing = facing;
        self
    }

    pub const fn half(mut self, half: Half) -> Self {
        self.half = half;
        self
    }

    pub const fn opened(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub const fn layers(mut self, layers: u8) -> Self {
        self.layers = layers;
        self
    }

    pub const fn waterlogged(mut self, waterlogged: bool) -> Self {
        self.waterlogged = waterlogged;
        self
    }

    pub const fn has_open_property(&self) -> bool {
        self.kind.has_open_property()
    }

    /// Collision volume for this state.
    pub fn collision_shape(&self) -> CollisionShape {
        match self.kind {
            BlockKind::Air
            | BlockKind::Water
            | BlockKind::Lava
            | BlockKind::Vine
            | BlockKind::Fire
            | BlockKind::PressurePlate
            | BlockKind::Sign
            | BlockKind::Banner
            | BlockKind::Rail
            | BlockKind::SweetBerryBush
            | BlockKind::Plant => CollisionShape::EMPTY,
            BlockKind::Solid
            | BlockKind::Glass
            | BlockKind::Magma
            | BlockKind::Ladder
            | BlockKind::Bamboo
            | BlockKind::Stairs
            | BlockKind::Door => CollisionShape::FULL,
            BlockKind::DirtPath => CollisionShape::new(0.0, 0.9375),
            BlockKind::Fence | BlockKind::Wall => CollisionShape::new(0.0, 1.5),
            BlockKind::FenceGate => {
                if self.open {
                    CollisionShape::EMPTY
                } else {
                    CollisionShape::new(0.0, 1.5)
                }
            }
            BlockKind::Campfire => CollisionShape::new(0.0, 0.4375),
            BlockKind::Carpet => CollisionShape::new(0.0, 0.0625),
            BlockKind::Snow => {
                if self.layers <= 1 {
                    CollisionShape::EMPTY
                } else {
                    CollisionShape::new(0.0, f64::from(self.layers - 1) * 0.125)
                }
            }
            BlockKind::Slab => match self.half {
                Half::Bottom => CollisionShape::new(0.0, 0.5),
                Half::Top => CollisionShape::new(0.5, 1.0),
                Half::Double => CollisionShape::FULL,
            },
            BlockKind::TrapDoor => {
                if self.open {
                    CollisionShape::FULL
                } else if self.half == Half::Top {
                    CollisionShape::new(0.8125, 1.0)
                } else {
                    CollisionShape::new(0.0, 0.1875)
                }
            }
        }
    }

    /// Fluid contained in this block.
    pub fn fluid(&self) -> FluidState {
        match self.kind {
            BlockKind::Water => FluidState::Water,
            BlockKind::Lava => FluidState::Lava,
            _ if self.waterlogged => FluidState::Water,
            _ => FluidState::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shape_extremes() {
        let shape = CollisionShape::EMPTY;
        assert!(shape.is_empty());
        assert_eq!(shape.max_y(), f64::NEG_INFINITY);
        assert_eq!(shape.min_y(), f64::INFINITY);
        assert_eq!(shape.start_y(1.0), 1.0);
        assert_eq!(shape.end_y(0.0), 0.0);
    }

    #[test]
    fn snow_shape_grows_with_layers() {
        assert!(BlockState::of(BlockKind::Snow).collision_shape().is_empty());
        let two = BlockState::of(BlockKind::Snow).layers(2).collision_shape();
        assert_eq!(two.max_y(), 0.125);
        let eight = BlockState::of(BlockKind::Snow).layers(8).collision_shape();
        assert_eq!(eight.max_y(), 0.875);
    }

    #[test]
    fn fence_is_taller_than_a_block() {
        assert!(BlockState::of(BlockKind::Fence).collision_shape().max_y() > 1.0);
        assert!(BlockState::of(BlockKind::FenceGate).collision_shape().max_y() > 1.0);
        assert!(
            BlockState::of(BlockKind::FenceGate)
                .opened(true)
                .collision_shape()
                .is_empty()
        );
    }

    #[test]
    fn trapdoor_shape_depends_on_state() {
        let closed = BlockState::of(BlockKind::TrapDoor);
        assert_eq!(closed.collision_shape().max_y(), 0.1875);
        let top = closed.half(Half::Top);
        assert_eq!(top.collision_shape().min_y(), 0.8125);
        assert_eq!(closed.opened(true).collision_shape(), CollisionShape::FULL);
    }

    #[test]
    fn waterlogged_blocks_carry_water() {
        let stairs = BlockState::of(BlockKind::Stairs).waterlogged(true);
        assert!(stairs.fluid().is_water());
        assert!(BlockState::of(BlockKind::Lava).fluid().is_lava());
        assert!(BlockState::AIR.fluid().is_empty());
    }

    #[test]
    fn material_table() {
        assert!(BlockKind::PressurePlate.blocks_motion());
        assert!(!BlockKind::Ladder.blocks_motion());
        assert!(!BlockKind::Ladder.is_solid());
        assert!(BlockKind::Water.is_liquid());
        assert!(!BlockKind::Glass.occludes());
        assert!(BlockKind::Door.has_open_property());
    }

    #[test]
    fn block_state_serializes() {
        let state = BlockState::of(BlockKind::Stairs)
            .facing(Direction::East)
            .half(Half::Top);
        let json = serde_json::to_string(&state).unwrap();
        let restored: BlockState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
