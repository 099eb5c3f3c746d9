// Surface classification and passability.
//
// Two questions are answered here for a single block:
// - `classify_surface`: can an entity stand on top of it (WALKABLE), fall
//   past it to something lower (DROPABLE), or neither (NOT_PASSABLE)?
// - `is_passable`: can the entity's body occupy the block's cell?
//
// Both are pure functions of a `BlockView` (block state, fluid and collision
// shape as the reader reports them), the direction of travel and the
// capability profile. Anything that needs neighbouring blocks lives in
// `ground.rs`.

use crate::options::PathingOptions;
use familiar_voxel::{BlockKind, BlockPos, BlockReader, BlockState, CollisionShape, Direction, FluidState};

/// Shapes at most this tall count as flat and never block movement.
pub const FLAT_SHAPE_HEIGHT: f64 = 0.1;

/// One position as a `BlockReader` reports it.
///
/// Fluid and shape are read separately from the state: a host may report a
/// waterlogged cell or a taller collision box than the state alone implies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockView {
    pub state: BlockState,
    pub fluid: FluidState,
    pub shape: CollisionShape,
}

impl BlockView {
    pub fn read<R: BlockReader + ?Sized>(world: &R, pos: BlockPos) -> Self {
        Self {
            state: world.block_state(pos),
            fluid: world.fluid_state(pos),
            shape: world.collision_shape(pos),
        }
    }

    /// Fluid and shape implied by the state alone.
    pub fn of(state: BlockState) -> Self {
        Self {
            state,
            fluid: state.fluid(),
            shape: state.collision_shape(),
        }
    }
}

impl From<BlockKind> for BlockView {
    fn from(kind: BlockKind) -> Self {
        Self::of(BlockState::of(kind))
    }
}

/// What a block offers as ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceType {
    Walkable,
    Dropable,
    NotPassable,
}

/// Classify `block` as ground.
pub fn classify_surface(block: &BlockView) -> SurfaceType {
    let state = &block.state;
    let fluid = block.fluid;
    let hazard = matches!(
        state.kind,
        BlockKind::Fence
            | BlockKind::FenceGate
            | BlockKind::Wall
            | BlockKind::Fire
            | BlockKind::Campfire
            | BlockKind::Bamboo
            | BlockKind::Door
            | BlockKind::Magma
    );
    if hazard || block.shape.max_y() > 1.0 {
        return SurfaceType::NotPassable;
    }

    if state.kind == BlockKind::Lava || fluid.is_lava() {
        return SurfaceType::NotPassable;
    }

    if is_water(state, fluid) {
        return SurfaceType::Walkable;
    }

    if state.kind == BlockKind::Sign {
        return SurfaceType::Dropable;
    }

    if state.kind.is_solid()
        || (state.kind == BlockKind::Snow && state.layers > 1)
        || state.kind == BlockKind::Carpet
    {
        return SurfaceType::Walkable;
    }

    SurfaceType::Dropable
}

/// Some kind of water, either as the block itself or as the fluid at this position.
pub fn is_water(state: &BlockState, fluid: FluidState) -> bool {
    if state.kind.occludes() {
        return false;
    }
    state.kind == BlockKind::Water || fluid.is_water()
}

/// Liquid for swimming purposes: a liquid block, or a non-blocking block holding fluid.
pub fn is_liquid(block: &BlockView) -> bool {
    let kind = block.state.kind;
    kind.is_liquid() || (!kind.blocks_motion() && !block.fluid.is_empty())
}

pub fn is_ladder(state: &BlockState) -> bool {
    state.kind.is_climbable()
}

/// Shape is empty or flat enough to walk through.
pub fn can_pass_shape(shape: &CollisionShape) -> bool {
    shape.is_empty() || shape.max_y() <= FLAT_SHAPE_HEIGHT
}

/// Can the entity's body occupy `pos`, holding `block`, when arriving from `from`?
///
/// `from` is the parent node's position, or the job start for the first step.
pub fn is_passable(block: &BlockView, pos: BlockPos, from: BlockPos, options: &PathingOptions) -> bool {
    let state = &block.state;
    if state.kind.is_air() {
        return true;
    }

    let shape = block.shape;
    if state.kind.blocks_motion() && !can_pass_shape(&shape) {
        return match state.kind {
            BlockKind::TrapDoor => trapdoor_allows(state, pos - from),
            BlockKind::Door | BlockKind::FenceGate => options.can_enter_doors,
            BlockKind::PressurePlate | BlockKind::Sign | BlockKind::Banner => true,
            _ => false,
        };
    }

    if state.kind == BlockKind::Fire {
        return false;
    }

    is_ladder(state)
        || (can_pass_shape(&shape)
            && !is_liquid(block)
            && !(state.kind == BlockKind::Snow && state.layers > 1)
            && state.kind != BlockKind::SweetBerryBush)
}

/// A trapdoor can be passed vertically, or horizontally when its hinge runs
/// along the direction of travel.
fn trapdoor_allows(state: &BlockState, dir: BlockPos) -> bool {
    if dir.y != 0 && !dir.has_horizontal() {
        return true;
    }
    if dir.x != 0 {
        matches!(state.facing, Direction::North | Direction::South)
    } else {
        matches!(state.facing, Direction::East | Direction::West)
    }
}

/// Position-based passability. `head` marks a check for the upper body,
/// where carpet counts as an obstruction.
pub fn is_passable_at<R: BlockReader + ?Sized>(
    world: &R,
    pos: BlockPos,
    head: bool,
    from: BlockPos,
    options: &PathingOptions,
) -> bool {
    let block = BlockView::read(world, pos);
    if can_pass_shape(&block.shape) {
        return !head || block.state.kind != BlockKind::Carpet || is_ladder(&block.state);
    }
    is_passable(&block, pos, from, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use familiar_voxel::{Half, VoxelWorld};

    fn surface(kind: BlockKind) -> SurfaceType {
        classify_surface(&BlockView::from(kind))
    }

    fn passes(state: BlockState, here: BlockPos, from: BlockPos, options: &PathingOptions) -> bool {
        is_passable(&BlockView::of(state), here, from, options)
    }

    #[test]
    fn hazards_are_not_passable() {
        for kind in [
            BlockKind::Fence,
            BlockKind::FenceGate,
            BlockKind::Wall,
            BlockKind::Fire,
            BlockKind::Campfire,
            BlockKind::Bamboo,
            BlockKind::Door,
            BlockKind::Magma,
            BlockKind::Lava,
        ] {
            assert_eq!(surface(kind), SurfaceType::NotPassable, "{kind:?}");
        }
        // Lava flowing over an otherwise harmless block.
        let lava_over_air = BlockView {
            fluid: FluidState::FlowingLava,
            ..BlockView::of(BlockState::AIR)
        };
        assert_eq!(classify_surface(&lava_over_air), SurfaceType::NotPassable);
        // A solid block whose reported shape rises above a full block.
        let tall = BlockView {
            shape: CollisionShape::new(0.0, 1.5),
            ..BlockView::from(BlockKind::Solid)
        };
        assert_eq!(classify_surface(&tall), SurfaceType::NotPassable);
    }

    #[test]
    fn solid_water_snow_and_carpet_are_walkable() {
        assert_eq!(surface(BlockKind::Solid), SurfaceType::Walkable);
        assert_eq!(surface(BlockKind::Water), SurfaceType::Walkable);
        assert_eq!(surface(BlockKind::Carpet), SurfaceType::Walkable);
        assert_eq!(surface(BlockKind::Stairs), SurfaceType::Walkable);
        let deep_snow = BlockState::of(BlockKind::Snow).layers(3);
        assert_eq!(classify_surface(&BlockView::of(deep_snow)), SurfaceType::Walkable);
    }

    #[test]
    fn open_space_and_thin_snow_are_dropable() {
        assert_eq!(surface(BlockKind::Air), SurfaceType::Dropable);
        assert_eq!(surface(BlockKind::Snow), SurfaceType::Dropable);
        assert_eq!(surface(BlockKind::Sign), SurfaceType::Dropable);
        assert_eq!(surface(BlockKind::Ladder), SurfaceType::Dropable);
    }

    #[test]
    fn air_and_flat_blocks_pass() {
        let options = PathingOptions::default();
        let here = BlockPos::new(0, 1, 0);
        let from = BlockPos::new(-1, 1, 0);
        assert!(passes(BlockState::AIR, here, from, &options));
        assert!(passes(BlockState::of(BlockKind::Rail), here, from, &options));
        assert!(passes(BlockState::of(BlockKind::Carpet), here, from, &options));
        assert!(passes(BlockState::of(BlockKind::Ladder), here, from, &options));
        assert!(!passes(BlockState::of(BlockKind::Solid), here, from, &options));
        assert!(!passes(BlockState::of(BlockKind::Fire), here, from, &options));
        assert!(!passes(BlockState::of(BlockKind::Water), here, from, &options));
        assert!(!passes(BlockState::of(BlockKind::SweetBerryBush), here, from, &options));
        assert!(!passes(BlockState::of(BlockKind::Snow).layers(2), here, from, &options));
        assert!(passes(BlockState::of(BlockKind::PressurePlate), here, from, &options));
        assert!(passes(BlockState::of(BlockKind::Banner), here, from, &options));
    }

    #[test]
    fn reported_fluid_makes_an_open_block_impassable() {
        let options = PathingOptions::default();
        let here = BlockPos::new(0, 1, 0);
        let from = BlockPos::new(-1, 1, 0);
        let flooded_rail = BlockView {
            fluid: FluidState::Water,
            ..BlockView::from(BlockKind::Rail)
        };
        assert!(is_liquid(&flooded_rail));
        assert!(!is_passable(&flooded_rail, here, from, &options));
        assert!(!is_liquid(&BlockView::from(BlockKind::Rail)));
    }

    #[test]
    fn doors_require_capability() {
        let here = BlockPos::new(0, 1, 0);
        let from = BlockPos::new(0, 1, 1);
        let door = BlockState::of(BlockKind::Door);
        assert!(!passes(door, here, from, &PathingOptions::default()));
        let opener = PathingOptions::default().with_doors(true);
        assert!(passes(door, here, from, &opener));
        assert!(passes(BlockState::of(BlockKind::FenceGate), here, from, &opener));
    }

    #[test]
    fn trapdoor_must_align_with_travel() {
        let options = PathingOptions::default();
        let here = BlockPos::new(0, 1, 0);
        let open_ns = BlockState::of(BlockKind::TrapDoor).opened(true).facing(Direction::North);
        // Moving along x: hinge facing north/south lets us through.
        assert!(passes(open_ns, here, BlockPos::new(-1, 1, 0), &options));
        // Moving along z: blocked.
        assert!(!passes(open_ns, here, BlockPos::new(0, 1, -1), &options));
        // Straight vertical movement always passes.
        assert!(passes(open_ns, here, BlockPos::new(0, 0, 0), &options));
        // Closed bottom trapdoor is taller than flat, same rule applies.
        let closed_ew = BlockState::of(BlockKind::TrapDoor).facing(Direction::East);
        assert!(passes(closed_ew, here, BlockPos::new(0, 1, 1), &options));
    }

    #[test]
    fn carpet_blocks_the_head_only() {
        let mut world = VoxelWorld::new(4, 4, 4);
        let pos = BlockPos::new(1, 2, 1);
        world.set(pos, BlockKind::Carpet);
        let options = PathingOptions::default();
        let from = BlockPos::new(0, 1, 1);
        assert!(is_passable_at(&world, pos, false, from, &options));
        assert!(!is_passable_at(&world, pos, true, from, &options));
    }

    #[test]
    fn slab_blocks_the_cell() {
        let mut world = VoxelWorld::new(4, 4, 4);
        let pos = BlockPos::new(1, 1, 1);
        world.set(pos, BlockState::of(BlockKind::Slab).half(Half::Bottom));
        assert!(!is_passable_at(&world, pos, false, BlockPos::new(0, 1, 1), &PathingOptions::default()));
    }
}
