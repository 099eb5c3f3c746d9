// Read-only world query surface and a dense in-memory world.
//
// `BlockReader` is the only view of the world the pathfinder needs: block
// state, fluid state and collision shape per position, plus the vertical
// build range. Implementations must be safe to read from several threads at
// once (`Send + Sync`); path jobs copy the region they need into an owned
// snapshot before searching, so readers are only touched on the caller's
// thread in practice.
//
// `VoxelWorld` stores states as a flat `Vec<BlockState>` indexed by
// `x + z * size_x + y * size_x * size_z` relative to `origin`, giving O(1)
// read/write access. Out-of-bounds reads return `Air`; out-of-bounds writes
// are no-ops.

use crate::block::{BlockKind, BlockState, CollisionShape, FluidState};
use crate::types::BlockPos;
use std::ops::Range;

/// Default vertical build range of the host world.
pub const DEFAULT_HEIGHT_RANGE: Range<i32> = 0..256;

/// Read-only access to block and fluid state.
pub trait BlockReader: Send + Sync {
    fn block_state(&self, pos: BlockPos) -> BlockState;

    fn fluid_state(&self, pos: BlockPos) -> FluidState {
        self.block_state(pos).fluid()
    }

    fn collision_shape(&self, pos: BlockPos) -> CollisionShape {
        self.block_state(pos).collision_shape()
    }

    /// Range of y values that can hold non-air blocks.
    fn height_range(&self) -> Range<i32> {
        DEFAULT_HEIGHT_RANGE
    }
}

impl<R: BlockReader + ?Sized> BlockReader for &R {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        (**self).block_state(pos)
    }

    fn fluid_state(&self, pos: BlockPos) -> FluidState {
        (**self).fluid_state(pos)
    }

    fn collision_shape(&self, pos: BlockPos) -> CollisionShape {
        (**self).collision_shape(pos)
    }

    fn height_range(&self) -> Range<i32> {
        (**self).height_range()
    }
}

/// Dense 3D block grid anchored at `origin`.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z (origin-relative).
    blocks: Vec<BlockState>,
    pub origin: BlockPos,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl VoxelWorld {
    /// Create a new world filled with `Air`, with its minimum corner at (0, 0, 0).
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        Self::with_origin(BlockPos::ZERO, size_x, size_y, size_z)
    }

    /// Create a new world filled with `Air`, with its minimum corner at `origin`.
    pub fn with_origin(origin: BlockPos, size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            blocks: vec![BlockState::AIR; total],
            origin,
            size_x,
            size_y,
            size_z,
        }
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, pos: BlockPos) -> bool {
        let rel = pos - self.origin;
        rel.x >= 0
            && rel.y >= 0
            && rel.z >= 0
            && (rel.x as u32) < self.size_x
            && (rel.y as u32) < self.size_y
            && (rel.z as u32) < self.size_z
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        let rel = pos - self.origin;
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        Some(rel.x as usize + rel.z as usize * sx + rel.y as usize * sx * sz)
    }

    /// Read a block. Returns `Air` for out-of-bounds coordinates.
    pub fn get(&self, pos: BlockPos) -> BlockState {
        self.index(pos)
            .map(|i| self.blocks[i])
            .unwrap_or(BlockState::AIR)
    }

    /// Write a block. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, pos: BlockPos, state: impl Into<BlockState>) {
        if let Some(i) = self.index(pos) {
            self.blocks[i] = state.into();
        }
    }

    /// Fill the inclusive box spanned by `a` and `b`.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, state: impl Into<BlockState>) {
        let state = state.into();
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            for z in a.z.min(b.z)..=a.z.max(b.z) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    self.set(BlockPos::new(x, y, z), state);
                }
            }
        }
    }

    /// Count of non-air blocks; mostly useful in tests.
    pub fn solid_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.kind != BlockKind::Air)
            .count()
    }
}

impl BlockReader for VoxelWorld {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.get(pos)
    }

    fn height_range(&self) -> Range<i32> {
        self.origin.y..self.origin.y + self.size_y as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Half;

    #[test]
    fn new_world_is_all_air() {
        let world = VoxelWorld::new(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert_eq!(world.get(BlockPos::new(x, y, z)), BlockState::AIR);
                }
            }
        }
    }

    #[test]
    fn set_and_get_with_origin() {
        let mut world = VoxelWorld::with_origin(BlockPos::new(-8, -2, -8), 16, 8, 16);
        let pos = BlockPos::new(-3, -1, 5);
        world.set(pos, BlockKind::Solid);
        assert_eq!(world.get(pos).kind, BlockKind::Solid);
        assert_eq!(world.get(pos.above()).kind, BlockKind::Air);
        assert_eq!(world.height_range(), -2..6);
    }

    #[test]
    fn out_of_bounds_read_returns_air() {
        let world = VoxelWorld::new(4, 4, 4);
        assert_eq!(world.get(BlockPos::new(-1, 0, 0)), BlockState::AIR);
        assert_eq!(world.get(BlockPos::new(0, 4, 0)), BlockState::AIR);
        assert_eq!(world.get(BlockPos::new(100, 100, 100)), BlockState::AIR);
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut world = VoxelWorld::new(4, 4, 4);
        world.set(BlockPos::new(-1, 0, 0), BlockKind::Solid);
        world.set(BlockPos::new(100, 0, 0), BlockKind::Solid);
        assert_eq!(world.solid_count(), 0);
    }

    #[test]
    fn fill_covers_inclusive_box() {
        let mut world = VoxelWorld::new(8, 8, 8);
        world.fill(BlockPos::new(3, 0, 3), BlockPos::new(1, 1, 1), BlockKind::Solid);
        assert_eq!(world.solid_count(), 3 * 2 * 3);
    }

    #[test]
    fn reader_derives_shape_and_fluid() {
        let mut world = VoxelWorld::new(4, 4, 4);
        let pos = BlockPos::new(1, 1, 1);
        world.set(pos, BlockState::of(BlockKind::Slab).half(Half::Top).waterlogged(true));
        assert_eq!(world.collision_shape(pos).min_y(), 0.5);
        assert!(world.fluid_state(pos).is_water());
        // Reading through a reference uses the same data.
        let reader: &dyn BlockReader = &world;
        assert_eq!(reader.block_state(pos).kind, BlockKind::Slab);
    }
}
