// Owned, immutable copy of the world region a path job may read.
//
// A job captures its snapshot once, on the caller's thread, when it is
// constructed. From then on the search only reads this buffer, so workers
// never touch the live world and concurrent jobs share nothing mutable.
//
// Each cell records what the reader reported for that position: block
// state, fluid state and collision shape. Hosts whose fluid or shape
// queries differ from what the block state implies (waterlogged blocks,
// modded shapes) see the same answers during the search as on the live
// world.
//
// Storage mirrors `VoxelWorld`: a flat `Vec` indexed by
// `x + z * size_x + y * size_x * size_z` relative to `min`. Reads outside
// the captured box return `Air` with no fluid and no shape, the same as an
// unloaded chunk.

use crate::error::PathError;
use crate::surface::BlockView;
use familiar_voxel::{BlockPos, BlockReader, BlockState, CollisionShape, FluidState};
use std::ops::Range;

/// Largest number of cells `capture_bounded` will copy. A cell is a few
/// dozen bytes, so this caps a job snapshot at roughly 128 MiB.
pub const MAX_SNAPSHOT_CELLS: u64 = 1 << 22;

/// What reads outside the captured box report.
const OUTSIDE: BlockView = BlockView {
    state: BlockState::AIR,
    fluid: FluidState::Empty,
    shape: CollisionShape::EMPTY,
};

/// Inclusive capture box after clamping to the reader's height range.
#[derive(Clone, Copy, Debug)]
struct Bounds {
    lo: BlockPos,
    hi: BlockPos,
}

impl Bounds {
    fn clamped<R: BlockReader + ?Sized>(reader: &R, min: BlockPos, max: BlockPos) -> Self {
        let heights = reader.height_range();
        Self {
            lo: BlockPos::new(
                min.x.min(max.x),
                min.y.min(max.y).max(heights.start),
                min.z.min(max.z),
            ),
            hi: BlockPos::new(
                min.x.max(max.x),
                min.y.max(max.y).min(heights.end.saturating_sub(1)),
                min.z.max(max.z),
            ),
        }
    }

    fn spans(&self) -> [u64; 3] {
        let span = |a: i32, b: i32| if b >= a { (i64::from(b) - i64::from(a) + 1) as u64 } else { 0 };
        [
            span(self.lo.x, self.hi.x),
            span(self.lo.y, self.hi.y),
            span(self.lo.z, self.hi.z),
        ]
    }

    fn cells(&self) -> u64 {
        let [x, y, z] = self.spans();
        x.saturating_mul(y).saturating_mul(z)
    }
}

#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    cells: Vec<BlockView>,
    min: BlockPos,
    size_x: usize,
    size_y: usize,
    size_z: usize,
}

impl WorldSnapshot {
    /// Copy the inclusive box `min..=max`, restricted vertically to the
    /// reader's height range.
    pub fn capture<R: BlockReader + ?Sized>(reader: &R, min: BlockPos, max: BlockPos) -> Self {
        Self::copy(reader, Bounds::clamped(reader, min, max))
    }

    /// Like `capture`, but refuses boxes holding more than
    /// `MAX_SNAPSHOT_CELLS` cells after clamping.
    pub fn capture_bounded<R: BlockReader + ?Sized>(
        reader: &R,
        min: BlockPos,
        max: BlockPos,
    ) -> Result<Self, PathError> {
        let bounds = Bounds::clamped(reader, min, max);
        let cells = bounds.cells();
        if cells > MAX_SNAPSHOT_CELLS {
            return Err(PathError::SnapshotTooLarge {
                cells,
                limit: MAX_SNAPSHOT_CELLS,
            });
        }
        Ok(Self::copy(reader, bounds))
    }

    /// Capture the full height range of `reader` for the given xz box.
    /// Unbounded: only meant for small worlds.
    pub fn capture_columns<R: BlockReader + ?Sized>(
        reader: &R,
        min_x: i32,
        min_z: i32,
        max_x: i32,
        max_z: i32,
    ) -> Self {
        let heights = reader.height_range();
        Self::capture(
            reader,
            BlockPos::new(min_x, heights.start, min_z),
            BlockPos::new(max_x, heights.end - 1, max_z),
        )
    }

    fn copy<R: BlockReader + ?Sized>(reader: &R, bounds: Bounds) -> Self {
        let [size_x, size_y, size_z] = bounds.spans().map(|s| s as usize);
        let lo = bounds.lo;

        let mut cells = Vec::with_capacity(size_x * size_y * size_z);
        for y in 0..size_y {
            for z in 0..size_z {
                for x in 0..size_x {
                    let pos = BlockPos::new(lo.x + x as i32, lo.y + y as i32, lo.z + z as i32);
                    cells.push(BlockView::read(reader, pos));
                }
            }
        }
        log::trace!("captured snapshot of {} cells at {lo}", cells.len());

        Self {
            cells,
            min: lo,
            size_x,
            size_y,
            size_z,
        }
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        let rel = pos - self.min;
        if rel.x < 0 || rel.y < 0 || rel.z < 0 {
            return None;
        }
        let (x, y, z) = (rel.x as usize, rel.y as usize, rel.z as usize);
        if x >= self.size_x || y >= self.size_y || z >= self.size_z {
            return None;
        }
        Some(x + z * self.size_x + y * self.size_x * self.size_z)
    }

    fn cell(&self, pos: BlockPos) -> &BlockView {
        self.index(pos).map_or(&OUTSIDE, |i| &self.cells[i])
    }

    /// Number of captured cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn min(&self) -> BlockPos {
        self.min
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.index(pos).is_some()
    }
}

impl BlockReader for WorldSnapshot {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.cell(pos).state
    }

    fn fluid_state(&self, pos: BlockPos) -> FluidState {
        self.cell(pos).fluid
    }

    fn collision_shape(&self, pos: BlockPos) -> CollisionShape {
        self.cell(pos).shape
    }

    fn height_range(&self) -> Range<i32> {
        self.min.y..self.min.y + self.size_y as i32
    }
}
