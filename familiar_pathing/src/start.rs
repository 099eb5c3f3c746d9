// Start-position correction.
//
// An entity's float position does not always map to a sensible start block:
// it may stand inside a slab or a path block, hover over a drop, float in
// water, or be wedged against a fence. `prepare_start` turns an
// `EntitySnapshot` into the block the search should start from:
//
// - inside a collision shape: step up one block;
// - over open space: fall until something below blocks motion, or a ladder
//   or fluid is reached;
// - in water: rise to the first block without fluid;
// - otherwise, in a fence, wall or solid cell: nudge one block sideways per
//   axis when within a quarter block of that side.
//
// Runs on the caller's thread against the live reader, before the job's
// snapshot exists. Fluid checks use the reader's `fluid_state`, so
// waterlogged blocks count as fluid when the host reports them that way.

use crate::surface::is_ladder;
use familiar_voxel::{BlockKind, BlockPos, BlockReader};
use serde::{Deserialize, Serialize};

/// What the pathfinder needs to know about the moving entity's placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub in_water: bool,
}

impl EntitySnapshot {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            in_water: false,
        }
    }

    pub fn in_water(mut self, in_water: bool) -> Self {
        self.in_water = in_water;
        self
    }

    pub fn block_pos(&self) -> BlockPos {
        BlockPos::containing(self.x, self.y, self.z)
    }
}

/// Corrected start block for a search from `entity`.
pub fn prepare_start<R: BlockReader + ?Sized>(reader: &R, entity: &EntitySnapshot) -> BlockPos {
    let mut pos = entity.block_pos();
    let mut state = reader.block_state(pos);

    // Standing within this collision shape: one up.
    if state.kind.blocks_motion() && reader.collision_shape(pos).max_y() > 0.0 {
        pos = pos.above();
        state = reader.block_state(pos);
    }

    let floor = reader.height_range().start;
    let mut down = reader.block_state(pos.below());
    while !state.kind.blocks_motion()
        && !down.kind.blocks_motion()
        && !is_ladder(&down)
        && reader.fluid_state(pos).is_empty()
    {
        pos = pos.below();
        state = down;
        down = reader.block_state(pos.below());
        if pos.y < floor {
            return entity.block_pos();
        }
    }

    if entity.in_water {
        let ceiling = reader.height_range().end;
        while !reader.fluid_state(pos).is_empty() && pos.y < ceiling {
            pos = pos.above();
        }
    } else if matches!(state.kind, BlockKind::Fence | BlockKind::Wall) || state.kind.is_solid() {
        let dx = entity.x - entity.x.floor();
        let dz = entity.z - entity.z.floor();
        if dx < 0.25 {
            pos = pos.offset(BlockPos::WEST);
        } else if dx > 0.75 {
            pos = pos.offset(BlockPos::EAST);
        }
        if dz < 0.25 {
            pos = pos.offset(BlockPos::NORTH);
        } else if dz > 0.75 {
            pos = pos.offset(BlockPos::SOUTH);
        }
    }

    pos
}
