// Neighbour landing-height resolution.
//
// Given the node being expanded and a candidate neighbour position one step
// away, `Terrain::ground_height` decides at which y the entity would
// actually stand after the move, or `None` if the move is impossible:
//
// 1. Head check: is there room for the upper body? Partial shapes (slabs,
//    stairs, trapdoors) are compared by their vertical extents. If not, try
//    stepping up onto the block above the candidate.
// 2. Body check: is the candidate cell itself passable? If not, try a
//    one-block step up, subject to headroom at both ends and a maximum jump
//    height (with a special case for walking up a bottom-half stair).
// 3. Footing: standing on walkable ground keeps the candidate's y. Otherwise
//    resolve swimming, ladder continuation, or a drop scan of up to ten
//    blocks looking for the nearest landing.
//
// All queries go through a `BlockReader`, normally the job's snapshot.
// Fluids and collision shapes come from the reader's own `fluid_state` and
// `collision_shape`, never from the block state alone.
//
// See also: `surface.rs` for the single-block predicates, `job.rs` for the
// walk step that turns a landing height into a node (and corner nodes).

use crate::node::Node;
use crate::options::PathingOptions;
use crate::surface::{BlockView, SurfaceType, classify_surface, is_ladder, is_liquid, is_passable, is_passable_at, is_water};
use familiar_voxel::{BlockKind, BlockPos, BlockReader, BlockState, Direction, Half};

/// Highest rise (in blocks, between collision tops) a step-up may cover.
pub const MAX_JUMP_HEIGHT: f64 = 1.3;

pub const HALF_A_BLOCK: f64 = 0.5;

/// Deepest drop scan, in blocks below the candidate.
pub const MAX_DROP: i32 = 10;

/// Deepest drop that may land on dry ground. Deeper drops need liquid below.
pub const MAX_DRY_DROP: i32 = 3;

/// Terrain queries for one job: a world view plus the capability profile.
pub(crate) struct Terrain<'a, R: ?Sized> {
    pub world: &'a R,
    pub options: &'a PathingOptions,
}

impl<'a, R: BlockReader + ?Sized> Terrain<'a, R> {
    pub fn new(world: &'a R, options: &'a PathingOptions) -> Self {
        Self { world, options }
    }

    pub fn state(&self, pos: BlockPos) -> BlockState {
        self.world.block_state(pos)
    }

    pub fn view(&self, pos: BlockPos) -> BlockView {
        BlockView::read(self.world, pos)
    }

    /// Classify the block at `at` as ground, using the fluid found at
    /// `fluid_at`. Landing checks look for fluid in the cell being entered,
    /// not in the floor under it.
    pub fn classify(&self, at: BlockPos, fluid_at: BlockPos) -> SurfaceType {
        classify_surface(&BlockView {
            fluid: self.world.fluid_state(fluid_at),
            ..self.view(at)
        })
    }

    /// Is the block under `pos` something to stand on?
    pub fn is_walkable_ground(&self, pos: BlockPos) -> bool {
        let below = pos.below();
        self.classify(below, below) == SurfaceType::Walkable
    }

    pub fn is_ladder_at(&self, pos: BlockPos) -> bool {
        is_ladder(&self.state(pos))
    }

    pub fn is_water_at(&self, pos: BlockPos) -> bool {
        is_water(&self.state(pos), self.world.fluid_state(pos))
    }

    pub fn is_liquid_at(&self, pos: BlockPos) -> bool {
        is_liquid(&self.view(pos))
    }

    /// Position-based passability when arriving from `from`.
    pub fn passable(&self, pos: BlockPos, head: bool, from: BlockPos) -> bool {
        is_passable_at(self.world, pos, head, from, self.options)
    }

    /// Landing y for a move from `parent` into the column at `pos`, within
    /// one block up or a bounded drop down.
    pub fn ground_height(&self, parent: &Node, pos: BlockPos) -> Option<i32> {
        if self.head_blocked(parent, pos) {
            return self.step_up(parent, pos.above());
        }

        if !is_passable(&self.view(pos), pos, parent.pos, self.options) {
            return self.step_up(parent, pos);
        }

        let below = self.view(pos.below());
        match self.classify(pos.below(), pos) {
            SurfaceType::Walkable => Some(pos.y),
            SurfaceType::NotPassable => None,
            SurfaceType::Dropable => self.not_standing(parent, pos, &below),
        }
    }

    /// No room for the upper body at `pos`.
    fn head_blocked(&self, parent: &Node, pos: BlockPos) -> bool {
        let local = if self.world.collision_shape(pos).max_y() < 1.0 {
            pos.above()
        } else {
            pos
        };

        let head = if self.options.can_fit_in_one_cube { pos } else { pos.above() };
        if !self.passable(head, true, parent.pos) {
            let floor = self.world.collision_shape(pos.below());
            let ceiling = self.world.collision_shape(pos.above());
            let ceiling_y = f64::from(pos.above().y) + ceiling.start_y(1.0);
            if ceiling_y - (f64::from(pos.below().y) + floor.end_y(0.0)) < 2.0 {
                return true;
            }
            let parent_floor = self.world.collision_shape(parent.pos.below());
            if ceiling_y - (f64::from(parent.pos.below().y) + parent_floor.end_y(0.0)) < 1.75 {
                return true;
            }
        }

        let body = self.world.collision_shape(pos);
        let top = self.world.collision_shape(local.above());
        let clearance = f64::from(local.above().y) + top.start_y(1.0) - (f64::from(pos.y) + body.end_y(0.0));
        if clearance >= 2.0 {
            return false;
        }
        self.is_liquid_at(local.below()) && !self.passable(pos, false, parent.pos)
    }

    /// Try to climb one block onto the block at `pos`.
    fn step_up(&self, parent: &Node, pos: BlockPos) -> Option<i32> {
        if parent.ladder || parent.swimming || self.classify(pos, pos) != SurfaceType::Walkable {
            return None;
        }

        let body = self.world.collision_shape(pos);
        let body_top = f64::from(pos.y) + body.end_y(0.0);

        // Headroom over the landing spot.
        let landing_head = pos.above_by(2);
        if !self.passable(landing_head, false, parent.pos) {
            let ceiling = self.world.collision_shape(landing_head);
            if f64::from(landing_head.y) + ceiling.start_y(1.0) - body_top < 2.0 {
                return None;
            }
        }

        // Room to jump from where we stand.
        let launch_head = parent.pos.above_by(2);
        if !self.passable(launch_head, false, parent.pos) {
            let ceiling = self.world.collision_shape(launch_head);
            if f64::from(launch_head.y) + ceiling.start_y(1.0) - body_top < 2.0 {
                return None;
            }
        }

        let parent_top = self.world.collision_shape(parent.pos.below()).max_y();
        let parent_max = parent_top + f64::from(parent.pos.below().y);
        let target_max = body.max_y() + f64::from(pos.y);
        if target_max - parent_max < MAX_JUMP_HEIGHT {
            return Some(pos.y + 1);
        }

        let target = self.state(pos);
        let facing = Direction::nearest_xz(pos.x - parent.pos.x, pos.z - parent.pos.z);
        if target.kind == BlockKind::Stairs
            && parent_top - HALF_A_BLOCK < MAX_JUMP_HEIGHT
            && target.half == Half::Bottom
            && facing == target.facing
        {
            return Some(pos.y + 1);
        }
        None
    }

    /// Nothing walkable directly under `pos`.
    fn not_standing(&self, parent: &Node, pos: BlockPos, below: &BlockView) -> Option<i32> {
        let swimming = parent.swimming;
        if is_liquid(below) {
            return self.in_liquid(pos, &below.state, swimming);
        }
        if is_ladder(&below.state) {
            return Some(pos.y);
        }
        self.drop(parent, pos, swimming)
    }

    fn in_liquid(&self, pos: BlockPos, below: &BlockState, swimming: bool) -> Option<i32> {
        if swimming || (self.options.can_swim && below.kind == BlockKind::Water) {
            Some(pos.y)
        } else {
            None
        }
    }

    /// Scan downwards for a landing.
    fn drop(&self, parent: &Node, pos: BlockPos, swimming: bool) -> Option<i32> {
        if parent.ladder || swimming {
            return None;
        }

        // Stepping sideways off a ledge we are not actually standing on.
        let parent_floor = parent.pos.below();
        let sideways = parent.pos.x != pos.x || parent.pos.z != pos.z;
        if sideways
            && self.passable(parent_floor, false, parent.pos)
            && self.classify(parent_floor, parent_floor) == SurfaceType::Dropable
        {
            return None;
        }

        for depth in 2..=MAX_DROP {
            let landing = pos.below_by(depth);
            let below = self.view(landing);
            let dry_landing = depth <= MAX_DRY_DROP && self.classify(landing, pos) == SurfaceType::Walkable;
            if dry_landing || is_liquid(&below) {
                return Some(pos.y - depth + 1);
            }
            if !below.state.kind.is_air() {
                return None;
            }
        }
        None
    }
}
