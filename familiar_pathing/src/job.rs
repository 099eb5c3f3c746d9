// Path job: the best-first search engine.
//
// A `PathJob` owns everything one search needs: the start position, a goal
// strategy, the capability profile, an optional xz restriction box and an
// immutable `WorldSnapshot` captured at construction. The snapshot window is
// the job's start/end box padded by `range / 2` on every side (plus the
// deepest drop scan below), clamped to the world's height range; a window
// over `MAX_SNAPSHOT_CELLS` is refused instead of captured. `search()` runs the
// whole search synchronously on the calling thread and returns a
// `SearchOutcome`; `pathfinder.rs` runs jobs on a worker pool.
//
// Search loop, per iteration:
// 1. Honour a cancellation request (checked once per iteration).
// 2. Pop the lowest-score open node; stop once `range²` nodes were expanded.
// 3. A node standing on walkable ground inside the restriction box that
//    satisfies the goal ends the search.
// 4. Otherwise it may become the best fallback (by goal result score,
//    never a corner node).
// 5. Expand it unless hard-restricted and outside the box: straight up/down
//    on ladders, forced down for corner nodes, then down/N/E/S/W filtered by
//    the previous move so the search does not double back.
//
// Moves that change height are split: a step up first goes straight up
// (a corner node), a step down first goes horizontally into the air cell
// (a corner node). Corner nodes are transitions, never resting spots.
//
// The neighbour order and back-tracking filters produce asymmetric
// exploration: a node never expands back the way it came, even when that
// would be cheaper.
//
// **Critical constraint: determinism.** Expansion order depends only on the
// snapshot, the goal and the options: fixed neighbour order, heap ties
// broken by heuristic then insertion counter, `FxHashMap` without random
// state for the visited map (keyed by full `BlockPos`).
//
// See also: `ground.rs` for landing-height resolution, `cost.rs` for edge
// costs, `node.rs` for the arena and open-set ordering.

use crate::cost::Step;
use crate::debug::DebugCapture;
use crate::error::PathError;
use crate::goal::PathGoal;
use crate::ground::{MAX_DROP, Terrain};
use crate::node::{Node, NodeId, OpenEntry};
use crate::options::PathingOptions;
use crate::path::{Path, PathPoint};
use crate::snapshot::WorldSnapshot;
use familiar_voxel::{BlockKind, BlockPos, BlockReader, Direction};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Minimum number of rail nodes on a path before rail annotations are emitted.
pub const MIN_RAILS_LENGTH: usize = 8;

/// Snapshot box for a job whose positions of interest span `a..=b`.
fn window(a: BlockPos, b: BlockPos, range: u32) -> (BlockPos, BlockPos) {
    let pad = i32::try_from(range / 2).unwrap_or(i32::MAX);
    let lo = BlockPos::new(
        a.x.min(b.x).saturating_sub(pad),
        a.y.min(b.y).saturating_sub(pad).saturating_sub(MAX_DROP),
        a.z.min(b.z).saturating_sub(pad),
    );
    let hi = BlockPos::new(
        a.x.max(b.x).saturating_add(pad),
        a.y.max(b.y).saturating_add(pad),
        a.z.max(b.z).saturating_add(pad),
    );
    (lo, hi)
}

/// Cells in the smallest window a job with `range` captures (start and end
/// in the same block), before clamping to the world's height range.
pub fn min_window_cells(range: u32) -> u64 {
    let side = u64::from(range / 2) * 2 + 1;
    side.saturating_mul(side).saturating_mul(side + MAX_DROP as u64)
}

// ---------------------------------------------------------------------------
// Restriction box
// ---------------------------------------------------------------------------

/// Axis-aligned xz box limiting where a path may end.
///
/// A hard restriction also forbids expanding nodes outside the box (and a
/// start outside the box yields an immediate best-effort result). A soft
/// restriction only limits where the path may end; the search may leave the
/// box to find a way around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
    pub hard: bool,
}

impl Restriction {
    /// Box spanned by two corners, grown (or shrunk, if negative) by `grow`
    /// on x and z.
    pub fn new(a: BlockPos, b: BlockPos, grow: BlockPos, hard: bool) -> Self {
        Self {
            min_x: a.x.min(b.x) - grow.x,
            max_x: a.x.max(b.x) + grow.x,
            min_z: a.z.min(b.z) - grow.z,
            max_z: a.z.max(b.z) + grow.z,
            hard,
        }
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.z >= self.min_z && pos.z <= self.max_z
    }
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Engine state, advanced by `PathJob::search`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Initialized,
    Searching,
    DestinationReached,
    BestEffortExhausted,
    Cancelled,
    Finalized,
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A node satisfying the goal was reached.
    DestinationReached,
    /// The open set emptied or the visit budget ran out; the path leads to
    /// the best fallback node.
    BestEffort,
    /// Cancellation was requested. No path.
    Cancelled,
    /// The job panicked. No path.
    Faulted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes_added: u32,
    pub nodes_visited: u32,
    /// The search stopped because it hit the `range²` visit cap.
    pub budget_exhausted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub termination: Termination,
    pub path: Option<Path>,
    pub stats: SearchStats,
    pub debug: Option<DebugCapture>,
}

impl SearchOutcome {
    /// Outcome with no path, for cancelled or faulted jobs.
    pub fn empty(termination: Termination) -> Self {
        Self {
            termination,
            path: None,
            stats: SearchStats::default(),
            debug: None,
        }
    }

    pub fn reaches_destination(&self) -> bool {
        self.termination == Termination::DestinationReached
    }
}

// ---------------------------------------------------------------------------
// PathJob
// ---------------------------------------------------------------------------

pub struct PathJob {
    start: BlockPos,
    range: u32,
    goal: Box<dyn PathGoal>,
    options: PathingOptions,
    restriction: Option<Restriction>,
    world: WorldSnapshot,
    capture_debug: bool,
    state: JobState,
}

impl std::fmt::Debug for PathJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathJob")
            .field("start", &self.start)
            .field("range", &self.range)
            .field("restriction", &self.restriction)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PathJob {
    /// Goal-directed job. The snapshot covers the box around `start` and
    /// `end`, padded by `range / 2`.
    pub fn new<R, G>(
        reader: &R,
        start: BlockPos,
        end: BlockPos,
        range: u32,
        goal: G,
        options: PathingOptions,
    ) -> Result<Self, PathError>
    where
        R: BlockReader + ?Sized,
        G: PathGoal + 'static,
    {
        let (lo, hi) = window(start, end, range);
        let world = WorldSnapshot::capture_bounded(reader, lo, hi)?;
        Ok(Self::with_snapshot(world, start, range, Box::new(goal), options, None))
    }

    /// Job restricted to an xz box. The snapshot covers the box padded by
    /// `range / 2`, so soft-restricted searches can detour around it.
    /// Vertically it is centred on `start`.
    pub fn restricted<R, G>(
        reader: &R,
        start: BlockPos,
        restriction: Restriction,
        range: u32,
        goal: G,
        options: PathingOptions,
    ) -> Result<Self, PathError>
    where
        R: BlockReader + ?Sized,
        G: PathGoal + 'static,
    {
        let (lo, hi) = window(
            BlockPos::new(restriction.min_x, start.y, restriction.min_z),
            BlockPos::new(restriction.max_x, start.y, restriction.max_z),
            range,
        );
        let world = WorldSnapshot::capture_bounded(reader, lo, hi)?;
        Ok(Self::with_snapshot(world, start, range, Box::new(goal), options, Some(restriction)))
    }

    /// Build from an already captured snapshot.
    pub fn with_snapshot(
        world: WorldSnapshot,
        start: BlockPos,
        range: u32,
        goal: Box<dyn PathGoal>,
        options: PathingOptions,
        restriction: Option<Restriction>,
    ) -> Self {
        Self {
            start,
            range,
            goal,
            options,
            restriction,
            world,
            capture_debug: false,
            state: JobState::Initialized,
        }
    }

    /// Record discovered, expanded and path positions for this job.
    pub fn with_debug_capture(mut self) -> Self {
        self.capture_debug = true;
        self
    }

    pub fn start(&self) -> BlockPos {
        self.start
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn restriction(&self) -> Option<&Restriction> {
        self.restriction.as_ref()
    }

    pub fn options(&self) -> &PathingOptions {
        &self.options
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.world
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Maximum number of node expansions.
    pub fn visit_budget(&self) -> u64 {
        u64::from(self.range) * u64::from(self.range)
    }

    /// Run the search to completion on this thread.
    pub fn search(&mut self, cancel: &AtomicBool) -> SearchOutcome {
        let budget = self.visit_budget();
        let mut search = Search::new(
            &self.world,
            &self.options,
            self.goal.as_ref(),
            self.start,
            self.restriction,
            self.capture_debug,
        );
        self.state = JobState::Initialized;

        let hard = self.restriction.is_some_and(|r| r.hard);
        if hard && !search.in_area(self.start) {
            log::warn!("path job from {}: start outside hard restriction, no expansion", self.start);
        }

        let start_id = search.add_start();
        let mut best = start_id;
        let mut best_score = f64::MAX;
        let mut reached = false;
        self.state = JobState::Searching;

        loop {
            if cancel.load(Ordering::Relaxed) {
                self.state = JobState::Cancelled;
                log::trace!(
                    "path job from {} cancelled after {} visits",
                    self.start,
                    search.stats.nodes_visited
                );
                return SearchOutcome {
                    termination: Termination::Cancelled,
                    path: None,
                    stats: search.stats,
                    debug: search.debug,
                };
            }

            let Some(id) = search.pop_open() else {
                break;
            };
            if u64::from(search.stats.nodes_visited) >= budget {
                search.stats.budget_exhausted = true;
                break;
            }
            search.stats.nodes_visited += 1;

            let visits = search.stats.nodes_visited;
            let node = &mut search.nodes[id.index()];
            node.counter_visited = visits;
            node.closed = true;
            let node = *node;
            if let Some(debug) = search.debug.as_mut() {
                debug.expanded(node.pos);
            }

            let viable = search.in_area(node.pos) && search.terrain.is_walkable_ground(node.pos);
            if viable && search.goal.is_at_destination(&node) {
                best = id;
                reached = true;
                break;
            }

            let score = search.goal.node_result_score(&node);
            if viable && score < best_score && !node.corner {
                best = id;
                best_score = score;
            }

            if !hard || viable {
                search.expand(id);
            }
        }

        self.state = if reached {
            JobState::DestinationReached
        } else {
            JobState::BestEffortExhausted
        };
        let path = search.finalize(best);
        self.state = JobState::Finalized;

        log::debug!(
            "path job from {} finished: reached={} steps={} added={} visited={} budget_exhausted={}",
            self.start,
            reached,
            path.steps(),
            search.stats.nodes_added,
            search.stats.nodes_visited,
            search.stats.budget_exhausted
        );

        SearchOutcome {
            termination: if reached {
                Termination::DestinationReached
            } else {
                Termination::BestEffort
            },
            path: Some(path),
            stats: search.stats,
            debug: search.debug,
        }
    }
}

// ---------------------------------------------------------------------------
// Search internals
// ---------------------------------------------------------------------------

/// Per-search mutable state. Lives only for the duration of `search()`.
struct Search<'a> {
    terrain: Terrain<'a, WorldSnapshot>,
    goal: &'a dyn PathGoal,
    start: BlockPos,
    restriction: Option<Restriction>,
    nodes: Vec<Node>,
    visited: FxHashMap<BlockPos, NodeId>,
    open: BinaryHeap<OpenEntry>,
    stats: SearchStats,
    debug: Option<DebugCapture>,
}

impl<'a> Search<'a> {
    fn new(
        world: &'a WorldSnapshot,
        options: &'a PathingOptions,
        goal: &'a dyn PathGoal,
        start: BlockPos,
        restriction: Option<Restriction>,
        capture_debug: bool,
    ) -> Self {
        Self {
            terrain: Terrain::new(world, options),
            goal,
            start,
            restriction,
            nodes: Vec::new(),
            visited: FxHashMap::default(),
            open: BinaryHeap::new(),
            stats: SearchStats::default(),
            debug: capture_debug.then(DebugCapture::new),
        }
    }

    fn in_area(&self, pos: BlockPos) -> bool {
        self.restriction.is_none_or(|r| r.contains(pos))
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn push_open(&mut self, id: NodeId) {
        let entry = OpenEntry::for_node(id, &self.nodes[id.index()]);
        self.open.push(entry);
    }

    /// Pop the next live open node, skipping entries invalidated by re-scoring.
    fn pop_open(&mut self) -> Option<NodeId> {
        while let Some(entry) = self.open.pop() {
            let node = self.node(entry.node);
            if node.closed || node.version != entry.version {
                continue;
            }
            return Some(entry.node);
        }
        None
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.visited.insert(node.pos, id);
        if let Some(debug) = self.debug.as_mut() {
            debug.discovered(node.pos);
        }
        self.nodes.push(node);
        id
    }

    fn add_start(&mut self) -> NodeId {
        let start = self.start;
        let mut node = Node::start(start, self.goal.heuristic(start));
        if self.terrain.is_ladder_at(start) {
            node.ladder = true;
        } else if self.terrain.is_liquid_at(start.below()) {
            node.swimming = true;
        }
        node.on_rails = self.terrain.options.can_use_rails && self.terrain.state(start).kind == BlockKind::Rail;

        self.stats.nodes_added += 1;
        node.counter_added = self.stats.nodes_added;
        let id = self.insert(node);
        self.push_open(id);
        id
    }

    fn expand(&mut self, id: NodeId) {
        for delta in self.neighbour_moves(id) {
            self.walk(id, delta);
        }
    }

    /// Candidate moves out of `id`, in the fixed expansion order.
    fn neighbour_moves(&self, id: NodeId) -> SmallVec<[BlockPos; 8]> {
        let node = *self.node(id);
        let parent_pos = node.parent.map(|p| self.node(p).pos);
        let d = parent_pos.map_or(BlockPos::ZERO, |p| node.pos - p);

        let mut moves: SmallVec<[BlockPos; 8]> = SmallVec::new();

        // Straight up a ladder.
        if node.ladder && (d.y >= 0 || d.has_horizontal()) {
            moves.push(BlockPos::UP);
        }
        // Straight down onto a ladder.
        if (d.y <= 0 || d.has_horizontal()) && self.terrain.is_ladder_at(node.pos.below()) {
            moves.push(BlockPos::DOWN);
        }

        if node.corner && parent_pos.is_none_or(|p| p != node.pos.below()) {
            // Corner nodes only continue downward.
            moves.push(BlockPos::DOWN);
        } else {
            let from = parent_pos.unwrap_or(self.start);
            if self.terrain.passable(node.pos.below(), false, from) {
                moves.push(BlockPos::DOWN);
            }
            if d.z <= 0 {
                moves.push(BlockPos::NORTH);
            }
            if d.x >= 0 {
                moves.push(BlockPos::EAST);
            }
            if d.z >= 0 {
                moves.push(BlockPos::SOUTH);
            }
            if d.x <= 0 {
                moves.push(BlockPos::WEST);
            }
        }

        moves
    }

    /// Try to move from `parent_id` by `delta`, adding or improving a node.
    fn walk(&mut self, parent_id: NodeId, delta: BlockPos) -> bool {
        let parent = *self.node(parent_id);
        let grandparent = parent.parent.map(|g| self.node(g).pos);
        let mut d = delta;
        let mut pos = parent.pos + d;

        let Some(new_y) = self.terrain.ground_height(&parent, pos) else {
            return false;
        };

        let mut corner = false;
        if pos.y != new_y {
            if parent.corner && d.has_horizontal() {
                return false;
            }
            let rise = new_y - parent.pos.y;
            let lift = BlockPos::new(0, new_y - pos.y, 0);
            if !parent.corner && rise > 0 && grandparent.is_none_or(|g| g != parent.pos + lift) {
                // Going up: take the cell straight above first.
                d = lift;
                pos = parent.pos + d;
                corner = true;
            } else if !parent.corner
                && rise < 0
                && d.has_horizontal()
                && grandparent.is_none_or(|g| g != parent.pos.below())
            {
                // Going down: take the air cell beside us first.
                d = BlockPos::new(d.x, 0, d.z);
                pos = parent.pos + d;
                corner = true;
            } else {
                d = d + lift;
                pos = BlockPos::new(pos.x, new_y, pos.z);
            }
        }

        let existing = self.visited.get(&pos).copied();
        if existing.is_some_and(|e| self.node(e).closed) {
            return false;
        }

        let options = self.terrain.options;
        let swimming = match existing {
            Some(e) => self.node(e).swimming,
            None => self.terrain.is_water_at(pos.below()),
        };
        if swimming && !options.can_swim {
            return false;
        }

        let rail_cell = if corner { pos.below() } else { pos };
        let on_rails = options.can_use_rails && self.terrain.state(rail_cell).kind == BlockKind::Rail;
        let step = Step {
            delta: d,
            swimming,
            on_path: options.is_road(&self.terrain.state(pos.below())),
            on_rails,
            rails_exit: !on_rails && parent.on_rails,
            swim_start: swimming && !parent.swimming,
            corner,
        };
        let cost = parent.cost + options.step_cost(&step, &self.terrain.state(pos));
        let heuristic = self.goal.heuristic(pos);
        let score = cost + heuristic;

        let id = match existing {
            None => {
                let mut node = Node::child((parent_id, &parent), pos, cost, heuristic);
                if self.terrain.is_ladder_at(pos) {
                    node.ladder = true;
                } else if swimming {
                    node.swimming = true;
                }
                node.on_rails = on_rails;
                node.corner = corner;
                self.stats.nodes_added += 1;
                node.counter_added = self.stats.nodes_added;
                self.insert(node)
            }
            Some(e) => {
                let node = &mut self.nodes[e.index()];
                if score >= node.score {
                    return false;
                }
                node.parent = Some(parent_id);
                node.steps = parent.steps + 1;
                node.cost = cost;
                node.heuristic = heuristic;
                node.score = score;
                node.version += 1;
                e
            }
        };
        self.push_open(id);

        // Keep going in the same direction while it looks like an improvement.
        if options.jump_point_search && self.node(id).heuristic <= parent.heuristic {
            self.walk(id, d);
        }
        true
    }

    /// Build the path from the start to `final_id`.
    fn finalize(&mut self, final_id: NodeId) -> Path {
        let mut chain = Vec::new();
        let mut cursor = Some(final_id);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.node(id).parent;
        }
        chain.reverse();

        if let Some(debug) = self.debug.as_mut() {
            for &id in &chain {
                debug.on_path(self.nodes[id.index()].pos);
            }
        }

        let rails_length = chain.iter().skip(1).filter(|&&id| self.node(id).on_rails).count();
        let mut points: Vec<PathPoint> = chain.iter().map(|&id| PathPoint::new(self.node(id).pos)).collect();

        // Walk back from the end so the following point is already annotated.
        for i in (1..chain.len()).rev() {
            let node = *self.node(chain[i]);
            let parent = *self.node(chain[i - 1]);
            let next = chain.get(i + 1).map(|&id| *self.node(id));

            // Swimming points keep their position; the flag tells movers not to sink.
            points[i].swimming = node.swimming;

            if rails_length >= MIN_RAILS_LENGTH {
                points[i].on_rails = node.on_rails;
                if node.on_rails && (!parent.on_rails || parent.parent.is_none()) {
                    points[i].rails_entry = true;
                } else if node.on_rails && i + 1 < points.len() && !points[i + 1].on_rails {
                    points[i + 1].rails_exit = true;
                }
            }

            let climbing = next.filter(|n| node.ladder && same_column(n.pos, node.pos));
            if let Some(next) = climbing {
                points[i].on_ladder = true;
                if next.pos.y > node.pos.y {
                    points[i].ladder_facing = Some(self.ladder_facing(node.pos));
                }
            } else if parent.ladder && same_column(parent.pos, node.pos) {
                points[i].on_ladder = true;
            }
        }

        let last = *self.node(final_id);
        Path {
            points,
            target: self.goal.path_target(&last),
            reaches_destination: self.goal.is_at_destination(&last),
            cost: last.cost,
        }
    }

    /// Side a climber faces at `pos`.
    fn ladder_facing(&self, pos: BlockPos) -> Direction {
        let state = self.terrain.state(pos);
        match state.kind {
            BlockKind::Ladder => state.facing,
            BlockKind::Vine => state.facing.opposite(),
            _ => Direction::Up,
        }
    }
}

fn same_column(a: BlockPos, b: BlockPos) -> bool {
    a.x == b.x && a.z == b.z
}
