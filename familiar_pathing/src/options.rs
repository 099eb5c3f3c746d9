// Capability profile and cost multipliers for a path job.
//
// `PathingOptions` is an immutable value handed to each job at
// construction. It describes what the moving entity can do (swim, ride
// rails, open doors, fit through one-block gaps) and how strongly each
// terrain feature should bias the search. Different profiles change edge
// costs and passability; they never change the search algorithm.
//
// All multipliers default to 1.0 (neutral) and all capabilities to false.
// Loaded from JSON as part of `PathfinderConfig`; see `config.rs`.

use familiar_voxel::{BlockKind, BlockState};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathingOptions {
    /// Multiplier per block of upward movement.
    pub jump_cost: f64,
    /// Multiplier per block of downward movement.
    pub drop_cost: f64,
    /// Multiplier for steps onto a road block (see `road_blocks`).
    pub on_path_cost: f64,
    /// Multiplier for steps along rails.
    pub on_rail_cost: f64,
    /// Multiplier for the first step off rails.
    pub rails_exit_cost: f64,
    /// Multiplier for each step while already swimming.
    pub swim_cost: f64,
    /// Multiplier for the step that enters water.
    pub swim_cost_enter: f64,
    /// Multiplier for stepping into doors, trapdoors and fence gates.
    pub traverse_toggle_able_cost: f64,

    pub can_swim: bool,
    pub can_use_rails: bool,
    pub can_enter_doors: bool,
    /// Entity is at most one block tall, so only the target cell needs headroom.
    pub can_fit_in_one_cube: bool,

    /// Block kinds that count as road when stood upon.
    pub road_blocks: Vec<BlockKind>,

    /// Keep stepping in the same direction while the heuristic improves.
    /// Faster on open terrain but can produce odd paths.
    pub jump_point_search: bool,
}

impl Default for PathingOptions {
    fn default() -> Self {
        Self {
            jump_cost: 1.0,
            drop_cost: 1.0,
            on_path_cost: 1.0,
            on_rail_cost: 1.0,
            rails_exit_cost: 1.0,
            swim_cost: 1.0,
            swim_cost_enter: 1.0,
            traverse_toggle_able_cost: 1.0,
            can_swim: false,
            can_use_rails: false,
            can_enter_doors: false,
            can_fit_in_one_cube: false,
            road_blocks: Vec::new(),
            jump_point_search: false,
        }
    }
}

impl PathingOptions {
    /// The is-road predicate.
    pub fn is_road(&self, state: &BlockState) -> bool {
        self.road_blocks.contains(&state.kind)
    }

    pub fn with_swimming(mut self, can_swim: bool) -> Self {
        self.can_swim = can_swim;
        self
    }

    pub fn with_rails(mut self, can_use_rails: bool) -> Self {
        self.can_use_rails = can_use_rails;
        self
    }

    pub fn with_doors(mut self, can_enter_doors: bool) -> Self {
        self.can_enter_doors = can_enter_doors;
        self
    }

    pub fn with_one_cube_fit(mut self, fits: bool) -> Self {
        self.can_fit_in_one_cube = fits;
        self
    }

    /// All cost multipliers with their field names, for validation.
    pub(crate) fn multipliers(&self) -> [(&'static str, f64); 8] {
        [
            ("jump_cost", self.jump_cost),
            ("drop_cost", self.drop_cost),
            ("on_path_cost", self.on_path_cost),
            ("on_rail_cost", self.on_rail_cost),
            ("rails_exit_cost", self.rails_exit_cost),
            ("swim_cost", self.swim_cost),
            ("swim_cost_enter", self.swim_cost_enter),
            ("traverse_toggle_able_cost", self.traverse_toggle_able_cost),
        ]
    }
}
