// Edge cost model.
//
// The cost of a step is the Euclidean length of its integer delta, scaled
// by the profile's multipliers. Multipliers compose multiplicatively:
// a swim-entry step that also drops one block pays
// `length * drop_cost * swim_cost_enter`.
//
// Vertical moves pay `jump_cost` or `drop_cost` once per block of height
// change, except a single-block change onto a stair block, which is a normal
// walking step.

use crate::options::PathingOptions;
use familiar_voxel::{BlockKind, BlockPos, BlockState};

/// Terrain facts about one step, gathered by the search engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Step {
    pub delta: BlockPos,
    pub swimming: bool,
    pub on_path: bool,
    pub on_rails: bool,
    pub rails_exit: bool,
    pub swim_start: bool,
    pub corner: bool,
}

impl Step {
    pub fn new(delta: BlockPos) -> Self {
        Self {
            delta,
            ..Self::default()
        }
    }
}

impl PathingOptions {
    /// Weighted cost of moving by `step.delta` into a cell holding `target`.
    ///
    /// Always `>= 0` for non-negative multipliers.
    pub fn step_cost(&self, step: &Step, target: &BlockState) -> f64 {
        let d = step.delta;
        let mut cost = d.length();

        let onto_stairs = d.y.abs() <= 1 && target.kind == BlockKind::Stairs;
        if d.y != 0 && !onto_stairs {
            let height = f64::from(d.y.abs());
            if d.y > 0 {
                cost *= self.jump_cost * height;
            } else {
                cost *= self.drop_cost * height;
            }
        }

        if target.has_open_property() {
            cost *= self.traverse_toggle_able_cost;
        }
        if step.on_path {
            cost *= self.on_path_cost;
        }
        if step.on_rails {
            cost *= self.on_rail_cost;
        }
        if step.rails_exit {
            cost *= self.rails_exit_cost;
        }
        if step.swimming {
            if step.swim_start {
                cost *= self.swim_cost_enter;
            } else {
                cost *= self.swim_cost;
            }
        }

        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costly() -> PathingOptions {
        PathingOptions {
            jump_cost: 2.0,
            drop_cost: 3.0,
            on_path_cost: 0.5,
            on_rail_cost: 0.1,
            rails_exit_cost: 4.0,
            swim_cost: 1.5,
            swim_cost_enter: 25.0,
            traverse_toggle_able_cost: 2.0,
            ..PathingOptions::default()
        }
    }

    #[test]
    fn axis_and_diagonal_lengths() {
        let options = PathingOptions::default();
        let air = BlockState::AIR;
        assert_eq!(options.step_cost(&Step::new(BlockPos::EAST), &air), 1.0);
        let diag = options.step_cost(&Step::new(BlockPos::new(1, 0, 1)), &air);
        assert!((diag - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn jump_and_drop_scale_with_height() {
        let options = costly();
        let air = BlockState::AIR;
        assert_eq!(options.step_cost(&Step::new(BlockPos::UP), &air), 2.0);
        assert_eq!(options.step_cost(&Step::new(BlockPos::DOWN), &air), 3.0);
        // Two-block drop: length 2, times drop_cost * 2.
        assert_eq!(options.step_cost(&Step::new(BlockPos::new(0, -2, 0)), &air), 12.0);
    }

    #[test]
    fn one_block_rise_onto_stairs_is_free_of_jump_cost() {
        let options = costly();
        let stairs = BlockState::of(BlockKind::Stairs);
        assert_eq!(options.step_cost(&Step::new(BlockPos::UP), &stairs), 1.0);
    }

    #[test]
    fn multipliers_compose() {
        let options = costly();
        let step = Step {
            swimming: true,
            swim_start: true,
            on_path: true,
            ..Step::new(BlockPos::DOWN)
        };
        let cost = options.step_cost(&step, &BlockState::AIR);
        assert!((cost - 3.0 * 0.5 * 25.0).abs() < 1e-12);

        let door = BlockState::of(BlockKind::Door);
        assert_eq!(options.step_cost(&Step::new(BlockPos::NORTH), &door), 2.0);
    }

    #[test]
    fn rails_and_exit() {
        let options = costly();
        let on = Step {
            on_rails: true,
            ..Step::new(BlockPos::EAST)
        };
        assert!((options.step_cost(&on, &BlockState::AIR) - 0.1).abs() < 1e-12);
        let exit = Step {
            rails_exit: true,
            ..Step::new(BlockPos::EAST)
        };
        assert_eq!(options.step_cost(&exit, &BlockState::AIR), 4.0);
    }
}
