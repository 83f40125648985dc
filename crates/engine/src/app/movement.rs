use tracing::debug;

use super::projection::{GridPos, WorldVec};
use super::world::WorldState;

/// Below this per-axis distance the rendered position snaps onto the target
/// instead of easing further.
pub const MOVE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
    Left,
    Right,
}

impl StepDirection {
    fn delta(self) -> (i32, i32) {
        match self {
            StepDirection::Up => (0, -1),
            StepDirection::Down => (0, 1),
            StepDirection::Left => (-1, 0),
            StepDirection::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Accepted,
    RejectedOutOfBounds,
    RejectedBlocked,
    RejectedOccupied,
}

/// Grid-constrained player movement. The logical target cell moves in whole
/// steps; the rendered position eases toward it each frame and is only ever
/// used for drawing.
#[derive(Debug, Clone)]
pub struct MovementController {
    target: GridPos,
    rendered: WorldVec,
    smoothing: f32,
}

impl MovementController {
    pub fn new(spawn: GridPos, smoothing: f32) -> Self {
        Self {
            target: spawn,
            rendered: spawn.to_world(),
            smoothing,
        }
    }

    pub fn target(&self) -> GridPos {
        self.target
    }

    pub fn rendered(&self) -> WorldVec {
        self.rendered
    }

    /// Attempts a one-cell step. The target only changes on `Accepted`; a
    /// rejected step leaves both positions untouched.
    pub fn request_step(&mut self, direction: StepDirection, world: &WorldState) -> StepOutcome {
        let (dx, dy) = direction.delta();
        let candidate = GridPos {
            x: self.target.x + dx,
            y: self.target.y + dy,
        };

        let outcome = if !world.grid().in_bounds(candidate) {
            StepOutcome::RejectedOutOfBounds
        } else if !world
            .grid()
            .tile_at(candidate)
            .is_some_and(|tile| tile.is_walkable())
        {
            StepOutcome::RejectedBlocked
        } else if world.is_cell_occupied(candidate) {
            StepOutcome::RejectedOccupied
        } else {
            self.target = candidate;
            StepOutcome::Accepted
        };

        if outcome != StepOutcome::Accepted {
            debug!(
                x = candidate.x,
                y = candidate.y,
                ?outcome,
                "step_rejected"
            );
        }
        outcome
    }

    /// One animation frame: each axis moves a `smoothing` fraction of its
    /// remaining distance, then snaps once inside [`MOVE_EPSILON`].
    pub fn advance(&mut self) {
        let target = self.target.to_world();
        self.rendered.x = approach(self.rendered.x, target.x, self.smoothing);
        self.rendered.y = approach(self.rendered.y, target.y, self.smoothing);
    }

    /// Whether the rendered position has reached the logical target.
    pub fn is_settled(&self) -> bool {
        let target = self.target.to_world();
        self.rendered.x == target.x && self.rendered.y == target.y
    }
}

fn approach(current: f32, target: f32, smoothing: f32) -> f32 {
    let remaining = target - current;
    if remaining.abs() < MOVE_EPSILON {
        target
    } else {
        current + remaining * smoothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::grid::TileGrid;
    use crate::app::world::InteractableKind;

    fn open_world(size: usize) -> WorldState {
        let grid = TileGrid::authored(&vec![vec![0; size]; size]).expect("grid");
        WorldState::new(grid)
    }

    fn walled_world() -> WorldState {
        // 4x4 with a wall ring, only the inner 2x2 walkable
        let grid = TileGrid::authored(&[
            vec![1, 1, 1, 1],
            vec![1, 0, 0, 1],
            vec![1, 0, 0, 1],
            vec![1, 1, 1, 1],
        ])
        .expect("grid");
        WorldState::new(grid)
    }

    #[test]
    fn accepted_step_moves_the_target_one_cell() {
        let world = open_world(8);
        let mut movement = MovementController::new(GridPos { x: 1, y: 1 }, 0.1);

        assert_eq!(
            movement.request_step(StepDirection::Left, &world),
            StepOutcome::Accepted
        );
        assert_eq!(movement.target(), GridPos { x: 0, y: 1 });
        // rendered position has not jumped
        assert_eq!(movement.rendered(), WorldVec { x: 1.0, y: 1.0 });
    }

    #[test]
    fn step_off_the_grid_is_rejected() {
        let world = open_world(4);
        let mut movement = MovementController::new(GridPos { x: 0, y: 0 }, 0.1);

        assert_eq!(
            movement.request_step(StepDirection::Up, &world),
            StepOutcome::RejectedOutOfBounds
        );
        assert_eq!(
            movement.request_step(StepDirection::Left, &world),
            StepOutcome::RejectedOutOfBounds
        );
        assert_eq!(movement.target(), GridPos { x: 0, y: 0 });
    }

    #[test]
    fn step_into_a_wall_is_rejected() {
        let world = walled_world();
        let mut movement = MovementController::new(GridPos { x: 1, y: 1 }, 0.1);

        assert_eq!(
            movement.request_step(StepDirection::Up, &world),
            StepOutcome::RejectedBlocked
        );
        assert_eq!(movement.target(), GridPos { x: 1, y: 1 });
        assert_eq!(
            movement.request_step(StepDirection::Down, &world),
            StepOutcome::Accepted
        );
    }

    #[test]
    fn step_into_an_occupied_cell_is_rejected() {
        let mut world = open_world(8);
        world.add_interactable(InteractableKind::Rock, GridPos { x: 2, y: 1 }, 0.0);
        let mut movement = MovementController::new(GridPos { x: 1, y: 1 }, 0.1);

        assert_eq!(
            movement.request_step(StepDirection::Right, &world),
            StepOutcome::RejectedOccupied
        );
        assert_eq!(movement.target(), GridPos { x: 1, y: 1 });
    }

    #[test]
    fn advance_eases_by_the_smoothing_fraction() {
        let world = open_world(12);
        let mut movement = MovementController::new(GridPos { x: 5, y: 3 }, 0.2);
        assert_eq!(
            movement.request_step(StepDirection::Right, &world),
            StepOutcome::Accepted
        );

        movement.advance();
        assert!((movement.rendered().x - 5.2).abs() < 0.0001);
        assert!((movement.rendered().y - 3.0).abs() < 0.0001);
    }

    #[test]
    fn advance_snaps_exactly_once_within_epsilon() {
        let world = open_world(12);
        let mut movement = MovementController::new(GridPos { x: 5, y: 5 }, 0.5);
        movement.request_step(StepDirection::Down, &world);

        // 0.5 halves the distance each frame; after 7 frames the remainder
        // is below 0.01 and the next advance lands exactly on the target.
        for _ in 0..8 {
            movement.advance();
        }
        assert_eq!(movement.rendered(), WorldVec { x: 5.0, y: 6.0 });
        assert!(movement.is_settled());
    }

    #[test]
    fn default_smoothing_settles_a_unit_step_within_fifty_frames() {
        let world = open_world(12);
        let mut movement = MovementController::new(GridPos { x: 4, y: 4 }, 0.1);
        movement.request_step(StepDirection::Right, &world);

        let mut frames = 0;
        while !movement.is_settled() {
            movement.advance();
            frames += 1;
            assert!(frames <= 50, "did not settle within 50 frames");
        }
        assert_eq!(movement.rendered(), WorldVec { x: 5.0, y: 4.0 });
    }

    #[test]
    fn axes_interpolate_independently() {
        let world = open_world(12);
        let mut movement = MovementController::new(GridPos { x: 2, y: 2 }, 0.1);
        movement.request_step(StepDirection::Right, &world);
        movement.advance();
        movement.advance();
        // second step on the other axis while the first is still easing
        movement.request_step(StepDirection::Down, &world);
        movement.advance();

        let rendered = movement.rendered();
        assert!(rendered.x > 2.2 && rendered.x < 3.0);
        assert!(rendered.y > 2.0 && rendered.y < 2.2);
        assert_eq!(movement.target(), GridPos { x: 3, y: 3 });
    }
}
