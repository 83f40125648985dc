use super::movement::StepDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Quit,
}

impl InputAction {
    /// Movement actions map onto grid steps; `Quit` has no direction.
    pub fn step_direction(self) -> Option<StepDirection> {
        match self {
            InputAction::MoveUp => Some(StepDirection::Up),
            InputAction::MoveDown => Some(StepDirection::Down),
            InputAction::MoveLeft => Some(StepDirection::Left),
            InputAction::MoveRight => Some(StepDirection::Right),
            InputAction::Quit => None,
        }
    }
}

const DIRECTION_COUNT: usize = 4;

const fn direction_index(direction: StepDirection) -> usize {
    match direction {
        StepDirection::Up => 0,
        StepDirection::Down => 1,
        StepDirection::Left => 2,
        StepDirection::Right => 3,
    }
}

/// Held-direction state with last-write-wins resolution: the most recently
/// pressed direction drives movement, and releasing it falls back to any
/// direction still held.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DirectionLatch {
    down: [bool; DIRECTION_COUNT],
    latest: Option<StepDirection>,
}

impl DirectionLatch {
    pub(crate) fn set(&mut self, direction: StepDirection, is_down: bool) {
        self.down[direction_index(direction)] = is_down;
        if is_down {
            self.latest = Some(direction);
        } else if self.latest == Some(direction) {
            self.latest = self.any_down();
        }
    }

    pub(crate) fn current(&self) -> Option<StepDirection> {
        self.latest.filter(|dir| self.down[direction_index(*dir)])
    }

    fn any_down(&self) -> Option<StepDirection> {
        [
            StepDirection::Up,
            StepDirection::Down,
            StepDirection::Left,
            StepDirection::Right,
        ]
        .into_iter()
        .find(|dir| self.down[direction_index(*dir)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_pressed_direction_wins() {
        let mut latch = DirectionLatch::default();
        latch.set(StepDirection::Up, true);
        latch.set(StepDirection::Right, true);
        assert_eq!(latch.current(), Some(StepDirection::Right));
    }

    #[test]
    fn releasing_the_active_direction_falls_back_to_a_held_one() {
        let mut latch = DirectionLatch::default();
        latch.set(StepDirection::Up, true);
        latch.set(StepDirection::Right, true);
        latch.set(StepDirection::Right, false);
        assert_eq!(latch.current(), Some(StepDirection::Up));
    }

    #[test]
    fn no_direction_when_everything_is_released() {
        let mut latch = DirectionLatch::default();
        latch.set(StepDirection::Left, true);
        latch.set(StepDirection::Left, false);
        assert_eq!(latch.current(), None);
    }

    #[test]
    fn releasing_an_inactive_direction_keeps_the_active_one() {
        let mut latch = DirectionLatch::default();
        latch.set(StepDirection::Down, true);
        latch.set(StepDirection::Left, true);
        latch.set(StepDirection::Down, false);
        assert_eq!(latch.current(), Some(StepDirection::Left));
    }
}
