use std::collections::HashSet;

use engine::{EntityId, GridPos, InteractionEvent, WorldHost};
use tracing::{debug, info};

/// Game-side listener: logs movement, tracks which triggers are currently
/// active and counts total steps for the session summary.
#[derive(Debug, Default)]
pub(crate) struct GameHost {
    steps_taken: u64,
    active_triggers: HashSet<EntityId>,
}

impl WorldHost for GameHost {
    fn player_moved(&mut self, cell: GridPos) {
        self.steps_taken += 1;
        debug!(x = cell.x, y = cell.y, steps = self.steps_taken, "player_moved");
    }

    fn interaction(&mut self, event: InteractionEvent) {
        if event.active {
            self.active_triggers.insert(event.id);
        } else {
            self.active_triggers.remove(&event.id);
        }
        info!(
            kind = event.kind.label(),
            id = event.id.0,
            active = event.active,
            "interaction"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::InteractableKind;

    #[test]
    fn active_triggers_follow_enter_and_exit_events() {
        let mut host = GameHost::default();
        let event = InteractionEvent {
            id: EntityId(3),
            kind: InteractableKind::Shop,
            active: true,
        };
        host.interaction(event);
        assert!(host.active_triggers.contains(&EntityId(3)));

        host.interaction(InteractionEvent {
            active: false,
            ..event
        });
        assert!(host.active_triggers.is_empty());
    }

    #[test]
    fn steps_are_counted() {
        let mut host = GameHost::default();
        host.player_moved(GridPos { x: 1, y: 0 });
        host.player_moved(GridPos { x: 2, y: 0 });
        assert_eq!(host.steps_taken, 2);
    }
}
