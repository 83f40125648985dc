use std::collections::HashSet;

use tracing::debug;

use super::host::InteractionEvent;
use super::projection::GridPos;
use super::world::{EntityId, WorldState};

/// Latched proximity detection against the player's logical cell. Each
/// trigger fires one entry event when the player crosses in and one exit
/// event when they cross back out, nothing in between.
#[derive(Debug, Default)]
pub struct InteractionDetector {
    latched: HashSet<EntityId>,
}

impl InteractionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares the player's cell against every trigger. Events come back
    /// in entity registration order, so hosts see a stable sequence.
    pub fn update(&mut self, player: GridPos, world: &WorldState) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        for interactable in world.interactables() {
            if interactable.trigger_radius <= 0.0 {
                continue;
            }
            let inside = player.distance_to(interactable.position) < interactable.trigger_radius;
            let latched = self.latched.contains(&interactable.id);
            if inside && !latched {
                self.latched.insert(interactable.id);
                debug!(id = interactable.id.0, kind = interactable.kind.label(), "trigger_entered");
                events.push(InteractionEvent {
                    id: interactable.id,
                    kind: interactable.kind,
                    active: true,
                });
            } else if !inside && latched {
                self.latched.remove(&interactable.id);
                debug!(id = interactable.id.0, kind = interactable.kind.label(), "trigger_left");
                events.push(InteractionEvent {
                    id: interactable.id,
                    kind: interactable.kind,
                    active: false,
                });
            }
        }
        events
    }

    /// Clears one latch so the next update inside the radius fires entry
    /// again. Hosts call this after consuming an interaction.
    pub fn reset_latch(&mut self, id: EntityId) {
        self.latched.remove(&id);
    }
}
