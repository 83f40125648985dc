use super::projection::GridPos;
use super::world::{EntityId, InteractableKind};

/// Raised when the player crosses an interactable's trigger boundary.
/// `active` is true on entry and false on exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionEvent {
    pub id: EntityId,
    pub kind: InteractableKind,
    pub active: bool,
}

/// Callbacks from the session to whatever embeds it. All methods default to
/// no-ops so hosts only implement what they care about.
pub trait WorldHost {
    /// The player's logical cell changed through an accepted step.
    fn player_moved(&mut self, _cell: GridPos) {}

    /// A proximity trigger fired or cleared.
    fn interaction(&mut self, _event: InteractionEvent) {}
}

/// Host that ignores everything. Useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullHost;

impl WorldHost for NullHost {}
