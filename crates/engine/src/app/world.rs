use serde::Deserialize;

use super::grid::TileGrid;
use super::projection::GridPos;

/// Stable handle for a registered entity. Ids are handed out in registration
/// order and never reused, which also fixes draw order for equal depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractableKind {
    Monolith,
    Shop,
    House,
    Rock,
    Tree,
}

impl InteractableKind {
    pub fn label(self) -> &'static str {
        match self {
            InteractableKind::Monolith => "monolith",
            InteractableKind::Shop => "shop",
            InteractableKind::House => "house",
            InteractableKind::Rock => "rock",
            InteractableKind::Tree => "tree",
        }
    }
}

/// A stationary world object. With a positive `trigger_radius` it raises
/// proximity events; with radius zero it is a pure obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    pub id: EntityId,
    pub kind: InteractableKind,
    pub position: GridPos,
    pub trigger_radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub id: EntityId,
    pub name: String,
    pub position: GridPos,
}

/// The immutable-after-setup world: the tile grid plus every registered
/// entity. Registration is append-only; nothing is removed at runtime.
#[derive(Debug, Clone)]
pub struct WorldState {
    grid: TileGrid,
    next_id: u32,
    interactables: Vec<Interactable>,
    npcs: Vec<Npc>,
}

impl WorldState {
    pub fn new(grid: TileGrid) -> Self {
        Self {
            grid,
            next_id: 0,
            interactables: Vec::new(),
            npcs: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_interactable(
        &mut self,
        kind: InteractableKind,
        position: GridPos,
        trigger_radius: f32,
    ) -> EntityId {
        let id = self.allocate_id();
        self.interactables.push(Interactable {
            id,
            kind,
            position,
            trigger_radius,
        });
        id
    }

    pub fn add_npc(&mut self, name: impl Into<String>, position: GridPos) -> EntityId {
        let id = self.allocate_id();
        self.npcs.push(Npc {
            id,
            name: name.into(),
            position,
        });
        id
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn interactables(&self) -> &[Interactable] {
        &self.interactables
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// Whether a cell is taken by a stationary entity. Entities share the
    /// grid with the player but never overlap each other by construction.
    pub fn is_cell_occupied(&self, cell: GridPos) -> bool {
        self.interactables.iter().any(|it| it.position == cell)
            || self.npcs.iter().any(|npc| npc.position == cell)
    }

    /// Legal destination for a player step: inside the grid, on a walkable
    /// tile, and not taken by an entity.
    pub fn is_cell_open(&self, cell: GridPos) -> bool {
        self.grid.is_walkable(cell) && !self.is_cell_occupied(cell)
    }
}
