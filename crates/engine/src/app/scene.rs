use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;

use super::camera::{CameraBounds, CameraController};
use super::config::{ConfigError, MapSource, PlayerAppearance, WorldConfig};
use super::grid::{scatter_cells, MapGenError, TileGrid};
use super::host::WorldHost;
use super::interaction::InteractionDetector;
use super::movement::{MovementController, StepDirection, StepOutcome};
use super::projection::{GridPos, IsoProjection, ScreenVec, WorldVec};
use super::rendering::Viewport;
use super::world::{EntityId, WorldState};

/// Startup progression. Transitions are one-way; a session in `World` stays
/// there for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Boot,
    Preload,
    World,
}

impl SessionPhase {
    pub fn advance(self) -> SessionPhase {
        match self {
            SessionPhase::Boot => SessionPhase::Preload,
            SessionPhase::Preload => SessionPhase::World,
            SessionPhase::World => SessionPhase::World,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SessionPhase::Boot => "boot",
            SessionPhase::Preload => "preload",
            SessionPhase::World => "world",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    MapGen(#[from] MapGenError),
    #[error("spawn cell ({x}, {y}) is not open")]
    SpawnBlocked { x: i32, y: i32 },
    #[error("entity placed outside the grid at ({x}, {y})")]
    PlacementOutOfBounds { x: i32, y: i32 },
}

/// Everything the renderer needs for one frame, read-only. Built after the
/// tick phase so simulation state never changes mid-draw.
#[derive(Debug)]
pub struct FrameSnapshot<'a> {
    pub world: &'a WorldState,
    pub projection: IsoProjection,
    pub player_rendered: WorldVec,
    pub player_target: GridPos,
    pub appearance: &'a PlayerAppearance,
    /// Translation from projected screen space into viewport pixels.
    pub view_offset: ScreenVec,
}

/// One running world: grid, entities, player movement, camera and proximity
/// triggers, advanced by fixed ticks and read through [`FrameSnapshot`].
#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    projection: IsoProjection,
    world: WorldState,
    movement: MovementController,
    camera: CameraController,
    detector: InteractionDetector,
    appearance: PlayerAppearance,
    bounds: CameraBounds,
}

impl Session {
    /// Validates the config and builds the whole world up front. The phase
    /// machine still starts at `Boot`; ticking walks it into `World`.
    pub fn new(config: WorldConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let grid = match &config.map {
            MapSource::Authored { rows } => TileGrid::authored(rows)?,
            MapSource::Radial {
                size,
                center,
                inner_radius,
                settle_radius,
            } => TileGrid::radial(*size, *center, *inner_radius, *settle_radius)?,
        };
        let projection = IsoProjection::new(config.tile_width, config.tile_height);
        let bounds = CameraBounds::of_grid(&projection, grid.size());

        let placements = config
            .interactables
            .iter()
            .map(|interactable| interactable.position)
            .chain(config.npcs.iter().map(|npc| npc.position));
        for position in placements {
            if !grid.in_bounds(position) {
                return Err(SessionError::PlacementOutOfBounds {
                    x: position.x,
                    y: position.y,
                });
            }
        }

        let mut world = WorldState::new(grid);
        for interactable in &config.interactables {
            world.add_interactable(
                interactable.kind,
                interactable.position,
                interactable.trigger_radius,
            );
        }
        for npc in &config.npcs {
            world.add_npc(npc.name.clone(), npc.position);
        }
        for scatter in &config.scatter {
            let mut rng = ChaCha8Rng::seed_from_u64(scatter.seed);
            let mut reserved: Vec<GridPos> =
                world.interactables().iter().map(|it| it.position).collect();
            reserved.extend(world.npcs().iter().map(|npc| npc.position));
            reserved.push(config.spawn);
            let cells = scatter_cells(world.grid(), scatter.zone, scatter.count, &mut rng, &reserved);
            for cell in cells {
                world.add_interactable(scatter.kind, cell, 0.0);
            }
        }

        if !world.is_cell_open(config.spawn) {
            return Err(SessionError::SpawnBlocked {
                x: config.spawn.x,
                y: config.spawn.y,
            });
        }

        Ok(Self {
            phase: SessionPhase::Boot,
            projection,
            movement: MovementController::new(config.spawn, config.move_smoothing),
            camera: CameraController::new(config.camera),
            detector: InteractionDetector::new(),
            appearance: config.player.clone(),
            world,
            bounds,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn player_cell(&self) -> GridPos {
        self.movement.target()
    }

    /// Rearms one trigger so it fires entry again without the player
    /// leaving. Hosts call this after handling an interaction.
    pub fn reset_interaction_latch(&mut self, id: EntityId) {
        self.detector.reset_latch(id);
    }

    /// One fixed simulation tick: movement, then camera, then proximity
    /// triggers. Host callbacks fire inside the tick, in that order.
    pub fn tick(
        &mut self,
        pending_step: Option<StepDirection>,
        viewport: Viewport,
        host: &mut dyn WorldHost,
    ) {
        if self.phase != SessionPhase::World {
            let next = self.phase.advance();
            info!(from = self.phase.label(), to = next.label(), "phase_advanced");
            self.phase = next;
            return;
        }

        if let Some(direction) = pending_step {
            if self.movement.is_settled()
                && self.movement.request_step(direction, &self.world) == StepOutcome::Accepted
            {
                host.player_moved(self.movement.target());
            }
        }
        self.movement.advance();

        let follow = self.projection.to_screen(self.movement.rendered());
        self.camera.update(follow, viewport, Some(&self.bounds));

        for event in self.detector.update(self.movement.target(), &self.world) {
            host.interaction(event);
        }
    }

    pub fn frame_snapshot(&self, viewport: Viewport) -> Option<FrameSnapshot<'_>> {
        if self.phase != SessionPhase::World {
            return None;
        }
        Some(FrameSnapshot {
            world: &self.world,
            projection: self.projection,
            player_rendered: self.movement.rendered(),
            player_target: self.movement.target(),
            appearance: &self.appearance,
            view_offset: self.camera.view_offset(viewport),
        })
    }
}
