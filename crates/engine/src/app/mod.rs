mod camera;
mod config;
mod grid;
mod host;
mod input;
mod interaction;
mod loop_runner;
mod metrics;
mod movement;
mod projection;
mod rendering;
mod scene;
mod world;

pub use camera::{CameraBounds, CameraController};
pub use config::{
    build_demo_appearance, parse_hex_color, CameraConfig, CameraMode, ConfigError, HairStyle,
    InteractableConfig, MapSource, NpcConfig, PlayerAppearance, ScatterConfig, WorldConfig,
};
pub use grid::{scatter_cells, MapGenError, TileGrid, TileKind};
pub use host::{InteractionEvent, NullHost, WorldHost};
pub use input::InputAction;
pub use interaction::InteractionDetector;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use movement::{MovementController, StepDirection, StepOutcome, MOVE_EPSILON};
pub use projection::{GridPos, IsoProjection, ScreenVec, WorldVec};
pub use rendering::{Renderer, Viewport};
pub use scene::{FrameSnapshot, Session, SessionError, SessionPhase};
pub use world::{EntityId, Interactable, InteractableKind, Npc, WorldState};
