pub mod app;

pub use app::{
    build_demo_appearance, parse_hex_color, run_app, AppError, CameraBounds, CameraConfig,
    CameraController, CameraMode, ConfigError, EntityId, FrameSnapshot, GridPos, HairStyle,
    InputAction, InteractableConfig, InteractableKind, InteractionDetector, InteractionEvent,
    IsoProjection, LoopConfig, MapGenError, MapSource, MovementController, NpcConfig, NullHost,
    PlayerAppearance, ScatterConfig, ScreenVec, Session, SessionError, SessionPhase,
    StepDirection, StepOutcome, TileGrid, TileKind, Viewport, WorldConfig, WorldHost, WorldState,
    WorldVec, MOVE_EPSILON,
};
