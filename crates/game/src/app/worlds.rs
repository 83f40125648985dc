use std::fs;
use std::path::Path;

use engine::{
    build_demo_appearance, CameraConfig, CameraMode, GridPos, InteractableConfig,
    InteractableKind, MapSource, NpcConfig, ScatterConfig, TileKind, WorldConfig,
};

/// Walled courtyard, hand-authored. A small map for testing movement and
/// depth sorting against known geometry.
pub(crate) fn courtyard() -> WorldConfig {
    WorldConfig {
        tile_width: 64,
        tile_height: 32,
        map: MapSource::Authored {
            rows: vec![
                vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
                vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
                vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
                vec![1, 0, 0, 1, 1, 0, 0, 0, 0, 1],
                vec![1, 0, 0, 1, 0, 0, 0, 0, 0, 1],
                vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
                vec![1, 0, 0, 0, 0, 0, 1, 0, 0, 1],
                vec![1, 0, 0, 0, 0, 0, 1, 0, 0, 1],
                vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
                vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            ],
        },
        spawn: GridPos { x: 5, y: 5 },
        move_smoothing: 0.1,
        camera: CameraConfig {
            mode: CameraMode::Locked,
            clamp_to_world: false,
        },
        interactables: Vec::new(),
        npcs: Vec::new(),
        scatter: Vec::new(),
        player: build_demo_appearance("wanderer"),
    }
}

/// Radially zoned frontier settlement: a scorched exclusion ring around the
/// central monolith, a village band with shop, house and an elder, and
/// scattered wilderness debris beyond.
pub(crate) fn frontier() -> WorldConfig {
    WorldConfig {
        tile_width: 64,
        tile_height: 32,
        map: MapSource::Radial {
            size: 20,
            center: GridPos { x: 10, y: 10 },
            inner_radius: 4.0,
            settle_radius: 8.0,
        },
        spawn: GridPos { x: 10, y: 16 },
        move_smoothing: 0.1,
        camera: CameraConfig {
            mode: CameraMode::Smoothed { factor: 0.1 },
            clamp_to_world: true,
        },
        interactables: vec![
            InteractableConfig {
                kind: InteractableKind::Monolith,
                position: GridPos { x: 10, y: 10 },
                trigger_radius: 0.0,
            },
            InteractableConfig {
                kind: InteractableKind::Shop,
                position: GridPos { x: 10, y: 15 },
                trigger_radius: 1.5,
            },
            InteractableConfig {
                kind: InteractableKind::House,
                position: GridPos { x: 15, y: 10 },
                trigger_radius: 1.5,
            },
        ],
        npcs: vec![NpcConfig {
            name: "elder".to_string(),
            position: GridPos { x: 13, y: 13 },
        }],
        scatter: vec![
            ScatterConfig {
                kind: InteractableKind::Rock,
                zone: TileKind::Grass,
                count: 8,
                seed: 7,
            },
            ScatterConfig {
                kind: InteractableKind::Tree,
                zone: TileKind::Grass,
                count: 10,
                seed: 21,
            },
        ],
        player: build_demo_appearance("wanderer"),
    }
}

/// Loads a world description from JSON, reporting the JSON path of the
/// offending field on parse failures.
pub(crate) fn load_world_config(path: &Path) -> Result<WorldConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read world '{}': {error}", path.display()))?;
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    let config = match serde_path_to_error::deserialize::<_, WorldConfig>(&mut deserializer) {
        Ok(config) => config,
        Err(error) => {
            let field = error.path().to_string();
            let source = error.into_inner();
            return Err(if field.is_empty() || field == "." {
                format!("parse world json: {source}")
            } else {
                format!("parse world json at {field}: {source}")
            });
        }
    };
    config
        .validate()
        .map_err(|error| format!("invalid world '{}': {error}", path.display()))?;
    Ok(config)
}

/// Resolves the world argument: a built-in name, a JSON file path, or the
/// default frontier world when absent.
pub(crate) fn select_world(arg: Option<&str>) -> Result<WorldConfig, String> {
    match arg {
        None | Some("frontier") => Ok(frontier()),
        Some("courtyard") => Ok(courtyard()),
        Some(path) => load_world_config(Path::new(path)),
    }
}
