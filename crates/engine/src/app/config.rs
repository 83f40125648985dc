use serde::Deserialize;
use thiserror::Error;

use super::grid::TileKind;
use super::projection::GridPos;
use super::world::InteractableKind;

pub const DEFAULT_TILE_WIDTH: u32 = 64;
pub const DEFAULT_TILE_HEIGHT: u32 = 32;
pub const DEFAULT_MOVE_SMOOTHING: f32 = 0.1;

const DEMO_SKIN_COLORS: [&str; 5] = ["#FCD5B5", "#E0AC69", "#8D5524", "#C68642", "#FFDBAC"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid hex color {value:?}, expected #RRGGBB")]
    InvalidHexColor { value: String },
    #[error("movement smoothing must be in (0, 1], got {value}")]
    InvalidSmoothing { value: f32 },
    #[error("camera smoothing factor must be in (0, 1], got {value}")]
    InvalidCameraFactor { value: f32 },
    #[error("interactable trigger radius must not be negative, got {value}")]
    NegativeTriggerRadius { value: f32 },
}

/// Where the tile grid comes from: a hand-authored matrix of tile ids, or
/// procedural radial zoning around a center cell.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MapSource {
    Authored {
        rows: Vec<Vec<u16>>,
    },
    Radial {
        size: u32,
        center: GridPos,
        inner_radius: f32,
        settle_radius: f32,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CameraMode {
    /// Camera target equals the follow position every frame.
    Locked,
    /// Camera eases toward the follow position by `factor` per frame.
    Smoothed { factor: f32 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CameraConfig {
    pub mode: CameraMode,
    #[serde(default)]
    pub clamp_to_world: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Locked,
            clamp_to_world: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HairStyle {
    Afro,
    LongWhite,
    Bald,
    Blond,
    Mane,
}

impl HairStyle {
    pub fn from_index(index: u32) -> HairStyle {
        match index % 5 {
            0 => HairStyle::Afro,
            1 => HairStyle::LongWhite,
            2 => HairStyle::Bald,
            3 => HairStyle::Blond,
            _ => HairStyle::Mane,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerAppearance {
    pub name: String,
    /// `#RRGGBB`, validated by [`WorldConfig::validate`].
    pub skin_color: String,
    pub hair_style: HairStyle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractableConfig {
    pub kind: InteractableKind,
    pub position: GridPos,
    #[serde(default)]
    pub trigger_radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpcConfig {
    pub name: String,
    pub position: GridPos,
}

/// Seeded decorative placement: `count` interactables of `kind` scattered
/// over cells of `zone`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScatterConfig {
    pub kind: InteractableKind,
    pub zone: TileKind,
    pub count: u32,
    pub seed: u64,
}

fn default_tile_width() -> u32 {
    DEFAULT_TILE_WIDTH
}

fn default_tile_height() -> u32 {
    DEFAULT_TILE_HEIGHT
}

fn default_move_smoothing() -> f32 {
    DEFAULT_MOVE_SMOOTHING
}

/// Full description of one world instance. Deserialized from JSON by the
/// host binary or assembled in code for tests and demos.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_tile_width")]
    pub tile_width: u32,
    #[serde(default = "default_tile_height")]
    pub tile_height: u32,
    pub map: MapSource,
    pub spawn: GridPos,
    #[serde(default = "default_move_smoothing")]
    pub move_smoothing: f32,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub interactables: Vec<InteractableConfig>,
    #[serde(default)]
    pub npcs: Vec<NpcConfig>,
    #[serde(default)]
    pub scatter: Vec<ScatterConfig>,
    pub player: PlayerAppearance,
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.move_smoothing > 0.0 && self.move_smoothing <= 1.0) {
            return Err(ConfigError::InvalidSmoothing {
                value: self.move_smoothing,
            });
        }
        if let CameraMode::Smoothed { factor } = self.camera.mode {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::InvalidCameraFactor { value: factor });
            }
        }
        for interactable in &self.interactables {
            if interactable.trigger_radius < 0.0 {
                return Err(ConfigError::NegativeTriggerRadius {
                    value: interactable.trigger_radius,
                });
            }
        }
        parse_hex_color(&self.player.skin_color)?;
        Ok(())
    }
}

/// Parses `#RRGGBB` into rgb bytes.
pub fn parse_hex_color(value: &str) -> Result<[u8; 3], ConfigError> {
    let invalid = || ConfigError::InvalidHexColor {
        value: value.to_string(),
    };
    let digits = value.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| invalid())?;
    Ok([r, g, b])
}

/// Deterministic appearance for hosts that have no character creator: both
/// skin tone and hair style are derived from the name.
pub fn build_demo_appearance(name: &str) -> PlayerAppearance {
    let mut hash: u32 = 2166136261;
    for byte in name.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16777619);
    }
    PlayerAppearance {
        name: name.to_string(),
        skin_color: DEMO_SKIN_COLORS[hash as usize % DEMO_SKIN_COLORS.len()].to_string(),
        hair_style: HairStyle::from_index(hash >> 8),
    }
}
