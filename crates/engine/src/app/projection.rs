use serde::Deserialize;

/// A logical grid cell. This is the authoritative location of an entity for
/// collision and game-state purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn distance_to(self, other: GridPos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn to_world(self) -> WorldVec {
        WorldVec {
            x: self.x as f32,
            y: self.y as f32,
        }
    }
}

/// A fractional cartesian position in grid units, used only for drawing.
/// Converges toward a [`GridPos`] during movement animation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldVec {
    pub x: f32,
    pub y: f32,
}

impl WorldVec {
    /// Painter's-algorithm depth key: ascending values draw later (nearer).
    pub fn depth_key(self) -> f32 {
        self.x + self.y
    }
}

/// A point or offset in screen pixels, before any camera offset is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenVec {
    pub x: f32,
    pub y: f32,
}

/// 2:1 isometric projection. `tile_width`/`tile_height` are fixed for a
/// world instance; every tile in one world shares them.
#[derive(Debug, Clone, Copy)]
pub struct IsoProjection {
    tile_width: f32,
    tile_height: f32,
}

impl IsoProjection {
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width: tile_width as f32,
            tile_height: tile_height as f32,
        }
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    pub fn to_screen(&self, world: WorldVec) -> ScreenVec {
        ScreenVec {
            x: (world.x - world.y) * (self.tile_width * 0.5),
            y: (world.x + world.y) * (self.tile_height * 0.5),
        }
    }

    pub fn to_world(&self, screen: ScreenVec) -> WorldVec {
        let half_width = self.tile_width * 0.5;
        let half_height = self.tile_height * 0.5;
        WorldVec {
            x: (screen.x / half_width + screen.y / half_height) * 0.5,
            y: (screen.y / half_height - screen.x / half_width) * 0.5,
        }
    }

    pub fn to_grid(&self, screen: ScreenVec) -> GridPos {
        let world = self.to_world(screen);
        GridPos {
            x: world.x.round() as i32,
            y: world.y.round() as i32,
        }
    }
}
