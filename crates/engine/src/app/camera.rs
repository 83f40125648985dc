use super::config::{CameraConfig, CameraMode};
use super::movement::MOVE_EPSILON;
use super::projection::{IsoProjection, ScreenVec, WorldVec};
use super::rendering::Viewport;

/// Screen-space bounding box of the projected world, used for optional
/// camera clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub min: ScreenVec,
    pub max: ScreenVec,
}

impl CameraBounds {
    /// Bounds covering every tile diamond of a square grid, including the
    /// half-tile overhang of the outermost diamonds.
    pub fn of_grid(projection: &IsoProjection, grid_size: u32) -> Self {
        let last = grid_size.saturating_sub(1) as f32;
        let half_width = projection.tile_width() * 0.5;
        let east = projection.to_screen(WorldVec { x: last, y: 0.0 });
        let west = projection.to_screen(WorldVec { x: 0.0, y: last });
        let south = projection.to_screen(WorldVec { x: last, y: last });
        Self {
            min: ScreenVec {
                x: west.x - half_width,
                y: -projection.tile_height() * 0.5,
            },
            max: ScreenVec {
                x: east.x + half_width,
                y: south.y + projection.tile_height() * 0.5,
            },
        }
    }
}

/// Keeps the view centered on a follow point, either hard-locked or easing
/// toward it. The first update always snaps so a fresh session never pans
/// in from the origin.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
    position: ScreenVec,
    initialized: bool,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            position: ScreenVec::default(),
            initialized: false,
        }
    }

    /// Screen-space point the camera is currently centered on.
    pub fn position(&self) -> ScreenVec {
        self.position
    }

    /// Translation to apply to projected points so the camera center lands
    /// in the middle of the viewport.
    pub fn view_offset(&self, viewport: Viewport) -> ScreenVec {
        ScreenVec {
            x: viewport.width as f32 * 0.5 - self.position.x,
            y: viewport.height as f32 * 0.5 - self.position.y,
        }
    }

    pub fn update(&mut self, follow: ScreenVec, viewport: Viewport, bounds: Option<&CameraBounds>) {
        if !self.initialized {
            self.position = follow;
            self.initialized = true;
        } else {
            match self.config.mode {
                CameraMode::Locked => self.position = follow,
                CameraMode::Smoothed { factor } => {
                    self.position.x = ease(self.position.x, follow.x, factor);
                    self.position.y = ease(self.position.y, follow.y, factor);
                }
            }
        }

        if self.config.clamp_to_world {
            if let Some(bounds) = bounds {
                self.position.x = clamp_axis(
                    self.position.x,
                    bounds.min.x,
                    bounds.max.x,
                    viewport.width as f32,
                );
                self.position.y = clamp_axis(
                    self.position.y,
                    bounds.min.y,
                    bounds.max.y,
                    viewport.height as f32,
                );
            }
        }
    }

}

fn ease(current: f32, target: f32, factor: f32) -> f32 {
    let remaining = target - current;
    if remaining.abs() < MOVE_EPSILON {
        target
    } else {
        current + remaining * factor
    }
}

/// Keeps the view window inside `[min, max]` on one axis; when the world is
/// narrower than the view, centers on it instead.
fn clamp_axis(center: f32, min: f32, max: f32, view_extent: f32) -> f32 {
    let half = view_extent * 0.5;
    if max - min <= view_extent {
        (min + max) * 0.5
    } else {
        center.clamp(min + half, max - half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    fn locked() -> CameraConfig {
        CameraConfig {
            mode: CameraMode::Locked,
            clamp_to_world: false,
        }
    }

    #[test]
    fn locked_camera_tracks_the_follow_point_exactly() {
        let mut camera = CameraController::new(locked());
        camera.update(ScreenVec { x: 100.0, y: 50.0 }, VIEW, None);
        camera.update(ScreenVec { x: 140.0, y: 70.0 }, VIEW, None);
        assert_eq!(camera.position(), ScreenVec { x: 140.0, y: 70.0 });
    }

    #[test]
    fn first_update_snaps_even_in_smoothed_mode() {
        let mut camera = CameraController::new(CameraConfig {
            mode: CameraMode::Smoothed { factor: 0.1 },
            clamp_to_world: false,
        });
        camera.update(ScreenVec { x: 320.0, y: 240.0 }, VIEW, None);
        assert_eq!(camera.position(), ScreenVec { x: 320.0, y: 240.0 });
    }

    #[test]
    fn smoothed_camera_eases_by_the_configured_factor() {
        let mut camera = CameraController::new(CameraConfig {
            mode: CameraMode::Smoothed { factor: 0.25 },
            clamp_to_world: false,
        });
        camera.update(ScreenVec { x: 0.0, y: 0.0 }, VIEW, None);
        camera.update(ScreenVec { x: 100.0, y: 40.0 }, VIEW, None);
        assert!((camera.position().x - 25.0).abs() < 0.0001);
        assert!((camera.position().y - 10.0).abs() < 0.0001);
    }

    #[test]
    fn view_offset_centers_the_camera_position() {
        let mut camera = CameraController::new(locked());
        camera.update(ScreenVec { x: 100.0, y: 60.0 }, VIEW, None);
        let offset = camera.view_offset(VIEW);
        assert_eq!(offset, ScreenVec { x: 300.0, y: 240.0 });
    }

    #[test]
    fn clamped_camera_stops_at_the_world_edge() {
        let mut camera = CameraController::new(CameraConfig {
            mode: CameraMode::Locked,
            clamp_to_world: true,
        });
        let bounds = CameraBounds {
            min: ScreenVec {
                x: -2000.0,
                y: -1000.0,
            },
            max: ScreenVec {
                x: 2000.0,
                y: 1000.0,
            },
        };
        camera.update(ScreenVec { x: 5000.0, y: 0.0 }, VIEW, Some(&bounds));
        assert_eq!(camera.position().x, 2000.0 - 400.0);
    }

    #[test]
    fn world_narrower_than_the_view_is_centered() {
        let mut camera = CameraController::new(CameraConfig {
            mode: CameraMode::Locked,
            clamp_to_world: true,
        });
        let bounds = CameraBounds {
            min: ScreenVec { x: -100.0, y: 0.0 },
            max: ScreenVec { x: 100.0, y: 80.0 },
        };
        camera.update(ScreenVec { x: 90.0, y: 70.0 }, VIEW, Some(&bounds));
        assert_eq!(camera.position(), ScreenVec { x: 0.0, y: 40.0 });
    }

    #[test]
    fn grid_bounds_cover_the_projected_diamond() {
        let projection = IsoProjection::new(64, 32);
        let bounds = CameraBounds::of_grid(&projection, 10);
        // 10x10 grid spans x in [-9*32 - 32, 9*32 + 32]
        assert_eq!(bounds.min.x, -320.0);
        assert_eq!(bounds.max.x, 320.0);
        assert_eq!(bounds.min.y, -16.0);
        assert_eq!(bounds.max.y, 18.0 * 16.0 + 16.0);
    }
}
