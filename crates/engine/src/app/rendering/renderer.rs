use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::config::{parse_hex_color, HairStyle};
use crate::app::grid::TileKind;
use crate::app::projection::{GridPos, ScreenVec};
use crate::app::scene::FrameSnapshot;
use crate::app::world::InteractableKind;

use super::draw::{fill_circle, fill_diamond, fill_ellipse, fill_extruded_sides, fill_rect, put_px};
use super::Viewport;

const CLEAR_COLOR: [u8; 4] = [24, 28, 38, 255];
const TILE_GRASS_COLOR: [u8; 4] = [74, 112, 56, 255];
const TILE_GRASS_ALT_COLOR: [u8; 4] = [82, 122, 62, 255];
const TILE_GRASS_EDGE_COLOR: [u8; 4] = [58, 92, 44, 255];
const TILE_VILLAGE_COLOR: [u8; 4] = [168, 146, 104, 255];
const TILE_VILLAGE_EDGE_COLOR: [u8; 4] = [140, 120, 84, 255];
const TILE_SCORCHED_COLOR: [u8; 4] = [52, 34, 34, 255];
const TILE_SCORCHED_EDGE_COLOR: [u8; 4] = [74, 40, 32, 255];
const WALL_TOP_COLOR: [u8; 4] = [126, 130, 140, 255];
const WALL_LEFT_COLOR: [u8; 4] = [78, 82, 92, 255];
const WALL_RIGHT_COLOR: [u8; 4] = [100, 104, 114, 255];
const SHADOW_COLOR: [u8; 4] = [12, 14, 18, 255];
const LEG_COLOR: [u8; 4] = [52, 56, 72, 255];
const EYE_COLOR: [u8; 4] = [20, 20, 24, 255];
const MONOLITH_COLOR: [u8; 4] = [30, 30, 44, 255];
const MONOLITH_GLOW_COLOR: [u8; 4] = [120, 220, 255, 255];
const SHOP_WALL_COLOR: [u8; 4] = [160, 96, 54, 255];
const SHOP_AWNING_COLOR: [u8; 4] = [214, 64, 58, 255];
const HOUSE_WALL_COLOR: [u8; 4] = [150, 116, 74, 255];
const HOUSE_ROOF_COLOR: [u8; 4] = [112, 52, 40, 255];
const ROCK_COLOR: [u8; 4] = [118, 118, 122, 255];
const TREE_TRUNK_COLOR: [u8; 4] = [92, 62, 36, 255];
const TREE_CANOPY_COLOR: [u8; 4] = [44, 110, 52, 255];
const NPC_BODY_COLOR: [u8; 4] = [92, 96, 118, 255];
const NPC_SKIN_COLOR: [u8; 4] = [224, 172, 105, 255];
const HAIR_AFRO_COLOR: [u8; 4] = [42, 30, 22, 255];
const HAIR_LONG_WHITE_COLOR: [u8; 4] = [232, 232, 232, 255];
const HAIR_BLOND_COLOR: [u8; 4] = [228, 198, 86, 255];
const HAIR_MANE_COLOR: [u8; 4] = [198, 122, 44, 255];
const FALLBACK_SKIN_COLOR: [u8; 3] = [252, 213, 181];

/// Wall extrusion height as a multiple of the tile height. 40px at the
/// default 32px tall tile.
const WALL_HEIGHT_FACTOR: f32 = 1.25;

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DrawKind {
    Tile { cell: GridPos, tile: TileKind },
    Interactable { index: usize },
    Npc { index: usize },
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawItem {
    depth: f32,
    seq: u32,
    kind: DrawKind,
}

/// Painter's-algorithm draw list: ascending depth, registration sequence as
/// the tie break. Tiles sit below any entity registered on the same cell.
fn collect_draw_list(snapshot: &FrameSnapshot<'_>) -> Vec<DrawItem> {
    let grid = snapshot.world.grid();
    let size = grid.size() as i32;
    let area = (size * size) as u32;
    let mut items = Vec::with_capacity(area as usize + snapshot.world.interactables().len() + 2);

    for y in 0..size {
        for x in 0..size {
            let cell = GridPos { x, y };
            if let Some(tile) = grid.tile_at(cell) {
                items.push(DrawItem {
                    depth: cell.to_world().depth_key(),
                    seq: (y * size + x) as u32,
                    kind: DrawKind::Tile { cell, tile },
                });
            }
        }
    }
    for (index, interactable) in snapshot.world.interactables().iter().enumerate() {
        items.push(DrawItem {
            depth: interactable.position.to_world().depth_key(),
            seq: area + interactable.id.0,
            kind: DrawKind::Interactable { index },
        });
    }
    for (index, npc) in snapshot.world.npcs().iter().enumerate() {
        items.push(DrawItem {
            depth: npc.position.to_world().depth_key(),
            seq: area + npc.id.0,
            kind: DrawKind::Npc { index },
        });
    }
    items.push(DrawItem {
        depth: snapshot.player_rendered.depth_key(),
        seq: u32::MAX,
        kind: DrawKind::Player,
    });

    items.sort_by(|a, b| {
        a.depth
            .partial_cmp(&b.depth)
            .unwrap_or(Ordering::Equal)
            .then(a.seq.cmp(&b.seq))
    });
    items
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: PathBuf,
    sprite_cache: HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: HashSet<String>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub fn render(&mut self, snapshot: &FrameSnapshot<'_>) -> Result<(), Error> {
        let Viewport { width, height } = self.viewport;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        let projection = snapshot.projection;
        let half_width = (projection.tile_width() * 0.5) as i32;
        let half_height = (projection.tile_height() * 0.5) as i32;
        let wall_height = (projection.tile_height() * WALL_HEIGHT_FACTOR) as i32;
        let cull_margin = projection.tile_width() as i32 * 2 + wall_height;

        for item in collect_draw_list(snapshot) {
            let world = match item.kind {
                DrawKind::Tile { cell, .. } => cell.to_world(),
                DrawKind::Interactable { index } => {
                    snapshot.world.interactables()[index].position.to_world()
                }
                DrawKind::Npc { index } => snapshot.world.npcs()[index].position.to_world(),
                DrawKind::Player => snapshot.player_rendered,
            };
            let screen = offset_screen(projection.to_screen(world), snapshot.view_offset);
            let sx = screen.x.round() as i32;
            let sy = screen.y.round() as i32;
            if sx < -cull_margin
                || sy < -cull_margin
                || sx > width as i32 + cull_margin
                || sy > height as i32 + cull_margin
            {
                continue;
            }

            match item.kind {
                DrawKind::Tile { cell, tile } => match tile {
                    TileKind::Grass => {
                        // checkerboard tint so motion over open ground reads
                        let fill = if (cell.x + cell.y) % 2 == 0 {
                            TILE_GRASS_COLOR
                        } else {
                            TILE_GRASS_ALT_COLOR
                        };
                        draw_floor_tile(
                            frame,
                            width,
                            height,
                            sx,
                            sy,
                            half_width,
                            half_height,
                            fill,
                            TILE_GRASS_EDGE_COLOR,
                        );
                    }
                    TileKind::Village => {
                        draw_floor_tile(
                            frame,
                            width,
                            height,
                            sx,
                            sy,
                            half_width,
                            half_height,
                            TILE_VILLAGE_COLOR,
                            TILE_VILLAGE_EDGE_COLOR,
                        );
                    }
                    TileKind::Scorched => {
                        draw_floor_tile(
                            frame,
                            width,
                            height,
                            sx,
                            sy,
                            half_width,
                            half_height,
                            TILE_SCORCHED_COLOR,
                            TILE_SCORCHED_EDGE_COLOR,
                        );
                    }
                    TileKind::Wall => {
                        fill_extruded_sides(
                            frame,
                            width,
                            height,
                            sx,
                            sy,
                            half_width,
                            half_height,
                            wall_height,
                            WALL_LEFT_COLOR,
                            WALL_RIGHT_COLOR,
                        );
                        fill_diamond(
                            frame,
                            width,
                            height,
                            sx,
                            sy - wall_height,
                            half_width,
                            half_height,
                            WALL_TOP_COLOR,
                        );
                    }
                },
                DrawKind::Interactable { index } => {
                    let interactable = &snapshot.world.interactables()[index];
                    let sprite = resolve_cached_sprite(
                        &mut self.sprite_cache,
                        &mut self.warned_missing_sprite_keys,
                        &self.asset_root,
                        &format!("interactables/{}.png", interactable.kind.label()),
                    );
                    if let Some(sprite) = sprite {
                        draw_sprite_bottom_centered(frame, width, height, sx, sy, sprite);
                    } else {
                        draw_interactable_placeholder(
                            frame,
                            width,
                            height,
                            sx,
                            sy,
                            half_height,
                            interactable.kind,
                        );
                    }
                }
                DrawKind::Npc { index } => {
                    let _ = &snapshot.world.npcs()[index];
                    draw_figure(
                        frame,
                        width,
                        height,
                        sx,
                        sy,
                        half_height,
                        NPC_SKIN_COLOR,
                        NPC_BODY_COLOR,
                        None,
                    );
                }
                DrawKind::Player => {
                    let skin = parse_hex_color(&snapshot.appearance.skin_color)
                        .unwrap_or(FALLBACK_SKIN_COLOR);
                    let skin = [skin[0], skin[1], skin[2], 255];
                    draw_figure(
                        frame,
                        width,
                        height,
                        sx,
                        sy,
                        half_height,
                        skin,
                        skin,
                        hair_color(snapshot.appearance.hair_style),
                    );
                }
            }
        }

        self.pixels.render()
    }
}

fn offset_screen(screen: ScreenVec, offset: ScreenVec) -> ScreenVec {
    ScreenVec {
        x: screen.x + offset.x,
        y: screen.y + offset.y,
    }
}

fn hair_color(style: HairStyle) -> Option<[u8; 4]> {
    match style {
        HairStyle::Afro => Some(HAIR_AFRO_COLOR),
        HairStyle::LongWhite => Some(HAIR_LONG_WHITE_COLOR),
        HairStyle::Bald => None,
        HairStyle::Blond => Some(HAIR_BLOND_COLOR),
        HairStyle::Mane => Some(HAIR_MANE_COLOR),
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_floor_tile(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    half_width: i32,
    half_height: i32,
    fill: [u8; 4],
    edge: [u8; 4],
) {
    fill_diamond(
        frame, width, height, center_x, center_y, half_width, half_height, edge,
    );
    fill_diamond(
        frame,
        width,
        height,
        center_x,
        center_y,
        half_width - 2,
        half_height - 1,
        fill,
    );
}

/// Layered placeholder figure: ground shadow, legs, torso, head with eyes
/// and optional hair. The tile's screen center is the feet position.
#[allow(clippy::too_many_arguments)]
fn draw_figure(
    frame: &mut [u8],
    width: u32,
    height: u32,
    feet_x: i32,
    feet_y: i32,
    half_height: i32,
    skin: [u8; 4],
    body: [u8; 4],
    hair: Option<[u8; 4]>,
) {
    let unit = half_height.max(4);
    fill_ellipse(
        frame,
        width,
        height,
        feet_x,
        feet_y,
        unit / 2 + 2,
        unit / 4 + 1,
        SHADOW_COLOR,
    );
    let leg_height = unit / 2;
    let leg_width = (unit / 6).max(2);
    fill_rect(
        frame,
        width,
        height,
        feet_x - leg_width - 1,
        feet_y - leg_height,
        leg_width,
        leg_height,
        LEG_COLOR,
    );
    fill_rect(
        frame,
        width,
        height,
        feet_x + 1,
        feet_y - leg_height,
        leg_width,
        leg_height,
        LEG_COLOR,
    );
    let torso_height = unit;
    let torso_width = unit / 2 + 2;
    let torso_top = feet_y - leg_height - torso_height;
    fill_rect(
        frame,
        width,
        height,
        feet_x - torso_width / 2,
        torso_top,
        torso_width,
        torso_height,
        body,
    );
    let head_radius = unit / 3 + 1;
    let head_y = torso_top - head_radius;
    fill_circle(frame, width, height, feet_x, head_y, head_radius, skin);
    if let Some(hair) = hair {
        fill_circle(
            frame,
            width,
            height,
            feet_x,
            head_y - head_radius / 2,
            head_radius,
            hair,
        );
    }
    put_px(frame, width, height, feet_x - 2, head_y + 1, EYE_COLOR);
    put_px(frame, width, height, feet_x + 2, head_y + 1, EYE_COLOR);
}

fn draw_interactable_placeholder(
    frame: &mut [u8],
    width: u32,
    height: u32,
    base_x: i32,
    base_y: i32,
    half_height: i32,
    kind: InteractableKind,
) {
    let unit = half_height.max(4);
    match kind {
        InteractableKind::Monolith => {
            let slab_width = unit;
            let slab_height = unit * 4;
            fill_rect(
                frame,
                width,
                height,
                base_x - slab_width / 2,
                base_y - slab_height,
                slab_width,
                slab_height,
                MONOLITH_COLOR,
            );
            put_px(frame, width, height, base_x, base_y - slab_height - 1, MONOLITH_GLOW_COLOR);
        }
        InteractableKind::Shop => {
            let box_width = unit * 2;
            let box_height = unit * 2;
            fill_rect(
                frame,
                width,
                height,
                base_x - box_width / 2,
                base_y - box_height,
                box_width,
                box_height,
                SHOP_WALL_COLOR,
            );
            fill_rect(
                frame,
                width,
                height,
                base_x - box_width / 2 - 2,
                base_y - box_height,
                box_width + 4,
                unit / 2,
                SHOP_AWNING_COLOR,
            );
        }
        InteractableKind::House => {
            let box_width = unit * 2;
            let box_height = unit + unit / 2;
            fill_rect(
                frame,
                width,
                height,
                base_x - box_width / 2,
                base_y - box_height,
                box_width,
                box_height,
                HOUSE_WALL_COLOR,
            );
            fill_diamond(
                frame,
                width,
                height,
                base_x,
                base_y - box_height,
                box_width / 2 + 2,
                unit,
                HOUSE_ROOF_COLOR,
            );
        }
        InteractableKind::Rock => {
            fill_ellipse(
                frame,
                width,
                height,
                base_x,
                base_y - unit / 3,
                unit / 2 + 2,
                unit / 2,
                ROCK_COLOR,
            );
        }
        InteractableKind::Tree => {
            fill_rect(
                frame,
                width,
                height,
                base_x - 1,
                base_y - unit,
                3,
                unit,
                TREE_TRUNK_COLOR,
            );
            fill_circle(
                frame,
                width,
                height,
                base_x,
                base_y - unit - unit / 2,
                unit / 2 + 2,
                TREE_CANOPY_COLOR,
            );
        }
    }
}

fn draw_sprite_bottom_centered(
    frame: &mut [u8],
    width: u32,
    height: u32,
    base_x: i32,
    base_y: i32,
    sprite: &LoadedSprite,
) {
    if sprite.width == 0 || sprite.height == 0 {
        return;
    }
    let expected_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_len {
        return;
    }
    let left = base_x - sprite.width as i32 / 2;
    let top = base_y - sprite.height as i32;
    for src_y in 0..sprite.height as i32 {
        for src_x in 0..sprite.width as i32 {
            let offset = ((src_y * sprite.width as i32 + src_x) * 4) as usize;
            let alpha = sprite.rgba[offset + 3];
            if alpha == 0 {
                continue;
            }
            put_px(
                frame,
                width,
                height,
                left + src_x,
                top + src_y,
                [
                    sprite.rgba[offset],
                    sprite.rgba[offset + 1],
                    sprite.rgba[offset + 2],
                    alpha,
                ],
            );
        }
    }
}

fn resolve_cached_sprite<'a>(
    sprite_cache: &'a mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
    key: &str,
) -> Option<&'a LoadedSprite> {
    if !sprite_cache.contains_key(key) {
        let path = asset_root.join(key);
        let loaded = match load_sprite_rgba(&path) {
            Ok(sprite) => Some(sprite),
            Err(reason) => {
                if warned_missing_sprite_keys.insert(key.to_string()) {
                    warn!(key, reason = reason.as_str(), "sprite_load_failed");
                }
                None
            }
        };
        sprite_cache.insert(key.to_string(), loaded);
    }
    sprite_cache.get(key).and_then(|entry| entry.as_ref())
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::build_demo_appearance;
    use crate::app::grid::TileGrid;
    use crate::app::projection::{IsoProjection, WorldVec};
    use crate::app::world::WorldState;

    fn snapshot_world(size: usize) -> WorldState {
        let grid = TileGrid::authored(&vec![vec![0; size]; size]).expect("grid");
        WorldState::new(grid)
    }

    fn snapshot<'a>(
        world: &'a WorldState,
        appearance: &'a crate::app::config::PlayerAppearance,
        player_rendered: WorldVec,
    ) -> FrameSnapshot<'a> {
        FrameSnapshot {
            world,
            projection: IsoProjection::new(64, 32),
            player_rendered,
            player_target: GridPos {
                x: player_rendered.x.round() as i32,
                y: player_rendered.y.round() as i32,
            },
            appearance,
            view_offset: ScreenVec::default(),
        }
    }

    fn depth_of(items: &[DrawItem], kind: DrawKind) -> usize {
        items
            .iter()
            .position(|item| item.kind == kind)
            .expect("item present")
    }

    #[test]
    fn draw_list_orders_by_ascending_depth() {
        let world = snapshot_world(6);
        let appearance = build_demo_appearance("tester");
        let snapshot = snapshot(&world, &appearance, WorldVec { x: 5.0, y: 5.0 });
        let items = collect_draw_list(&snapshot);

        let near = depth_of(
            &items,
            DrawKind::Tile {
                cell: GridPos { x: 4, y: 4 },
                tile: TileKind::Grass,
            },
        );
        let far = depth_of(
            &items,
            DrawKind::Tile {
                cell: GridPos { x: 0, y: 0 },
                tile: TileKind::Grass,
            },
        );
        assert!(far < near);
        for pair in items.windows(2) {
            assert!(pair[0].depth <= pair[1].depth);
        }
    }

    #[test]
    fn equal_depth_ties_break_by_sequence() {
        let world = snapshot_world(6);
        let appearance = build_demo_appearance("tester");
        let snapshot = snapshot(&world, &appearance, WorldVec { x: 5.0, y: 5.0 });
        let items = collect_draw_list(&snapshot);

        // (3, 2) and (2, 3) share depth 5; row-major registration keeps
        // (3, 2) first.
        let a = depth_of(
            &items,
            DrawKind::Tile {
                cell: GridPos { x: 3, y: 2 },
                tile: TileKind::Grass,
            },
        );
        let b = depth_of(
            &items,
            DrawKind::Tile {
                cell: GridPos { x: 2, y: 3 },
                tile: TileKind::Grass,
            },
        );
        assert!(a < b);
    }

    #[test]
    fn entities_draw_after_the_tile_they_stand_on() {
        let mut world = snapshot_world(6);
        world.add_interactable(InteractableKind::Rock, GridPos { x: 2, y: 2 }, 0.0);
        let appearance = build_demo_appearance("tester");
        let snapshot = snapshot(&world, &appearance, WorldVec { x: 5.0, y: 5.0 });
        let items = collect_draw_list(&snapshot);

        let tile = depth_of(
            &items,
            DrawKind::Tile {
                cell: GridPos { x: 2, y: 2 },
                tile: TileKind::Grass,
            },
        );
        let rock = depth_of(&items, DrawKind::Interactable { index: 0 });
        assert!(tile < rock);
    }

    #[test]
    fn coincident_entities_keep_registration_order() {
        let mut world = snapshot_world(6);
        world.add_interactable(InteractableKind::Rock, GridPos { x: 2, y: 2 }, 0.0);
        world.add_npc("elder", GridPos { x: 2, y: 2 });
        let appearance = build_demo_appearance("tester");
        let snapshot = snapshot(&world, &appearance, WorldVec { x: 5.0, y: 5.0 });
        let items = collect_draw_list(&snapshot);

        let rock = depth_of(&items, DrawKind::Interactable { index: 0 });
        let npc = depth_of(&items, DrawKind::Npc { index: 0 });
        assert!(rock < npc);
    }

    #[test]
    fn player_depth_follows_the_rendered_position() {
        let world = snapshot_world(6);
        let appearance = build_demo_appearance("tester");
        // mid-step between (1, 1) and (2, 1)
        let snapshot = snapshot(&world, &appearance, WorldVec { x: 1.6, y: 1.0 });
        let items = collect_draw_list(&snapshot);

        let player = depth_of(&items, DrawKind::Player);
        let behind = depth_of(
            &items,
            DrawKind::Tile {
                cell: GridPos { x: 1, y: 1 },
                tile: TileKind::Grass,
            },
        );
        let in_front = depth_of(
            &items,
            DrawKind::Tile {
                cell: GridPos { x: 2, y: 1 },
                tile: TileKind::Grass,
            },
        );
        assert!(behind < player);
        assert!(player < in_front);
    }
}
