use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::projection::GridPos;

/// Closed set of tile classifications. Authored maps refer to these by the
/// numeric ids accepted by [`TileKind::from_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Wall,
    Scorched,
    Village,
}

impl TileKind {
    pub fn from_id(id: u16) -> Option<TileKind> {
        match id {
            0 => Some(TileKind::Grass),
            1 => Some(TileKind::Wall),
            2 => Some(TileKind::Scorched),
            3 => Some(TileKind::Village),
            _ => None,
        }
    }

    pub fn is_walkable(self) -> bool {
        match self {
            TileKind::Grass | TileKind::Village => true,
            TileKind::Wall | TileKind::Scorched => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapGenError {
    #[error("authored map has no rows")]
    EmptyAuthoredMap,
    #[error("authored row {row} has {actual} tiles, expected {expected} (map must be square)")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown tile id {id} at ({x}, {y})")]
    UnknownTileId { id: u16, x: i32, y: i32 },
    #[error("grid size must be positive")]
    NonPositiveSize,
    #[error("zoning center ({x}, {y}) lies outside the {size}x{size} grid")]
    CenterOutOfBounds { x: i32, y: i32, size: u32 },
    #[error("zoning radii must satisfy 0 < inner < settle, got inner {inner} and settle {settle}")]
    InvalidRadii { inner: f32, settle: f32 },
}

/// An N x N grid of tile classifications. Immutable after generation; the
/// rest of the engine only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    size: u32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Builds a grid from a literal row-major matrix of tile ids.
    pub fn authored(rows: &[Vec<u16>]) -> Result<Self, MapGenError> {
        if rows.is_empty() {
            return Err(MapGenError::EmptyAuthoredMap);
        }
        let size = rows.len();
        let mut tiles = Vec::with_capacity(size * size);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(MapGenError::RowLengthMismatch {
                    row: y,
                    expected: size,
                    actual: row.len(),
                });
            }
            for (x, id) in row.iter().enumerate() {
                let kind = TileKind::from_id(*id).ok_or(MapGenError::UnknownTileId {
                    id: *id,
                    x: x as i32,
                    y: y as i32,
                })?;
                tiles.push(kind);
            }
        }
        Ok(Self {
            size: size as u32,
            tiles,
        })
    }

    /// Procedural radial zoning: cells closer to `center` than `inner_radius`
    /// become the scorched exclusion ring, cells closer than `settle_radius`
    /// the village zone, everything else wilderness grass. Deterministic for
    /// the same inputs; decorative scatter is a separate seeded pass.
    pub fn radial(
        size: u32,
        center: GridPos,
        inner_radius: f32,
        settle_radius: f32,
    ) -> Result<Self, MapGenError> {
        if size == 0 {
            return Err(MapGenError::NonPositiveSize);
        }
        let limit = size as i32;
        if center.x < 0 || center.y < 0 || center.x >= limit || center.y >= limit {
            return Err(MapGenError::CenterOutOfBounds {
                x: center.x,
                y: center.y,
                size,
            });
        }
        if !(inner_radius > 0.0 && settle_radius > inner_radius) {
            return Err(MapGenError::InvalidRadii {
                inner: inner_radius,
                settle: settle_radius,
            });
        }

        let mut tiles = Vec::with_capacity(size as usize * size as usize);
        for y in 0..limit {
            for x in 0..limit {
                let distance = center.distance_to(GridPos { x, y });
                let kind = if distance < inner_radius {
                    TileKind::Scorched
                } else if distance < settle_radius {
                    TileKind::Village
                } else {
                    TileKind::Grass
                };
                tiles.push(kind);
            }
        }
        info!(
            size,
            center_x = center.x,
            center_y = center.y,
            inner_radius,
            settle_radius,
            "world_generated"
        );
        Ok(Self { size, tiles })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn in_bounds(&self, cell: GridPos) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size as i32 && cell.y < self.size as i32
    }

    pub fn tile_at(&self, cell: GridPos) -> Option<TileKind> {
        if !self.in_bounds(cell) {
            return None;
        }
        let index = cell.y as usize * self.size as usize + cell.x as usize;
        self.tiles.get(index).copied()
    }

    /// Out-of-bounds cells are not walkable.
    pub fn is_walkable(&self, cell: GridPos) -> bool {
        self.tile_at(cell).is_some_and(TileKind::is_walkable)
    }
}

/// Picks `count` distinct cells of `zone` for decorative placement, skipping
/// `reserved` cells. Candidate enumeration is row-major, so the result is
/// fully determined by the rng state.
pub fn scatter_cells(
    grid: &TileGrid,
    zone: TileKind,
    count: u32,
    rng: &mut impl Rng,
    reserved: &[GridPos],
) -> Vec<GridPos> {
    let limit = grid.size() as i32;
    let mut candidates: Vec<GridPos> = Vec::new();
    for y in 0..limit {
        for x in 0..limit {
            let cell = GridPos { x, y };
            if grid.tile_at(cell) == Some(zone) && !reserved.contains(&cell) {
                candidates.push(cell);
            }
        }
    }

    let mut picked = Vec::with_capacity(count as usize);
    for _ in 0..count {
        if candidates.is_empty() {
            break;
        }
        let index = rng.gen_range(0..candidates.len());
        picked.push(candidates.swap_remove(index));
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_field(size: usize) -> TileGrid {
        TileGrid::authored(&vec![vec![0; size]; size]).expect("grid")
    }

    #[test]
    fn authored_grid_maps_ids_to_kinds() {
        let grid = TileGrid::authored(&[vec![0, 1], vec![2, 3]]).expect("grid");
        assert_eq!(grid.tile_at(GridPos { x: 0, y: 0 }), Some(TileKind::Grass));
        assert_eq!(grid.tile_at(GridPos { x: 1, y: 0 }), Some(TileKind::Wall));
        assert_eq!(
            grid.tile_at(GridPos { x: 0, y: 1 }),
            Some(TileKind::Scorched)
        );
        assert_eq!(
            grid.tile_at(GridPos { x: 1, y: 1 }),
            Some(TileKind::Village)
        );
    }

    #[test]
    fn authored_grid_rejects_empty_input() {
        assert_eq!(TileGrid::authored(&[]), Err(MapGenError::EmptyAuthoredMap));
    }

    #[test]
    fn authored_grid_rejects_ragged_rows() {
        let err = TileGrid::authored(&[vec![0, 0], vec![0]]).expect_err("err");
        assert_eq!(
            err,
            MapGenError::RowLengthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn authored_grid_rejects_unknown_tile_id() {
        let err = TileGrid::authored(&[vec![0, 0], vec![0, 9]]).expect_err("err");
        assert_eq!(err, MapGenError::UnknownTileId { id: 9, x: 1, y: 1 });
    }

    #[test]
    fn walkability_follows_classification() {
        assert!(TileKind::Grass.is_walkable());
        assert!(TileKind::Village.is_walkable());
        assert!(!TileKind::Wall.is_walkable());
        assert!(!TileKind::Scorched.is_walkable());
    }

    #[test]
    fn out_of_bounds_cells_are_not_walkable() {
        let grid = open_field(4);
        assert!(grid.is_walkable(GridPos { x: 0, y: 0 }));
        assert!(!grid.is_walkable(GridPos { x: -1, y: 0 }));
        assert!(!grid.is_walkable(GridPos { x: 0, y: 4 }));
        assert_eq!(grid.tile_at(GridPos { x: 4, y: 4 }), None);
    }

    #[test]
    fn radial_zoning_classifies_by_distance_thresholds() {
        let center = GridPos { x: 20, y: 20 };
        let grid = TileGrid::radial(40, center, 4.0, 10.0).expect("grid");

        // distance 1: exclusion ring
        assert_eq!(
            grid.tile_at(GridPos { x: 20, y: 21 }),
            Some(TileKind::Scorched)
        );
        // distance 8: settled zone
        assert_eq!(
            grid.tile_at(GridPos { x: 20, y: 28 }),
            Some(TileKind::Village)
        );
        // far corner: wilderness
        assert_eq!(
            grid.tile_at(GridPos { x: 39, y: 39 }),
            Some(TileKind::Grass)
        );
    }

    #[test]
    fn radial_zoning_is_deterministic() {
        let center = GridPos { x: 10, y: 10 };
        let first = TileGrid::radial(20, center, 4.0, 8.0).expect("grid");
        let second = TileGrid::radial(20, center, 4.0, 8.0).expect("grid");
        assert_eq!(first, second);
    }

    #[test]
    fn radial_zoning_rejects_zero_size() {
        let err = TileGrid::radial(0, GridPos { x: 0, y: 0 }, 1.0, 2.0).expect_err("err");
        assert_eq!(err, MapGenError::NonPositiveSize);
    }

    #[test]
    fn radial_zoning_rejects_center_outside_grid_without_clamping() {
        let err = TileGrid::radial(10, GridPos { x: 10, y: 3 }, 1.0, 2.0).expect_err("err");
        assert_eq!(
            err,
            MapGenError::CenterOutOfBounds {
                x: 10,
                y: 3,
                size: 10
            }
        );
        let err = TileGrid::radial(10, GridPos { x: 2, y: -1 }, 1.0, 2.0).expect_err("err");
        assert!(matches!(err, MapGenError::CenterOutOfBounds { .. }));
    }

    #[test]
    fn radial_zoning_rejects_inverted_radii() {
        let err = TileGrid::radial(10, GridPos { x: 5, y: 5 }, 6.0, 2.0).expect_err("err");
        assert_eq!(
            err,
            MapGenError::InvalidRadii {
                inner: 6.0,
                settle: 2.0
            }
        );
    }

    #[test]
    fn scatter_is_reproducible_for_the_same_seed() {
        let grid = TileGrid::radial(20, GridPos { x: 10, y: 10 }, 3.0, 6.0).expect("grid");
        let mut first_rng = ChaCha8Rng::seed_from_u64(42);
        let mut second_rng = ChaCha8Rng::seed_from_u64(42);

        let first = scatter_cells(&grid, TileKind::Grass, 8, &mut first_rng, &[]);
        let second = scatter_cells(&grid, TileKind::Grass, 8, &mut second_rng, &[]);

        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
    }

    #[test]
    fn scatter_picks_distinct_cells_of_requested_zone() {
        let grid = TileGrid::radial(20, GridPos { x: 10, y: 10 }, 3.0, 6.0).expect("grid");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let picked = scatter_cells(&grid, TileKind::Village, 10, &mut rng, &[]);

        assert_eq!(picked.len(), 10);
        for cell in &picked {
            assert_eq!(grid.tile_at(*cell), Some(TileKind::Village));
        }
        let mut deduped = picked.clone();
        deduped.sort_by_key(|cell| (cell.y, cell.x));
        deduped.dedup();
        assert_eq!(deduped.len(), picked.len());
    }

    #[test]
    fn scatter_skips_reserved_cells_and_caps_at_candidate_count() {
        let grid = TileGrid::authored(&[vec![0, 0], vec![1, 1]]).expect("grid");
        let reserved = [GridPos { x: 0, y: 0 }];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let picked = scatter_cells(&grid, TileKind::Grass, 5, &mut rng, &reserved);

        assert_eq!(picked, vec![GridPos { x: 1, y: 0 }]);
    }
}
