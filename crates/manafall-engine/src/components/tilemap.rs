//! Tile collision surface.
//!
//! Physics, AI and projectiles only see the world through [`TileSurface`].
//! [`TileGrid`] is the stock implementation: a fixed-size grid of tile kinds
//! whose origin is the world origin (Y grows downward).

use glam::Vec2;

use crate::core::geometry::Rect;

/// Neighborhood scanned around a query position, in row-major order.
/// This order is the tie-break order for sequential collision resolution.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (0, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

/// What the simulation needs from the level geometry.
pub trait TileSurface {
    /// Solid tile rectangles near `pos`, in a stable query order.
    fn solid_rects_near(&self, pos: Vec2) -> Vec<Rect>;

    /// One-way (drop-through) platform rectangles near `pos`.
    fn one_way_rects_near(&self, pos: Vec2) -> Vec<Rect>;

    /// Whether a solid tile covers `point`.
    fn is_solid_at(&self, point: Vec2) -> bool;

    /// Whether a lethal hazard tile covers `point`.
    fn is_hazard_at(&self, _point: Vec2) -> bool {
        false
    }
}

/// Kind of a non-empty tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// Blocks movement on every side.
    Solid,
    /// Blocks downward movement only; can be dropped through.
    OneWay,
    /// Passable, kills the player on contact.
    Hazard,
    /// Solid until stood on for a while, then breaks and later reforms.
    Crumbling,
}

impl TileKind {
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Solid | TileKind::Crumbling)
    }

    /// Decode the host's numeric tile code. 0 and unknown codes mean empty.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(TileKind::Solid),
            2 => Some(TileKind::OneWay),
            3 => Some(TileKind::Hazard),
            4 => Some(TileKind::Crumbling),
            _ => None,
        }
    }
}

/// Grid of tiles stored in row-major order: index = y * width + x.
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub width: u32,
    pub height: u32,
    pub tile_size: f32,
    tiles: Vec<Option<TileKind>>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        let count = (width * height) as usize;
        Self {
            width,
            height,
            tile_size,
            tiles: vec![None; count],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as u32 * self.width + x as u32) as usize)
    }

    /// Tile at grid position (x, y). Out-of-range cells are empty.
    pub fn get(&self, x: i32, y: i32) -> Option<TileKind> {
        self.index(x, y).and_then(|i| self.tiles[i])
    }

    /// Set a tile. Returns false (and changes nothing) when out of range.
    pub fn set(&mut self, x: i32, y: i32, tile: Option<TileKind>) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Fill a rectangular region of cells.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, tile: Option<TileKind>) {
        for ty in y..y + h as i32 {
            for tx in x..x + w as i32 {
                self.set(tx, ty, tile);
            }
        }
    }

    pub fn clear(&mut self) {
        self.tiles.fill(None);
    }

    /// Grid cell containing a world position (may be out of range).
    pub fn world_to_tile(&self, world_pos: Vec2) -> (i32, i32) {
        (
            (world_pos.x / self.tile_size).floor() as i32,
            (world_pos.y / self.tile_size).floor() as i32,
        )
    }

    /// World-space rectangle of a cell.
    pub fn tile_rect(&self, x: i32, y: i32) -> Rect {
        Rect::new(
            Vec2::new(x as f32 * self.tile_size, y as f32 * self.tile_size),
            Vec2::splat(self.tile_size),
        )
    }

    /// Kind of the tile covering a world position.
    pub fn tile_at(&self, world_pos: Vec2) -> Option<TileKind> {
        let (x, y) = self.world_to_tile(world_pos);
        self.get(x, y)
    }

    /// Every cell holding the given kind, in row-major order.
    pub fn cells_of(&self, kind: TileKind) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if self.get(x, y) == Some(kind) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    fn rects_near(&self, pos: Vec2, keep: impl Fn(TileKind) -> bool) -> Vec<Rect> {
        let (cx, cy) = self.world_to_tile(pos);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                let (x, y) = (cx + dx, cy + dy);
                match self.get(x, y) {
                    Some(kind) if keep(kind) => Some(self.tile_rect(x, y)),
                    _ => None,
                }
            })
            .collect()
    }
}

impl TileSurface for TileGrid {
    fn solid_rects_near(&self, pos: Vec2) -> Vec<Rect> {
        self.rects_near(pos, TileKind::is_solid)
    }

    fn one_way_rects_near(&self, pos: Vec2) -> Vec<Rect> {
        self.rects_near(pos, |kind| kind == TileKind::OneWay)
    }

    fn is_solid_at(&self, point: Vec2) -> bool {
        self.tile_at(point).is_some_and(TileKind::is_solid)
    }

    fn is_hazard_at(&self, point: Vec2) -> bool {
        self.tile_at(point) == Some(TileKind::Hazard)
    }
}
