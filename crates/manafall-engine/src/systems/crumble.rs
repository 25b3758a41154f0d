//! Crumbling blocks: solid until stood on, then shake, break, and reform.
//!
//! The field edits the `TileGrid` directly, so it runs before the world tick
//! that reads the grid.

use log::debug;

use crate::api::config::CrumbleTuning;
use crate::components::player::Player;
use crate::components::tilemap::{TileGrid, TileKind};
use crate::core::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrumbleState {
    Solid,
    Shaking,
    Breaking,
    /// Tile removed from the grid, waiting to reform.
    Broken,
}

impl CrumbleState {
    pub fn code(self) -> u32 {
        match self {
            CrumbleState::Solid => 0,
            CrumbleState::Shaking => 1,
            CrumbleState::Breaking => 2,
            CrumbleState::Broken => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrumbleBlock {
    pub cell: (i32, i32),
    pub state: CrumbleState,
    pub timer: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CrumbleField {
    blocks: Vec<CrumbleBlock>,
}

impl CrumbleField {
    /// Track every crumbling tile currently in the grid.
    pub fn from_grid(grid: &TileGrid) -> Self {
        let mut field = Self::default();
        field.sync(grid);
        field
    }

    pub fn blocks(&self) -> &[CrumbleBlock] {
        &self.blocks
    }

    pub fn state_at(&self, cell: (i32, i32)) -> Option<CrumbleState> {
        self.blocks.iter().find(|b| b.cell == cell).map(|b| b.state)
    }

    /// Reconcile with host edits to the grid. Blocks keep their state while
    /// their cell still holds a crumbling tile, or is empty because the block
    /// is broken; newly placed crumbling tiles start solid.
    pub fn sync(&mut self, grid: &TileGrid) {
        self.blocks.retain(|block| {
            let (x, y) = block.cell;
            match grid.get(x, y) {
                Some(TileKind::Crumbling) => true,
                None => block.state == CrumbleState::Broken,
                Some(_) => false,
            }
        });
        for cell in grid.cells_of(TileKind::Crumbling) {
            if self.state_at(cell).is_none() {
                self.blocks.push(CrumbleBlock {
                    cell,
                    state: CrumbleState::Solid,
                    timer: 0,
                });
            }
        }
    }

    pub fn update(&mut self, grid: &mut TileGrid, player: &Player, tuning: &CrumbleTuning) {
        for block in &mut self.blocks {
            let tile = grid.tile_rect(block.cell.0, block.cell.1);
            match block.state {
                CrumbleState::Broken => {
                    block.timer += 1;
                    if block.timer >= tuning.respawn_ticks {
                        block.state = CrumbleState::Solid;
                        block.timer = 0;
                        grid.set(block.cell.0, block.cell.1, Some(TileKind::Crumbling));
                    }
                }
                CrumbleState::Solid | CrumbleState::Shaking => {
                    if !stands_on(player, &tile, tuning) {
                        continue;
                    }
                    if block.state == CrumbleState::Solid {
                        block.state = CrumbleState::Shaking;
                        block.timer = 0;
                    } else {
                        block.timer += 1;
                        if block.timer >= tuning.shake_ticks {
                            block.state = CrumbleState::Breaking;
                            block.timer = 0;
                        }
                    }
                }
                CrumbleState::Breaking => {
                    block.timer += 1;
                    if block.timer >= tuning.break_ticks {
                        grid.set(block.cell.0, block.cell.1, None);
                        block.state = CrumbleState::Broken;
                        block.timer = 0;
                        debug!("crumble block {:?} broke", block.cell);
                    }
                }
            }
        }
    }
}

fn stands_on(player: &Player, tile: &Rect, tuning: &CrumbleTuning) -> bool {
    let rect = player.rect();
    player.body.collisions.down
        && player.body.velocity.y >= 0.0
        && rect.bottom() <= tile.top() + tuning.stand_tolerance
        && rect.bottom() >= tile.top() - tuning.stand_tolerance
        && rect.right() > tile.left() + tuning.edge_inset
        && rect.left() < tile.right() - tuning.edge_inset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::PlayerTuning;
    use glam::Vec2;

    /// One crumbling block at (2, 5); its top edge is y = 80.
    fn setup() -> (TileGrid, CrumbleField) {
        let mut grid = TileGrid::new(10, 10, 16.0);
        grid.set(2, 5, Some(TileKind::Crumbling));
        let field = CrumbleField::from_grid(&grid);
        (grid, field)
    }

    fn standing_player() -> Player {
        let mut p = Player::new(Vec2::new(36.0, 64.0), PlayerTuning::default());
        p.body.collisions.down = true;
        p
    }

    #[test]
    fn tracks_crumbling_tiles() {
        let (_, field) = setup();
        assert_eq!(field.blocks().len(), 1);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Solid));
        assert_eq!(field.state_at((0, 0)), None);
    }

    #[test]
    fn full_cycle() {
        let tuning = CrumbleTuning::default();
        let (mut grid, mut field) = setup();
        let p = standing_player();

        field.update(&mut grid, &p, &tuning);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Shaking));

        for _ in 0..34 {
            field.update(&mut grid, &p, &tuning);
        }
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Shaking));
        field.update(&mut grid, &p, &tuning);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Breaking));

        // Breaking finishes even if the player leaves.
        let away = Player::new(Vec2::new(300.0, 0.0), PlayerTuning::default());
        for _ in 0..11 {
            field.update(&mut grid, &away, &tuning);
        }
        assert_eq!(grid.get(2, 5), Some(TileKind::Crumbling));
        field.update(&mut grid, &away, &tuning);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Broken));
        assert_eq!(grid.get(2, 5), None);

        for _ in 0..299 {
            field.update(&mut grid, &away, &tuning);
        }
        assert_eq!(grid.get(2, 5), None);
        field.update(&mut grid, &away, &tuning);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Solid));
        assert_eq!(grid.get(2, 5), Some(TileKind::Crumbling));
    }

    #[test]
    fn shaking_pauses_when_player_steps_off() {
        let tuning = CrumbleTuning::default();
        let (mut grid, mut field) = setup();
        let p = standing_player();
        field.update(&mut grid, &p, &tuning);
        field.update(&mut grid, &p, &tuning);
        let away = Player::new(Vec2::new(300.0, 0.0), PlayerTuning::default());
        for _ in 0..100 {
            field.update(&mut grid, &away, &tuning);
        }
        assert_eq!(field.blocks()[0].state, CrumbleState::Shaking);
        assert_eq!(field.blocks()[0].timer, 1);
    }

    #[test]
    fn requires_ground_contact_and_overlap() {
        let tuning = CrumbleTuning::default();
        let (mut grid, mut field) = setup();

        let mut airborne = standing_player();
        airborne.body.collisions.down = false;
        field.update(&mut grid, &airborne, &tuning);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Solid));

        // Box ends before the block's inset edge.
        let mut edge = standing_player();
        edge.body.pos.x = 24.0 - 8.0 + 1.0;
        field.update(&mut grid, &edge, &tuning);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Solid));

        let mut rising = standing_player();
        rising.body.velocity.y = -1.0;
        field.update(&mut grid, &rising, &tuning);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Solid));
    }

    #[test]
    fn sync_keeps_broken_blocks_and_adds_new_tiles() {
        let tuning = CrumbleTuning::default();
        let (mut grid, mut field) = setup();
        let p = standing_player();
        for _ in 0..48 {
            field.update(&mut grid, &p, &tuning);
        }
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Broken));
        assert_eq!(grid.get(2, 5), None);

        grid.set(7, 7, Some(TileKind::Crumbling));
        field.sync(&grid);
        assert_eq!(field.blocks().len(), 2);
        assert_eq!(field.state_at((2, 5)), Some(CrumbleState::Broken));
        assert_eq!(field.state_at((7, 7)), Some(CrumbleState::Solid));

        let away = Player::new(Vec2::new(300.0, 0.0), PlayerTuning::default());
        for _ in 0..300 {
            field.update(&mut grid, &away, &tuning);
        }
        assert_eq!(grid.get(2, 5), Some(TileKind::Crumbling));
    }

    #[test]
    fn sync_drops_overwritten_cells() {
        let (mut grid, mut field) = setup();
        grid.set(2, 5, Some(TileKind::Solid));
        field.sync(&grid);
        assert!(field.blocks().is_empty());

        // An intact block whose tile was erased is gone too.
        let (mut grid, mut field) = setup();
        grid.set(2, 5, None);
        field.sync(&grid);
        assert!(field.blocks().is_empty());
    }
}
