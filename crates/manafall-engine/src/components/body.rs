//! Kinematic body shared by the player and every enemy.
//!
//! Integration is a fixed per-tick displacement (no dt): intent plus velocity,
//! resolved one axis at a time against the tile surface.

use glam::Vec2;

use crate::api::config::PhysicsTuning;
use crate::components::tilemap::TileSurface;
use crate::core::geometry::Rect;

/// Which sides touched geometry during the most recent `advance`.
/// Reset at the start of every advance, never accumulated across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    pub fn side(&self) -> bool {
        self.left || self.right
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsBody {
    /// Top-left corner of the bounding box.
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    /// Facing left when true.
    pub flip: bool,
    pub collisions: Collisions,
    /// Movement intent passed to the most recent `advance`.
    pub last_movement: Vec2,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            flip: false,
            collisions: Collisions::default(),
            last_movement: Vec2::ZERO,
        }
    }

    /// Bounding box `[pos, pos + size)`.
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Point `offset` units ahead of the center along the facing direction.
    pub fn muzzle(&self, offset: f32) -> Vec2 {
        let c = self.center();
        Vec2::new(if self.flip { c.x - offset } else { c.x + offset }, c.y)
    }

    fn apply_gravity(&mut self, physics: &PhysicsTuning) {
        self.velocity.y = (self.velocity.y + physics.gravity_step).min(physics.max_fall_speed);
    }

    /// Move by `movement + velocity` and resolve against `surface`.
    ///
    /// `dropping` disables one-way platforms for this tick.
    pub fn advance<S: TileSurface + ?Sized>(
        &mut self,
        surface: &S,
        movement: Vec2,
        dropping: bool,
        physics: &PhysicsTuning,
    ) {
        self.collisions = Collisions::default();
        let frame = movement + self.velocity;

        // Gravity is applied once here and once after resolution. The shipped fall
        // curve depends on both applications.
        self.apply_gravity(physics);

        self.pos.x += frame.x;
        let mut rect = self.rect();
        for tile in surface.solid_rects_near(self.pos) {
            if rect.overlaps(&tile) {
                if frame.x > 0.0 {
                    rect.set_right(tile.left());
                    self.collisions.right = true;
                }
                if frame.x < 0.0 {
                    rect.set_left(tile.right());
                    self.collisions.left = true;
                }
                self.pos.x = rect.left();
            }
        }

        self.pos.y += frame.y;
        let mut rect = self.rect();

        if frame.y > 0.0 && !dropping {
            for platform in surface.one_way_rects_near(self.pos) {
                // Land only if the bottom was at (or just above) the top before moving.
                if rect.overlaps(&platform)
                    && rect.bottom() - frame.y <= platform.top() + physics.one_way_tolerance
                {
                    rect.set_bottom(platform.top());
                    self.collisions.down = true;
                    self.pos.y = rect.top();
                }
            }
        }

        for tile in surface.solid_rects_near(self.pos) {
            if rect.overlaps(&tile) {
                if frame.y > 0.0 {
                    rect.set_bottom(tile.top());
                    self.collisions.down = true;
                }
                if frame.y < 0.0 {
                    rect.set_top(tile.bottom());
                    self.collisions.up = true;
                }
                self.pos.y = rect.top();
            }
        }

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }
        self.last_movement = movement;

        self.apply_gravity(physics);

        if self.collisions.down || self.collisions.up {
            self.velocity.y = 0.0;
        }
    }
}
