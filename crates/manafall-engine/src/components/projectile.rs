use std::f32::consts::PI;

use glam::Vec2;

use crate::core::geometry::Rect;

/// Who fired a projectile and with which attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    PlayerBasic,
    PlayerStrong,
    Flamemite,
    DarkMage,
}

impl ProjectileKind {
    pub fn is_player_owned(self) -> bool {
        matches!(self, ProjectileKind::PlayerBasic | ProjectileKind::PlayerStrong)
    }

    pub fn is_enemy_owned(self) -> bool {
        !self.is_player_owned()
    }

    pub fn code(self) -> u32 {
        match self {
            ProjectileKind::PlayerBasic => 0,
            ProjectileKind::PlayerStrong => 1,
            ProjectileKind::Flamemite => 2,
            ProjectileKind::DarkMage => 3,
        }
    }
}

/// A horizontal shot. `pos` is the center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Signed horizontal displacement per tick.
    pub speed: f32,
    pub age: u32,
    pub damage: i32,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn new(pos: Vec2, speed: f32, damage: i32, kind: ProjectileKind) -> Self {
        Self {
            pos,
            speed,
            age: 0,
            damage,
            kind,
        }
    }

    /// Square hit box of side `size` centered on the projectile.
    pub fn hitbox(&self, size: f32) -> Rect {
        Rect::centered(self.pos, Vec2::splat(size))
    }

    /// Direction of travel in radians (0 = right, PI = left).
    pub fn heading(&self) -> f32 {
        if self.speed < 0.0 {
            PI
        } else {
            0.0
        }
    }

    /// Move one tick and grow one tick older.
    pub fn step(&mut self) {
        self.pos.x += self.speed;
        self.age += 1;
    }
}
