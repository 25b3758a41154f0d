use glam::Vec2;

use crate::api::config::{EnemyStats, EnemyTuning};
use crate::api::types::EntityId;
use crate::components::action::ActionState;
use crate::components::body::PhysicsBody;
use crate::core::geometry::Rect;

/// The closed set of enemy variants. Behavior is dispatched on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Melee wanderer.
    Slime,
    /// Short-range caster with its own cooldown.
    Flamemite,
    /// Boss caster, fires only in the direction it faces.
    DarkMage,
}

impl EnemyKind {
    /// Spawn-marker variant for this kind (0 is the player start).
    pub fn code(self) -> u32 {
        match self {
            EnemyKind::Slime => 1,
            EnemyKind::Flamemite => 2,
            EnemyKind::DarkMage => 3,
        }
    }

    pub fn from_marker(variant: u32) -> Option<Self> {
        match variant {
            1 => Some(EnemyKind::Slime),
            2 => Some(EnemyKind::Flamemite),
            3 => Some(EnemyKind::DarkMage),
            _ => None,
        }
    }

    pub fn stats(self, tuning: &EnemyTuning) -> &EnemyStats {
        match self {
            EnemyKind::Slime => &tuning.slime,
            EnemyKind::Flamemite => &tuning.flamemite,
            EnemyKind::DarkMage => &tuning.dark_mage,
        }
    }

    /// A level's boss is the enemy spawned from this kind's marker.
    pub fn is_boss(self) -> bool {
        self == EnemyKind::DarkMage
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub body: PhysicsBody,
    pub action: ActionState,
    pub health: i32,
    /// Remaining ticks of the current walking burst; 0 when standing.
    pub walking: u32,
    pub attack_cooldown: u32,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, tuning: &EnemyTuning) -> Self {
        let stats = kind.stats(tuning);
        Self {
            id,
            kind,
            body: PhysicsBody::new(pos, Vec2::new(stats.width, stats.height)),
            action: ActionState::default(),
            health: stats.health,
            walking: 0,
            attack_cooldown: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
