use bytemuck::{Pod, Zeroable};

use crate::components::enemy::EnemyKind;

/// Stable identifier for an enemy in the roster. Never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Something the host may want to react to (HUD, audio, level flow).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    PlayerDamaged { hp: i32 },
    PlayerDied,
    EnemyKilled { id: EntityId, kind: EnemyKind },
    BossDefeated,
    ManaCollected { mana: i32, full: bool },
    GoalReached,
    /// The player has been dead long enough that the host should reload the level.
    RestartDue,
}

impl WorldEvent {
    /// Numeric kind written to the wire.
    pub fn code(&self) -> u32 {
        match self {
            WorldEvent::PlayerDamaged { .. } => 1,
            WorldEvent::PlayerDied => 2,
            WorldEvent::EnemyKilled { .. } => 3,
            WorldEvent::BossDefeated => 4,
            WorldEvent::ManaCollected { .. } => 5,
            WorldEvent::GoalReached => 6,
            WorldEvent::RestartDue => 7,
        }
    }

    pub fn to_record(&self) -> EventRecord {
        let (a, b) = match *self {
            WorldEvent::PlayerDamaged { hp } => (hp as f32, 0.0),
            WorldEvent::EnemyKilled { id, kind } => (id.0 as f32, kind.code() as f32),
            WorldEvent::ManaCollected { mana, full } => (mana as f32, if full { 1.0 } else { 0.0 }),
            _ => (0.0, 0.0),
        };
        EventRecord {
            kind: self.code() as f32,
            a,
            b,
            c: 0.0,
        }
    }
}

/// A world event as the host reads it: `kind` plus up to three payload floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;
}
