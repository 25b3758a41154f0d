//! Simulation tuning.
//!
//! All gameplay numbers live here so hosts can override them from JSON.
//! Every value is expressed per tick (the simulation runs at `tick_rate` Hz).
//! `Default` reproduces the shipped game exactly.

use serde::{Deserialize, Serialize};

use crate::input::controls::KeyBindings;

/// Top-level configuration for a `World` and its host bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks per second the tuning was authored for.
    pub tick_rate: f32,
    /// Maximum catch-up ticks per host frame.
    pub max_steps_per_frame: u32,
    /// Seed for AI and shimmer randomness.
    pub seed: u64,
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub enemies: EnemyTuning,
    pub projectiles: ProjectileTuning,
    pub pickups: PickupTuning,
    pub crumble: CrumbleTuning,
    pub buffers: BufferCapacity,
    pub keys: KeyBindings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_steps_per_frame: 10,
            seed: 42,
            physics: PhysicsTuning::default(),
            player: PlayerTuning::default(),
            enemies: EnemyTuning::default(),
            projectiles: ProjectileTuning::default(),
            pickups: PickupTuning::default(),
            crumble: CrumbleTuning::default(),
            buffers: BufferCapacity::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Gravity and collision constants shared by every actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Added to vertical velocity on each gravity application (twice per tick).
    pub gravity_step: f32,
    pub max_fall_speed: f32,
    /// How far above a one-way platform's top the pre-move bottom may sit and still land.
    pub one_way_tolerance: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity_step: 0.1,
            max_fall_speed: 5.0,
            one_way_tolerance: 2.0,
        }
    }
}

/// Player abilities, costs and timings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub max_hp: i32,
    pub max_mana: i32,
    /// Mana granted by one pickup.
    pub max_obtainable_mana: i32,
    pub max_jumps: u8,
    pub jump_velocity: f32,
    pub wall_jump_velocity_x: f32,
    pub wall_jump_velocity_y: f32,
    /// Air time set when leaving the ground by jumping.
    pub jump_air_time: u32,
    /// Air time above which the player counts as airborne (wall slide, jump pose).
    pub airborne_after: u32,
    pub wall_slide_max_fall: f32,
    pub friction: f32,
    pub dash_ticks: i32,
    pub dash_cooldown: i32,
    pub dash_speed: f32,
    pub dash_divisor: f32,
    pub drop_through_ticks: i32,
    pub drop_through_nudge: f32,
    pub drop_through_velocity: f32,
    pub drop_probe_height: f32,
    pub invincibility_ticks: i32,
    pub attack_lock_ticks: i32,
    pub fail_lock_ticks: i32,
    pub muzzle_offset: f32,
    pub basic: AttackTuning,
    pub strong: AttackTuning,
    pub hit_sparks: u32,
    pub death_sparks: u32,
    pub fail_sparks: u32,
    /// Damage dealt by touching a live enemy.
    pub contact_damage: i32,
    /// Ticks between death and the restart request.
    pub restart_delay: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
            max_hp: 120,
            max_mana: 200,
            max_obtainable_mana: 20,
            max_jumps: 2,
            jump_velocity: -4.0,
            wall_jump_velocity_x: 3.5,
            wall_jump_velocity_y: -5.0,
            jump_air_time: 5,
            airborne_after: 4,
            wall_slide_max_fall: 0.5,
            friction: 0.1,
            dash_ticks: 45,
            dash_cooldown: 120,
            dash_speed: 0.8,
            dash_divisor: 15.0,
            drop_through_ticks: 10,
            drop_through_nudge: 8.0,
            drop_through_velocity: 1.0,
            drop_probe_height: 4.0,
            invincibility_ticks: 60,
            attack_lock_ticks: 36,
            fail_lock_ticks: 24,
            muzzle_offset: 7.0,
            basic: AttackTuning {
                cost: 20,
                damage: 50,
                speed: 1.5,
                sparks: 4,
                spark_speed: (2.0, 3.0),
            },
            strong: AttackTuning {
                cost: 100,
                damage: 200,
                speed: 2.5,
                sparks: 12,
                spark_speed: (3.0, 4.0),
            },
            hit_sparks: 15,
            death_sparks: 40,
            fail_sparks: 3,
            contact_damage: 10,
            restart_delay: 90,
        }
    }
}

/// One mana-gated projectile attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    pub cost: i32,
    pub damage: i32,
    pub speed: f32,
    pub sparks: u32,
    pub spark_speed: (f32, f32),
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            cost: 20,
            damage: 50,
            speed: 1.5,
            sparks: 4,
            spark_speed: (2.0, 3.0),
        }
    }
}

/// Per-variant enemy stats plus the shared wander pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Per-tick probability of starting a walking burst.
    pub wander_chance: f32,
    pub wander_min_ticks: u32,
    pub wander_max_ticks: u32,
    pub walk_speed: f32,
    /// Ground probe: horizontal offset from center toward facing, and depth below the top edge.
    pub probe_ahead: f32,
    pub probe_depth: f32,
    /// Vertical band the player must be within for a ranged attack.
    pub sight_band: f32,
    pub muzzle_offset: f32,
    pub kill_sparks: u32,
    pub slime: EnemyStats,
    pub flamemite: EnemyStats,
    pub dark_mage: EnemyStats,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            wander_chance: 0.01,
            wander_min_ticks: 30,
            wander_max_ticks: 120,
            walk_speed: 0.5,
            probe_ahead: 7.0,
            probe_depth: 23.0,
            sight_band: 48.0,
            muzzle_offset: 7.0,
            kill_sparks: 20,
            slime: EnemyStats {
                width: 16.0,
                height: 12.0,
                health: 50,
                death_sparks: 15,
                death_spark_speed: (2.0, 3.0),
                ..EnemyStats::default()
            },
            flamemite: EnemyStats {
                width: 16.0,
                height: 13.0,
                health: 50,
                death_sparks: 25,
                death_spark_speed: (3.0, 4.0),
                attack_range: 100.0,
                attack_cooldown: 90,
                projectile_speed: 2.0,
                projectile_damage: 20,
                muzzle_sparks: 6,
            },
            dark_mage: EnemyStats {
                width: 10.0,
                height: 16.0,
                health: 400,
                death_sparks: 40,
                death_spark_speed: (3.0, 5.0),
                attack_range: 0.0,
                attack_cooldown: 0,
                projectile_speed: 1.5,
                projectile_damage: 15,
                muzzle_sparks: 4,
            },
        }
    }
}

/// Stats for one enemy variant. Melee-only variants leave the ranged fields at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub death_sparks: u32,
    pub death_spark_speed: (f32, f32),
    /// Horizontal reach of the ranged attack. Only the flamemite reads it; the
    /// dark mage fires at any distance in front of it.
    pub attack_range: f32,
    pub attack_cooldown: u32,
    pub projectile_speed: f32,
    pub projectile_damage: i32,
    pub muzzle_sparks: u32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 16.0,
            health: 50,
            death_sparks: 15,
            death_spark_speed: (2.0, 3.0),
            attack_range: 0.0,
            attack_cooldown: 0,
            projectile_speed: 0.0,
            projectile_damage: 0,
            muzzle_sparks: 0,
        }
    }
}

/// Projectile lifetime and hit feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Age after which a projectile expires silently.
    pub lifetime: u32,
    pub hitbox: f32,
    pub wall_sparks: u32,
    pub player_hit_sparks: u32,
    pub enemy_hit_sparks: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            lifetime: 360,
            hitbox: 8.0,
            wall_sparks: 4,
            player_hit_sparks: 10,
            enemy_hit_sparks: 8,
        }
    }
}

/// Mana pickups and goal zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub size: f32,
    pub respawn_ticks: u32,
    pub shimmer_chance: f32,
    pub collect_particles: u32,
    pub respawn_particles: u32,
    pub goal_sparks: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            size: 16.0,
            respawn_ticks: 1200,
            shimmer_chance: 0.02,
            collect_particles: 10,
            respawn_particles: 15,
            goal_sparks: 30,
        }
    }
}

/// Timings for crumbling blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrumbleTuning {
    pub shake_ticks: u32,
    pub break_ticks: u32,
    pub respawn_ticks: u32,
    /// Vertical slack when deciding whether the player stands on a block.
    pub stand_tolerance: f32,
    pub edge_inset: f32,
}

impl Default for CrumbleTuning {
    fn default() -> Self {
        Self {
            shake_ticks: 35,
            break_ticks: 12,
            respawn_ticks: 300,
            stand_tolerance: 4.0,
            edge_inset: 2.0,
        }
    }
}

/// Frame buffer capacities for the host protocol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferCapacity {
    pub max_actors: usize,
    pub max_effects: usize,
    pub max_events: usize,
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self {
            max_actors: 256,
            max_effects: 256,
            max_events: 32,
        }
    }
}
