//! Enemy decision making.
//!
//! Every variant shares the wander pattern (random walking bursts with ledge and
//! wall turning). When a burst ends the variant gets an attack window.

use glam::Vec2;

use crate::api::config::{EnemyTuning, PhysicsTuning};
use crate::components::action::select_enemy_action;
use crate::components::enemy::{Enemy, EnemyKind};
use crate::components::projectile::{Projectile, ProjectileKind};
use crate::components::tilemap::TileSurface;
use crate::core::rng::Rng;
use crate::systems::effects::{EffectQueue, EffectRequest};

/// Read-only inputs an enemy needs for one tick.
pub struct EnemyContext<'a> {
    pub surface: &'a dyn TileSurface,
    /// Player top-left position as of the previous tick.
    pub target: Vec2,
    pub tuning: &'a EnemyTuning,
    pub physics: &'a PhysicsTuning,
}

/// Result of the wander step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub horizontal: f32,
    /// The walking burst ended this tick.
    pub attack_window: bool,
}

pub trait EnemyBehavior {
    /// Per-tick timers that run before the wander step.
    fn tick_timers(&self, _enemy: &mut Enemy) {}

    fn decide_intent(
        &self,
        enemy: &mut Enemy,
        surface: &dyn TileSurface,
        tuning: &EnemyTuning,
        rng: &mut Rng,
    ) -> Intent {
        wander(enemy, surface, tuning, rng)
    }

    /// Called on the tick a walking burst ends. May fire one projectile.
    fn on_attack_window(
        &self,
        enemy: &mut Enemy,
        target: Vec2,
        tuning: &EnemyTuning,
        effects: &mut EffectQueue,
    ) -> Option<Projectile>;

    fn on_death(&self, enemy: &Enemy, tuning: &EnemyTuning, effects: &mut EffectQueue) {
        let stats = enemy.kind.stats(tuning);
        effects.push(EffectRequest::burst(
            enemy.body.center(),
            stats.death_sparks,
            stats.death_spark_speed,
        ));
    }
}

pub struct Slime;
pub struct Flamemite;
pub struct DarkMage;

impl EnemyBehavior for Slime {
    fn on_attack_window(
        &self,
        _enemy: &mut Enemy,
        _target: Vec2,
        _tuning: &EnemyTuning,
        _effects: &mut EffectQueue,
    ) -> Option<Projectile> {
        None
    }
}

impl EnemyBehavior for Flamemite {
    fn tick_timers(&self, enemy: &mut Enemy) {
        enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);
    }

    fn on_attack_window(
        &self,
        enemy: &mut Enemy,
        target: Vec2,
        tuning: &EnemyTuning,
        effects: &mut EffectQueue,
    ) -> Option<Projectile> {
        if enemy.attack_cooldown > 0 {
            return None;
        }
        let stats = &tuning.flamemite;
        let delta = target - enemy.body.pos;
        if delta.y.abs() >= tuning.sight_band || delta.x.abs() >= stats.attack_range {
            return None;
        }
        if delta.x != 0.0 {
            enemy.body.flip = delta.x < 0.0;
        }
        enemy.attack_cooldown = stats.attack_cooldown;
        Some(fire(enemy, ProjectileKind::Flamemite, tuning, effects))
    }
}

impl EnemyBehavior for DarkMage {
    fn on_attack_window(
        &self,
        enemy: &mut Enemy,
        target: Vec2,
        tuning: &EnemyTuning,
        effects: &mut EffectQueue,
    ) -> Option<Projectile> {
        let delta = target - enemy.body.pos;
        if delta.y.abs() >= tuning.sight_band {
            return None;
        }
        // Never turns around to shoot.
        let in_front = if enemy.body.flip {
            delta.x < 0.0
        } else {
            delta.x > 0.0
        };
        if !in_front {
            return None;
        }
        Some(fire(enemy, ProjectileKind::DarkMage, tuning, effects))
    }
}

impl EnemyKind {
    pub fn behavior(self) -> &'static dyn EnemyBehavior {
        match self {
            EnemyKind::Slime => &Slime,
            EnemyKind::Flamemite => &Flamemite,
            EnemyKind::DarkMage => &DarkMage,
        }
    }
}

/// Shared wander step: walk while a burst lasts, otherwise maybe start one.
pub fn wander(
    enemy: &mut Enemy,
    surface: &dyn TileSurface,
    tuning: &EnemyTuning,
    rng: &mut Rng,
) -> Intent {
    let mut intent = Intent::default();

    if enemy.walking > 0 {
        let body = &mut enemy.body;
        let ahead = if body.flip {
            -tuning.probe_ahead
        } else {
            tuning.probe_ahead
        };
        let probe = Vec2::new(body.center().x + ahead, body.pos.y + tuning.probe_depth);
        if surface.is_solid_at(probe) {
            if body.collisions.side() {
                body.flip = !body.flip;
            } else {
                intent.horizontal = if body.flip {
                    -tuning.walk_speed
                } else {
                    tuning.walk_speed
                };
            }
        } else {
            // Ledge ahead.
            body.flip = !body.flip;
        }
        enemy.walking -= 1;
        intent.attack_window = enemy.walking == 0;
    } else if rng.chance(tuning.wander_chance) {
        enemy.walking = rng.range_inclusive(tuning.wander_min_ticks, tuning.wander_max_ticks);
    }

    intent
}

fn fire(
    enemy: &Enemy,
    kind: ProjectileKind,
    tuning: &EnemyTuning,
    effects: &mut EffectQueue,
) -> Projectile {
    let stats = enemy.kind.stats(tuning);
    let left = enemy.body.flip;
    let muzzle = enemy.body.muzzle(tuning.muzzle_offset);
    effects.push(EffectRequest::facing_cone(muzzle, stats.muzzle_sparks, left, (2.0, 3.0)));
    let speed = if left {
        -stats.projectile_speed
    } else {
        stats.projectile_speed
    };
    Projectile::new(muzzle, speed, stats.projectile_damage, kind)
}

/// Run one enemy for one tick: decide, move, pick an action.
/// Returns the projectile it fired, if any.
pub fn update_enemy(
    enemy: &mut Enemy,
    ctx: &EnemyContext<'_>,
    rng: &mut Rng,
    effects: &mut EffectQueue,
) -> Option<Projectile> {
    let behavior = enemy.kind.behavior();
    behavior.tick_timers(enemy);

    let mut intent = behavior.decide_intent(enemy, ctx.surface, ctx.tuning, rng);
    let shot = if intent.attack_window {
        behavior.on_attack_window(enemy, ctx.target, ctx.tuning, effects)
    } else {
        None
    };

    // An enemy that turned around to shoot stands still for the tick.
    if intent.horizontal != 0.0 && (intent.horizontal < 0.0) != enemy.body.flip {
        intent.horizontal = 0.0;
    }

    enemy
        .body
        .advance(ctx.surface, Vec2::new(intent.horizontal, 0.0), false, ctx.physics);
    enemy.action.set(select_enemy_action(intent.horizontal != 0.0));
    enemy.action.tick();
    shot
}
