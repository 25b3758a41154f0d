//! Active projectile list: advance, collide, expire.

use std::f32::consts::PI;

use crate::api::config::ProjectileTuning;
use crate::api::types::WorldEvent;
use crate::components::enemy::Enemy;
use crate::components::player::Player;
use crate::components::projectile::Projectile;
use crate::components::tilemap::TileSurface;
use crate::systems::combat::damage_player;
use crate::systems::effects::{EffectQueue, EffectRequest};

/// Why a projectile left the active list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Wall,
    Expired,
    HitPlayer,
    HitEnemy,
}

#[derive(Debug, Default)]
pub struct ProjectileSystem {
    active: Vec<Projectile>,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self {
            active: Vec::with_capacity(32),
        }
    }

    pub fn spawn(&mut self, projectile: Projectile) {
        self.active.push(projectile);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Advance every projectile one tick and resolve it. Each projectile
    /// is removed for at most one reason, checked in order: wall, lifetime,
    /// target. Enemy health may drop to zero here; removal of dead enemies
    /// happens afterwards.
    pub fn update(
        &mut self,
        surface: &dyn TileSurface,
        player: &mut Player,
        enemies: &mut [Enemy],
        tuning: &ProjectileTuning,
        effects: &mut EffectQueue,
        events: &mut Vec<WorldEvent>,
    ) -> Vec<Impact> {
        let mut impacts = Vec::new();
        self.active.retain_mut(|projectile| {
            projectile.step();
            match resolve(projectile, surface, player, enemies, tuning, effects, events) {
                Some(impact) => {
                    impacts.push(impact);
                    false
                }
                None => true,
            }
        });
        impacts
    }
}

fn resolve(
    projectile: &Projectile,
    surface: &dyn TileSurface,
    player: &mut Player,
    enemies: &mut [Enemy],
    tuning: &ProjectileTuning,
    effects: &mut EffectQueue,
    events: &mut Vec<WorldEvent>,
) -> Option<Impact> {
    if surface.is_solid_at(projectile.pos) {
        // Sparks fly back the way the projectile came.
        effects.push(EffectRequest::cone(
            projectile.pos,
            tuning.wall_sparks,
            projectile.heading() + PI,
            (2.0, 3.0),
        ));
        return Some(Impact::Wall);
    }

    if projectile.age > tuning.lifetime {
        return Some(Impact::Expired);
    }

    let hitbox = projectile.hitbox(tuning.hitbox);
    if projectile.kind.is_enemy_owned() {
        // Dashing grants full immunity; invincibility still absorbs the shot.
        if player.is_dashing() || !player.rect().overlaps(&hitbox) {
            return None;
        }
        damage_player(player, projectile.damage, effects, events);
        effects.push(EffectRequest::burst(
            player.body.center(),
            tuning.player_hit_sparks,
            (2.0, 3.0),
        ));
        return Some(Impact::HitPlayer);
    }

    let target = enemies
        .iter_mut()
        .find(|enemy| enemy.is_alive() && enemy.rect().overlaps(&hitbox))?;
    target.health -= projectile.damage;
    effects.push(EffectRequest::burst(
        target.body.center(),
        tuning.enemy_hit_sparks,
        (0.0, 1.0),
    ));
    Some(Impact::HitEnemy)
}
