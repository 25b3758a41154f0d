//! Mana pickups and level goals.

use glam::Vec2;
use log::{debug, info};

use crate::api::config::PickupTuning;
use crate::api::types::WorldEvent;
use crate::components::player::Player;
use crate::core::geometry::Rect;
use crate::core::rng::Rng;
use crate::systems::effects::{EffectQueue, EffectRequest};

#[derive(Debug, Clone, PartialEq)]
pub struct ManaPickup {
    pub rect: Rect,
    /// Respawning pickups come back after a delay instead of disappearing.
    pub respawns: bool,
    pub available: bool,
    pub respawn_timer: u32,
}

impl ManaPickup {
    pub fn new(pos: Vec2, size: f32, respawns: bool) -> Self {
        Self {
            rect: Rect::new(pos, Vec2::splat(size)),
            respawns,
            available: true,
            respawn_timer: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub rect: Rect,
}

#[derive(Debug, Default)]
pub struct PickupField {
    pub mana: Vec<ManaPickup>,
    pub goals: Vec<Goal>,
}

impl PickupField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mana(&mut self, pos: Vec2, respawns: bool, tuning: &PickupTuning) {
        self.mana.push(ManaPickup::new(pos, tuning.size, respawns));
    }

    pub fn add_goal(&mut self, pos: Vec2, tuning: &PickupTuning) {
        self.goals.push(Goal {
            rect: Rect::new(pos, Vec2::splat(tuning.size)),
        });
    }

    pub fn clear(&mut self) {
        self.mana.clear();
        self.goals.clear();
    }

    /// Shimmer, collection and respawn timers for mana pickups.
    pub fn update_mana(
        &mut self,
        player: &mut Player,
        tuning: &PickupTuning,
        rng: &mut Rng,
        effects: &mut EffectQueue,
        events: &mut Vec<WorldEvent>,
    ) {
        for pickup in self.mana.iter().filter(|p| p.available) {
            if rng.chance(tuning.shimmer_chance) {
                effects.push(EffectRequest::ambient(pickup.rect.center(), 1, 0.5));
            }
        }

        let player_rect = player.rect();
        let amount = player.tuning().max_obtainable_mana;
        self.mana.retain_mut(|pickup| {
            if !pickup.available || !player_rect.overlaps(&pickup.rect) {
                return true;
            }
            let full = player.collect_mana(amount);
            debug!("mana collected: {} (full: {})", player.mana, full);
            effects.push(EffectRequest::ambient(
                pickup.rect.center(),
                tuning.collect_particles,
                2.0,
            ));
            events.push(WorldEvent::ManaCollected {
                mana: player.mana,
                full,
            });
            if pickup.respawns {
                pickup.available = false;
                pickup.respawn_timer = 0;
                return true;
            }
            false
        });

        for pickup in self.mana.iter_mut().filter(|p| !p.available) {
            pickup.respawn_timer += 1;
            if pickup.respawn_timer >= tuning.respawn_ticks {
                pickup.available = true;
                pickup.respawn_timer = 0;
                effects.push(EffectRequest::ambient(
                    pickup.rect.center(),
                    tuning.respawn_particles,
                    1.5,
                ));
            }
        }
    }

    /// True when the player touches any goal this tick.
    pub fn check_goals(
        &self,
        player: &Player,
        tuning: &PickupTuning,
        effects: &mut EffectQueue,
        events: &mut Vec<WorldEvent>,
    ) -> bool {
        let player_rect = player.rect();
        let Some(goal) = self.goals.iter().find(|g| player_rect.overlaps(&g.rect)) else {
            return false;
        };
        effects.push(EffectRequest::burst(
            goal.rect.center(),
            tuning.goal_sparks,
            (3.0, 4.0),
        ));
        info!("goal reached");
        events.push(WorldEvent::GoalReached);
        true
    }

    pub fn available_mana(&self) -> impl Iterator<Item = &ManaPickup> {
        self.mana.iter().filter(|p| p.available)
    }
}
