//! The player: movement abilities, mana, attacks and damage.
//!
//! Every ability returns whether it fired. A rejected ability changes nothing;
//! callers pick the fallback (for attacks, [`Player::attack_fail`]).

use glam::Vec2;
use log::debug;

use crate::api::config::{AttackTuning, PhysicsTuning, PlayerTuning};
use crate::components::action::{select_player_action, Action, ActionState, PlayerPose};
use crate::components::body::PhysicsBody;
use crate::components::projectile::{Projectile, ProjectileKind};
use crate::components::tilemap::TileSurface;
use crate::core::geometry::Rect;
use crate::systems::effects::{EffectQueue, EffectRequest};

#[derive(Debug, Clone)]
pub struct Player {
    pub body: PhysicsBody,
    pub action: ActionState,
    pub hp: i32,
    pub mana: i32,
    pub jumps: u8,
    pub wall_slide: bool,
    /// Ticks since the player last stood on ground.
    pub air_time: u32,
    /// While positive, movement intent is ignored and no new attack starts.
    pub attack_lock: i32,
    /// While positive, incoming damage is ignored.
    pub invincibility: i32,
    /// Signed dash counter; the sign is the dash direction.
    pub dashing: i32,
    pub dash_cooldown: i32,
    pub dropping_through: i32,
    pub dead: bool,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(pos: Vec2, tuning: PlayerTuning) -> Self {
        Self {
            body: PhysicsBody::new(pos, Vec2::new(tuning.width, tuning.height)),
            action: ActionState::default(),
            hp: tuning.max_hp,
            mana: 0,
            jumps: tuning.max_jumps,
            wall_slide: false,
            air_time: 0,
            attack_lock: 0,
            invincibility: 0,
            dashing: 0,
            dash_cooldown: 0,
            dropping_through: 0,
            dead: false,
            tuning,
        }
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn max_hp(&self) -> i32 {
        self.tuning.max_hp
    }

    pub fn max_mana(&self) -> i32 {
        self.tuning.max_mana
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing != 0
    }

    /// Put the player at a level start with full health, no mana and no
    /// running timers.
    pub fn reset_for_level(&mut self, pos: Vec2) {
        *self = Self::new(pos, self.tuning);
    }

    // -- Damage --

    /// Apply damage unless invincible or already dead.
    /// Returns true only when this hit killed the player.
    pub fn take_damage(&mut self, amount: i32, effects: &mut EffectQueue) -> bool {
        if self.invincibility > 0 || self.dead {
            return false;
        }
        self.hp -= amount;
        self.invincibility = self.tuning.invincibility_ticks;
        effects.push(EffectRequest::burst(
            self.body.center(),
            self.tuning.hit_sparks,
            (2.0, 3.0),
        ));

        if self.hp <= 0 {
            self.hp = 0;
            self.die(effects);
            return true;
        }
        false
    }

    /// Lethal terrain: ignores invincibility.
    pub fn kill(&mut self, effects: &mut EffectQueue) -> bool {
        if self.dead {
            return false;
        }
        self.hp = 0;
        self.die(effects);
        true
    }

    fn die(&mut self, effects: &mut EffectQueue) {
        self.dead = true;
        effects.push(EffectRequest::burst(
            self.body.center(),
            self.tuning.death_sparks,
            (3.0, 4.0),
        ));
    }

    // -- Mana --

    /// Add mana up to the cap. Returns whether mana is now full.
    pub fn collect_mana(&mut self, amount: i32) -> bool {
        self.mana = (self.mana + amount).clamp(0, self.tuning.max_mana);
        self.mana >= self.tuning.max_mana
    }

    pub fn use_mana(&mut self, amount: i32) -> bool {
        if self.mana >= amount {
            self.mana -= amount;
            return true;
        }
        false
    }

    pub fn can_cast(&self, cost: i32) -> bool {
        self.mana >= cost
    }

    // -- Movement abilities --

    pub fn dash(&mut self) -> bool {
        if self.dash_cooldown > 0 || self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flip {
            -self.tuning.dash_ticks
        } else {
            self.tuning.dash_ticks
        };
        self.dash_cooldown = self.tuning.dash_cooldown;
        self.action.set(Action::Dash);
        true
    }

    /// Vertical jump, or a wall jump while sliding with input into the wall.
    pub fn jump(&mut self) -> bool {
        if self.attack_lock > 0 {
            return false;
        }

        if self.wall_slide {
            // Input must still press into the wall; the kick sends the body away from it.
            let pushing = self.body.last_movement.x;
            let away = if self.body.flip && pushing < 0.0 {
                self.tuning.wall_jump_velocity_x
            } else if !self.body.flip && pushing > 0.0 {
                -self.tuning.wall_jump_velocity_x
            } else {
                return false;
            };
            self.body.velocity = Vec2::new(away, self.tuning.wall_jump_velocity_y);
            self.air_time = self.tuning.jump_air_time;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }

        if self.jumps > 0 {
            self.body.velocity.y = self.tuning.jump_velocity;
            self.jumps -= 1;
            self.air_time = self.tuning.jump_air_time;
            return true;
        }
        false
    }

    // -- Attacks --

    pub fn basic_attack(&mut self, effects: &mut EffectQueue) -> Option<Projectile> {
        let attack = self.tuning.basic;
        self.cast(attack, ProjectileKind::PlayerBasic, effects)
    }

    pub fn strong_attack(&mut self, effects: &mut EffectQueue) -> Option<Projectile> {
        let attack = self.tuning.strong;
        self.cast(attack, ProjectileKind::PlayerStrong, effects)
    }

    fn cast(
        &mut self,
        attack: AttackTuning,
        kind: ProjectileKind,
        effects: &mut EffectQueue,
    ) -> Option<Projectile> {
        if self.attack_lock > 0 || !self.use_mana(attack.cost) {
            debug!("{:?} rejected (mana {}, lock {})", kind, self.mana, self.attack_lock);
            return None;
        }
        self.action.set(Action::Attack);

        let muzzle = self.body.muzzle(self.tuning.muzzle_offset);
        let speed = if self.body.flip { -attack.speed } else { attack.speed };
        effects.push(EffectRequest::facing_cone(
            muzzle,
            attack.sparks,
            self.body.flip,
            attack.spark_speed,
        ));
        self.attack_lock = self.tuning.attack_lock_ticks;
        Some(Projectile::new(muzzle, speed, attack.damage, kind))
    }

    /// Fizzle feedback for an attack the player could not afford.
    pub fn attack_fail(&mut self, effects: &mut EffectQueue) -> bool {
        if self.attack_lock > 0 {
            return false;
        }
        self.action.set(Action::AttackFail);
        effects.push(EffectRequest::burst(
            self.body.muzzle(self.tuning.muzzle_offset),
            self.tuning.fail_sparks,
            (0.5, 1.0),
        ));
        self.attack_lock = self.tuning.fail_lock_ticks;
        true
    }

    // -- Per tick --

    /// Advance one tick. `horizontal` is the movement intent; `drop` requests
    /// falling through a one-way platform underfoot.
    pub fn update<S: TileSurface + ?Sized>(
        &mut self,
        surface: &S,
        horizontal: f32,
        drop: bool,
        physics: &PhysicsTuning,
    ) {
        if self.dash_cooldown > 0 {
            self.dash_cooldown -= 1;
        }

        let mut movement = Vec2::new(horizontal, 0.0);
        if self.dashing != 0 {
            movement = Vec2::ZERO;
            let dir = self.dashing.signum() as f32;
            self.body.velocity.x = dir * self.tuning.dash_speed * self.dashing.abs() as f32
                / self.tuning.dash_divisor;
            self.dashing -= self.dashing.signum();
        }

        if self.dropping_through > 0 {
            self.dropping_through -= 1;
        }

        if drop && self.body.collisions.down && self.dropping_through == 0 {
            let rect = self.body.rect();
            let probe = Rect::new(
                Vec2::new(rect.left(), rect.bottom()),
                Vec2::new(rect.size.x, self.tuning.drop_probe_height),
            );
            let over_platform = surface
                .one_way_rects_near(self.body.pos)
                .iter()
                .any(|platform| probe.overlaps(platform));
            if over_platform {
                self.dropping_through = self.tuning.drop_through_ticks;
                self.body.pos.y += self.tuning.drop_through_nudge;
                self.body.velocity.y = self.tuning.drop_through_velocity;
            }
        }

        if self.attack_lock > 0 {
            movement = Vec2::ZERO;
        }

        self.body
            .advance(surface, movement, self.dropping_through > 0, physics);

        if self.invincibility > 0 {
            self.invincibility -= 1;
        }
        if self.attack_lock > 0 {
            self.attack_lock -= 1;
        }

        self.air_time += 1;
        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = self.tuning.max_jumps;
        }

        self.wall_slide = false;
        if self.body.collisions.side() && self.air_time > self.tuning.airborne_after {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(self.tuning.wall_slide_max_fall);
            self.body.flip = !self.body.collisions.right;
        }

        let pose = PlayerPose {
            attack_locked: self.attack_lock > 0,
            dashing: self.dashing != 0,
            wall_slide: self.wall_slide,
            airborne: self.air_time > self.tuning.airborne_after,
            moving: movement.x != 0.0,
        };
        let next = select_player_action(self.action.current(), pose);
        self.action.set(next);
        self.action.tick();

        let friction = self.tuning.friction;
        self.body.velocity.x = if self.body.velocity.x > 0.0 {
            (self.body.velocity.x - friction).max(0.0)
        } else {
            (self.body.velocity.x + friction).min(0.0)
        };
    }
}
