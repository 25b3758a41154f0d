//! The simulation root: owns the player, the enemy roster, projectiles and
//! pickups, and runs one fixed tick at a time against a tile surface.

use glam::Vec2;
use log::{info, warn};

use crate::api::config::SimConfig;
use crate::api::types::{EntityId, WorldEvent};
use crate::components::enemy::{Enemy, EnemyKind};
use crate::components::player::Player;
use crate::components::tilemap::TileSurface;
use crate::core::rng::Rng;
use crate::input::controls::Intents;
use crate::systems::ai::{update_enemy, EnemyContext};
use crate::systems::combat::{apply_contact_damage, apply_hazards, sweep_dead_enemies};
use crate::systems::effects::{EffectQueue, EffectRequest};
use crate::systems::pickups::PickupField;
use crate::systems::projectiles::ProjectileSystem;

/// Marker variant for the player start.
pub const PLAYER_START: u32 = 0;

/// A level object placed by the host when a level loads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnMarker {
    /// 0 = player start, 1 = Slime, 2 = Flamemite, 3 = DarkMage.
    pub variant: u32,
    pub pos: Vec2,
}

pub struct World {
    config: SimConfig,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: ProjectileSystem,
    pub pickups: PickupField,
    /// Non-owning reference into `enemies`.
    boss: Option<EntityId>,
    effects: EffectQueue,
    events: Vec<WorldEvent>,
    rng: Rng,
    next_id: u32,
    death_timer: u32,
    restart_sent: bool,
    level_complete: bool,
    tick_count: u64,
}

impl World {
    pub fn new(config: SimConfig) -> Self {
        let player = Player::new(Vec2::ZERO, config.player);
        let rng = Rng::new(config.seed);
        Self {
            player,
            enemies: Vec::with_capacity(32),
            projectiles: ProjectileSystem::new(),
            pickups: PickupField::new(),
            boss: None,
            effects: EffectQueue::new(),
            events: Vec::with_capacity(config.buffers.max_events),
            rng,
            next_id: 1,
            death_timer: 0,
            restart_sent: false,
            level_complete: false,
            tick_count: 0,
            config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Clear every level object and reset the player at its current start.
    /// Enemy ids keep counting up so they are never reused.
    pub fn begin_level(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.boss = None;
        self.effects.clear();
        self.events.clear();
        let start = self.player.body.pos;
        self.player.reset_for_level(start);
        self.death_timer = 0;
        self.restart_sent = false;
        self.level_complete = false;
    }

    /// Place a level object. Returns the id of a spawned enemy.
    pub fn spawn_marker(&mut self, marker: SpawnMarker) -> Option<EntityId> {
        if marker.variant == PLAYER_START {
            self.player.reset_for_level(marker.pos);
            return None;
        }
        let Some(kind) = EnemyKind::from_marker(marker.variant) else {
            warn!("unknown spawn marker variant {} at {:?}", marker.variant, marker.pos);
            return None;
        };
        Some(self.spawn_enemy(kind, marker.pos))
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.enemies
            .push(Enemy::new(id, kind, pos, &self.config.enemies));
        if kind.is_boss() {
            if let Some(previous) = self.boss {
                warn!("boss {} replaced by {}", previous.0, id.0);
            }
            self.boss = Some(id);
        }
        id
    }

    pub fn add_mana_pickup(&mut self, pos: Vec2, respawns: bool) {
        self.pickups.add_mana(pos, respawns, &self.config.pickups);
    }

    pub fn add_goal(&mut self, pos: Vec2) {
        self.pickups.add_goal(pos, &self.config.pickups);
    }

    // -- Queries --

    pub fn boss_id(&self) -> Option<EntityId> {
        self.boss
    }

    pub fn boss(&self) -> Option<&Enemy> {
        let id = self.boss?;
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn effects(&self) -> &EffectQueue {
        &self.effects
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn drain_effects(&mut self) -> Vec<EffectRequest> {
        self.effects.drain()
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Tick --

    /// Run one fixed tick.
    ///
    /// Order: player abilities from intents, enemies (seeing the player where
    /// the previous tick left it), player movement, hazards and contact damage,
    /// pickups and goals, projectiles, dead-enemy removal, restart timer.
    pub fn tick(&mut self, surface: &dyn TileSurface, intents: &Intents) {
        if self.level_complete {
            return;
        }
        self.tick_count += 1;

        if !self.player.dead {
            self.apply_intents(intents);
        }

        let target = self.player.body.pos;
        let ctx = EnemyContext {
            surface,
            target,
            tuning: &self.config.enemies,
            physics: &self.config.physics,
        };
        for enemy in &mut self.enemies {
            if let Some(shot) = update_enemy(enemy, &ctx, &mut self.rng, &mut self.effects) {
                self.projectiles.spawn(shot);
            }
        }

        if !self.player.dead {
            self.player
                .update(surface, intents.horizontal, intents.drop, &self.config.physics);
            apply_hazards(&mut self.player, surface, &mut self.effects, &mut self.events);
            apply_contact_damage(
                &mut self.player,
                &self.enemies,
                self.config.player.contact_damage,
                &mut self.effects,
                &mut self.events,
            );
        }

        if !self.player.dead {
            self.pickups.update_mana(
                &mut self.player,
                &self.config.pickups,
                &mut self.rng,
                &mut self.effects,
                &mut self.events,
            );
            if self.pickups.check_goals(
                &self.player,
                &self.config.pickups,
                &mut self.effects,
                &mut self.events,
            ) {
                self.level_complete = true;
                info!("level complete after {} ticks", self.tick_count);
            }
        }

        self.projectiles.update(
            surface,
            &mut self.player,
            &mut self.enemies,
            &self.config.projectiles,
            &mut self.effects,
            &mut self.events,
        );
        sweep_dead_enemies(
            &mut self.enemies,
            &mut self.boss,
            &self.config.enemies,
            &mut self.effects,
            &mut self.events,
        );

        self.tick_restart_timer();
    }

    fn apply_intents(&mut self, intents: &Intents) {
        if intents.dash {
            self.player.dash();
        }
        if intents.jump {
            self.player.jump();
        }
        if intents.basic_attack {
            match self.player.basic_attack(&mut self.effects) {
                Some(shot) => self.projectiles.spawn(shot),
                None => {
                    self.player.attack_fail(&mut self.effects);
                }
            }
        }
        if intents.strong_attack {
            match self.player.strong_attack(&mut self.effects) {
                Some(shot) => self.projectiles.spawn(shot),
                None => {
                    self.player.attack_fail(&mut self.effects);
                }
            }
        }
    }

    fn tick_restart_timer(&mut self) {
        if !self.player.dead || self.restart_sent {
            return;
        }
        self.death_timer += 1;
        if self.death_timer > self.config.player.restart_delay {
            self.restart_sent = true;
            info!("restart due");
            self.events.push(WorldEvent::RestartDue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::PickupTuning;
    use crate::components::action::Action;
    use crate::components::tilemap::{TileGrid, TileKind};

    /// 40x15 grid with a floor on row 12 (top y = 192).
    fn arena() -> TileGrid {
        let mut grid = TileGrid::new(40, 15, 16.0);
        grid.fill_rect(0, 12, 40, 1, Some(TileKind::Solid));
        grid
    }

    /// Quiet config: enemies never start wandering, pickups never shimmer.
    fn quiet_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.enemies.wander_chance = 0.0;
        config.pickups = PickupTuning {
            shimmer_chance: 0.0,
            ..Default::default()
        };
        config
    }

    fn world_with_player(x: f32) -> World {
        let mut world = World::new(quiet_config());
        world.spawn_marker(SpawnMarker {
            variant: PLAYER_START,
            pos: Vec2::new(x, 176.0),
        });
        world
    }

    fn idle() -> Intents {
        Intents::default()
    }

    fn run(world: &mut World, grid: &TileGrid, ticks: u32) {
        for _ in 0..ticks {
            world.tick(grid, &idle());
        }
    }

    #[test]
    fn markers_populate_roster_and_boss() {
        let mut world = World::new(quiet_config());
        assert_eq!(
            world.spawn_marker(SpawnMarker { variant: 0, pos: Vec2::new(10.0, 20.0) }),
            None
        );
        assert_eq!(world.player.body.pos, Vec2::new(10.0, 20.0));

        let slime = world.spawn_marker(SpawnMarker { variant: 1, pos: Vec2::ZERO });
        let mage = world.spawn_marker(SpawnMarker { variant: 3, pos: Vec2::new(100.0, 0.0) });
        assert_eq!(world.spawn_marker(SpawnMarker { variant: 9, pos: Vec2::ZERO }), None);

        assert_eq!(world.enemies.len(), 2);
        assert_ne!(slime, mage);
        assert_eq!(world.boss_id(), mage);
        assert_eq!(world.boss().map(|b| b.health), Some(400));
        assert_eq!(world.enemy(slime.unwrap()).map(|e| e.rect().size), Some(Vec2::new(16.0, 12.0)));
    }

    #[test]
    fn begin_level_clears_and_never_reuses_ids() {
        let mut world = world_with_player(32.0);
        let first = world.spawn_enemy(EnemyKind::DarkMage, Vec2::ZERO);
        world.add_goal(Vec2::new(300.0, 0.0));
        world.player.mana = 80;
        world.player.hp = 5;
        world.begin_level();

        assert!(world.enemies.is_empty());
        assert!(world.pickups.goals.is_empty());
        assert_eq!(world.boss_id(), None);
        assert_eq!(world.player.hp, 120);
        assert_eq!(world.player.mana, 0);
        assert_eq!(world.player.body.pos, Vec2::new(32.0, 176.0));

        let second = world.spawn_enemy(EnemyKind::Slime, Vec2::ZERO);
        assert!(second.0 > first.0);
    }

    #[test]
    fn player_walks_on_the_floor() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        run(&mut world, &grid, 5);
        let right = Intents {
            horizontal: 1.0,
            ..Default::default()
        };
        for _ in 0..20 {
            world.tick(&grid, &right);
        }
        assert_eq!(world.player.body.pos.x, 52.0);
        assert_eq!(world.player.rect().bottom(), 192.0);
        assert_eq!(world.player.action.current(), Action::Run);
    }

    #[test]
    fn failed_attack_takes_fail_path() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        world.player.mana = 15;
        let attack = Intents {
            basic_attack: true,
            ..Default::default()
        };
        world.tick(&grid, &attack);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.player.mana, 15);
        assert_eq!(world.player.action.current(), Action::AttackFail);
        // Lock set to 24, then decremented once by the player update.
        assert_eq!(world.player.attack_lock, 23);
    }

    #[test]
    fn basic_attack_kills_slime_and_logs_events() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        let slime = world.spawn_enemy(EnemyKind::Slime, Vec2::new(60.0, 180.0));
        world.player.mana = 40;
        run(&mut world, &grid, 3);
        world.drain_effects();

        let attack = Intents {
            basic_attack: true,
            ..Default::default()
        };
        world.tick(&grid, &attack);
        assert_eq!(world.player.mana, 20);
        assert_eq!(world.projectiles.len(), 1);

        // Muzzle at x = 43, slime box starts at 60: hit within 20 ticks.
        run(&mut world, &grid, 20);
        assert!(world.projectiles.is_empty());
        assert!(world.enemies.is_empty());
        assert!(world
            .drain_events()
            .contains(&WorldEvent::EnemyKilled { id: slime, kind: EnemyKind::Slime }));
    }

    #[test]
    fn boss_defeat_clears_reference() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        let mage = world.spawn_enemy(EnemyKind::DarkMage, Vec2::new(60.0, 176.0));
        if let Some(enemy) = world.enemies.iter_mut().find(|e| e.id == mage) {
            enemy.health = 10;
        }
        world.player.mana = 20;
        world.tick(
            &grid,
            &Intents {
                basic_attack: true,
                ..Default::default()
            },
        );
        run(&mut world, &grid, 20);
        assert_eq!(world.boss_id(), None);
        assert!(world.boss().is_none());
        assert!(world.events().contains(&WorldEvent::BossDefeated));
    }

    #[test]
    fn contact_damage_then_invincibility() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        world.spawn_enemy(EnemyKind::Slime, Vec2::new(30.0, 180.0));
        run(&mut world, &grid, 30);
        assert_eq!(world.player.hp, 110);
        run(&mut world, &grid, 40);
        assert_eq!(world.player.hp, 100);
    }

    #[test]
    fn hazard_death_then_restart_event_once() {
        let mut grid = arena();
        grid.set(2, 11, Some(TileKind::Hazard));
        let mut world = world_with_player(36.0);
        world.tick(&grid, &idle());
        assert!(world.player.dead);
        assert_eq!(world.drain_events(), vec![WorldEvent::PlayerDied]);

        run(&mut world, &grid, 89);
        assert!(world.events().is_empty());
        run(&mut world, &grid, 1);
        assert_eq!(world.drain_events(), vec![WorldEvent::RestartDue]);
        run(&mut world, &grid, 200);
        assert!(world.events().is_empty());
    }

    #[test]
    fn dead_player_ignores_intents() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        world.player.mana = 100;
        world.player.kill(&mut EffectQueue::new());
        world.tick(
            &grid,
            &Intents {
                basic_attack: true,
                jump: true,
                ..Default::default()
            },
        );
        assert!(world.projectiles.is_empty());
        assert_eq!(world.player.mana, 100);
    }

    #[test]
    fn goal_completes_level_and_freezes_simulation() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        world.add_goal(Vec2::new(30.0, 176.0));
        world.tick(&grid, &idle());
        assert!(world.is_level_complete());
        assert!(world.drain_events().contains(&WorldEvent::GoalReached));

        let ticks = world.tick_count();
        let pos = world.player.body.pos;
        run(&mut world, &grid, 10);
        assert_eq!(world.tick_count(), ticks);
        assert_eq!(world.player.body.pos, pos);
        assert!(world.events().is_empty());

        world.begin_level();
        assert!(!world.is_level_complete());
    }

    #[test]
    fn mana_pickup_collected_through_tick() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        world.add_mana_pickup(Vec2::new(30.0, 176.0), false);
        world.tick(&grid, &idle());
        assert_eq!(world.player.mana, 20);
        assert!(world.pickups.mana.is_empty());
        assert_eq!(
            world.drain_events(),
            vec![WorldEvent::ManaCollected { mana: 20, full: false }]
        );
    }

    #[test]
    fn flamemite_shoots_player_in_range() {
        let grid = arena();
        let mut world = world_with_player(32.0);
        let id = world.spawn_enemy(EnemyKind::Flamemite, Vec2::new(100.0, 179.0));
        run(&mut world, &grid, 3);
        // Force the end of a walking burst on the next tick.
        if let Some(enemy) = world.enemies.iter_mut().find(|e| e.id == id) {
            enemy.walking = 1;
        }
        world.tick(&grid, &idle());
        assert_eq!(world.projectiles.len(), 1);
        let shot = world.projectiles.iter().next().map(|p| p.speed);
        assert_eq!(shot, Some(-2.0));
    }
}
