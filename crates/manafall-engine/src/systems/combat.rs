//! Damage application and death handling shared by the contact, hazard and
//! projectile passes.

use log::info;

use crate::api::config::EnemyTuning;
use crate::api::types::{EntityId, WorldEvent};
use crate::components::enemy::Enemy;
use crate::components::player::Player;
use crate::components::tilemap::TileSurface;
use crate::systems::effects::{EffectQueue, EffectRequest};

/// Damage the player through the invincibility gate and report what happened.
/// Returns true when the hit was fatal.
pub fn damage_player(
    player: &mut Player,
    amount: i32,
    effects: &mut EffectQueue,
    events: &mut Vec<WorldEvent>,
) -> bool {
    let before = player.hp;
    let died = player.take_damage(amount, effects);
    if player.hp != before {
        events.push(WorldEvent::PlayerDamaged { hp: player.hp });
    }
    if died {
        info!("player died");
        events.push(WorldEvent::PlayerDied);
    }
    died
}

/// Lethal terrain under the player's center kills outright.
pub fn apply_hazards(
    player: &mut Player,
    surface: &dyn TileSurface,
    effects: &mut EffectQueue,
    events: &mut Vec<WorldEvent>,
) -> bool {
    if player.dead || !surface.is_hazard_at(player.body.center()) {
        return false;
    }
    player.kill(effects);
    info!("player died on hazard");
    events.push(WorldEvent::PlayerDied);
    true
}

/// Touching a live enemy hurts unless the player is dashing.
pub fn apply_contact_damage(
    player: &mut Player,
    enemies: &[Enemy],
    damage: i32,
    effects: &mut EffectQueue,
    events: &mut Vec<WorldEvent>,
) {
    if player.is_dashing() {
        return;
    }
    let rect = player.rect();
    for enemy in enemies.iter().filter(|e| e.is_alive()) {
        if rect.overlaps(&enemy.rect()) {
            damage_player(player, damage, effects, events);
        }
    }
}

/// Remove every enemy whose health dropped to zero this tick.
///
/// Runs after the projectile pass so removal never disturbs an iteration in
/// progress. Clears the boss reference when the boss dies.
pub fn sweep_dead_enemies(
    enemies: &mut Vec<Enemy>,
    boss: &mut Option<EntityId>,
    tuning: &EnemyTuning,
    effects: &mut EffectQueue,
    events: &mut Vec<WorldEvent>,
) -> usize {
    let before = enemies.len();
    enemies.retain(|enemy| {
        if enemy.is_alive() {
            return true;
        }
        enemy.kind.behavior().on_death(enemy, tuning, effects);
        effects.push(EffectRequest::burst(
            enemy.body.center(),
            tuning.kill_sparks,
            (2.0, 3.0),
        ));
        info!("{:?} {} killed", enemy.kind, enemy.id.0);
        events.push(WorldEvent::EnemyKilled {
            id: enemy.id,
            kind: enemy.kind,
        });
        if *boss == Some(enemy.id) {
            *boss = None;
            info!("boss defeated");
            events.push(WorldEvent::BossDefeated);
        }
        false
    });
    before - enemies.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::PlayerTuning;
    use crate::components::enemy::EnemyKind;
    use crate::components::tilemap::{TileGrid, TileKind};
    use glam::Vec2;

    fn player_at(pos: Vec2) -> Player {
        Player::new(pos, PlayerTuning::default())
    }

    fn enemy_at(id: u32, kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy::new(EntityId(id), kind, pos, &EnemyTuning::default())
    }

    #[test]
    fn damage_reports_hp_and_death() {
        let mut p = player_at(Vec2::ZERO);
        let mut fx = EffectQueue::new();
        let mut events = Vec::new();
        assert!(!damage_player(&mut p, 30, &mut fx, &mut events));
        assert_eq!(events, vec![WorldEvent::PlayerDamaged { hp: 90 }]);

        // Invincible: no event.
        damage_player(&mut p, 30, &mut fx, &mut events);
        assert_eq!(events.len(), 1);

        p.invincibility = 0;
        assert!(damage_player(&mut p, 500, &mut fx, &mut events));
        assert_eq!(events[1], WorldEvent::PlayerDamaged { hp: 0 });
        assert_eq!(events[2], WorldEvent::PlayerDied);
    }

    #[test]
    fn hazard_kills_through_invincibility() {
        let mut grid = TileGrid::new(10, 10, 16.0);
        grid.set(1, 1, Some(TileKind::Hazard));
        let mut p = player_at(Vec2::new(20.0, 16.0));
        p.invincibility = 60;
        let mut fx = EffectQueue::new();
        let mut events = Vec::new();
        assert!(apply_hazards(&mut p, &grid, &mut fx, &mut events));
        assert!(p.dead);
        assert_eq!(events, vec![WorldEvent::PlayerDied]);
        assert!(!apply_hazards(&mut p, &grid, &mut fx, &mut events));
    }

    #[test]
    fn contact_damage_skipped_while_dashing() {
        let mut p = player_at(Vec2::new(10.0, 10.0));
        let enemies = vec![enemy_at(1, EnemyKind::Slime, Vec2::new(12.0, 12.0))];
        let mut fx = EffectQueue::new();
        let mut events = Vec::new();

        p.dashing = 30;
        apply_contact_damage(&mut p, &enemies, 10, &mut fx, &mut events);
        assert_eq!(p.hp, 120);

        p.dashing = 0;
        apply_contact_damage(&mut p, &enemies, 10, &mut fx, &mut events);
        assert_eq!(p.hp, 110);
    }

    #[test]
    fn overlapping_enemies_only_hurt_once_per_window() {
        let mut p = player_at(Vec2::new(10.0, 10.0));
        let enemies = vec![
            enemy_at(1, EnemyKind::Slime, Vec2::new(12.0, 12.0)),
            enemy_at(2, EnemyKind::Flamemite, Vec2::new(8.0, 12.0)),
        ];
        let mut fx = EffectQueue::new();
        let mut events = Vec::new();
        apply_contact_damage(&mut p, &enemies, 10, &mut fx, &mut events);
        assert_eq!(p.hp, 110);
    }

    #[test]
    fn sweep_removes_dead_and_clears_boss() {
        let tuning = EnemyTuning::default();
        let mut enemies = vec![
            enemy_at(1, EnemyKind::Slime, Vec2::ZERO),
            enemy_at(2, EnemyKind::DarkMage, Vec2::new(50.0, 0.0)),
            enemy_at(3, EnemyKind::Flamemite, Vec2::new(90.0, 0.0)),
        ];
        let mut boss = Some(EntityId(2));
        enemies[1].health = -10;
        enemies[2].health = 0;
        let mut fx = EffectQueue::new();
        let mut events = Vec::new();

        let removed = sweep_dead_enemies(&mut enemies, &mut boss, &tuning, &mut fx, &mut events);
        assert_eq!(removed, 2);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, EntityId(1));
        assert_eq!(boss, None);
        assert!(events.contains(&WorldEvent::BossDefeated));
        // 40 + 20 for the mage, 25 + 20 for the flamemite.
        assert_eq!(fx.total_count(), 105);
    }
}
