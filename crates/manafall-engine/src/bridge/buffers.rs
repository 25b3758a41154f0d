use bytemuck::{Pod, Zeroable};
use log::warn;

use crate::api::config::EnemyTuning;
use crate::api::types::WorldEvent;
use crate::api::world::World;
use crate::bridge::protocol::*;
use crate::components::enemy::Enemy;
use crate::components::player::Player;
use crate::components::projectile::Projectile;
use crate::components::tilemap::TileGrid;
use crate::core::geometry::Rect;
use crate::systems::crumble::{CrumbleField, CrumbleState};
use crate::systems::effects::EffectRequest;

/// One drawable thing in the actor section: player, enemy, projectile,
/// crumbling block, pickup or goal.
/// Must match the host reader: 16 floats = 64 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ActorRecord {
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// 1.0 when facing left.
    pub flip: f32,
    /// `Action::code()` for actors, `CrumbleState::code()` for blocks.
    pub action: f32,
    /// Ticks spent in the current action or block state.
    pub elapsed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub dash_cooldown: f32,
    /// 1.0 while damage is being ignored.
    pub invincible: f32,
    pub pad: [f32; 2],
}

impl ActorRecord {
    pub const FLOATS: usize = ACTOR_FLOATS;

    fn boxed(kind: f32, rect: Rect) -> Self {
        Self {
            kind,
            x: rect.pos.x,
            y: rect.pos.y,
            w: rect.size.x,
            h: rect.size.y,
            ..Default::default()
        }
    }

    pub fn player(player: &Player) -> Self {
        Self {
            flip: flag(player.body.flip),
            action: player.action.current().code() as f32,
            elapsed: player.action.elapsed() as f32,
            hp: player.hp as f32,
            max_hp: player.max_hp() as f32,
            mana: player.mana as f32,
            max_mana: player.max_mana() as f32,
            dash_cooldown: player.dash_cooldown as f32,
            invincible: flag(player.invincibility > 0),
            ..Self::boxed(ACTOR_KIND_PLAYER, player.rect())
        }
    }

    pub fn enemy(enemy: &Enemy, tuning: &EnemyTuning) -> Self {
        Self {
            flip: flag(enemy.body.flip),
            action: enemy.action.current().code() as f32,
            elapsed: enemy.action.elapsed() as f32,
            hp: enemy.health as f32,
            max_hp: enemy.kind.stats(tuning).health as f32,
            ..Self::boxed(enemy.kind.code() as f32, enemy.rect())
        }
    }

    pub fn projectile(projectile: &Projectile, hitbox: f32) -> Self {
        let kind = ACTOR_KIND_PROJECTILE_BASE + projectile.kind.code() as f32;
        Self {
            flip: flag(projectile.speed < 0.0),
            elapsed: projectile.age as f32,
            hp: projectile.damage as f32,
            ..Self::boxed(kind, projectile.hitbox(hitbox))
        }
    }

    pub fn crumble(rect: Rect, state: CrumbleState, timer: u32) -> Self {
        Self {
            action: state.code() as f32,
            elapsed: timer as f32,
            ..Self::boxed(ACTOR_KIND_CRUMBLE, rect)
        }
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// The flat f32 frame the host reads each frame.
pub struct FrameBuffers {
    layout: ProtocolLayout,
    data: Vec<f32>,
    frame: u64,
    actor_count: usize,
    effect_count: usize,
    event_count: usize,
}

impl FrameBuffers {
    pub fn new(layout: ProtocolLayout) -> Self {
        let mut buffers = Self {
            data: vec![0.0; layout.buffer_total_floats],
            layout,
            frame: 0,
            actor_count: 0,
            effect_count: 0,
            event_count: 0,
        };
        buffers.write_capacities();
        buffers
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    fn write_capacities(&mut self) {
        self.data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        self.data[HEADER_MAX_ACTORS] = self.layout.max_actors as f32;
        self.data[HEADER_MAX_EFFECTS] = self.layout.max_effects as f32;
        self.data[HEADER_MAX_EVENTS] = self.layout.max_events as f32;
    }

    /// Serialize one frame: world actors, crumbling blocks, and the effects
    /// and events drained since the last frame. Records past a section's
    /// capacity are dropped with a warning.
    pub fn write(
        &mut self,
        world: &World,
        grid: &TileGrid,
        crumble: &CrumbleField,
        effects: &[EffectRequest],
        events: &[WorldEvent],
    ) {
        self.frame += 1;
        self.actor_count = 0;
        self.effect_count = 0;
        self.event_count = 0;

        let config = world.config();
        let mut actors = Vec::with_capacity(1 + world.enemies.len() + world.projectiles.len());
        actors.push(ActorRecord::player(&world.player));
        actors.extend(
            world
                .enemies
                .iter()
                .map(|e| ActorRecord::enemy(e, &config.enemies)),
        );
        actors.extend(
            world
                .projectiles
                .iter()
                .map(|p| ActorRecord::projectile(p, config.projectiles.hitbox)),
        );
        actors.extend(crumble.blocks().iter().map(|b| {
            ActorRecord::crumble(grid.tile_rect(b.cell.0, b.cell.1), b.state, b.timer)
        }));
        actors.extend(
            world
                .pickups
                .available_mana()
                .map(|m| ActorRecord::boxed(ACTOR_KIND_MANA, m.rect)),
        );
        actors.extend(
            world
                .pickups
                .goals
                .iter()
                .map(|g| ActorRecord::boxed(ACTOR_KIND_GOAL, g.rect)),
        );

        let layout = &self.layout;
        self.actor_count = write_section(
            &mut self.data,
            layout.actor_data_offset,
            layout.max_actors,
            &actors,
            "actor",
        );
        let records: Vec<_> = effects.iter().map(EffectRequest::to_record).collect();
        self.effect_count = write_section(
            &mut self.data,
            layout.effect_data_offset,
            layout.max_effects,
            &records,
            "effect",
        );
        let records: Vec<_> = events.iter().map(WorldEvent::to_record).collect();
        self.event_count = write_section(
            &mut self.data,
            layout.event_data_offset,
            layout.max_events,
            &records,
            "event",
        );

        self.write_header(world, grid.tile_size);
    }

    fn write_header(&mut self, world: &World, tile_size: f32) {
        self.write_capacities();
        let (boss_hp, boss_max) = match world.boss() {
            Some(boss) => (
                boss.health as f32,
                boss.kind.stats(&world.config().enemies).health as f32,
            ),
            None => (-1.0, 0.0),
        };
        let header = &mut self.data[..HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = self.frame as f32;
        header[HEADER_ACTOR_COUNT] = self.actor_count as f32;
        header[HEADER_EFFECT_COUNT] = self.effect_count as f32;
        header[HEADER_EVENT_COUNT] = self.event_count as f32;
        header[HEADER_TICK_COUNT] = world.tick_count() as f32;
        header[HEADER_PLAYER_HP] = world.player.hp as f32;
        header[HEADER_PLAYER_MANA] = world.player.mana as f32;
        header[HEADER_PLAYER_DEAD] = flag(world.player.dead);
        header[HEADER_BOSS_HP] = boss_hp;
        header[HEADER_BOSS_MAX_HP] = boss_max;
        header[HEADER_LEVEL_COMPLETE] = flag(world.is_level_complete());
        header[HEADER_WORLD_TILE_SIZE] = tile_size;
    }

    // ---- Accessors for host reads ----

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn header(&self) -> &[f32] {
        &self.data[..HEADER_FLOATS]
    }

    pub fn actors(&self) -> &[ActorRecord] {
        let start = self.layout.actor_data_offset;
        let end = start + self.actor_count * ACTOR_FLOATS;
        bytemuck::cast_slice(&self.data[start..end])
    }

    pub fn actor_count(&self) -> usize {
        self.actor_count
    }

    pub fn effect_count(&self) -> usize {
        self.effect_count
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }
}

/// Copy `records` into the section at `offset`, up to `capacity`.
/// Returns how many were written.
fn write_section<T: Pod>(
    data: &mut [f32],
    offset: usize,
    capacity: usize,
    records: &[T],
    label: &str,
) -> usize {
    let count = records.len().min(capacity);
    if records.len() > capacity {
        warn!(
            "{} section full: dropped {} of {} records",
            label,
            records.len() - capacity,
            records.len()
        );
    }
    let floats: &[f32] = bytemuck::cast_slice(&records[..count]);
    data[offset..offset + floats.len()].copy_from_slice(floats);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SimConfig;
    use crate::api::types::EntityId;
    use crate::components::enemy::EnemyKind;
    use crate::components::tilemap::TileKind;
    use crate::systems::effects::EffectRecord;
    use glam::Vec2;

    fn small_layout() -> ProtocolLayout {
        ProtocolLayout::new(4, 2, 2)
    }

    fn world() -> World {
        let mut world = World::new(SimConfig::default());
        world.player.body.pos = Vec2::new(10.0, 20.0);
        world.player.mana = 40;
        world
    }

    #[test]
    fn actor_record_is_16_floats() {
        assert_eq!(std::mem::size_of::<ActorRecord>(), ACTOR_FLOATS * 4);
        assert_eq!(std::mem::size_of::<EffectRecord>(), EFFECT_FLOATS * 4);
    }

    #[test]
    fn new_buffer_carries_capacities() {
        let buffers = FrameBuffers::new(small_layout());
        assert_eq!(buffers.len(), small_layout().buffer_total_floats);
        assert_eq!(buffers.header()[HEADER_MAX_ACTORS], 4.0);
        assert_eq!(buffers.header()[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
    }

    #[test]
    fn writes_player_enemies_and_header() {
        let mut world = world();
        world.spawn_enemy(EnemyKind::DarkMage, Vec2::new(50.0, 0.0));
        let grid = TileGrid::new(4, 4, 16.0);
        let mut buffers = FrameBuffers::new(ProtocolLayout::from_config(world.config()));
        buffers.write(&world, &grid, &CrumbleField::default(), &[], &[]);

        assert_eq!(buffers.actor_count(), 2);
        let actors = buffers.actors();
        assert_eq!(actors[0].kind, ACTOR_KIND_PLAYER);
        assert_eq!((actors[0].x, actors[0].y, actors[0].w, actors[0].h), (10.0, 20.0, 8.0, 16.0));
        assert_eq!(actors[0].mana, 40.0);
        assert_eq!(actors[1].kind, EnemyKind::DarkMage.code() as f32);
        assert_eq!(actors[1].max_hp, 400.0);

        let header = buffers.header();
        assert_eq!(header[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(header[HEADER_ACTOR_COUNT], 2.0);
        assert_eq!(header[HEADER_BOSS_HP], 400.0);
        assert_eq!(header[HEADER_PLAYER_HP], 120.0);
        assert_eq!(header[HEADER_WORLD_TILE_SIZE], 16.0);
    }

    #[test]
    fn crumble_blocks_and_pickups_are_actors() {
        let mut world = world();
        world.add_mana_pickup(Vec2::new(64.0, 0.0), true);
        world.add_goal(Vec2::new(96.0, 0.0));
        let mut grid = TileGrid::new(4, 4, 16.0);
        grid.set(1, 2, Some(TileKind::Crumbling));
        let crumble = CrumbleField::from_grid(&grid);
        let mut buffers = FrameBuffers::new(ProtocolLayout::new(16, 4, 4));
        buffers.write(&world, &grid, &crumble, &[], &[]);

        let kinds: Vec<f32> = buffers.actors().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![ACTOR_KIND_PLAYER, ACTOR_KIND_CRUMBLE, ACTOR_KIND_MANA, ACTOR_KIND_GOAL]);
        let block = buffers.actors()[1];
        assert_eq!((block.x, block.y), (16.0, 32.0));
        assert_eq!(block.action, CrumbleState::Solid.code() as f32);
    }

    #[test]
    fn overflow_is_truncated() {
        let mut world = world();
        for i in 0..6 {
            world.spawn_enemy(EnemyKind::Slime, Vec2::new(i as f32 * 20.0, 0.0));
        }
        let effects = vec![EffectRequest::burst(Vec2::ZERO, 3, (1.0, 2.0)); 5];
        let events = vec![
            WorldEvent::PlayerDied,
            WorldEvent::GoalReached,
            WorldEvent::EnemyKilled { id: EntityId(3), kind: EnemyKind::Slime },
        ];
        let grid = TileGrid::new(4, 4, 16.0);
        let mut buffers = FrameBuffers::new(small_layout());
        buffers.write(&world, &grid, &CrumbleField::default(), &effects, &events);

        assert_eq!(buffers.actor_count(), 4);
        assert_eq!(buffers.effect_count(), 2);
        assert_eq!(buffers.event_count(), 2);
        assert_eq!(buffers.len(), small_layout().buffer_total_floats);

        let layout = small_layout();
        let data = buffers.as_slice();
        assert_eq!(data[layout.effect_data_offset + 3], 3.0);
        assert_eq!(data[layout.event_data_offset], WorldEvent::PlayerDied.code() as f32);
        assert_eq!(data[layout.event_data_offset + EVENT_FLOATS], WorldEvent::GoalReached.code() as f32);
    }

    #[test]
    fn counts_reset_each_frame() {
        let world = world();
        let grid = TileGrid::new(4, 4, 16.0);
        let mut buffers = FrameBuffers::new(small_layout());
        buffers.write(&world, &grid, &CrumbleField::default(), &[], &[WorldEvent::PlayerDied]);
        assert_eq!(buffers.event_count(), 1);
        buffers.write(&world, &grid, &CrumbleField::default(), &[], &[]);
        assert_eq!(buffers.event_count(), 0);
        assert_eq!(buffers.header()[HEADER_FRAME_COUNTER], 2.0);
        assert_eq!(buffers.header()[HEADER_BOSS_HP], -1.0);
    }
}
