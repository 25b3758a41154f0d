/// Frame buffer layout shared with the host.
/// Must stay in sync with the host-side reader.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Actors: max_actors × 16 floats]
/// [Effects: max_effects × 8 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame so the host can
/// compute offsets without a second channel.

use crate::api::config::SimConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_ACTORS: usize = 2;
pub const HEADER_ACTOR_COUNT: usize = 3;
pub const HEADER_MAX_EFFECTS: usize = 4;
pub const HEADER_EFFECT_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_TICK_COUNT: usize = 8;
pub const HEADER_PLAYER_HP: usize = 9;
pub const HEADER_PLAYER_MANA: usize = 10;
pub const HEADER_PLAYER_DEAD: usize = 11;
/// -1 when the level has no living boss.
pub const HEADER_BOSS_HP: usize = 12;
pub const HEADER_BOSS_MAX_HP: usize = 13;
pub const HEADER_LEVEL_COMPLETE: usize = 14;
pub const HEADER_WORLD_TILE_SIZE: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per actor record (wire format, never changes).
pub const ACTOR_FLOATS: usize = 16;

/// Floats per effect request: kind, x, y, count, angle min/max, speed min/max.
pub const EFFECT_FLOATS: usize = 8;

/// Floats per world event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Actor kind codes. Enemies use their spawn-marker codes (1..=3).
pub const ACTOR_KIND_PLAYER: f32 = 0.0;
/// Projectiles are `ACTOR_KIND_PROJECTILE_BASE + ProjectileKind::code()`.
pub const ACTOR_KIND_PROJECTILE_BASE: f32 = 10.0;
pub const ACTOR_KIND_CRUMBLE: f32 = 20.0;
pub const ACTOR_KIND_MANA: f32 = 30.0;
pub const ACTOR_KIND_GOAL: f32 = 31.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_actors: usize,
    pub max_effects: usize,
    pub max_events: usize,

    /// Size of each section in floats.
    pub actor_data_floats: usize,
    pub effect_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where each section begins.
    pub actor_data_offset: usize,
    pub effect_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_actors: usize, max_effects: usize, max_events: usize) -> Self {
        let actor_data_floats = max_actors * ACTOR_FLOATS;
        let effect_data_floats = max_effects * EFFECT_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let actor_data_offset = HEADER_FLOATS;
        let effect_data_offset = actor_data_offset + actor_data_floats;
        let event_data_offset = effect_data_offset + effect_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_actors,
            max_effects,
            max_events,
            actor_data_floats,
            effect_data_floats,
            event_data_floats,
            actor_data_offset,
            effect_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.buffers.max_actors,
            config.buffers.max_effects,
            config.buffers.max_events,
        )
    }
}
