use manafall_engine::{
    ControlState, CrumbleField, EntityId, FrameBuffers, InputEvent, InputQueue, ProtocolLayout,
    SimConfig, SpawnMarker, TickClock, TileGrid, TileKind, Vec2, World,
};

/// Parse a host config. An empty string means defaults; malformed JSON is
/// logged and also falls back to defaults.
pub fn parse_config(json: &str) -> SimConfig {
    if json.trim().is_empty() {
        return SimConfig::default();
    }
    match SimConfig::from_json(json) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("invalid config, using defaults: {}", err);
            SimConfig::default()
        }
    }
}

/// Owns one simulation and everything the host loop needs around it:
/// the tile grid, crumbling blocks, keyboard state, the fixed-tick clock and
/// the frame buffers the host reads.
///
/// The web crate keeps one in a `thread_local!` and exports free functions
/// via `#[wasm_bindgen]`.
pub struct SimRunner {
    world: World,
    grid: TileGrid,
    crumble: CrumbleField,
    /// Grid edited by the host since the crumble field last synced.
    crumble_stale: bool,
    input: InputQueue,
    controls: ControlState,
    clock: TickClock,
    buffers: FrameBuffers,
}

impl SimRunner {
    pub fn new(config: SimConfig, width: u32, height: u32, tile_size: f32) -> Self {
        let clock = TickClock::from_rate(config.tick_rate, config.max_steps_per_frame);
        let controls = ControlState::new(config.keys);
        let buffers = FrameBuffers::new(ProtocolLayout::from_config(&config));
        Self {
            world: World::new(config),
            grid: TileGrid::new(width, height, tile_size),
            crumble: CrumbleField::default(),
            crumble_stale: false,
            input: InputQueue::new(),
            controls,
            clock,
            buffers,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    // ---- Level construction ----

    /// Start a fresh level: empty grid, empty roster, released keys.
    /// The host then sends tiles and markers.
    pub fn begin_level(&mut self) {
        self.world.begin_level();
        self.grid.clear();
        self.crumble = CrumbleField::default();
        self.crumble_stale = false;
        self.controls.release_all();
        log::info!("level reset");
    }

    pub fn set_tile(&mut self, x: i32, y: i32, code: u32) -> bool {
        let written = self.grid.set(x, y, TileKind::from_code(code));
        if !written {
            log::warn!("tile ({}, {}) outside {}x{} grid", x, y, self.grid.width, self.grid.height);
        }
        self.crumble_stale = true;
        written
    }

    pub fn spawn_marker(&mut self, variant: u32, x: f32, y: f32) -> Option<EntityId> {
        self.world.spawn_marker(SpawnMarker {
            variant,
            pos: Vec2::new(x, y),
        })
    }

    pub fn add_mana(&mut self, x: f32, y: f32, respawns: bool) {
        self.world.add_mana_pickup(Vec2::new(x, y), respawns);
    }

    pub fn add_goal(&mut self, x: f32, y: f32) {
        self.world.add_goal(Vec2::new(x, y));
    }

    // ---- Input ----

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Window lost focus: forget held keys so the player stops.
    pub fn release_keys(&mut self) {
        self.input.drain();
        self.controls.release_all();
    }

    // ---- Frame ----

    /// Run however many fixed ticks `dt` seconds cover, then serialize the frame.
    pub fn tick(&mut self, dt: f32) {
        if self.crumble_stale {
            self.crumble.sync(&self.grid);
            self.crumble_stale = false;
        }

        self.controls.apply_all(self.input.drain());

        let steps = self.clock.accumulate(dt);
        for _ in 0..steps {
            self.crumble.update(
                &mut self.grid,
                &self.world.player,
                &self.world.config().crumble,
            );
            let intents = self.controls.take_intents();
            self.world.tick(&self.grid, &intents);
        }

        let effects = self.world.drain_effects();
        let events = self.world.drain_events();
        self.buffers
            .write(&self.world, &self.grid, &self.crumble, &effects, &events);
    }

    // ---- Pointer accessors for host reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffers.ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.buffers.layout().buffer_total_floats as u32
    }

    pub fn actor_count(&self) -> u32 {
        self.buffers.actor_count() as u32
    }

    pub fn effect_count(&self) -> u32 {
        self.buffers.effect_count() as u32
    }

    pub fn event_count(&self) -> u32 {
        self.buffers.event_count() as u32
    }

    // ---- Capacity accessors ----

    pub fn max_actors(&self) -> u32 {
        self.buffers.layout().max_actors as u32
    }

    pub fn max_effects(&self) -> u32 {
        self.buffers.layout().max_effects as u32
    }

    pub fn max_events(&self) -> u32 {
        self.buffers.layout().max_events as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manafall_engine::bridge::protocol::{HEADER_ACTOR_COUNT, HEADER_FRAME_COUNTER};

    const FRAME: f32 = 1.0 / 60.0 + 1e-4;

    /// 20x12 level with a floor on row 10 and the player standing on it.
    fn level() -> SimRunner {
        let mut runner = SimRunner::new(SimConfig::default(), 20, 12, 16.0);
        runner.begin_level();
        for x in 0..20 {
            runner.set_tile(x, 10, 1);
        }
        runner.spawn_marker(0, 32.0, 144.0);
        runner
    }

    #[test]
    fn bad_config_falls_back_to_defaults() {
        assert_eq!(parse_config(""), SimConfig::default());
        assert_eq!(parse_config("{ not json"), SimConfig::default());
        assert_eq!(parse_config(r#"{ "seed": 3 }"#).seed, 3);
    }

    #[test]
    fn out_of_range_tiles_are_rejected() {
        let mut runner = level();
        assert!(!runner.set_tile(40, 0, 1));
        assert!(runner.set_tile(0, 0, 2));
        assert_eq!(runner.grid().get(0, 0), Some(TileKind::OneWay));
    }

    #[test]
    fn keys_drive_the_player() {
        let mut runner = level();
        runner.tick(FRAME);
        runner.push_input(InputEvent::KeyDown { key_code: 39 });
        for _ in 0..10 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.world().player.body.pos.x, 42.0);

        runner.push_input(InputEvent::KeyUp { key_code: 39 });
        runner.tick(FRAME);
        assert_eq!(runner.world().player.body.pos.x, 42.0);
    }

    #[test]
    fn press_survives_a_frame_without_ticks() {
        let mut runner = level();
        runner.tick(FRAME);
        runner.push_input(InputEvent::KeyDown { key_code: 38 });
        runner.tick(0.0);
        assert_eq!(runner.world().player.jumps, 2);
        runner.tick(FRAME);
        assert_eq!(runner.world().player.jumps, 1);
    }

    #[test]
    fn frame_buffers_follow_ticks() {
        let mut runner = level();
        runner.spawn_marker(1, 100.0, 148.0);
        runner.tick(FRAME);
        let header = runner.buffers.header();
        assert_eq!(header[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(header[HEADER_ACTOR_COUNT], 2.0);
        assert_eq!(runner.actor_count(), 2);
        assert_eq!(runner.max_actors(), 256);
    }

    #[test]
    fn crumbling_tiles_are_tracked_after_load() {
        let mut runner = level();
        runner.set_tile(5, 9, 4);
        runner.tick(FRAME);
        assert_eq!(runner.crumble.blocks().len(), 1);
        // The block is also a drawable actor.
        assert_eq!(runner.actor_count(), 2);
    }

    #[test]
    fn broken_block_reforms_after_a_mid_level_edit() {
        let mut runner = level();
        runner.set_tile(2, 10, 4);
        let mut broke = false;
        for _ in 0..200 {
            runner.tick(FRAME);
            if runner.grid().get(2, 10).is_none() {
                broke = true;
                break;
            }
        }
        assert!(broke);

        runner.set_tile(0, 0, 1);
        runner.tick(FRAME);
        assert_eq!(runner.crumble.blocks().len(), 1);
        for _ in 0..400 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.grid().get(2, 10), Some(TileKind::Crumbling));
    }
}
