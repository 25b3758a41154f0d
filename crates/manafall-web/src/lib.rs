pub mod runner;

use std::cell::RefCell;

use manafall_engine::InputEvent;
use wasm_bindgen::prelude::*;

pub use runner::{parse_config, SimRunner};

thread_local! {
    static RUNNER: RefCell<Option<SimRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut SimRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Simulation not initialized. Call sim_init() first.");
        f(runner)
    })
}

/// Create the simulation. `config_json` may be empty for defaults; the grid
/// is `width` x `height` tiles of `tile_size` world units.
#[wasm_bindgen]
pub fn sim_init(config_json: &str, width: u32, height: u32, tile_size: f32) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = parse_config(config_json);
    let runner = SimRunner::new(config, width, height, tile_size);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("manafall: initialized ({}x{} tiles)", width, height);
}

#[wasm_bindgen]
pub fn sim_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Level construction ----

#[wasm_bindgen]
pub fn sim_begin_level() {
    with_runner(|r| r.begin_level());
}

#[wasm_bindgen]
pub fn sim_set_tile(x: i32, y: i32, code: u32) -> bool {
    with_runner(|r| r.set_tile(x, y, code))
}

/// Returns the spawned enemy id, or 0 for the player start and unknown markers.
#[wasm_bindgen]
pub fn sim_spawn_marker(variant: u32, x: f32, y: f32) -> u32 {
    with_runner(|r| r.spawn_marker(variant, x, y).map_or(0, |id| id.0))
}

#[wasm_bindgen]
pub fn sim_add_mana(x: f32, y: f32, respawns: bool) {
    with_runner(|r| r.add_mana(x, y, respawns));
}

#[wasm_bindgen]
pub fn sim_add_goal(x: f32, y: f32) {
    with_runner(|r| r.add_goal(x, y));
}

// ---- Input ----

#[wasm_bindgen]
pub fn sim_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn sim_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

#[wasm_bindgen]
pub fn sim_release_keys() {
    with_runner(|r| r.release_keys());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats())
}

#[wasm_bindgen]
pub fn get_actor_count() -> u32 {
    with_runner(|r| r.actor_count())
}

#[wasm_bindgen]
pub fn get_effect_count() -> u32 {
    with_runner(|r| r.effect_count())
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.event_count())
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_actors() -> u32 {
    with_runner(|r| r.max_actors())
}

#[wasm_bindgen]
pub fn get_max_effects() -> u32 {
    with_runner(|r| r.max_effects())
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events())
}
