pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use glam::Vec2;
pub use api::config::{
    AttackTuning, BufferCapacity, CrumbleTuning, EnemyStats, EnemyTuning, PhysicsTuning,
    PickupTuning, PlayerTuning, ProjectileTuning, SimConfig,
};
pub use api::types::{EntityId, EventRecord, WorldEvent};
pub use api::world::{SpawnMarker, World, PLAYER_START};
pub use components::action::{Action, ActionState};
pub use components::body::{Collisions, PhysicsBody};
pub use components::enemy::{Enemy, EnemyKind};
pub use components::player::Player;
pub use components::projectile::{Projectile, ProjectileKind};
pub use components::tilemap::{TileGrid, TileKind, TileSurface};
pub use core::geometry::Rect;
pub use core::rng::Rng;
pub use core::time::TickClock;
pub use systems::ai::EnemyBehavior;
pub use systems::crumble::{CrumbleField, CrumbleState};
pub use systems::effects::{EffectKind, EffectQueue, EffectRecord, EffectRequest};
pub use systems::pickups::{Goal, ManaPickup, PickupField};
pub use systems::projectiles::{Impact, ProjectileSystem};
pub use input::controls::{ControlState, Intents, KeyBindings};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::buffers::{ActorRecord, FrameBuffers};
