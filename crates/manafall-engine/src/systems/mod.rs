pub mod ai;
pub mod combat;
pub mod crumble;
pub mod effects;
pub mod pickups;
pub mod projectiles;
