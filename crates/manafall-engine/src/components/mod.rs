pub mod action;
pub mod body;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod tilemap;
