//! Fire-and-forget visual effect requests.
//!
//! The simulation never owns particles. It only describes bursts (where, how many,
//! which directions, how fast) and the host's effects layer spawns and animates them.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Angular half-width of a directional spark cone, in radians.
pub const CONE_SPREAD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Short-lived streak (hits, deaths, muzzle flashes).
    Spark,
    /// Slow drifting mote (mana shimmer).
    Ambient,
}

impl EffectKind {
    pub fn code(self) -> u32 {
        match self {
            EffectKind::Spark => 0,
            EffectKind::Ambient => 1,
        }
    }
}

/// One burst of `count` effects. Each effect picks its angle and speed uniformly
/// from the given ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub count: u32,
    pub angle: (f32, f32),
    pub speed: (f32, f32),
}

impl EffectRequest {
    /// Sparks flying in every direction.
    pub fn burst(pos: Vec2, count: u32, speed: (f32, f32)) -> Self {
        Self {
            kind: EffectKind::Spark,
            pos,
            count,
            angle: (0.0, TAU),
            speed,
        }
    }

    /// Sparks in a cone around `base` radians.
    pub fn cone(pos: Vec2, count: u32, base: f32, speed: (f32, f32)) -> Self {
        Self {
            kind: EffectKind::Spark,
            pos,
            count,
            angle: (base - CONE_SPREAD, base + CONE_SPREAD),
            speed,
        }
    }

    /// Sparks in a cone pointing left (`true`) or right.
    pub fn facing_cone(pos: Vec2, count: u32, left: bool, speed: (f32, f32)) -> Self {
        Self::cone(pos, count, if left { PI } else { 0.0 }, speed)
    }

    /// Ambient motes drifting in every direction.
    pub fn ambient(pos: Vec2, count: u32, max_speed: f32) -> Self {
        Self {
            kind: EffectKind::Ambient,
            pos,
            count,
            angle: (0.0, TAU),
            speed: (0.0, max_speed),
        }
    }

    pub fn to_record(&self) -> EffectRecord {
        EffectRecord {
            kind: self.kind.code() as f32,
            x: self.pos.x,
            y: self.pos.y,
            count: self.count as f32,
            angle_min: self.angle.0,
            angle_max: self.angle.1,
            speed_min: self.speed.0,
            speed_max: self.speed.1,
        }
    }
}

/// Wire form of an `EffectRequest`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EffectRecord {
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub count: f32,
    pub angle_min: f32,
    pub angle_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl EffectRecord {
    pub const FLOATS: usize = 8;
}

/// Requests accumulated since the host last drained them.
#[derive(Debug, Default)]
pub struct EffectQueue {
    requests: Vec<EffectRequest>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self {
            requests: Vec::with_capacity(64),
        }
    }

    /// Queue a request. Empty bursts are dropped.
    pub fn push(&mut self, request: EffectRequest) {
        if request.count > 0 {
            self.requests.push(request);
        }
    }

    /// Take every pending request.
    pub fn drain(&mut self) -> Vec<EffectRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectRequest> {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Total number of individual effects across all pending requests.
    pub fn total_count(&self) -> u32 {
        self.requests.iter().map(|r| r.count).sum()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}
