//! Water spray and paint drip particles
//!
//! Purely visual. Uses its own RNG so gameplay stays reproducible no matter
//! how many particles spawn.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::erosion::GraffitiColor;

pub const MAX_SPRAY: usize = 80;
pub const MAX_DRIPS: usize = 40;
const SPRAY_PER_TICK: usize = 3;
const DRIPS_PER_IMPACT: usize = 2;
const SPRAY_GRAVITY: f32 = 300.0;
const DRIP_GRAVITY: f32 = 150.0;

/// A water droplet around the impact point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SprayParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
}

impl SprayParticle {
    /// Fade factor 0..=1
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).max(0.0)
    }
}

/// A streak of dissolved paint running down the wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drip {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub length: f32,
    pub life: f32,
    pub color: GraffitiColor,
    pub alpha: f32,
}

impl Drip {
    pub fn current_alpha(&self) -> f32 {
        self.alpha.min(self.life / 1.5)
    }
}

/// All live water effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterFx {
    /// Cannon nozzle the stream starts from
    pub nozzle: Vec2,
    pub spray: Vec<SprayParticle>,
    pub drips: Vec<Drip>,
}

impl WaterFx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_nozzle(&mut self, nozzle: Vec2) {
        self.nozzle = nozzle;
    }

    /// Move particles and spawn spray at `aim` while firing
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, aim: Vec2, firing: bool, rng: &mut R) {
        for p in &mut self.spray {
            p.pos += p.vel * dt;
            p.vel.y += SPRAY_GRAVITY * dt;
            p.life -= dt;
        }
        self.spray.retain(|p| p.life > 0.0);

        for d in &mut self.drips {
            d.pos += d.vel * dt;
            d.vel.y += DRIP_GRAVITY * dt;
            d.life -= dt;
        }
        self.drips.retain(|d| d.life > 0.0);

        if !firing {
            return;
        }
        for _ in 0..SPRAY_PER_TICK {
            if self.spray.len() >= MAX_SPRAY {
                break;
            }
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 20.0;
            self.spray.push(SprayParticle {
                pos: aim + offset,
                vel: Vec2::new((rng.random::<f32>() - 0.5) * 150.0, -50.0 - rng.random::<f32>() * 100.0),
                radius: 1.0 + rng.random::<f32>() * 3.0,
                life: 0.3 + rng.random::<f32>() * 0.5,
                max_life: 0.8,
            });
        }
    }

    /// Paint runs down from an impact in the tile's color
    pub fn spawn_drips<R: Rng + ?Sized>(&mut self, pos: Vec2, color: GraffitiColor, rng: &mut R) {
        for _ in 0..DRIPS_PER_IMPACT {
            if self.drips.len() >= MAX_DRIPS {
                break;
            }
            self.drips.push(Drip {
                pos: Vec2::new(pos.x + (rng.random::<f32>() - 0.5) * 15.0, pos.y),
                vel: Vec2::new((rng.random::<f32>() - 0.5) * 8.0, 30.0 + rng.random::<f32>() * 80.0),
                width: 1.5 + rng.random::<f32>() * 2.5,
                length: 8.0 + rng.random::<f32>() * 16.0,
                life: 1.5 + rng.random::<f32>() * 2.0,
                color,
                alpha: 0.5 + rng.random::<f32>() * 0.3,
            });
        }
    }

    pub fn clear(&mut self) {
        self.spray.clear();
        self.drips.clear();
    }
}
