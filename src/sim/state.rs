//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`World`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::{MAX_ROCK_CAP, Tuning};

/// Which side fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Player,
    Enemy,
    Neutral,
}

/// The player's ship
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians, always in [0, 2π)
    pub rotation: f32,
    /// Seconds until the next shot is allowed (never negative)
    pub shoot_cooldown: f32,
}

impl Player {
    /// Unit vector along the ship's heading
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }
}

/// A bullet entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds since spawn
    pub time: f32,
    pub team: Team,
}

/// A rock entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unused by the tick
    pub rotation: f32,
}

fn unseeded_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Seed the rock RNG was created from
    pub seed: u64,
    /// Fixed steps run since creation
    pub time_steps: u64,
    pub player: Player,
    /// Live bullets, unordered
    pub bullets: Vec<Bullet>,
    /// Live rocks, unordered
    pub rocks: Vec<Rock>,
    #[serde(default)]
    pub tuning: Tuning,
    /// Rock spawn RNG (restarts from seed 0 after deserialization)
    #[serde(skip, default = "unseeded_rng")]
    rng: Pcg32,
}

impl World {
    /// Create a new world with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            time_steps: 0,
            player: Player::default(),
            bullets: Vec::new(),
            rocks: Vec::with_capacity(tuning.rock_cap.min(MAX_ROCK_CAP)),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Spawn a rock somewhere inside a screen of `extent`, centred on the origin
    pub fn spawn_rock(&mut self, extent: Vec2) {
        let pos = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * extent.x,
            (self.rng.random::<f32>() - 0.5) * extent.y,
        );
        let dir = Vec2::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        );
        self.rocks.push(Rock {
            pos,
            vel: dir * self.tuning.max_rock_speed,
            rotation: 0.0,
        });
    }
}
