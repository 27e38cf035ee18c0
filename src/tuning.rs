//! Data-driven game balance
//!
//! Every gameplay constant the tick reads. Defaults reproduce the classic
//! feel; a settings file can override any subset.

use serde::{Deserialize, Serialize};

/// Upper bound accepted for [`Tuning::rock_cap`]
pub const MAX_ROCK_CAP: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ship turn rate (radians/s)
    pub turn_rate: f32,
    /// Forward/back thrust acceleration (pixels/s²)
    pub thrust_accel: f32,
    /// Velocity multiplier applied once per fixed step
    pub damping: f32,
    /// Muzzle speed added to the ship velocity (pixels/s)
    pub bullet_speed: f32,
    /// Bullets are culled once they reach this age (seconds)
    pub bullet_max_time: f32,
    /// Delay between shots (seconds)
    pub shoot_cooldown: f32,
    /// Live rock cap; one rock spawns per step while below it
    pub rock_cap: usize,
    /// Per-axis rock speed bound (pixels/s)
    pub max_rock_speed: f32,
    /// A bullet closer than this destroys a rock (pixels)
    pub rock_hit_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            turn_rate: 4.0,
            thrust_accel: 256.0,
            damping: 0.99,
            bullet_speed: 512.0,
            bullet_max_time: 2.0,
            shoot_cooldown: 0.25,
            rock_cap: 10,
            max_rock_speed: 1.0,
            rock_hit_radius: 5.0,
        }
    }
}

impl Tuning {
    /// Squared hit radius, compared against squared distances
    pub fn rock_hit_radius_sq(&self) -> f32 {
        self.rock_hit_radius * self.rock_hit_radius
    }

    /// Replace values the tick cannot run with: non-finite floats fall back
    /// to their defaults and the rock cap is clamped to [`MAX_ROCK_CAP`]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            ("turn_rate", &mut self.turn_rate, defaults.turn_rate),
            ("thrust_accel", &mut self.thrust_accel, defaults.thrust_accel),
            ("damping", &mut self.damping, defaults.damping),
            ("bullet_speed", &mut self.bullet_speed, defaults.bullet_speed),
            ("bullet_max_time", &mut self.bullet_max_time, defaults.bullet_max_time),
            ("shoot_cooldown", &mut self.shoot_cooldown, defaults.shoot_cooldown),
            ("max_rock_speed", &mut self.max_rock_speed, defaults.max_rock_speed),
            ("rock_hit_radius", &mut self.rock_hit_radius, defaults.rock_hit_radius),
        ];
        for (name, value, default) in fields {
            if !value.is_finite() {
                log::warn!("tuning.{name} is {value}; using {default}");
                *value = default;
            }
        }

        if self.rock_cap > MAX_ROCK_CAP {
            log::warn!("tuning.rock_cap {} exceeds {MAX_ROCK_CAP}; clamping", self.rock_cap);
            self.rock_cap = MAX_ROCK_CAP;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let tuning: Tuning = serde_json::from_str(r#"{ "rock_cap": 3 }"#).unwrap();
        assert_eq!(tuning.rock_cap, 3);
        assert_eq!(tuning.bullet_speed, 512.0);
        assert_eq!(tuning.rock_hit_radius_sq(), 25.0);
    }

    #[test]
    fn test_sanitized_clamps_rock_cap() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "rock_cap": 18446744073709551615 }"#).unwrap();
        assert_eq!(tuning.sanitized().rock_cap, MAX_ROCK_CAP);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let tuning = Tuning {
            turn_rate: 1.0e30,
            rock_cap: 50,
            ..Tuning::default()
        };
        assert_eq!(tuning.clone().sanitized(), tuning);
    }

    #[test]
    fn test_sanitized_replaces_non_finite() {
        let tuning = Tuning {
            damping: f32::NAN,
            bullet_speed: f32::INFINITY,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning, Tuning::default());
    }
}
