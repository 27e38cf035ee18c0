//! Point-distance collision checks
//!
//! Rocks and bullets are points; a hit is a squared distance under the
//! squared hit radius. Brute force over every pair.

use glam::Vec2;

use super::state::Bullet;

/// Strict squared-distance proximity test
#[inline]
pub fn within_radius_sq(a: Vec2, b: Vec2, radius_sq: f32) -> bool {
    a.distance_squared(b) < radius_sq
}

/// Index of the first bullet within range of `point`, scanning in storage order
pub fn first_bullet_hit(point: Vec2, bullets: &[Bullet], radius_sq: f32) -> Option<usize> {
    bullets
        .iter()
        .position(|b| within_radius_sq(point, b.pos, radius_sq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Team;

    fn bullet_at(x: f32, y: f32) -> Bullet {
        Bullet {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            time: 0.0,
            team: Team::Player,
        }
    }

    #[test]
    fn test_within_radius_is_strict() {
        assert!(within_radius_sq(Vec2::ZERO, Vec2::new(4.9, 0.0), 25.0));
        assert!(!within_radius_sq(Vec2::ZERO, Vec2::new(5.0, 0.0), 25.0));
        assert!(within_radius_sq(Vec2::ONE, Vec2::ONE, 25.0));
    }

    #[test]
    fn test_first_bullet_hit() {
        let bullets = [bullet_at(100.0, 0.0), bullet_at(3.0, 3.0), bullet_at(1.0, 0.0)];
        assert_eq!(first_bullet_hit(Vec2::ZERO, &bullets, 25.0), Some(1));
        assert_eq!(first_bullet_hit(Vec2::new(-50.0, 0.0), &bullets, 25.0), None);
        assert_eq!(first_bullet_hit(Vec2::ZERO, &[], 25.0), None);
    }
}
