//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one step. Stage order matters:
//! steer, fire, integrate the ship, age bullets, spawn rocks, move and
//! cull rocks.

use glam::Vec2;

use super::collision::first_bullet_hit;
use super::state::{Bullet, Player, Team, World};
use crate::tuning::Tuning;
use crate::{wrap_angle, wrap_axis};

/// Input commands for a single tick (held-key levels, not edges)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust_forward: bool,
    pub thrust_back: bool,
    /// Fire continues every step while held and the cooldown allows
    pub fire: bool,
}

/// Wrap a position toroidally on both axes
#[inline]
pub fn wrap_position(pos: Vec2, extent: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(pos.x, extent.x), wrap_axis(pos.y, extent.y))
}

/// Advance the world by one fixed timestep
///
/// `extent` is the current screen size; wrapping always uses it, so a
/// resize takes effect on the next step.
pub fn tick(world: &mut World, input: &TickInput, extent: Vec2, dt: f32) {
    world.time_steps += 1;

    steer_ship(&mut world.player, input, &world.tuning, dt);

    if input.fire && world.player.shoot_cooldown <= 0.0 {
        world.player.shoot_cooldown = world.tuning.shoot_cooldown;
        let bullet = Bullet {
            pos: world.player.pos,
            vel: world.player.forward() * world.tuning.bullet_speed + world.player.vel,
            time: 0.0,
            team: Team::Player,
        };
        world.bullets.push(bullet);
    }

    integrate_ship(&mut world.player, &world.tuning, extent, dt);
    update_bullets(world, extent, dt);

    if world.rocks.len() < world.tuning.rock_cap {
        world.spawn_rock(extent);
    }
    update_rocks(world, extent, dt);
}

/// Turn, cool down the gun, and apply thrust
fn steer_ship(player: &mut Player, input: &TickInput, tuning: &Tuning, dt: f32) {
    if input.turn_left {
        player.rotation -= tuning.turn_rate * dt;
    }
    if input.turn_right {
        player.rotation += tuning.turn_rate * dt;
    }
    player.rotation = wrap_angle(player.rotation);

    player.shoot_cooldown = (player.shoot_cooldown - dt).max(0.0);

    let forward = player.forward();
    if input.thrust_forward {
        player.vel += forward * dt * tuning.thrust_accel;
    }
    if input.thrust_back {
        player.vel -= forward * dt * tuning.thrust_accel;
    }
}

/// Damp, move, and wrap the ship
fn integrate_ship(player: &mut Player, tuning: &Tuning, extent: Vec2, dt: f32) {
    player.vel *= tuning.damping;
    player.pos += player.vel * dt;
    player.pos = wrap_position(player.pos, extent);
}

/// Move and age bullets; expired ones are swap-removed
fn update_bullets(world: &mut World, extent: Vec2, dt: f32) {
    let max_time = world.tuning.bullet_max_time;
    // Back to front so swap_remove only moves already-visited bullets
    for i in (0..world.bullets.len()).rev() {
        let bullet = &mut world.bullets[i];
        bullet.pos += bullet.vel * dt;
        bullet.time += dt;
        if bullet.time >= max_time {
            world.bullets.swap_remove(i);
            continue;
        }
        bullet.pos = wrap_position(bullet.pos, extent);
    }
}

/// Move rocks and cull any within hit range of a bullet
fn update_rocks(world: &mut World, extent: Vec2, dt: f32) {
    let radius_sq = world.tuning.rock_hit_radius_sq();
    for i in (0..world.rocks.len()).rev() {
        let rock = &mut world.rocks[i];
        rock.pos += rock.vel * dt;
        rock.pos = wrap_position(rock.pos, extent);

        if first_bullet_hit(rock.pos, &world.bullets, radius_sq).is_some() {
            world.rocks.swap_remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::Rock;

    const EXTENT: Vec2 = Vec2::new(1280.0, 720.0);

    /// World that never spawns rocks, so ship/bullet tests stay isolated
    fn quiet_world() -> World {
        World::with_tuning(1, Tuning { rock_cap: 0, ..Tuning::default() })
    }

    #[test]
    fn test_zero_input_damps_velocity() {
        let mut world = quiet_world();
        world.player.vel = Vec2::new(100.0, -50.0);
        world.player.rotation = 1.0;

        let steps = 10;
        for _ in 0..steps {
            tick(&mut world, &TickInput::default(), EXTENT, SIM_DT);
        }

        let expected = Vec2::new(100.0, -50.0) * 0.99f32.powi(steps);
        assert!((world.player.vel - expected).length() < 1e-3);
        assert_eq!(world.player.rotation, 1.0);
        assert_eq!(world.time_steps, steps as u64);
    }

    #[test]
    fn test_forward_thrust_one_step() {
        let mut world = quiet_world();
        let input = TickInput {
            thrust_forward: true,
            ..Default::default()
        };
        tick(&mut world, &input, EXTENT, SIM_DT);

        let expected_vel = Vec2::new(256.0 * SIM_DT, 0.0) * 0.99;
        assert!((world.player.vel - expected_vel).length() < 1e-5);
        assert!((world.player.pos - expected_vel * SIM_DT).length() < 1e-5);
    }

    #[test]
    fn test_thrust_back_reverses() {
        let mut world = quiet_world();
        let input = TickInput {
            thrust_back: true,
            ..Default::default()
        };
        tick(&mut world, &input, EXTENT, SIM_DT);
        assert!(world.player.vel.x < 0.0);
        assert_eq!(world.player.vel.y, 0.0);
    }

    #[test]
    fn test_turning_wraps_and_cancels() {
        let mut world = quiet_world();
        let left = TickInput {
            turn_left: true,
            ..Default::default()
        };
        tick(&mut world, &left, EXTENT, SIM_DT);
        let expected = std::f32::consts::TAU - 4.0 * SIM_DT;
        assert!((world.player.rotation - expected).abs() < 1e-5);

        let both = TickInput {
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        let before = world.player.rotation;
        tick(&mut world, &both, EXTENT, SIM_DT);
        assert!((world.player.rotation - before).abs() < 1e-5);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut world = quiet_world();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        tick(&mut world, &fire, EXTENT, SIM_DT);
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.player.shoot_cooldown, 0.25);

        // 0.25 s is exactly 16 steps; the 16th step brings the cooldown to zero
        for _ in 0..15 {
            tick(&mut world, &fire, EXTENT, SIM_DT);
        }
        assert_eq!(world.bullets.len(), 1);

        tick(&mut world, &fire, EXTENT, SIM_DT);
        assert_eq!(world.bullets.len(), 2);
    }

    #[test]
    fn test_bullet_inherits_ship_velocity() {
        let mut world = quiet_world();
        world.player.vel = Vec2::new(0.0, 64.0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire, EXTENT, SIM_DT);

        let bullet = &world.bullets[0];
        assert_eq!(bullet.team, Team::Player);
        assert_eq!(bullet.vel, Vec2::new(512.0, 64.0));
        // Spawned at the pre-move ship position, then moved once this step
        assert!((bullet.pos - bullet.vel * SIM_DT).length() < 1e-4);
        assert_eq!(bullet.time, SIM_DT);
    }

    #[test]
    fn test_bullets_expire() {
        let mut world = quiet_world();
        world.bullets.push(Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            time: 2.0 - SIM_DT,
            team: Team::Player,
        });
        world.bullets.push(Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            time: 0.0,
            team: Team::Neutral,
        });
        tick(&mut world, &TickInput::default(), EXTENT, SIM_DT);
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.bullets[0].team, Team::Neutral);
    }

    #[test]
    fn test_rocks_spawn_one_per_step_up_to_cap() {
        let mut world = World::new(3);
        for step in 1..=15 {
            tick(&mut world, &TickInput::default(), EXTENT, SIM_DT);
            assert_eq!(world.rocks.len(), step.min(10));
        }
    }

    #[test]
    fn test_rock_hit_removes_rock_keeps_bullet() {
        let mut world = World::new(9);
        // Fill to the cap so no spawn happens this step
        for i in 0..10 {
            world.rocks.push(Rock {
                pos: Vec2::new(-600.0 + 100.0 * i as f32, 300.0),
                vel: Vec2::ZERO,
                rotation: 0.0,
            });
        }
        world.rocks[4].pos = Vec2::new(50.0, 50.0);
        world.bullets.push(Bullet {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            time: 0.0,
            team: Team::Player,
        });

        tick(&mut world, &TickInput::default(), EXTENT, SIM_DT);

        assert_eq!(world.rocks.len(), 9);
        assert_eq!(world.bullets.len(), 1);
        assert!(world
            .rocks
            .iter()
            .all(|r| r.pos.distance_squared(Vec2::new(50.0, 50.0)) >= 25.0));
    }

    #[test]
    fn test_swap_remove_visits_every_rock() {
        let mut world = World::new(11);
        // Every rock sits on a bullet: all must go in a single step
        for i in 0..10 {
            let pos = Vec2::new(20.0 * i as f32, 0.0);
            world.rocks.push(Rock {
                pos,
                vel: Vec2::ZERO,
                rotation: 0.0,
            });
            world.bullets.push(Bullet {
                pos,
                vel: Vec2::ZERO,
                time: 0.0,
                team: Team::Player,
            });
        }
        tick(&mut world, &TickInput::default(), EXTENT, SIM_DT);
        assert!(world.rocks.is_empty());
        assert_eq!(world.bullets.len(), 10);
    }

    #[test]
    fn test_ship_wraps_with_current_extent() {
        let mut world = quiet_world();
        world.player.pos = Vec2::new(399.0, 0.0);
        world.player.vel = Vec2::new(640.0, 0.0);

        // Smaller screen than the one the ship started on
        let small = Vec2::new(800.0, 600.0);
        tick(&mut world, &TickInput::default(), small, SIM_DT);
        assert!(world.player.pos.x < 0.0);
        assert!(world.player.pos.x >= -400.0);
    }

    #[test]
    fn test_restored_world_with_huge_rotation_keeps_ticking() {
        let mut world = quiet_world();
        world.player.rotation = 2.0e8;
        world.tuning.turn_rate = 1.0e12;
        let json = serde_json::to_string(&world).unwrap();
        let mut restored: World = serde_json::from_str(&json).unwrap();

        let input = TickInput {
            turn_right: true,
            ..TickInput::default()
        };
        tick(&mut restored, &input, EXTENT, SIM_DT);
        assert!((0.0..std::f32::consts::TAU).contains(&restored.player.rotation));
    }
}
