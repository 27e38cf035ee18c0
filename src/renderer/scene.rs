//! Scene assembly: turns the world into one triangle list per frame
//!
//! World origin is the screen centre; everything is drawn in pixels.
//! Draw order is the layering: grid, ship, bullets, rocks, overlay.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{Player, World};

/// HUD values that live outside the world
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay {
    /// Frames per second, if shown
    pub fps: Option<u32>,
    /// Draw the ship position readout
    pub show_position: bool,
}

/// World position to pixel position
#[inline]
pub fn world_to_screen(pos: Vec2, extent: Vec2) -> Vec2 {
    pos + extent * 0.5
}

/// Pixel x/y of the interior grid lines for one axis
pub fn grid_lines(extent_px: u32, lines: u32) -> impl Iterator<Item = u32> {
    (1..=lines).map(move |i| extent_px * i / (lines + 1))
}

/// Ship triangle corners in pixels
pub fn ship_corners(player: &Player, extent: Vec2) -> [Vec2; 3] {
    let rotation = Vec2::from_angle(player.rotation);
    let center = world_to_screen(player.pos, extent);
    [
        Vec2::new(1.0, 0.0),
        Vec2::new(-0.5, 0.5),
        Vec2::new(-0.5, -0.5),
    ]
    .map(|corner| rotation.rotate(corner) * SHIP_SCALE + center)
}

/// Build the frame's vertices in pixel space
pub fn build_frame(world: &World, size: (u32, u32), overlay: &Overlay) -> Vec<Vertex> {
    let (width, height) = size;
    let extent = Vec2::new(width as f32, height as f32);
    let mut vertices = Vec::with_capacity(
        ((GRID_VERTICAL_LINES + GRID_HORIZONTAL_LINES) as usize + world.bullets.len() + world.rocks.len())
            * 6
            + 256,
    );

    for x in grid_lines(width, GRID_VERTICAL_LINES) {
        shapes::rect(
            &mut vertices,
            Vec2::new(x as f32, 0.0),
            Vec2::new(LINE_WIDTH, extent.y),
            colors::GRID,
        );
    }
    for y in grid_lines(height, GRID_HORIZONTAL_LINES) {
        shapes::rect(
            &mut vertices,
            Vec2::new(0.0, y as f32),
            Vec2::new(extent.x, LINE_WIDTH),
            colors::GRID,
        );
    }

    shapes::triangle_outline(
        &mut vertices,
        ship_corners(&world.player, extent),
        LINE_WIDTH,
        colors::SHIP,
    );

    for bullet in &world.bullets {
        let min = world_to_screen(bullet.pos, extent).floor();
        shapes::rect(&mut vertices, min, Vec2::splat(BULLET_SIZE), colors::BULLET);
    }

    for rock in &world.rocks {
        // Centred on the rock, not anchored at its top-left corner
        let min = (world_to_screen(rock.pos, extent) - Vec2::splat(ROCK_SIZE * 0.5)).floor();
        shapes::rect(&mut vertices, min, Vec2::splat(ROCK_SIZE), colors::ROCK);
    }

    if let Some(fps) = overlay.fps {
        shapes::seven_segment_text(
            &mut vertices,
            &fps.to_string(),
            Vec2::new(4.0, 4.0),
            16.0,
            colors::FPS_TEXT,
        );
    }
    if overlay.show_position {
        let pos = world.player.pos;
        shapes::seven_segment_text(
            &mut vertices,
            &format!("{:.1} {:.1}", pos.x, pos.y),
            Vec2::new(10.0, 30.0),
            16.0,
            colors::HUD_TEXT,
        );
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bullet, Rock, Team};

    #[test]
    fn test_grid_lines_evenly_split() {
        let xs: Vec<u32> = grid_lines(1280, 31).collect();
        assert_eq!(xs.len(), 31);
        assert_eq!(xs[0], 40);
        assert_eq!(xs[30], 1240);
        let ys: Vec<u32> = grid_lines(720, 31).collect();
        assert_eq!(ys[0], 22);
    }

    #[test]
    fn test_ship_nose_points_along_rotation() {
        let extent = Vec2::new(1280.0, 720.0);
        let mut player = Player::default();
        let corners = ship_corners(&player, extent);
        assert!((corners[0] - Vec2::new(660.0, 360.0)).length() < 1e-4);

        player.rotation = std::f32::consts::FRAC_PI_2;
        let corners = ship_corners(&player, extent);
        assert!((corners[0] - Vec2::new(640.0, 380.0)).length() < 1e-3);
    }

    #[test]
    fn test_frame_vertex_budget() {
        let mut world = World::new(1);
        world.bullets.push(Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            time: 0.0,
            team: Team::Player,
        });
        world.rocks.push(Rock {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            rotation: 0.0,
        });

        let bare = build_frame(&world, (1280, 720), &Overlay::default());
        // 62 grid lines, 3 ship edges, 1 bullet, 1 rock
        assert_eq!(bare.len(), (62 + 3 + 1 + 1) * 6);

        let hud = Overlay {
            fps: Some(60),
            show_position: true,
        };
        assert!(build_frame(&world, (1280, 720), &hud).len() > bare.len());
    }

    #[test]
    fn test_rock_square_centred_on_position() {
        let mut world = World::new(1);
        world.rocks.push(Rock {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
        });
        let vertices = build_frame(&world, (1280, 720), &Overlay::default());
        let rock = &vertices[vertices.len() - 6..];
        assert_eq!(rock[0].position, [630.0, 350.0]);
        assert_eq!(rock[2].position, [650.0, 370.0]);
    }
}
