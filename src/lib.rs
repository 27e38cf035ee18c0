//! Tiny Asteroids - a fixed-timestep arcade toy and a GPU grass field
//!
//! Core modules:
//! - `sim`: Simulation (entities, fixed-step tick, frame clock)
//! - `renderer`: wgpu pipeline and 2D shape generation
//! - `platform`: Keyboard state fed by window events
//! - `grass`: Compute-generated grass blades drawn indirectly
//! - `tuning`: Data-driven game balance
//! - `settings`: Window and loop settings

pub mod error;
pub mod grass;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (64 Hz)
    pub const SIM_DT: f32 = 1.0 / 64.0;
    /// Default cap on fixed steps run in a single frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default window size and title
    pub const WINDOW_WIDTH: u32 = 1280;
    pub const WINDOW_HEIGHT: u32 = 720;
    pub const WINDOW_TITLE: &str = "Game";

    /// Background grid lines per axis
    pub const GRID_VERTICAL_LINES: u32 = 31;
    pub const GRID_HORIZONTAL_LINES: u32 = 31;

    /// Draw sizes in pixels
    pub const SHIP_SCALE: f32 = 20.0;
    pub const BULLET_SIZE: f32 = 2.0;
    pub const ROCK_SIZE: f32 = 20.0;
    pub const LINE_WIDTH: f32 = 1.0;
}

/// Wrap an angle into [0, 2π) by repeated addition/subtraction.
///
/// Per-step rotation deltas are small, so this settles in one or two
/// iterations. Anything further than a turn out is reduced first, since
/// past ~1e8 subtracting 2π no longer changes the f32. Non-finite input is
/// returned unchanged.
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    if !angle.is_finite() {
        return angle;
    }
    if !(-TAU..2.0 * TAU).contains(&angle) {
        angle = angle.rem_euclid(TAU);
    }
    loop {
        if angle >= TAU {
            angle -= TAU;
        } else if angle < 0.0 {
            angle += TAU;
        } else {
            return angle;
        }
    }
}

/// Wrap one coordinate into [-extent/2, extent/2)
///
/// A non-positive extent (minimized window) leaves the value alone.
#[inline]
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return value;
    }
    let half = extent * 0.5;
    let wrapped = (value + half).rem_euclid(extent) - half;
    // rem_euclid can round up to exactly `extent`
    if wrapped >= half {
        wrapped - extent
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_wrap_angle_range() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        // A tiny negative value must not land on TAU itself
        let tiny = wrap_angle(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn test_wrap_angle_huge_values_terminate() {
        for angle in [2.0e8, -2.0e8, 1.0e30, -1.0e30, f32::MAX, f32::MIN] {
            let wrapped = wrap_angle(angle);
            assert!((0.0..TAU).contains(&wrapped), "{angle} -> {wrapped}");
        }
        assert!((wrap_angle(3.0 * TAU + 1.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_axis_half_open() {
        assert_eq!(wrap_axis(640.0, 1280.0), -640.0);
        assert_eq!(wrap_axis(-640.0, 1280.0), -640.0);
        assert!((wrap_axis(650.0, 1280.0) - (-630.0)).abs() < 1e-3);
        assert!((wrap_axis(-700.0, 1280.0) - 580.0).abs() < 1e-3);
        assert_eq!(wrap_axis(12.5, 1280.0), 12.5);
    }

    #[test]
    fn test_wrap_axis_zero_extent() {
        assert_eq!(wrap_axis(900.0, 0.0), 900.0);
    }
}
