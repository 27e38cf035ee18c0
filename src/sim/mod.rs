//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod state;
pub mod tick;

pub use clock::{FpsCounter, FrameClock};
pub use collision::{first_bullet_hit, within_radius_sq};
pub use state::{Bullet, Player, Rock, Team, World};
pub use tick::{TickInput, tick, wrap_position};
