//! Platform layer
//!
//! Turns window events into the level-triggered input the simulation reads.

pub mod input;

pub use input::KeyboardState;
