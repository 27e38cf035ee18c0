//! Keyboard state fed by winit window events

use std::collections::HashSet;

use glam::Vec3;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::sim::TickInput;

/// Keys currently held down
#[derive(Debug, Default)]
pub struct KeyboardState {
    keys_held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event from the window
    pub fn process_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.process_key(code, event.state);
        }
    }

    pub fn process_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Drop all held keys (focus lost, so releases would never arrive)
    pub fn clear(&mut self) {
        self.keys_held.clear();
    }

    /// Ship controls: A/D turn, W/S thrust, Space fires
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            turn_left: self.is_key_down(KeyCode::KeyA),
            turn_right: self.is_key_down(KeyCode::KeyD),
            thrust_forward: self.is_key_down(KeyCode::KeyW),
            thrust_back: self.is_key_down(KeyCode::KeyS),
            fire: self.is_key_down(KeyCode::Space),
        }
    }

    /// Camera flight: W/S along -Z/+Z, A/D along -X/+X, Q/E up and down
    pub fn fly_direction(&self) -> Vec3 {
        let axis = |neg: KeyCode, pos: KeyCode| {
            (self.is_key_down(pos) as i32 - self.is_key_down(neg) as i32) as f32
        };
        Vec3::new(
            axis(KeyCode::KeyA, KeyCode::KeyD),
            axis(KeyCode::KeyE, KeyCode::KeyQ),
            axis(KeyCode::KeyW, KeyCode::KeyS),
        )
    }
}
