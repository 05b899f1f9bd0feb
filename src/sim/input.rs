//! Pointer input to paddle rotation
//!
//! Pointer positions arrive in arena coordinates. The paddle turns to
//! face the pointer along the shortest way round, eased over a short
//! duration so it never teleports.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{shortest_arc, wrap_angle};

/// Raw pointer event from the host, already in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
}

/// A timed rotation of the paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationCommand {
    /// Angle when the command started
    pub from: f32,
    /// Signed total rotation
    pub delta: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl RotationCommand {
    /// Turn from `current` to `target` along the shortest arc
    pub fn toward(current: f32, target: f32, duration: f32) -> Self {
        Self::by(current, shortest_arc(current, target), duration)
    }

    /// Turn by a fixed signed amount (may exceed a full turn)
    pub fn by(current: f32, delta: f32, duration: f32) -> Self {
        Self {
            from: wrap_angle(current),
            delta,
            duration,
            elapsed: 0.0,
        }
    }

    /// Angle the command ends at
    pub fn target(&self) -> f32 {
        wrap_angle(self.from + self.delta)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` and return the new angle (linear timing)
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        wrap_angle(self.from + self.delta * t)
    }
}

/// Maps pointer positions to paddle commands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputMapper {
    /// Arena center the paddle turns around
    pub center: Vec2,
    /// How long a pointer-driven turn takes
    pub turn_secs: f32,
}

impl InputMapper {
    pub fn new(center: Vec2, turn_secs: f32) -> Self {
        Self { center, turn_secs }
    }

    /// Angle from the arena center to the pointer
    pub fn pointer_angle(&self, pointer: Vec2) -> f32 {
        let offset = pointer - self.center;
        wrap_angle(offset.y.atan2(offset.x))
    }

    /// Rotation command turning the paddle to face the pointer
    pub fn on_pointer_move(&self, current_angle: f32, pointer: Vec2) -> RotationCommand {
        RotationCommand::toward(current_angle, self.pointer_angle(pointer), self.turn_secs)
    }
}
