//! Avatar movement from held keys

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::input::{Direction, HeldKeys};
use super::tuning::Tuning;

/// The player's thief
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// World position; y stays on the ground
    pub pos: Vec3,
    /// Yaw in radians (0 = facing +z)
    pub facing: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            facing: 0.0,
        }
    }
}

/// Apply one tick of movement. Returns whether any direction was held.
///
/// All held directions add up, so diagonals move on both axes. Facing is
/// overwritten by each held direction in [`Direction::ALL`] order, so the
/// last one wins. The result is clamped to the world square.
pub fn step_avatar(avatar: &mut Avatar, held: HeldKeys, tuning: &Tuning) -> bool {
    let mut moving = false;

    for dir in Direction::ALL {
        if held.direction_held(dir) {
            let (dx, dz) = dir.axis();
            avatar.pos.x += dx * tuning.move_step;
            avatar.pos.z += dz * tuning.move_step;
            avatar.facing = dir.facing();
            moving = true;
        }
    }

    let bound = tuning.world_bound;
    avatar.pos.x = avatar.pos.x.clamp(-bound, bound);
    avatar.pos.z = avatar.pos.z.clamp(-bound, bound);

    moving
}

/// Rate limiter for footstep cues, keyed on wall-clock time so the cadence
/// does not depend on frame rate.
#[derive(Debug, Clone, Default)]
pub struct FootstepGate {
    last_ms: Option<f64>,
}

impl FootstepGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true (and arms the gate) if a footstep may sound at `now_ms`
    pub fn try_fire(&mut self, now_ms: f64, interval_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last <= interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}
