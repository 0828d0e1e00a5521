//! Data-driven game balance
//!
//! Every field falls back to the matching constant in [`crate::consts`], so a
//! tuning document only needs to name what it changes.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Avatar displacement per tick, per held direction
    pub move_step: f32,
    /// Half-extent of the walkable square
    pub world_bound: f32,
    /// Touch distance for jewels and alarms alike
    pub capture_radius: f32,
    /// Side of the square that spawns are drawn from
    pub spawn_side: f32,
    pub collectible_height: f32,
    pub hazard_height: f32,
    pub initial_collectibles: usize,
    pub initial_hazards: usize,
    /// Score step that adds an alarm
    pub hazard_score_interval: u64,
    /// Minimum gap between footstep cues (ms)
    pub footstep_interval_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_step: MOVE_STEP,
            world_bound: WORLD_BOUND,
            capture_radius: CAPTURE_RADIUS,
            spawn_side: SPAWN_SIDE,
            collectible_height: COLLECTIBLE_HEIGHT,
            hazard_height: HAZARD_HEIGHT,
            initial_collectibles: INITIAL_COLLECTIBLES,
            initial_hazards: INITIAL_HAZARDS,
            hazard_score_interval: HAZARD_SCORE_INTERVAL,
            footstep_interval_ms: FOOTSTEP_INTERVAL_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Replace values the simulation cannot work with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.move_step.is_finite() && self.move_step >= 0.0) {
            self.move_step = defaults.move_step;
        }
        if !(self.world_bound.is_finite() && self.world_bound >= 0.0) {
            self.world_bound = defaults.world_bound;
        }
        if !(self.capture_radius.is_finite() && self.capture_radius >= 0.0) {
            self.capture_radius = defaults.capture_radius;
        }
        if !(self.spawn_side.is_finite() && self.spawn_side > 0.0) {
            self.spawn_side = defaults.spawn_side;
        }
        if self.hazard_score_interval == 0 {
            self.hazard_score_interval = defaults.hazard_score_interval;
        }
        if !(self.footstep_interval_ms.is_finite() && self.footstep_interval_ms >= 0.0) {
            self.footstep_interval_ms = defaults.footstep_interval_ms;
        }
        self
    }

    /// Alarms that should exist at `score`
    pub fn expected_hazards(&self, score: u64) -> usize {
        self.initial_hazards + (score / self.hazard_score_interval) as usize
    }
}
