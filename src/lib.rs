//! Midnight Heist - A jewel-thief arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, proximity checks, game state)
//! - `frame`: Per-frame driver that feeds the sim and fans out side effects
//! - `audio`: Audio cue boundary (Web Audio on wasm)
//! - `hud`: Display state boundary (DOM on wasm)
//! - `settings`: Player preferences

pub mod audio;
pub mod frame;
pub mod hud;
pub mod settings;
pub mod sim;

pub use frame::{FrameDriver, FrameSnapshot, PageExit, RenderSink};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Avatar displacement per tick, per held direction
    pub const MOVE_STEP: f32 = 0.1;
    /// Avatar x/z are clamped to [-WORLD_BOUND, WORLD_BOUND]
    pub const WORLD_BOUND: f32 = 15.0;
    /// Proximity below which an entity counts as touched (strict)
    pub const CAPTURE_RADIUS: f32 = 0.5;

    /// Side length of the square spawn region, centered at the origin
    pub const SPAWN_SIDE: f32 = 16.0;
    /// Resting height of a jewel
    pub const COLLECTIBLE_HEIGHT: f32 = 0.15;
    /// Resting height of an alarm
    pub const HAZARD_HEIGHT: f32 = 0.05;

    pub const INITIAL_COLLECTIBLES: usize = 10;
    pub const INITIAL_HAZARDS: usize = 5;
    /// A new alarm appears every time the score hits a multiple of this
    pub const HAZARD_SCORE_INTERVAL: u64 = 5;

    /// Minimum wall-clock gap between footstep cues (ms)
    pub const FOOTSTEP_INTERVAL_MS: f64 = 300.0;
}
