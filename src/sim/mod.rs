//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Wall-clock time only enters through `TickInput`
//! - Stable iteration order (by registry index)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod input;
pub mod motion;
pub mod registry;
pub mod state;
pub mod tick;
pub mod tuning;

pub use collision::{captured_collectibles, first_triggered_hazard, in_capture_range};
pub use input::{Direction, HeldKeys, InputSampler, Key};
pub use motion::{Avatar, FootstepGate, step_avatar};
pub use registry::{Entity, EntityRegistry, random_position};
pub use state::{GameEvent, GameState, GameStatus};
pub use tick::{TickInput, tick};
pub use tuning::Tuning;
