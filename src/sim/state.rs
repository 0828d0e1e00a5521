//! Game state and core simulation types
//!
//! One explicit context struct, owned by the frame driver and handed to
//! `tick` by reference.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::{Avatar, FootstepGate};
use super::registry::EntityRegistry;
use super::tuning::Tuning;

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Active gameplay
    #[default]
    Playing,
    /// Caught by an alarm. Terminal for this run.
    GameOver,
}

/// Things that happened during a tick, in the order they happened.
///
/// The frame driver turns these into audio cues and display updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The footstep cadence allowed a step sound
    Footstep,
    /// A jewel was picked up; `score` is the score after the pickup
    Collected { collectible_id: u32, score: u64 },
    /// A replacement jewel appeared
    CollectibleSpawned { collectible_id: u32 },
    /// Score milestone added an alarm
    HazardSpawned { hazard_id: u32 },
    /// The avatar touched an alarm
    Caught { hazard_id: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub avatar: Avatar,
    pub registry: EntityRegistry,
    /// Jewels collected this run
    pub score: u64,
    pub status: GameStatus,
    /// Simulation ticks run while playing
    pub time_ticks: u64,
    /// Seconds of play, summed from tick `dt`
    pub elapsed: f32,
    pub footsteps: FootstepGate,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new run; the registry is populated from the seeded RNG.
    /// Out-of-range tuning values fall back to their defaults.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let registry = EntityRegistry::populate(&mut rng, &tuning);
        Self::from_parts(seed, rng, tuning, registry)
    }

    /// Create a run around a caller-built registry (scripted scenarios)
    pub fn from_parts(seed: u64, rng: Pcg32, tuning: Tuning, registry: EntityRegistry) -> Self {
        Self {
            seed,
            rng,
            tuning: tuning.sanitized(),
            avatar: Avatar::default(),
            registry,
            score: 0,
            status: GameStatus::Playing,
            time_ticks: 0,
            elapsed: 0.0,
            footsteps: FootstepGate::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_new_run() {
        let state = GameState::new(12345);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.avatar.pos, Vec3::ZERO);
        assert_eq!(state.registry.collectibles.len(), 10);
        assert_eq!(state.registry.hazards.len(), 5);
    }

    #[test]
    fn test_custom_tuning() {
        let tuning = Tuning {
            initial_collectibles: 3,
            initial_hazards: 0,
            ..Default::default()
        };
        let state = GameState::with_tuning(1, tuning);
        assert_eq!(state.registry.collectibles.len(), 3);
        assert!(state.registry.hazards.is_empty());
    }

    #[test]
    fn test_unusable_tuning_replaced() {
        let tuning = Tuning {
            hazard_score_interval: 0,
            world_bound: f32::NAN,
            spawn_side: -4.0,
            ..Default::default()
        };
        let state = GameState::with_tuning(1, tuning.clone());
        assert_eq!(state.tuning.hazard_score_interval, 5);
        assert_eq!(state.tuning.world_bound, 15.0);
        assert_eq!(state.tuning.spawn_side, 16.0);

        let state = GameState::from_parts(
            1,
            Pcg32::seed_from_u64(1),
            Tuning {
                world_bound: -1.0,
                ..tuning
            },
            EntityRegistry::new(),
        );
        assert_eq!(state.tuning.hazard_score_interval, 5);
        assert_eq!(state.tuning.world_bound, 15.0);
    }
}
