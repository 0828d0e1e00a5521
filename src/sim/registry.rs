//! Live jewels and alarms
//!
//! Both roles share one record type; which `Vec` an entity sits in is its role.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tuning::Tuning;

/// A jewel or an alarm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec3,
}

/// Uniform point in the spawn square at height `y`.
///
/// Ignores every other entity; overlapping spawns are allowed.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, side: f32, y: f32) -> Vec3 {
    let half = side / 2.0;
    Vec3::new(
        rng.random_range(-half..half),
        y,
        rng.random_range(-half..half),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    /// Jewels (iteration order = insertion order)
    pub collectibles: Vec<Entity>,
    /// Alarms (never removed during a run)
    pub hazards: Vec<Entity>,
    /// Next entity ID
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            collectibles: Vec::new(),
            hazards: Vec::new(),
            next_id: 1,
        }
    }

    /// Fill a fresh registry with the initial jewels and alarms
    pub fn populate<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Self {
        let mut registry = Self::new();
        for _ in 0..tuning.initial_collectibles {
            registry.spawn_collectible(rng, tuning);
        }
        for _ in 0..tuning.initial_hazards {
            registry.spawn_hazard(rng, tuning);
        }
        registry
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a jewel at an explicit position
    pub fn insert_collectible(&mut self, pos: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.collectibles.push(Entity { id, pos });
        id
    }

    /// Add an alarm at an explicit position
    pub fn insert_hazard(&mut self, pos: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.hazards.push(Entity { id, pos });
        id
    }

    pub fn spawn_collectible<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) -> u32 {
        let pos = random_position(rng, tuning.spawn_side, tuning.collectible_height);
        self.insert_collectible(pos)
    }

    pub fn spawn_hazard<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) -> u32 {
        let pos = random_position(rng, tuning.spawn_side, tuning.hazard_height);
        self.insert_hazard(pos)
    }

    /// Remove the jewel at `index`, keeping the order of the rest
    pub fn remove_collectible(&mut self, index: usize) -> Entity {
        self.collectibles.remove(index)
    }
}
