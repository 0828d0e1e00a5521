//! Proximity checks between the avatar and registry entities
//!
//! Plain 3D Euclidean distance against one radius. Touching means strictly
//! closer than the radius, so an entity exactly on the circle is missed.

use glam::Vec3;

use super::registry::Entity;

/// True if `b` is strictly within `radius` of `a`
#[inline]
pub fn in_capture_range(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Indices of jewels the avatar touches, highest index first.
///
/// Removing them in the returned order never shifts an index that is still
/// pending, so each jewel is handled exactly once.
pub fn captured_collectibles(avatar: Vec3, collectibles: &[Entity], radius: f32) -> Vec<usize> {
    (0..collectibles.len())
        .rev()
        .filter(|&i| in_capture_range(avatar, collectibles[i].pos, radius))
        .collect()
}

/// Index of the first alarm (in registry order) the avatar touches
pub fn first_triggered_hazard(avatar: Vec3, hazards: &[Entity], radius: f32) -> Option<usize> {
    hazards
        .iter()
        .position(|h| in_capture_range(avatar, h.pos, radius))
}
