//! Physics collaborator seam.
//!
//! Ground detection, capsule movement and ray queries are owned by the host
//! engine. The simulation only calls through [`Physics`] so it can be driven
//! by a real collision world or by the flat-floor fakes used in tests.

use glam::Vec3;

/// Opaque identity of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(
    /// Raw identifier assigned by the host.
    pub u64,
);

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Closest object struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Object that was hit.
    pub object: ObjectId,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Queries the character issues against scene geometry.
pub trait Physics {
    /// Whether a sphere at `position` with `radius` touches the ground layer.
    fn is_grounded(&self, position: Vec3, radius: f32) -> bool;

    /// Casts a ray and reports the first hit within `max_range`.
    fn raycast_forward(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit>;

    /// Moves the capsule by `displacement`, returning the resolved position.
    ///
    /// The default performs no collision and applies the displacement as is.
    fn move_character(&self, position: Vec3, displacement: Vec3) -> Vec3 {
        position + displacement
    }
}

/// Position of the ground probe sphere for a capsule centred on `position`.
///
/// The probe sits one radius above the capsule's base so that a sphere
/// resting on the floor overlaps it.
#[must_use]
pub fn ground_probe(position: Vec3, height: f32, radius: f32) -> Vec3 {
    Vec3::new(position.x, position.y - height * 0.5 + radius, position.z)
}
