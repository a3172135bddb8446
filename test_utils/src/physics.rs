//! Flat-floor physics fake.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use dread::{ObjectId, Physics, RayHit};
use glam::Vec3;

const TOLERANCE: f32 = 0.05;
/// Capsules rest with their centre this far above the floor.
const HALF_HEIGHT: f32 = dread::CHARACTER_HEIGHT * 0.5;

/// Infinite floor at `y = 0` with ray hits supplied by the test.
///
/// Ray queries pop scripted hits first and fall back to the steady target
/// once the script runs out.
#[derive(Debug, Default)]
pub struct FlatFloor {
    floor_y: f32,
    /// Forces the ground query result when set.
    ground_override: Cell<Option<bool>>,
    script: RefCell<VecDeque<Option<RayHit>>>,
    target: Cell<Option<ObjectId>>,
}

impl FlatFloor {
    /// Creates a floor with no ray hits.
    ///
    /// # Examples
    /// ```
    /// use dread::Physics;
    /// use glam::Vec3;
    /// use test_utils::FlatFloor;
    /// let floor = FlatFloor::new();
    /// assert!(floor.is_grounded(Vec3::new(0.0, 0.3, 0.0), 0.3));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hits `object` one metre away on every query.
    #[must_use]
    pub fn looking_at(object: u64) -> Self {
        let floor = Self::default();
        floor.target.set(Some(ObjectId(object)));
        floor
    }

    /// Queues per-query hits, `None` meaning a miss.
    #[must_use]
    pub fn with_rays(rays: impl IntoIterator<Item = Option<u64>>) -> Self {
        let floor = Self::default();
        floor.script.replace(
            rays.into_iter()
                .map(|ray| ray.map(|id| hit(ObjectId(id))))
                .collect(),
        );
        floor
    }

    /// Forces every ground query to `grounded` until cleared with `None`.
    pub fn force_grounded(&self, grounded: Option<bool>) {
        self.ground_override.set(grounded);
    }

    pub fn set_target(&self, object: Option<u64>) {
        self.target.set(object.map(ObjectId));
    }
}

fn hit(object: ObjectId) -> RayHit {
    RayHit {
        object,
        distance: 1.0,
    }
}

impl Physics for FlatFloor {
    fn is_grounded(&self, position: Vec3, radius: f32) -> bool {
        self.ground_override
            .get()
            .unwrap_or(position.y - radius <= self.floor_y + TOLERANCE)
    }

    fn raycast_forward(&self, _origin: Vec3, _direction: Vec3, _max_range: f32) -> Option<RayHit> {
        match self.script.borrow_mut().pop_front() {
            Some(scripted) => scripted,
            None => self.target.get().map(hit),
        }
    }

    fn move_character(&self, position: Vec3, displacement: Vec3) -> Vec3 {
        let next = position + displacement;
        if self.ground_override.get().is_some() {
            return next;
        }
        Vec3::new(next.x, next.y.max(self.floor_y + HALF_HEIGHT), next.z)
    }
}
