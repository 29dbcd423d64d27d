//! Hive geometry and the receiver queue.

use hive_core::Vec2;

use crate::NECTAR_EPS;

/// The nest.  Foragers unload at the `entrance`; the unloaded nectar waits in
/// `receiver_queue` until receiver bees process it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hive {
    pub center:   Vec2,
    pub radius:   f32,
    /// Twelve o'clock on the hive rim.
    pub entrance: Vec2,
    /// Nectar delivered but not yet processed.
    pub receiver_queue: f32,
}

impl Hive {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            entrance: Vec2::new(center.x, center.y - radius),
            receiver_queue: 0.0,
        }
    }

    /// Placement used by the reference colony: horizontally centred, a
    /// little below mid-height, radius 12 % of the shorter side.
    pub fn for_world(width: f32, height: f32) -> Self {
        Self::new(Vec2::new(width * 0.5, height * 0.55), width.min(height) * 0.12)
    }

    pub fn enqueue(&mut self, nectar: f32) {
        if nectar > 0.0 {
            self.receiver_queue += nectar;
        }
    }

    /// Remove up to `capacity` from the queue and return the amount removed.
    pub fn process(&mut self, capacity: f32) -> f32 {
        if !(capacity > 0.0) || self.receiver_queue <= NECTAR_EPS {
            return 0.0;
        }
        let amount = self.receiver_queue.min(capacity);
        self.receiver_queue -= amount;
        if self.receiver_queue < NECTAR_EPS {
            self.receiver_queue = 0.0;
        }
        amount
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance_sq(self.center) <= self.radius * self.radius
    }
}
