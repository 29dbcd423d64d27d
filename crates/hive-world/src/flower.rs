//! Flowers and flower-field configuration.

use hive_core::{FlowerId, Vec2};

use crate::WeatherConfig;

/// One nectar source.
///
/// `remaining` starts at `capacity` and only ever decreases; a depleted
/// flower stays in the world with `remaining == 0`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flower {
    pub id:        FlowerId,
    pub pos:       Vec2,
    pub capacity:  f32,
    pub remaining: f32,
    /// Set the first time any bee takes nectar from this flower.
    pub visited:   bool,
}

impl Flower {
    pub fn new(id: FlowerId, pos: Vec2, capacity: f32) -> Self {
        Self { id, pos, capacity, remaining: capacity, visited: false }
    }

    /// Fraction of the original nectar still available, in `[0, 1]`.
    #[inline]
    pub fn fraction(&self) -> f32 {
        if self.capacity > 0.0 {
            (self.remaining / self.capacity).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.remaining > crate::NECTAR_EPS
    }
}

/// Parameters for flower placement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Nectar capacity of a randomly placed flower is drawn from
    /// `capacity_min..=capacity_max`.
    pub capacity_min: f32,
    pub capacity_max: f32,

    /// Radius range of a random patch created by `add_flowers`.
    pub patch_radius_min: f32,
    pub patch_radius_max: f32,

    /// Patch centres keep at least this distance from the world edge.
    pub patch_edge_margin: f32,

    /// Flowers after the first in `add_flower_at` are scattered within this
    /// radius of the requested point.
    pub cluster_spread: f32,

    pub weather: WeatherConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            capacity_min:      1.0,
            capacity_max:      3.0,
            patch_radius_min:  40.0,
            patch_radius_max:  120.0,
            patch_edge_margin: 80.0,
            cluster_spread:    12.0,
            weather:           WeatherConfig::default(),
        }
    }
}

impl WorldConfig {
    /// `Err` with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.capacity_min.is_finite() && self.capacity_min > 0.0) {
            return Err(format!("capacity_min must be positive, got {}", self.capacity_min));
        }
        if !(self.capacity_max.is_finite() && self.capacity_max >= self.capacity_min) {
            return Err(format!(
                "capacity_max ({}) must be >= capacity_min ({})",
                self.capacity_max, self.capacity_min
            ));
        }
        if !(self.patch_radius_min >= 0.0 && self.patch_radius_max >= self.patch_radius_min) {
            return Err("patch radius range is empty".into());
        }
        if !(self.cluster_spread.is_finite() && self.cluster_spread >= 0.0) {
            return Err(format!("cluster_spread must be >= 0, got {}", self.cluster_spread));
        }
        self.weather.validate()
    }
}
