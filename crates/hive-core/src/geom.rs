//! Planar coordinate type and world bounds.
//!
//! `Vec2` uses `f32` world units (pixels in the reference UI).  The world is
//! a flat rectangle `[0, width] × [0, height]`; there is no wrap-around and
//! no collision response, only clamping against [`Bounds`].

use std::ops::{Add, Mul, Sub};

/// A 2-D point or displacement in world units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` radians.
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_sq(self, other: Vec2) -> f32 {
        let d = other - self;
        d.x * d.x + d.y * d.y
    }

    /// Heading (radians, `atan2` convention) from `self` towards `target`.
    #[inline]
    pub fn angle_to(self, target: Vec2) -> f32 {
        let d = target - self;
        d.y.atan2(d.x)
    }

    /// `false` if either component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn as_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// The playable rectangle, inset by `margin` on every side.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width:  f32,
    pub height: f32,
    pub margin: f32,
}

impl Bounds {
    /// Default inset used to keep agents off the very edge.
    pub const DEFAULT_MARGIN: f32 = 4.0;

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, margin: Self::DEFAULT_MARGIN }
    }

    /// Clamp `p` into the inset rectangle.
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        let max_x = (self.width - self.margin).max(self.margin);
        let max_y = (self.height - self.margin).max(self.margin);
        Vec2::new(p.x.clamp(self.margin, max_x), p.y.clamp(self.margin, max_y))
    }

    /// `true` if `p` lies inside the inset rectangle (inclusive).
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.clamp(p) == p
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}
