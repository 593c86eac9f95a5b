//! World-space coordinates.
//!
//! Headings are radians measured counter-clockwise from the +X axis, matching
//! how unit rotations are reported by the world.

use std::f32::consts::{PI, TAU};
use std::fmt;

/// Point in world space, in yards.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns true for the all-zero point, which stands for "no location".
    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    #[inline]
    pub fn distance_sqr(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        self.distance_sqr(other).sqrt()
    }

    /// Heading from `self` toward `other` on the horizontal plane.
    pub fn heading_to(self, other: Vec3) -> f32 {
        normalize_heading((other.y - self.y).atan2(other.x - self.x))
    }

    /// Projects a point `distance` yards away along `heading`, keeping height.
    pub fn ray_cast(self, heading: f32, distance: f32) -> Vec3 {
        Vec3::new(
            self.x + heading.cos() * distance,
            self.y + heading.sin() * distance,
            self.z,
        )
    }

    /// Steps toward `target` by at most `step` yards.
    pub fn step_toward(self, target: Vec3, step: f32) -> Vec3 {
        let remaining = self.distance(target);
        if remaining <= step || remaining <= f32::EPSILON {
            return target;
        }
        let t = step / remaining;
        Vec3::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
            self.z + (target.z - self.z) * t,
        )
    }

    /// Arithmetic mean of `points`, or `None` for an empty input.
    pub fn centroid(points: impl IntoIterator<Item = Vec3>) -> Option<Vec3> {
        let mut count = 0usize;
        let mut sum = Vec3::ZERO;
        for point in points {
            sum.x += point.x;
            sum.y += point.y;
            sum.z += point.z;
            count += 1;
        }
        (count > 0).then(|| {
            let n = count as f32;
            Vec3::new(sum.x / n, sum.y / n, sum.z / n)
        })
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.2}, {:.2}, {:.2}>", self.x, self.y, self.z)
    }
}

/// Wraps a heading into `[0, 2π)`.
pub fn normalize_heading(heading: f32) -> f32 {
    let wrapped = heading.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Smallest absolute angle between two headings, in `[0, π]`.
pub fn heading_delta(a: f32, b: f32) -> f32 {
    let delta = normalize_heading(a - b);
    if delta > PI { TAU - delta } else { delta }
}

/// Circular mean of `headings`, or `None` for an empty input.
pub fn mean_heading(headings: impl IntoIterator<Item = f32>) -> Option<f32> {
    let mut count = 0usize;
    let (mut sin, mut cos) = (0.0f32, 0.0f32);
    for heading in headings {
        sin += heading.sin();
        cos += heading.cos();
        count += 1;
    }
    if count == 0 {
        return None;
    }
    if sin.abs() <= f32::EPSILON && cos.abs() <= f32::EPSILON {
        // Opposed headings cancel out; any direction is as good as another.
        return Some(0.0);
    }
    Some(normalize_heading(sin.atan2(cos)))
}
