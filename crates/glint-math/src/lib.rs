#![warn(missing_docs)]

//! Math types for glint.
//!
//! Thin wrappers around nalgebra providing the points, vectors, directions,
//! bounding boxes and tolerance constants shared by the mesh, ray tracing
//! and visibility crates.

use nalgebra::{Unit, Vector3};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Errors raised by checked vector operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The vector is too short (or non-finite) to define a direction.
    #[error("cannot normalize degenerate vector ({x}, {y}, {z})")]
    DegenerateVector {
        /// X component.
        x: f64,
        /// Y component.
        y: f64,
        /// Z component.
        z: f64,
    },
}

/// Normalize `v`, failing when its length is below `min_norm` or not finite.
pub fn try_direction(v: &Vec3, min_norm: f64) -> Result<Dir3, MathError> {
    let norm = v.norm();
    if !norm.is_finite() || norm < min_norm {
        return Err(MathError::DegenerateVector {
            x: v.x,
            y: v.y,
            z: v.z,
        });
    }
    Ok(Unit::new_unchecked(v / norm))
}

/// Divide `v` by its length, with the length floored at `floor`.
///
/// Never fails. A vector shorter than `floor` comes back shorter than unit
/// length (a zero vector stays zero).
#[inline]
pub fn normalize_floored(v: &Vec3, floor: f64) -> Vec3 {
    v / v.norm().max(floor)
}

/// `arccos` with the argument clipped to `[-1, 1]`.
#[inline]
pub fn clamped_acos(cos: f64) -> f64 {
    cos.clamp(-1.0, 1.0).acos()
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Relative part of a distance tolerance (scaled by the distance).
    pub relative: f64,
    /// Absolute part of a distance tolerance.
    pub absolute: f64,
    /// Minimum length accepted for a user-supplied direction.
    pub direction: f64,
}

impl Tolerance {
    /// Default tolerances (`d * 1e-6 + 1e-8` for distances).
    pub const DEFAULT: Self = Self {
        relative: 1e-6,
        absolute: 1e-8,
        direction: 1e-12,
    };

    /// Tolerance band around a distance `d`.
    #[inline]
    pub fn at_distance(&self, d: f64) -> f64 {
        d * self.relative + self.absolute
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.absolute
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another one.
    pub fn include_aabb(&mut self, other: &Aabb3) {
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// True if no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Edge lengths along x, y and z.
    pub fn extents(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::zeros();
        }
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Surface area of the box.
    pub fn surface_area(&self) -> f64 {
        let d = self.extents();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_try_direction() {
        let d = try_direction(&Vec3::new(3.0, 0.0, 4.0), 1e-12).unwrap();
        assert_relative_eq!(d.x, 0.6);
        assert_relative_eq!(d.z, 0.8);
    }

    #[test]
    fn test_try_direction_zero() {
        let err = try_direction(&Vec3::zeros(), 1e-12).unwrap_err();
        assert!(matches!(err, MathError::DegenerateVector { .. }));
    }

    #[test]
    fn test_try_direction_nan() {
        assert!(try_direction(&Vec3::new(f64::NAN, 0.0, 1.0), 1e-12).is_err());
    }

    #[test]
    fn test_normalize_floored() {
        let n = normalize_floored(&Vec3::new(0.0, 2.0, 0.0), 1e-8);
        assert_relative_eq!(n.norm(), 1.0);

        // Zero vector stays finite
        let z = normalize_floored(&Vec3::zeros(), 1e-8);
        assert_eq!(z, Vec3::zeros());
    }

    #[test]
    fn test_clamped_acos() {
        assert_relative_eq!(clamped_acos(1.0 + 1e-12), 0.0);
        assert_relative_eq!(clamped_acos(-2.0), std::f64::consts::PI);
    }

    #[test]
    fn test_tolerance_at_distance() {
        let tol = Tolerance::DEFAULT;
        assert_relative_eq!(tol.at_distance(10.0), 10.0 * 1e-6 + 1e-8);
        assert!(tol.is_zero(1e-9));
        assert!(!tol.is_zero(1e-7));
    }

    #[test]
    fn test_aabb_include_and_extents() {
        let mut bb = Aabb3::empty();
        assert!(bb.is_empty());
        assert_eq!(bb.extents(), Vec3::zeros());

        bb.include_point(&Point3::new(-1.0, 0.0, 2.0));
        bb.include_point(&Point3::new(1.0, 3.0, 4.0));
        assert!(!bb.is_empty());
        assert_relative_eq!(bb.extents(), Vec3::new(2.0, 3.0, 2.0));
        assert_relative_eq!(bb.center(), Point3::new(0.0, 1.5, 3.0));
        assert_relative_eq!(bb.surface_area(), 2.0 * (6.0 + 6.0 + 4.0));
    }
}
