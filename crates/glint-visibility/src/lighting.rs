//! Sun illumination and specular reflection tests.

use glint_math::{normalize_floored, Dir3, Point3, Vec3};
use glint_mesh::Patches;
use rayon::prelude::*;

use crate::mask::VisibilityMask;

/// Length floor when normalizing reflection and view vectors.
const EPSILON: f64 = 1e-12;

/// `n . s > 0` and `n . s >= cos_max`.
#[inline]
fn is_illuminated(normal: &Vec3, sun: &Vec3, cos_max: f64) -> bool {
    let d = normal.dot(sun);
    d > 0.0 && d >= cos_max
}

/// `R . V >= cos_limit` for the mirror ray `R` and view vector `V`.
#[inline]
fn reflects_toward(
    position: &Point3,
    normal: &Vec3,
    camera: &Point3,
    sun: &Vec3,
    cos_limit: f64,
) -> bool {
    let r = reflect(normal, sun);
    let view = normalize_floored(&(camera - position), EPSILON);
    r.dot(&view) >= cos_limit
}

/// Patches whose normal is sun-facing within `max_sun_angle_deg`.
///
/// Passes iff `n . s > 0` and `n . s >= cos(max_sun_angle_deg)`.
pub fn check_sun_illumination(
    normals: &[Vec3],
    sun_direction: &Dir3,
    max_sun_angle_deg: f64,
) -> VisibilityMask {
    let cos_max = max_sun_angle_deg.to_radians().cos();
    let s = sun_direction.as_ref();
    normals
        .par_iter()
        .map(|n| is_illuminated(n, s, cos_max))
        .collect::<Vec<_>>()
        .into()
}

/// [`check_sun_illumination`] restricted to the set entries of `candidates`.
///
/// Unset entries stay false without being evaluated.
pub fn check_sun_illumination_among(
    normals: &[Vec3],
    candidates: &VisibilityMask,
    sun_direction: &Dir3,
    max_sun_angle_deg: f64,
) -> VisibilityMask {
    debug_assert_eq!(normals.len(), candidates.len());
    let cos_max = max_sun_angle_deg.to_radians().cos();
    let s = sun_direction.as_ref();
    normals
        .par_iter()
        .zip(candidates.as_slice().par_iter())
        .map(|(n, &candidate)| candidate && is_illuminated(n, s, cos_max))
        .collect::<Vec<_>>()
        .into()
}

/// Mirror reflection of the sun direction about a unit normal, normalized.
///
/// `R = 2 (n . s) n - s`.
#[inline]
pub fn reflect(normal: &Vec3, sun_direction: &Vec3) -> Vec3 {
    let r = 2.0 * normal.dot(sun_direction) * normal - sun_direction;
    normalize_floored(&r, EPSILON)
}

/// Patches whose specular reflection of the sun points at the camera.
///
/// Passes iff `R . V >= cos(min_reflection_angle_deg)` where `R` is
/// [`reflect`] and `V` the unit vector from the patch to the camera.
pub fn check_reflection(
    patches: &Patches,
    camera: &Point3,
    sun_direction: &Dir3,
    min_reflection_angle_deg: f64,
) -> VisibilityMask {
    let cos_limit = min_reflection_angle_deg.to_radians().cos();
    let s = sun_direction.into_inner();
    patches
        .positions
        .par_iter()
        .zip(patches.normals.par_iter())
        .map(|(position, normal)| reflects_toward(position, normal, camera, &s, cos_limit))
        .collect::<Vec<_>>()
        .into()
}

/// [`check_reflection`] restricted to the set entries of `candidates`.
pub fn check_reflection_among(
    patches: &Patches,
    candidates: &VisibilityMask,
    camera: &Point3,
    sun_direction: &Dir3,
    min_reflection_angle_deg: f64,
) -> VisibilityMask {
    debug_assert_eq!(patches.len(), candidates.len());
    let cos_limit = min_reflection_angle_deg.to_radians().cos();
    let s = sun_direction.into_inner();
    patches
        .positions
        .par_iter()
        .zip(patches.normals.par_iter())
        .zip(candidates.as_slice().par_iter())
        .map(|((position, normal), &candidate)| {
            candidate && reflects_toward(position, normal, camera, &s, cos_limit)
        })
        .collect::<Vec<_>>()
        .into()
}
