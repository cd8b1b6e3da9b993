//! Ray-cast occlusion tests toward the camera and toward the sun.
//!
//! Both testers only ever clear entries of their candidate mask.

use glint_math::{Dir3, Point3, Tolerance};
use glint_raytrace::{Ray, RayCaster};
use tracing::debug;

use crate::config::{SunConfig, SunOcclusionMode};
use crate::error::{Result, VisibilityError};
use crate::mask::VisibilityMask;

/// `candidates` must carry one entry per patch position.
fn check_candidates(positions: &[Point3], candidates: &VisibilityMask) -> Result<()> {
    if candidates.len() != positions.len() {
        return Err(VisibilityError::MaskLength {
            expected: positions.len(),
            actual: candidates.len(),
        });
    }
    Ok(())
}

/// Remove candidates hidden from the camera by nearer geometry.
///
/// One ray is cast from `camera` toward each candidate centroid. A candidate
/// is occluded when any hit lies closer than `d - tol(d)`, with `d` the
/// camera-to-centroid distance; the band keeps the patch's own triangle from
/// counting against it.
///
/// Fails with [`VisibilityError::MaskLength`] unless `candidates` has one
/// entry per position.
pub fn filter_camera_occluded<C: RayCaster + ?Sized>(
    caster: &C,
    positions: &[Point3],
    camera: &Point3,
    candidates: &VisibilityMask,
    tolerance: &Tolerance,
) -> Result<VisibilityMask> {
    check_candidates(positions, candidates)?;
    let mut visible = candidates.clone();
    if !candidates.any() {
        return Ok(visible);
    }

    // (patch index, distance) per cast ray
    let mut targets: Vec<(usize, f64)> = Vec::new();
    let mut rays: Vec<Ray> = Vec::new();
    for i in candidates.indices() {
        let offset = positions[i] - camera;
        let distance = offset.norm();
        // Nothing can sit between the camera and a patch it touches
        if tolerance.is_zero(distance) {
            continue;
        }
        rays.push(Ray::new(*camera, offset));
        targets.push((i, distance));
    }

    let hits = caster.cast_batch(&rays);
    if hits.is_empty() {
        return Ok(visible);
    }

    let mut occluded = vec![false; rays.len()];
    for hit in &hits {
        let (_, target) = targets[hit.ray];
        let distance = (hit.location - camera).norm();
        if distance < target - tolerance.at_distance(target) {
            occluded[hit.ray] = true;
        }
    }

    let mut removed = 0usize;
    for (&(patch, _), &blocked) in targets.iter().zip(&occluded) {
        if blocked {
            visible.set(patch, false);
            removed += 1;
        }
    }

    debug!(
        candidates = rays.len(),
        hits = hits.len(),
        occluded = removed,
        "camera occlusion"
    );
    Ok(visible)
}

/// Parameters for [`filter_sun_occluded`].
#[derive(Debug, Clone, Copy)]
pub struct ShadowParams {
    /// How hits are interpreted.
    pub mode: SunOcclusionMode,
    /// Pull-back of the ray origin from the patch along `-sun`.
    pub surface_offset: f64,
    /// Distance tolerance.
    pub tolerance: Tolerance,
}

impl From<&SunConfig> for ShadowParams {
    fn from(sun: &SunConfig) -> Self {
        Self {
            mode: sun.occlusion,
            surface_offset: sun.surface_offset,
            tolerance: Tolerance::DEFAULT,
        }
    }
}

/// Remove candidates shadowed from the sun.
///
/// Each candidate casts a ray toward the sun from `position - sun * offset`.
/// The hit on the patch itself sits at distance `d = offset`. Depending on
/// [`SunOcclusionMode`]:
/// - `AnyBlocker`: shadowed if a hit lies beyond the patch (`> d + tol(d)`)
/// - `NearSurface`: shadowed if a hit lies before the patch (`< d - tol(d)`)
///
/// Like [`filter_camera_occluded`], rejects a mask of the wrong length.
pub fn filter_sun_occluded<C: RayCaster + ?Sized>(
    caster: &C,
    positions: &[Point3],
    candidates: &VisibilityMask,
    sun_direction: &Dir3,
    params: &ShadowParams,
) -> Result<VisibilityMask> {
    check_candidates(positions, candidates)?;
    let mut lit = candidates.clone();
    if !candidates.any() {
        return Ok(lit);
    }

    let indices = candidates.indices();
    let sun = sun_direction.as_ref();
    let rays: Vec<Ray> = indices
        .iter()
        .map(|&i| Ray::from_dir(positions[i] - sun * params.surface_offset, *sun_direction))
        .collect();

    let hits = caster.cast_batch(&rays);
    if hits.is_empty() {
        return Ok(lit);
    }

    let mut shadowed = vec![false; rays.len()];
    for hit in &hits {
        let ray = &rays[hit.ray];
        let patch_distance = (positions[indices[hit.ray]] - ray.origin).norm();
        let tol = params.tolerance.at_distance(patch_distance);
        let distance = (hit.location - ray.origin).norm();
        let blocked = match params.mode {
            SunOcclusionMode::AnyBlocker => distance > patch_distance + tol,
            SunOcclusionMode::NearSurface => distance < patch_distance - tol,
        };
        if blocked {
            shadowed[hit.ray] = true;
        }
    }

    let mut removed = 0usize;
    for (&patch, &blocked) in indices.iter().zip(&shadowed) {
        if blocked {
            lit.set(patch, false);
            removed += 1;
        }
    }

    debug!(
        candidates = rays.len(),
        hits = hits.len(),
        shadowed = removed,
        mode = ?params.mode,
        "sun occlusion"
    );
    Ok(lit)
}
