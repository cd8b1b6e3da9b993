//! Field-of-view and orientation culling.

use glint_math::normalize_floored;
use glint_mesh::Patches;
use rayon::prelude::*;

use crate::config::CameraConfig;
use crate::error::Result;
use crate::frame::CameraFrame;
use crate::mask::VisibilityMask;

/// Length floor for per-patch view vectors (patch centroid at the camera).
const VIEW_EPSILON: f64 = 1e-12;

/// Patches geometrically observable from `camera`.
///
/// A patch passes when all of the following hold:
/// - its centroid is in front of the camera (`v . forward > 0`)
/// - its normal faces the camera (`n . v_hat < 0`)
/// - `n . v_hat <= -cos(max_viewing_angle_deg)`
/// - `|v . right / v . forward| <= tan(fov_x_deg / 2)` and likewise for `up`/`fov_y_deg`
///
/// where `v` is the vector from the camera to the centroid.
pub fn cull_fov(patches: &Patches, camera: &CameraConfig) -> Result<VisibilityMask> {
    let frame = CameraFrame::new(camera)?;

    let cos_max_angle = camera.max_viewing_angle_deg.to_radians().cos();
    let tan_half_x = (camera.fov_x_deg / 2.0).to_radians().tan();
    let tan_half_y = (camera.fov_y_deg / 2.0).to_radians().tan();

    let flags: Vec<bool> = patches
        .positions
        .par_iter()
        .zip(patches.normals.par_iter())
        .map(|(position, normal)| {
            let v = position - frame.origin;
            let z = v.dot(&frame.forward);
            if z <= 0.0 {
                return false;
            }

            let dot = normal.dot(&normalize_floored(&v, VIEW_EPSILON));
            if dot >= 0.0 || dot > -cos_max_angle {
                return false;
            }

            let tan_x = (v.dot(&frame.right) / z).abs();
            let tan_y = (v.dot(&frame.up) / z).abs();
            tan_x <= tan_half_x && tan_y <= tan_half_y
        })
        .collect();

    Ok(VisibilityMask::from(flags))
}
