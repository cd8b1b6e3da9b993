//! Orthonormal camera frame.

use glint_math::{Point3, Vec3};

use crate::config::CameraConfig;
use crate::error::Result;

/// Reference up axis for the camera frame.
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Up axis used when the view axis is (nearly) parallel to [`WORLD_UP`].
pub const FALLBACK_UP: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Below this `|forward x up|` the primary up axis is considered parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Camera-centered orthonormal basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Camera position.
    pub origin: Point3,
    /// Unit axis from camera toward the target.
    pub forward: Vec3,
    /// Unit axis `normalize(forward x up)`.
    pub right: Vec3,
    /// Unit axis `right x forward`.
    pub up: Vec3,
}

impl CameraFrame {
    /// Build the frame for `camera`.
    ///
    /// Fails when the camera sits on its target. A view axis parallel to
    /// [`WORLD_UP`] switches to [`FALLBACK_UP`].
    pub fn new(camera: &CameraConfig) -> Result<Self> {
        let forward = camera.view_axis()?.into_inner();

        let mut right = forward.cross(&WORLD_UP);
        if right.norm() < PARALLEL_EPSILON {
            right = forward.cross(&FALLBACK_UP);
        }
        let right = right.normalize();
        let up = right.cross(&forward);

        Ok(Self {
            origin: camera.position_point(),
            forward,
            right,
            up,
        })
    }

    /// Express `p - origin` in frame coordinates `(right, up, forward)`.
    #[inline]
    pub fn to_local(&self, p: &Point3) -> Vec3 {
        let v = p - self.origin;
        Vec3::new(v.dot(&self.right), v.dot(&self.up), v.dot(&self.forward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal(f: &CameraFrame) {
        assert_relative_eq!(f.forward.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.right.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.up.norm(), 1.0, epsilon = 1e-12);
        assert!(f.forward.dot(&f.right).abs() < 1e-12);
        assert!(f.forward.dot(&f.up).abs() < 1e-12);
        assert!(f.right.dot(&f.up).abs() < 1e-12);
    }

    #[test]
    fn test_frame_on_x_axis() {
        let f = CameraFrame::new(&CameraConfig::at(Point3::new(600.0, 0.0, 0.0))).unwrap();
        assert_orthonormal(&f);
        assert_relative_eq!(f.forward, Vec3::new(-1.0, 0.0, 0.0));
        // (-x) x z = +y
        assert_relative_eq!(f.right, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(f.up, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_frame_looking_down_uses_fallback() {
        let f = CameraFrame::new(&CameraConfig::at(Point3::new(0.0, 0.0, 10.0))).unwrap();
        assert_orthonormal(&f);
        assert_relative_eq!(f.forward, Vec3::new(0.0, 0.0, -1.0));
        // (-z) x x = -y
        assert_relative_eq!(f.right, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_frame_camera_at_target() {
        let mut cam = CameraConfig::at(Point3::new(1.0, 2.0, 3.0));
        cam.target = Some([1.0, 2.0, 3.0]);
        assert!(CameraFrame::new(&cam).is_err());
    }

    #[test]
    fn test_to_local() {
        let f = CameraFrame::new(&CameraConfig::at(Point3::new(10.0, 0.0, 0.0))).unwrap();
        let local = f.to_local(&Point3::new(0.0, 1.0, 2.0));
        assert_relative_eq!(local, Vec3::new(1.0, 2.0, 10.0));
    }
}
