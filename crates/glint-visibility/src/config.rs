//! Camera, sun and sweep configuration.
//!
//! All settings structs derive serde so a whole analysis can be described in
//! one TOML file:
//!
//! ```toml
//! [mesh]
//! scale = 0.1
//!
//! [camera]
//! position = [600.0, 0.0, 0.0]
//! fov_x_deg = 2.0
//! fov_y_deg = 2.0
//! max_viewing_angle_deg = 60.0
//!
//! [sun]
//! direction = [1.0, 0.0, 0.0]
//! max_sun_angle_deg = 90.0
//! min_reflection_angle_deg = 100.0
//! occlusion = "any-blocker"
//!
//! [sweep]
//! camera_distance = 600.0
//! step_deg = 10.0
//! count = 37
//! ```

use std::path::Path;

use glint_math::{try_direction, Dir3, Point3, Tolerance, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VisibilityError};

/// Camera pose and acceptance thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position.
    pub position: [f64; 3],
    /// Aim point; the origin when absent.
    pub target: Option<[f64; 3]>,
    /// Full angular width of the sensor footprint (degrees).
    pub fov_x_deg: f64,
    /// Full angular height of the sensor footprint (degrees).
    pub fov_y_deg: f64,
    /// Largest accepted angle between the reversed patch normal and the view ray (degrees).
    pub max_viewing_angle_deg: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [600.0, 0.0, 0.0],
            target: None,
            fov_x_deg: 2.0,
            fov_y_deg: 2.0,
            max_viewing_angle_deg: 60.0,
        }
    }
}

impl CameraConfig {
    /// Camera at `position` aimed at the origin, other settings default.
    pub fn at(position: Point3) -> Self {
        Self {
            position: position.into(),
            ..Default::default()
        }
    }

    /// Camera position as a point.
    pub fn position_point(&self) -> Point3 {
        Point3::from(self.position)
    }

    /// Aim point, defaulting to the origin.
    pub fn target_point(&self) -> Point3 {
        self.target.map(Point3::from).unwrap_or_else(Point3::origin)
    }

    /// Unit view axis from camera to target.
    pub fn view_axis(&self) -> Result<Dir3> {
        try_direction(
            &(self.target_point() - self.position_point()),
            Tolerance::DEFAULT.direction,
        )
        .map_err(|source| VisibilityError::DegenerateDirection {
            what: "camera view axis (camera at target)",
            source,
        })
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        check_finite("camera.position", &self.position)?;
        if let Some(t) = &self.target {
            check_finite("camera.target", t)?;
        }
        check_open_angle("camera.fov_x_deg", self.fov_x_deg)?;
        check_open_angle("camera.fov_y_deg", self.fov_y_deg)?;
        check_closed_angle("camera.max_viewing_angle_deg", self.max_viewing_angle_deg)?;
        Ok(())
    }
}

/// How the sun-occlusion test interprets ray hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SunOcclusionMode {
    /// Shadowed if any surface lies along the sun ray beyond the patch itself.
    #[default]
    AnyBlocker,
    /// Shadowed only if a hit lies between the offset ray origin and the patch.
    ///
    /// Only catches near-self intersections; kept for comparison with older results.
    NearSurface,
}

/// Directional light source and lighting thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    /// Direction from the body toward the sun (normalized before use).
    pub direction: [f64; 3],
    /// Largest accepted incidence angle (degrees).
    pub max_sun_angle_deg: f64,
    /// Angular tolerance between the mirrored sun ray and the view direction (degrees).
    pub min_reflection_angle_deg: f64,
    /// Sun-occlusion semantics.
    pub occlusion: SunOcclusionMode,
    /// Distance the shadow ray origin is pulled back from the patch along `-direction`.
    pub surface_offset: f64,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            direction: [1.0, 0.0, 0.0],
            max_sun_angle_deg: 90.0,
            min_reflection_angle_deg: 100.0,
            occlusion: SunOcclusionMode::AnyBlocker,
            surface_offset: 1e-2,
        }
    }
}

impl SunConfig {
    /// Sun in the XY plane at azimuth `beta_deg`, other settings default.
    pub fn from_azimuth(beta_deg: f64) -> Self {
        let b = beta_deg.to_radians();
        Self {
            direction: [b.cos(), b.sin(), 0.0],
            ..Default::default()
        }
    }

    /// Unit sun direction.
    pub fn unit_direction(&self) -> Result<Dir3> {
        try_direction(&Vec3::from(self.direction), Tolerance::DEFAULT.direction).map_err(
            |source| VisibilityError::DegenerateDirection {
                what: "sun direction",
                source,
            },
        )
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        check_finite("sun.direction", &self.direction)?;
        check_closed_angle("sun.max_sun_angle_deg", self.max_sun_angle_deg)?;
        check_closed_angle("sun.min_reflection_angle_deg", self.min_reflection_angle_deg)?;
        if !(self.surface_offset.is_finite() && self.surface_offset > 0.0) {
            return Err(VisibilityError::InvalidSettings(
                "sun.surface_offset must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Camera orbit for a multi-configuration sweep.
///
/// Camera `i` sits at `camera_distance * (cos e cos a, cos e sin a, sin e)`
/// with `a = start_deg + i * step_deg` and `e = elevation_deg`, aimed at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    /// Distance from the origin to every camera.
    pub camera_distance: f64,
    /// Azimuth of the first camera (degrees).
    pub start_deg: f64,
    /// Azimuth increment between cameras (degrees).
    pub step_deg: f64,
    /// Number of camera positions.
    pub count: usize,
    /// Elevation of the orbit above the XY plane (degrees).
    pub elevation_deg: f64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            camera_distance: 600.0,
            start_deg: 0.0,
            step_deg: 10.0,
            count: 37,
            elevation_deg: 0.0,
        }
    }
}

impl SweepSettings {
    /// Azimuth of camera `i` (degrees).
    pub fn azimuth_deg(&self, i: usize) -> f64 {
        self.start_deg + i as f64 * self.step_deg
    }

    /// Camera configurations for the orbit, copying FOV and thresholds from `base`.
    pub fn cameras(&self, base: &CameraConfig) -> Vec<CameraConfig> {
        let e = self.elevation_deg.to_radians();
        (0..self.count)
            .map(|i| {
                let a = self.azimuth_deg(i).to_radians();
                let d = self.camera_distance;
                CameraConfig {
                    position: [d * e.cos() * a.cos(), d * e.cos() * a.sin(), d * e.sin()],
                    target: None,
                    ..base.clone()
                }
            })
            .collect()
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.camera_distance.is_finite() && self.camera_distance > 0.0) {
            return Err(VisibilityError::InvalidSettings(
                "sweep.camera_distance must be positive".into(),
            ));
        }
        if self.count == 0 {
            return Err(VisibilityError::InvalidSettings(
                "sweep.count must be at least 1".into(),
            ));
        }
        if !(self.start_deg.is_finite() && self.step_deg.is_finite() && self.elevation_deg.is_finite()) {
            return Err(VisibilityError::InvalidSettings(
                "sweep angles must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Mesh loading options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Uniform scale applied to vertices on load.
    pub scale: f64,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self { scale: 0.1 }
    }
}

/// Complete analysis description, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Mesh loading options.
    pub mesh: MeshSettings,
    /// Camera (for a sweep: FOV and thresholds shared by every position).
    pub camera: CameraConfig,
    /// Sun.
    pub sun: SunConfig,
    /// Camera orbit.
    pub sweep: SweepSettings,
}

impl AnalysisConfig {
    /// Parse from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        if !(self.mesh.scale.is_finite() && self.mesh.scale > 0.0) {
            return Err(VisibilityError::InvalidSettings(
                "mesh.scale must be positive".into(),
            ));
        }
        self.camera.validate()?;
        self.sun.validate()?;
        self.sweep.validate()
    }
}

fn check_finite(name: &str, v: &[f64; 3]) -> Result<()> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(VisibilityError::InvalidSettings(format!(
            "{name} must be finite"
        )))
    }
}

/// Angle in the open interval (0, 180).
fn check_open_angle(name: &str, deg: f64) -> Result<()> {
    if deg.is_finite() && deg > 0.0 && deg < 180.0 {
        Ok(())
    } else {
        Err(VisibilityError::InvalidSettings(format!(
            "{name} must be between 0 and 180 degrees (exclusive), got {deg}"
        )))
    }
}

/// Angle in the closed interval [0, 180].
fn check_closed_angle(name: &str, deg: f64) -> Result<()> {
    if deg.is_finite() && (0.0..=180.0).contains(&deg) {
        Ok(())
    } else {
        Err(VisibilityError::InvalidSettings(format!(
            "{name} must be between 0 and 180 degrees, got {deg}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_validate() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn test_camera_target_defaults_to_origin() {
        let cam = CameraConfig::at(Point3::new(0.0, 0.0, 10.0));
        assert_eq!(cam.target_point(), Point3::origin());
        let axis = cam.view_axis().unwrap();
        assert_relative_eq!(axis.into_inner(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_camera_at_target_fails() {
        let cam = CameraConfig::at(Point3::origin());
        assert!(matches!(
            cam.view_axis(),
            Err(VisibilityError::DegenerateDirection { .. })
        ));
    }

    #[test]
    fn test_zero_sun_fails() {
        let sun = SunConfig {
            direction: [0.0, 0.0, 0.0],
            ..Default::default()
        };
        assert!(sun.unit_direction().is_err());
    }

    #[test]
    fn test_sun_normalized() {
        let sun = SunConfig {
            direction: [0.0, 3.0, 4.0],
            ..Default::default()
        };
        assert_relative_eq!(sun.unit_direction().unwrap().into_inner(), Vec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_sun_from_azimuth() {
        let sun = SunConfig::from_azimuth(90.0);
        assert_relative_eq!(sun.direction[0], 0.0, epsilon = 1e-15);
        assert_relative_eq!(sun.direction[1], 1.0);
    }

    #[test]
    fn test_invalid_angles() {
        let mut cam = CameraConfig::default();
        cam.fov_x_deg = 0.0;
        assert!(cam.validate().is_err());
        cam.fov_x_deg = 180.0;
        assert!(cam.validate().is_err());
        cam.fov_x_deg = 2.0;
        cam.max_viewing_angle_deg = 181.0;
        assert!(cam.validate().is_err());

        let mut sun = SunConfig::default();
        sun.min_reflection_angle_deg = f64::NAN;
        assert!(sun.validate().is_err());
        sun.min_reflection_angle_deg = 180.0;
        sun.surface_offset = 0.0;
        assert!(sun.validate().is_err());
    }

    #[test]
    fn test_sweep_cameras() {
        let sweep = SweepSettings {
            camera_distance: 10.0,
            start_deg: 0.0,
            step_deg: 90.0,
            count: 4,
            elevation_deg: 0.0,
        };
        let cams = sweep.cameras(&CameraConfig::default());
        assert_eq!(cams.len(), 4);
        assert_relative_eq!(cams[0].position[0], 10.0);
        assert_relative_eq!(cams[1].position[1], 10.0);
        assert_relative_eq!(cams[2].position[0], -10.0);
        assert!(cams.iter().all(|c| c.target.is_none()));
        assert!(cams.iter().all(|c| c.fov_x_deg == 2.0));
    }

    #[test]
    fn test_default_sweep_matches_full_orbit() {
        let sweep = SweepSettings::default();
        assert_eq!(sweep.count, 37);
        assert_relative_eq!(sweep.azimuth_deg(36), 360.0);
    }

    #[test]
    fn test_sweep_validation() {
        let sweep = SweepSettings {
            count: 0,
            ..Default::default()
        };
        assert!(sweep.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let cfg = AnalysisConfig::from_toml_str(
            r#"
            [mesh]
            scale = 1.0

            [camera]
            position = [0.0, 0.0, 10.0]
            fov_x_deg = 90.0

            [sun]
            direction = [0.0, 0.0, 1.0]
            occlusion = "near-surface"

            [sweep]
            count = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mesh.scale, 1.0);
        assert_eq!(cfg.camera.position, [0.0, 0.0, 10.0]);
        assert_eq!(cfg.camera.fov_x_deg, 90.0);
        // Unspecified keys keep defaults
        assert_eq!(cfg.camera.fov_y_deg, 2.0);
        assert_eq!(cfg.sun.occlusion, SunOcclusionMode::NearSurface);
        assert_eq!(cfg.sweep.count, 5);
        assert_eq!(cfg.sweep.step_deg, 10.0);
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        assert!(matches!(
            AnalysisConfig::from_toml_str("[camera]\nfov_x_deg = -1.0\n"),
            Err(VisibilityError::InvalidSettings(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("[camera\n"),
            Err(VisibilityError::Config(_))
        ));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AnalysisConfig::from_toml_str("").unwrap(), AnalysisConfig::default());
    }
}
