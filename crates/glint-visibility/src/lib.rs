//! Camera and sun visibility analysis over triangulated surface meshes.
//!
//! A [`VisibilityPipeline`] decides, for one camera pose and one sun
//! direction, which patches (mesh faces) are both seen by the camera and
//! send a sunlit glint toward it:
//!
//! 1. [`cull_fov`]: in front of the camera, facing it, inside the field of view
//! 2. [`filter_camera_occluded`]: unobstructed line of sight
//! 3. [`check_sun_illumination`] and [`check_reflection`]: lighting conditions
//! 4. [`filter_sun_occluded`]: unobstructed path to the sun
//!
//! [`run_sweep`] repeats the pipeline over many camera poses in parallel and
//! accumulates the union of visible patches.
//!
//! # Example
//!
//! ```
//! use glint_mesh::SurfaceMesh;
//! use glint_visibility::{CameraConfig, Scene, SunConfig};
//!
//! let mesh = SurfaceMesh::from_flat(
//!     &[-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0],
//!     &[0, 1, 2, 0, 2, 3],
//! )
//! .unwrap();
//! let scene = Scene::new(mesh);
//!
//! let camera = CameraConfig {
//!     position: [0.0, 0.0, 10.0],
//!     fov_x_deg: 90.0,
//!     fov_y_deg: 90.0,
//!     max_viewing_angle_deg: 90.0,
//!     ..Default::default()
//! };
//! let sun = SunConfig {
//!     direction: [0.0, 0.0, 1.0],
//!     min_reflection_angle_deg: 180.0,
//!     ..Default::default()
//! };
//!
//! let out = scene.analyze(&camera, &sun).unwrap();
//! assert_eq!(out.stats.final_visible, 2);
//! ```

mod config;
mod error;
mod fov;
mod frame;
mod lighting;
mod mask;
mod occlusion;
mod pipeline;
mod scene;
mod stats;
mod sweep;

pub use config::{
    AnalysisConfig, CameraConfig, MeshSettings, SunConfig, SunOcclusionMode, SweepSettings,
};
pub use error::{Result, VisibilityError};
pub use fov::cull_fov;
pub use frame::{CameraFrame, FALLBACK_UP, WORLD_UP};
pub use lighting::{
    check_reflection, check_reflection_among, check_sun_illumination,
    check_sun_illumination_among, reflect,
};
pub use mask::VisibilityMask;
pub use occlusion::{filter_camera_occluded, filter_sun_occluded, ShadowParams};
pub use pipeline::{PipelineOutput, PipelineStage, VisibilityPipeline};
pub use scene::Scene;
pub use stats::VisibilityStats;
pub use sweep::{
    run_sweep, sweep_with_cancel, CombinedCoverage, ConfigurationRun, CoverageAccumulator,
    SweepOutcome,
};
