#![warn(missing_docs)]

//! glint: which parts of a body's surface can a camera see glinting in the sun?
//!
//! This crate ties the workspace together:
//!
//! - mesh import ([`load_mesh`]) and the [`Scene`] the pipeline runs on
//! - the visibility pipeline and orbit sweep (re-exported from `glint-visibility`)
//! - plain-text and JSON [`report`]s
//! - colored PLY [`export`] of a visibility mask
//!
//! # Example
//!
//! ```rust,no_run
//! use glint::{load_mesh, report, CameraConfig, Scene, SunConfig, SweepSettings};
//!
//! let scene = Scene::new(load_mesh("model/itokawa.obj", 0.1)?);
//! let cameras = SweepSettings::default().cameras(&CameraConfig::default());
//! let outcome = scene.sweep(&cameras, &SunConfig::from_azimuth(0.0))?;
//! report::write_combined(&mut std::io::stdout(), &outcome.coverage)?;
//! # Ok::<(), glint::GlintError>(())
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::info;

pub mod export;
pub mod report;

pub use glint_math::{Dir3, Point3, Tolerance, Vec3};
pub use glint_mesh::{load_obj, parse_obj, uv_sphere, MeshError, Patches, SurfaceMesh};
pub use glint_raytrace::{BruteForceCaster, Ray, RayCaster, RayHit, TriangleBvh};
pub use glint_visibility::{
    run_sweep, sweep_with_cancel, AnalysisConfig, CameraConfig, CombinedCoverage,
    ConfigurationRun, CoverageAccumulator, MeshSettings, PipelineOutput, PipelineStage, Scene,
    SunConfig, SunOcclusionMode, SweepOutcome, SweepSettings, VisibilityError, VisibilityMask,
    VisibilityPipeline, VisibilityStats,
};

/// Errors returned by glint operations.
#[derive(Error, Debug)]
pub enum GlintError {
    /// An I/O error occurred while writing a report or export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The mesh could not be loaded.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// The analysis failed.
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A mask does not match the mesh it is applied to.
    #[error("mask has {actual} entries for a mesh with {expected} faces")]
    MaskLength {
        /// Number of mesh faces.
        expected: usize,
        /// Length of the mask.
        actual: usize,
    },
}

/// Result type for glint operations.
pub type Result<T> = std::result::Result<T, GlintError>;

/// Load a mesh from disk, scaling every vertex by `scale`.
///
/// Only Wavefront OBJ is supported.
pub fn load_mesh(path: impl AsRef<Path>, scale: f64) -> Result<SurfaceMesh> {
    let path = path.as_ref();
    let mesh = load_obj(path, scale)?;
    let extents = mesh.bounds().extents();
    info!(
        path = %path.display(),
        patches = mesh.num_faces(),
        extent_x = extents.x,
        extent_y = extents.y,
        extent_z = extents.z,
        "loaded mesh"
    );
    Ok(mesh)
}
