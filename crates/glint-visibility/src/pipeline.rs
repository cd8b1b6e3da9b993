//! Single-configuration visibility pipeline.
//!
//! ```text
//! Init -> GeometricCull -> CameraOcclusion -> LightingCandidates -> SunOcclusion -> Combine -> Done
//! ```
//!
//! Each stage narrows the previous mask. When nothing survives camera
//! occlusion the run jumps straight to `Done` with an all-false mask.

use std::fmt;

use glint_math::{clamped_acos, normalize_floored, Dir3, Point3, Tolerance};
use glint_mesh::{Patches, SurfaceMesh};
use glint_raytrace::RayCaster;
use tracing::{debug, instrument};

use crate::config::{CameraConfig, SunConfig};
use crate::error::{Result, VisibilityError};
use crate::fov::cull_fov;
use crate::lighting::{check_reflection_among, check_sun_illumination_among};
use crate::mask::VisibilityMask;
use crate::occlusion::{filter_camera_occluded, filter_sun_occluded, ShadowParams};
use crate::stats::VisibilityStats;

/// Length floor for the patch-to-camera direction used in viewing angles.
const VIEW_EPSILON: f64 = 1e-12;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Init,
    GeometricCull,
    CameraOcclusion,
    LightingCandidates,
    SunOcclusion,
    Combine,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::GeometricCull => "geometric-cull",
            Self::CameraOcclusion => "camera-occlusion",
            Self::LightingCandidates => "lighting-candidates",
            Self::SunOcclusion => "sun-occlusion",
            Self::Combine => "combine",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Final mask and statistics from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub mask: VisibilityMask,
    pub stats: VisibilityStats,
}

/// Runs the visibility stages for one camera/sun configuration.
///
/// Borrows the mesh, its patches and a ray caster; none of them are mutated,
/// so one pipeline can serve any number of concurrent runs.
#[derive(Debug)]
pub struct VisibilityPipeline<'a, C: RayCaster + ?Sized> {
    pub(crate) mesh: &'a SurfaceMesh,
    pub(crate) patches: &'a Patches,
    pub(crate) caster: &'a C,
    pub(crate) tolerance: Tolerance,
}

impl<'a, C: RayCaster + ?Sized> VisibilityPipeline<'a, C> {
    /// Create a pipeline over `mesh`.
    ///
    /// `patches` must hold one entry per mesh face.
    pub fn new(mesh: &'a SurfaceMesh, patches: &'a Patches, caster: &'a C) -> Result<Self> {
        if patches.len() != mesh.num_faces() || patches.normals.len() != patches.len() {
            return Err(VisibilityError::PatchCount {
                expected: mesh.num_faces(),
                actual: patches.len(),
            });
        }
        Ok(Self {
            mesh,
            patches,
            caster,
            tolerance: Tolerance::DEFAULT,
        })
    }

    /// Replace the distance tolerance used by both occlusion tests.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Number of patches every output mask covers.
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    pub fn mesh(&self) -> &'a SurfaceMesh {
        self.mesh
    }

    /// Run every stage for one configuration.
    ///
    /// Fails only on invalid settings or a degenerate view axis / sun
    /// direction; all per-patch degeneracies are absorbed by epsilon floors.
    #[instrument(skip_all, fields(camera = ?camera.position))]
    pub fn run(&self, camera: &CameraConfig, sun: &SunConfig) -> Result<PipelineOutput> {
        camera.validate()?;
        sun.validate()?;
        let sun_direction = sun.unit_direction()?;
        let camera_position = camera.position_point();
        let n = self.patches.len();
        let total_area = self.mesh.total_area();
        debug!(stage = %PipelineStage::Init, patches = n);

        let geometric = cull_fov(self.patches, camera)?;
        debug!(stage = %PipelineStage::GeometricCull, visible = geometric.count());

        let unoccluded = filter_camera_occluded(
            self.caster,
            &self.patches.positions,
            &camera_position,
            &geometric,
            &self.tolerance,
        )?;
        debug!(stage = %PipelineStage::CameraOcclusion, unoccluded = unoccluded.count());

        if !unoccluded.any() {
            debug!(stage = %PipelineStage::Done, "nothing in line of sight");
            return Ok(PipelineOutput {
                mask: VisibilityMask::none(n),
                stats: VisibilityStats::empty(n, total_area),
            });
        }

        let illuminated = check_sun_illumination_among(
            &self.patches.normals,
            &unoccluded,
            &sun_direction,
            sun.max_sun_angle_deg,
        );
        let reflection = check_reflection_among(
            self.patches,
            &unoccluded,
            &camera_position,
            &sun_direction,
            sun.min_reflection_angle_deg,
        );
        let lighting = &illuminated & &reflection;
        debug!(
            stage = %PipelineStage::LightingCandidates,
            illuminated = illuminated.count(),
            reflection = reflection.count(),
            candidates = lighting.count(),
        );

        let params = ShadowParams {
            tolerance: self.tolerance,
            ..ShadowParams::from(sun)
        };
        let sun_clear = filter_sun_occluded(
            self.caster,
            &self.patches.positions,
            &lighting,
            &sun_direction,
            &params,
        )?;
        debug!(stage = %PipelineStage::SunOcclusion, unoccluded = sun_clear.count());

        let mask = &lighting & &sun_clear;
        let stats = self.combine(
            &geometric,
            &unoccluded,
            &illuminated,
            &reflection,
            &sun_clear,
            &mask,
            &camera_position,
            &sun_direction,
        );
        debug!(
            stage = %PipelineStage::Done,
            visible = stats.final_visible,
            visible_area = stats.visible_area,
        );

        Ok(PipelineOutput { mask, stats })
    }

    #[allow(clippy::too_many_arguments)]
    fn combine(
        &self,
        geometric: &VisibilityMask,
        unoccluded: &VisibilityMask,
        illuminated: &VisibilityMask,
        reflection: &VisibilityMask,
        sun_clear: &VisibilityMask,
        mask: &VisibilityMask,
        camera: &Point3,
        sun_direction: &Dir3,
    ) -> VisibilityStats {
        let s = sun_direction.as_ref();
        let visible_indices = mask.indices();
        let (incidence_angles, viewing_angles) = visible_indices
            .iter()
            .map(|&i| {
                let normal = &self.patches.normals[i];
                let view = normalize_floored(&(camera - self.patches.positions[i]), VIEW_EPSILON);
                (clamped_acos(normal.dot(s)), clamped_acos(normal.dot(&view)))
            })
            .unzip();

        VisibilityStats {
            geometric_visible: geometric.count(),
            camera_unoccluded: unoccluded.count(),
            sun_illuminated: illuminated.count(),
            reflection_ok: reflection.count(),
            sun_unoccluded: sun_clear.count(),
            final_visible: visible_indices.len(),
            total_patches: self.patches.len(),
            visible_area: self.mesh.masked_area(mask),
            total_area: self.mesh.total_area(),
            visible_indices,
            incidence_angles,
            viewing_angles,
        }
    }
}
