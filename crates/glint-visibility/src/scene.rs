//! A mesh bundled with its patches and acceleration structure.

use glint_math::Tolerance;
use glint_mesh::{Patches, SurfaceMesh};
use glint_raytrace::TriangleBvh;
use tracing::debug;

use crate::config::{CameraConfig, SunConfig};
use crate::error::Result;
use crate::pipeline::{PipelineOutput, VisibilityPipeline};
use crate::sweep::{run_sweep, SweepOutcome};

/// Owns everything the pipeline borrows.
///
/// Patches and the BVH are derived once here and shared read-only by every
/// run against this scene.
#[derive(Debug)]
pub struct Scene {
    mesh: SurfaceMesh,
    patches: Patches,
    bvh: TriangleBvh,
}

impl Scene {
    /// Extract patches and build the BVH for `mesh`.
    pub fn new(mesh: SurfaceMesh) -> Self {
        let patches = Patches::from_mesh(&mesh);
        let bvh = TriangleBvh::build(&mesh);
        debug!(
            faces = mesh.num_faces(),
            vertices = mesh.num_vertices(),
            "scene ready"
        );
        Self { mesh, patches, bvh }
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn patches(&self) -> &Patches {
        &self.patches
    }

    pub fn bvh(&self) -> &TriangleBvh {
        &self.bvh
    }

    /// A pipeline over this scene.
    pub fn pipeline(&self) -> VisibilityPipeline<'_, TriangleBvh> {
        VisibilityPipeline {
            mesh: &self.mesh,
            patches: &self.patches,
            caster: &self.bvh,
            tolerance: Tolerance::DEFAULT,
        }
    }

    /// Run one configuration.
    pub fn analyze(&self, camera: &CameraConfig, sun: &SunConfig) -> Result<PipelineOutput> {
        self.pipeline().run(camera, sun)
    }

    /// Run every camera in `cameras` against one sun.
    pub fn sweep(&self, cameras: &[CameraConfig], sun: &SunConfig) -> Result<SweepOutcome> {
        run_sweep(&self.pipeline(), cameras, sun)
    }
}
