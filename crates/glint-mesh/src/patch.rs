//! Per-face patch geometry: centroids and outward unit normals.

use glint_math::{normalize_floored, Point3, Vec3};

use crate::mesh::SurfaceMesh;

/// Floor applied to the cross-product length before normalizing a face normal.
pub const NORMAL_EPSILON: f64 = 1e-8;

/// Centroid and outward normal of every mesh face, in face order.
///
/// Computed once per mesh and shared read-only by every visibility run.
#[derive(Debug, Clone, Default)]
pub struct Patches {
    /// Face centroids.
    pub positions: Vec<Point3>,
    /// Unit face normals following the input winding.
    pub normals: Vec<Vec3>,
}

impl Patches {
    /// Extract patches from every face of `mesh`.
    pub fn from_mesh(mesh: &SurfaceMesh) -> Self {
        extract_patches(&mesh.triangles())
    }

    /// Number of patches.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if there are no patches.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Compute centroid and normal for each triangle.
///
/// The normal is `cross(v1 - v0, v2 - v0)` divided by its length floored at
/// [`NORMAL_EPSILON`]. Degenerate triangles therefore produce a short (possibly
/// zero) vector instead of NaN.
pub fn extract_patches(triangles: &[[Point3; 3]]) -> Patches {
    let mut positions = Vec::with_capacity(triangles.len());
    let mut normals = Vec::with_capacity(triangles.len());

    for [v0, v1, v2] in triangles {
        let centroid = Point3::from((v0.coords + v1.coords + v2.coords) / 3.0);
        let cross = (v1 - v0).cross(&(v2 - v0));
        positions.push(centroid);
        normals.push(normalize_floored(&cross, NORMAL_EPSILON));
    }

    Patches { positions, normals }
}
