//! Batch ray casting interface.

use rayon::prelude::*;

use crate::triangle::intersect_triangle;
use crate::{Intersection, Ray, RayHit};
use glint_math::Point3;
use glint_mesh::SurfaceMesh;

/// Something rays can be cast against.
///
/// Implementors report every hit along a ray; [`RayCaster::cast_batch`]
/// runs a whole batch and tags each hit with the index of its ray. Rays that
/// hit nothing contribute nothing.
pub trait RayCaster: Sync {
    /// All intersections along `ray`, sorted by distance.
    fn intersections(&self, ray: &Ray) -> Vec<Intersection>;

    /// Cast every ray in `rays`, returning hits grouped by ray index.
    fn cast_batch(&self, rays: &[Ray]) -> Vec<RayHit> {
        rays.par_iter()
            .enumerate()
            .flat_map_iter(|(i, ray)| {
                self.intersections(ray)
                    .into_iter()
                    .map(move |hit| RayHit::new(i, hit))
            })
            .collect()
    }
}

/// Reference caster that tests every triangle for every ray.
///
/// Only sensible for small meshes; used to cross-check [`crate::TriangleBvh`].
#[derive(Debug, Clone)]
pub struct BruteForceCaster {
    triangles: Vec<[Point3; 3]>,
}

impl BruteForceCaster {
    /// Collect the triangles of `mesh`.
    pub fn new(mesh: &SurfaceMesh) -> Self {
        Self {
            triangles: mesh.triangles(),
        }
    }
}

impl RayCaster for BruteForceCaster {
    fn intersections(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = self
            .triangles
            .iter()
            .enumerate()
            .filter_map(|(face, tri)| {
                intersect_triangle(ray, tri).map(|t| Intersection {
                    t,
                    point: ray.at(t),
                    face,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }
}
