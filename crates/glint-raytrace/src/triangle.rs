//! Ray/triangle intersection.

use glint_math::{Aabb3, Point3};

use crate::Ray;

/// Determinant magnitude below which a ray counts as parallel to a triangle.
pub const PARALLEL_EPSILON: f64 = 1e-12;

/// Smallest accepted ray parameter; hits at or behind the origin are ignored.
pub const MIN_T: f64 = 1e-9;

/// Möller–Trumbore ray-triangle intersection.
///
/// Returns the ray parameter of the hit. Both faces of the triangle are hit;
/// edges and corners count as inside.
#[allow(clippy::many_single_char_names)]
pub fn intersect_triangle(ray: &Ray, tri: &[Point3; 3]) -> Option<f64> {
    let [v0, v1, v2] = tri;
    let direction = ray.direction.as_ref();
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle (or triangle is degenerate)
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);

    if t > MIN_T {
        Some(t)
    } else {
        None
    }
}

/// Bounding box of a triangle.
pub fn triangle_aabb(tri: &[Point3; 3]) -> Aabb3 {
    let mut aabb = Aabb3::empty();
    for p in tri {
        aabb.include_point(p);
    }
    aabb
}
