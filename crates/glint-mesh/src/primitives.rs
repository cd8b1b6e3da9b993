//! Procedural test bodies.

use std::f64::consts::{PI, TAU};

use glint_math::Point3;

use crate::error::Result;
use crate::mesh::SurfaceMesh;

/// UV sphere centered at the origin with outward (counter-clockwise) winding.
///
/// `n_lat` latitude bands (at least 2) and `n_lon` longitude segments (at
/// least 3). Pole caps are triangle fans; the bands between them are split
/// into two triangles per quad, giving `2 * n_lon * (n_lat - 1)` faces.
pub fn uv_sphere(radius: f64, n_lat: usize, n_lon: usize) -> Result<SurfaceMesh> {
    let n_lat = n_lat.max(2);
    let n_lon = n_lon.max(3);

    let mut vertices = Vec::with_capacity(2 + (n_lat - 1) * n_lon);
    vertices.push(Point3::new(0.0, 0.0, -radius));
    for j in 1..n_lat {
        let phi = -PI / 2.0 + PI * j as f64 / n_lat as f64;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for i in 0..n_lon {
            let theta = TAU * i as f64 / n_lon as f64;
            let (sin_t, cos_t) = theta.sin_cos();
            vertices.push(Point3::new(
                radius * cos_phi * cos_t,
                radius * cos_phi * sin_t,
                radius * sin_phi,
            ));
        }
    }
    let north = vertices.len() as u32;
    vertices.push(Point3::new(0.0, 0.0, radius));

    let ring = |band: usize, i: usize| (1 + band * n_lon + i % n_lon) as u32;
    let mut faces = Vec::with_capacity(2 * n_lon * (n_lat - 1));

    // South cap
    for i in 0..n_lon {
        faces.push([0, ring(0, i + 1), ring(0, i)]);
    }

    for band in 0..n_lat - 2 {
        for i in 0..n_lon {
            let bl = ring(band, i);
            let br = ring(band, i + 1);
            let tl = ring(band + 1, i);
            let tr = ring(band + 1, i + 1);
            faces.push([bl, br, tl]);
            faces.push([br, tr, tl]);
        }
    }

    // North cap
    for i in 0..n_lon {
        faces.push([north, ring(n_lat - 2, i), ring(n_lat - 2, i + 1)]);
    }

    SurfaceMesh::new(vertices, faces)
}
