//! Immutable triangle surface mesh.

use glint_math::{Aabb3, Point3};

use crate::error::{MeshError, Result};

/// Triangulated surface of a body.
///
/// Every face references exactly three valid vertex indices. Degenerate
/// (zero-area) faces are allowed.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    vertices: Vec<Point3>,
    faces: Vec<[u32; 3]>,
    areas: Vec<f64>,
}

impl SurfaceMesh {
    /// Build a mesh, validating that every face index is in range.
    pub fn new(vertices: Vec<Point3>, faces: Vec<[u32; 3]>) -> Result<Self> {
        if faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        let vertex_count = vertices.len();
        for (face, tri) in faces.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::InvalidIndex {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        let areas = faces
            .iter()
            .map(|&[a, b, c]| {
                let v0 = vertices[a as usize];
                let v1 = vertices[b as usize];
                let v2 = vertices[c as usize];
                0.5 * (v1 - v0).cross(&(v2 - v0)).norm()
            })
            .collect();

        Ok(Self {
            vertices,
            faces,
            areas,
        })
    }

    /// Build a mesh from a flat `[x0, y0, z0, ...]` position array and a flat
    /// `[i0, i1, i2, ...]` index array.
    pub fn from_flat(positions: &[f64], indices: &[u32]) -> Result<Self> {
        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(vertices, faces)
    }

    /// Number of triangles.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Face index triples.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Area of each face.
    pub fn face_areas(&self) -> &[f64] {
        &self.areas
    }

    /// Sum of all face areas.
    pub fn total_area(&self) -> f64 {
        self.areas.iter().sum()
    }

    /// Sum of the areas of faces whose mask entry is set.
    ///
    /// Entries past the end of `mask` count as unset.
    pub fn masked_area(&self, mask: &[bool]) -> f64 {
        self.areas
            .iter()
            .zip(mask)
            .filter_map(|(&a, &m)| m.then_some(a))
            .sum()
    }

    /// The three corner positions of face `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[index];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Corner positions of every face, in face order.
    pub fn triangles(&self) -> Vec<[Point3; 3]> {
        (0..self.faces.len()).map(|i| self.triangle(i)).collect()
    }

    /// Bounding box of all vertices.
    pub fn bounds(&self) -> Aabb3 {
        let mut bb = Aabb3::empty();
        for v in &self.vertices {
            bb.include_point(v);
        }
        bb
    }

    /// Copy of this mesh with every vertex scaled about the origin.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(MeshError::InvalidScale(factor));
        }
        let vertices = self
            .vertices
            .iter()
            .map(|v| Point3::from(v.coords * factor))
            .collect();
        let areas = self.areas.iter().map(|a| a * factor * factor).collect();
        Ok(Self {
            vertices,
            faces: self.faces.clone(),
            areas,
        })
    }
}
