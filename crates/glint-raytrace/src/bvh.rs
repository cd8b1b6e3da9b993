//! Bounding Volume Hierarchy over mesh triangles.
//!
//! Uses Surface Area Heuristic (SAH) for construction.

use glint_math::{Aabb3, Point3};
use glint_mesh::SurfaceMesh;

use crate::caster::RayCaster;
use crate::triangle::{intersect_triangle, triangle_aabb};
use crate::{Intersection, Ray};

/// Maximum number of triangles stored in a leaf.
const LEAF_SIZE: usize = 4;

/// A BVH node - either a leaf containing faces or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node containing face indices.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Face indices contained in this leaf.
        faces: Vec<usize>,
    },
    /// Internal node with two children.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

/// Bounding Volume Hierarchy for accelerated ray-mesh intersection.
#[derive(Debug, Clone)]
pub struct TriangleBvh {
    root: Option<BvhNode>,
    triangles: Vec<[Point3; 3]>,
}

/// Per-face build record: face index, bounds and bounds centroid.
type FaceData = (usize, Aabb3, Point3);

impl TriangleBvh {
    /// Build a BVH from a mesh using SAH construction.
    pub fn build(mesh: &SurfaceMesh) -> Self {
        let triangles = mesh.triangles();

        let mut face_data: Vec<FaceData> = triangles
            .iter()
            .enumerate()
            .map(|(face, tri)| {
                let aabb = triangle_aabb(tri);
                (face, aabb, aabb.center())
            })
            .collect();

        let root = if face_data.is_empty() {
            None
        } else {
            Some(build_node(&mut face_data))
        };

        Self { root, triangles }
    }

    /// Number of triangles indexed.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Get a reference to the root node, if any.
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Trace a ray through the BVH, returning all intersections sorted by t.
    pub fn trace(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits = Vec::new();

        if let Some(ref root) = self.root {
            self.trace_node(ray, root, &mut hits);
        }

        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    /// Trace a ray through a single node.
    fn trace_node(&self, ray: &Ray, node: &BvhNode, hits: &mut Vec<Intersection>) {
        match node {
            BvhNode::Leaf { aabb, faces } => {
                if ray.intersect_aabb(aabb).is_some() {
                    for &face in faces {
                        if let Some(hit) = self.test_face(ray, face) {
                            hits.push(hit);
                        }
                    }
                }
            }
            BvhNode::Internal { aabb, left, right } => {
                if ray.intersect_aabb(aabb).is_some() {
                    self.trace_node(ray, left, hits);
                    self.trace_node(ray, right, hits);
                }
            }
        }
    }

    /// Test a ray against a single face.
    #[inline]
    fn test_face(&self, ray: &Ray, face: usize) -> Option<Intersection> {
        intersect_triangle(ray, &self.triangles[face]).map(|t| Intersection {
            t,
            point: ray.at(t),
            face,
        })
    }
}

impl RayCaster for TriangleBvh {
    fn intersections(&self, ray: &Ray) -> Vec<Intersection> {
        self.trace(ray)
    }
}

/// Build a BVH node recursively using SAH.
fn build_node(face_data: &mut [FaceData]) -> BvhNode {
    // Compute bounds of all faces
    let mut bounds = Aabb3::empty();
    for (_, aabb, _) in face_data.iter() {
        bounds.include_aabb(aabb);
    }

    // Base case: small number of faces -> leaf
    if face_data.len() <= LEAF_SIZE {
        return BvhNode::Leaf {
            aabb: bounds,
            faces: face_data.iter().map(|(id, _, _)| *id).collect(),
        };
    }

    // Find best split using SAH
    let split = find_best_split(face_data, &bounds);

    // Partition faces, falling back to a median split when SAH finds nothing
    let mid = match split {
        Some((axis, pos)) => partition_faces(face_data, axis, pos),
        None => 0,
    };
    let mid = if mid == 0 || mid == face_data.len() {
        face_data.len() / 2
    } else {
        mid
    };

    let (left_data, right_data) = face_data.split_at_mut(mid);

    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left_data)),
        right: Box::new(build_node(right_data)),
    }
}

/// Find the best split axis and position using SAH.
fn find_best_split(face_data: &[FaceData], bounds: &Aabb3) -> Option<(usize, f64)> {
    const NUM_BUCKETS: usize = 12;

    let extent = bounds.extents();
    let total_area = bounds.surface_area();

    let mut best: Option<(usize, f64)> = None;
    let mut best_cost = f64::INFINITY;

    // Try each axis
    for axis in 0..3 {
        let axis_extent = extent[axis];
        if axis_extent < 1e-10 {
            continue;
        }
        let axis_min = bounds.min[axis];

        // Initialize buckets
        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); NUM_BUCKETS];

        // Assign faces to buckets
        for (_, aabb, centroid) in face_data {
            let b = ((centroid[axis] - axis_min) / axis_extent * NUM_BUCKETS as f64) as usize;
            let b = b.min(NUM_BUCKETS - 1);

            bucket_counts[b] += 1;
            bucket_bounds[b].include_aabb(aabb);
        }

        // Sweep to find best split
        for split in 1..NUM_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += bucket_counts[i];
                if bucket_counts[i] > 0 {
                    left_bounds.include_aabb(&bucket_bounds[i]);
                }
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..NUM_BUCKETS {
                right_count += bucket_counts[i];
                if bucket_counts[i] > 0 {
                    right_bounds.include_aabb(&bucket_bounds[i]);
                }
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            // SAH cost: traversal + P(left) * N_left + P(right) * N_right
            let cost = if total_area > 0.0 {
                0.125
                    + left_bounds.surface_area() / total_area * left_count as f64
                    + right_bounds.surface_area() / total_area * right_count as f64
            } else {
                (left_count.max(right_count)) as f64
            };

            if cost < best_cost {
                best_cost = cost;
                best = Some((axis, axis_min + (split as f64 / NUM_BUCKETS as f64) * axis_extent));
            }
        }
    }

    best
}

/// Partition faces by centroid along an axis.
fn partition_faces(face_data: &mut [FaceData], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = face_data.len();

    while left < right {
        if face_data[left].2[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            face_data.swap(left, right);
        }
    }

    left
}
