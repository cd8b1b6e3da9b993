#![warn(missing_docs)]

//! Triangle surface meshes for glint.
//!
//! - [`SurfaceMesh`] - immutable vertex/face storage with per-face areas
//! - [`Patches`] - per-face centroids and outward unit normals
//! - [`obj`] - Wavefront OBJ import with a uniform scale factor
//! - [`uv_sphere`] - procedural sphere for tests and benchmarks
//!
//! # Example
//!
//! ```ignore
//! use glint_mesh::{load_obj, Patches};
//!
//! let mesh = load_obj("model/itokawa.obj", 0.1)?;
//! let patches = Patches::from_mesh(&mesh);
//! println!("{} patches, area {:.2}", patches.len(), mesh.total_area());
//! ```

pub mod error;
pub mod mesh;
pub mod obj;
pub mod patch;
pub mod primitives;

pub use error::{MeshError, Result};
pub use mesh::SurfaceMesh;
pub use obj::{load_obj, parse_obj};
pub use patch::{extract_patches, Patches, NORMAL_EPSILON};
pub use primitives::uv_sphere;
