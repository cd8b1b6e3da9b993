#![warn(missing_docs)]

//! Ray casting against triangle meshes.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray representation with origin and direction
//! - [`Intersection`] / [`RayHit`] - hits along one ray / hits in a batch
//! - [`triangle`] - Möller–Trumbore ray/triangle test
//! - [`bvh`] - Bounding volume hierarchy for acceleration
//! - [`RayCaster`] - batch interface used by the visibility testers
//!
//! # Example
//!
//! ```ignore
//! use glint_raytrace::{Ray, RayCaster, TriangleBvh};
//!
//! let bvh = TriangleBvh::build(&mesh);
//! let rays = vec![Ray::new(camera, target - camera)];
//! for hit in bvh.cast_batch(&rays) {
//!     println!("ray {} hit face {} at t={}", hit.ray, hit.face, hit.t);
//! }
//! ```

mod ray;
pub mod bvh;
pub mod caster;
pub mod triangle;

pub use bvh::TriangleBvh;
pub use caster::{BruteForceCaster, RayCaster};
pub use ray::{Intersection, Ray, RayHit};
