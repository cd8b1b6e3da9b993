//! Visibility model export.

pub mod ply;

pub use ply::{PlyExport, Rgb, GRAY, RED};
