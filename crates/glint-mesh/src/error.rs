//! Error types for mesh construction and import.

use thiserror::Error;

/// Errors that can occur while building or loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// I/O error while reading a mesh file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in a mesh file.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but mesh has {vertex_count} vertices")]
    InvalidIndex {
        /// Face index.
        face: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Mesh has no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Scale factor is zero, negative or not finite.
    #[error("invalid scale factor: {0}")]
    InvalidScale(f64),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
