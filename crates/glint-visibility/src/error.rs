//! Error types for visibility analysis.

use glint_math::MathError;
use thiserror::Error;

/// Errors that can occur during visibility analysis.
#[derive(Error, Debug)]
pub enum VisibilityError {
    /// A direction input (view axis or sun direction) has no usable length.
    #[error("degenerate {what}: {source}")]
    DegenerateDirection {
        /// Which input was degenerate.
        what: &'static str,
        /// Underlying math error.
        #[source]
        source: MathError,
    },

    /// Invalid analysis settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A mask does not have one entry per patch.
    #[error("mask has {actual} entries, expected {expected}")]
    MaskLength {
        /// Number of patches.
        expected: usize,
        /// Length of the offending mask.
        actual: usize,
    },

    /// Patch arrays do not match the mesh they were extracted from.
    #[error("{actual} patches for a mesh with {expected} faces")]
    PatchCount {
        /// Number of mesh faces.
        expected: usize,
        /// Number of patches supplied.
        actual: usize,
    },

    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for visibility operations.
pub type Result<T> = std::result::Result<T, VisibilityError>;
