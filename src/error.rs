//! Error types for Voronoi diagram generation

use thiserror::Error;

/// Errors that can occur while configuring a diagram or querying it
///
/// The sweep itself never fails: degenerate input yields a diagram with fewer
/// cells or edges instead of an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Bounding rectangle is empty or not finite
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
    /// Generation produced no usable diagram
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
