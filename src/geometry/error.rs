//! Error types for coordinate mapping

use thiserror::Error;

/// Errors that can occur while mapping pointer coordinates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The element the click landed on has no usable area
    #[error("degenerate container {width}x{height}: both dimensions must be positive")]
    DegenerateContainer { width: f64, height: f64 },
}

impl GeometryError {
    /// Create a degenerate container error
    pub fn degenerate(width: f64, height: f64) -> Self {
        Self::DegenerateContainer { width, height }
    }
}
