//! Coordinate mapping between pixel clicks, normalized positions and
//! anchored placements
//!
//! Normalized coordinates are fractions of the container size with the
//! origin at the top-left corner, so a tag keeps its position regardless of
//! the resolution the image is rendered at.

pub mod error;
pub mod mapper;
pub mod types;

pub use error::GeometryError;
pub use mapper::{to_anchored_offsets, to_normalized};
pub use types::*;
