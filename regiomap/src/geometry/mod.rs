//! Geometry collections and spatial extents.
//!
//! A [`GeometrySet`] is an ordered collection of attributed features sharing
//! one CRS. Sets are immutable once produced; reprojection yields a new set
//! rather than mutating in place, so every pipeline stage can hand its output
//! to concurrent consumers without synchronization.

mod extent;
mod set;

pub use extent::Extent;
pub use set::{Feature, GeometrySet};
