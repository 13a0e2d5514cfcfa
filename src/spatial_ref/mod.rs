//! Spatial reference systems

mod srs;

pub use srs::SpatialRef;
