mod bounding_box;
mod sample_interior;

pub use bounding_box::{Aabb, BoundingBox};
pub use sample_interior::SampleInterior;
