// src/geometry/mod.rs
pub mod area;
pub mod bounds;
pub mod point;

pub use area::Area;
pub use bounds::BoundingBox;
pub use point::{Point2D, Segment2D};
