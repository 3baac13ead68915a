// src/rooms/asset.rs

use crate::geometry::Point2D;

/// A decoration placed in the world. Owned by exactly one room.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    pub position: Point2D,
}

impl Asset {
    pub fn new(name: impl Into<String>, position: Point2D) -> Self {
        Self { name: name.into(), position }
    }
}
