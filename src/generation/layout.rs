// src/generation/layout.rs

//! Layer pools and angular sectors used while placing rooms.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::LayerSpec;
use crate::rooms::RoomId;

/// An angular range reserved for one room's subtree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub room: RoomId,
    pub start_angle: f64,
    pub span_angle: f64,
}

impl Sector {
    pub fn new(room: RoomId, start_angle: f64, span_angle: f64) -> Self {
        Self { room, start_angle, span_angle }
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.span_angle
    }

    /// Splits this sector into `count` equal, adjacent slices in order. The
    /// slices still name this sector's room until the caller hands them over.
    pub fn subdivide(&self, count: usize) -> Vec<Sector> {
        if count == 0 {
            return Vec::new();
        }
        let slice = self.span_angle / count as f64;
        (0..count)
            .map(|i| Sector::new(self.room, self.start_angle + slice * i as f64, slice))
            .collect()
    }

    /// Random angle inside the sector, keeping `buffer_fraction` of the span
    /// clear at both ends.
    pub fn placement_angle<R: Rng + ?Sized>(&self, buffer_fraction: f64, rng: &mut R) -> f64 {
        let buffer = self.span_angle * buffer_fraction;
        let lo = self.start_angle + buffer;
        let hi = self.end_angle() - buffer;
        if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            self.start_angle + self.span_angle / 2.0
        }
    }
}

/// Room names for one layer, shuffled.
///
/// Every room entry contributes `min_instances` copies unconditionally. The rest,
/// up to `max_instances`, go into an expandable pool; copies are promoted from
/// it at random until the layer reaches a target drawn from
/// `[min_rooms, max_rooms]` or the pool runs dry.
pub fn get_children_from_layer<R: Rng + ?Sized>(layer: &LayerSpec, rng: &mut R) -> Vec<String> {
    let mut pool = Vec::new();
    let mut expandable = Vec::new();
    for spec in &layer.rooms {
        for _ in 0..spec.min_instances {
            pool.push(spec.name.clone());
        }
        for _ in spec.min_instances..spec.max_instances {
            expandable.push(spec.name.clone());
        }
    }

    let (lo, hi) = (layer.min_rooms().min(layer.max_rooms), layer.max_rooms);
    let target = rng.random_range(lo..=hi);
    while pool.len() < target && !expandable.is_empty() {
        let pick = rng.random_range(0..expandable.len());
        pool.push(expandable.swap_remove(pick));
    }

    pool.shuffle(rng);
    pool
}
