// src/config/tunables.rs

use crate::generation::trail_geometry::{EDGE_MAX_STEPS, EDGE_STEP};

/// Knobs for layout, trail acceptance and graph repair. Defaults reproduce
/// the reference layouts; change them only if layout parity does not matter.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTunables {
    /// Shape attempts per parent/child trail.
    pub primary_attempts: usize,
    /// Polygons a primary trail may overlap.
    pub primary_allowed_intersections: usize,
    /// Shape attempts per repair or loop-back trail.
    pub repair_attempts: usize,
    /// Hard cap on isolated-group repair passes.
    pub repair_pass_cap: usize,
    /// Every this many passes the repair budget gains one intersection.
    pub escalation_period: usize,
    /// Reachable rooms tried per isolated room, least connected first.
    pub repair_candidate_cap: usize,
    /// Failed hops tolerated in a row while building the loop-back trail.
    pub circular_failure_streak: usize,
    /// A hub must sit on a layer strictly above this.
    pub hub_min_layer: usize,
    /// A hub must have strictly more connections than this.
    pub hub_min_degree: usize,
    /// Run degree balancing after repair.
    pub balance_degrees: bool,
    /// Fraction of each angular sector kept clear at both ends.
    pub sector_buffer: f64,
    /// How far a trail reaches inside a room past its edge.
    pub interior_depth: f64,
    /// How far past the edge the jittered part of a trail starts.
    pub edge_overshoot: f64,
    pub edge_step: f64,
    pub edge_max_steps: usize,
}

impl Default for GenerationTunables {
    fn default() -> Self {
        Self {
            primary_attempts: 1000,
            primary_allowed_intersections: 1,
            repair_attempts: 100,
            repair_pass_cap: 100_000,
            escalation_period: 5,
            repair_candidate_cap: 5,
            circular_failure_streak: 3,
            hub_min_layer: 2,
            hub_min_degree: 3,
            balance_degrees: false,
            sector_buffer: 0.05,
            interior_depth: 40.0,
            edge_overshoot: 30.0,
            edge_step: EDGE_STEP,
            edge_max_steps: EDGE_MAX_STEPS,
        }
    }
}
