// src/assets/mod.rs

//! Asset placement collaborators. The generator only asks a spawner to fill
//! a room or the map boundary; what gets placed is up to the implementation.

mod scatter;

pub use scatter::ScatterSpawner;

use std::path::Path;

use rand::Rng;

use crate::config::RoomTemplate;
use crate::error::Result;
use crate::geometry::Area;
use crate::rooms::{Asset, Room};

pub trait AssetSpawner {
    /// Assets for one room, built from its template's spawn descriptors.
    fn spawn<R: Rng + ?Sized>(&mut self, room: &Room, template: &RoomTemplate, rng: &mut R) -> Vec<Asset>;

    /// Boundary decorations read from a boundary config file, placed on or
    /// inside `boundary` and outside every polygon in `exclusions`.
    fn spawn_boundary_from_file<R: Rng + ?Sized>(
        &mut self,
        path: &Path,
        boundary: &Area,
        exclusions: &[&Area],
        rng: &mut R,
    ) -> Result<Vec<Asset>>;
}

/// Places nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpawner;

impl AssetSpawner for NullSpawner {
    fn spawn<R: Rng + ?Sized>(&mut self, _room: &Room, _template: &RoomTemplate, _rng: &mut R) -> Vec<Asset> {
        Vec::new()
    }

    fn spawn_boundary_from_file<R: Rng + ?Sized>(
        &mut self,
        _path: &Path,
        _boundary: &Area,
        _exclusions: &[&Area],
        _rng: &mut R,
    ) -> Result<Vec<Asset>> {
        Ok(Vec::new())
    }
}
