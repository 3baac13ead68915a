// src/generation/mod.rs

//! The map pipeline: radial layout, trails, graph repair and population.

pub mod layout;
pub mod room_generator;
pub mod trail_generator;
pub mod trail_geometry;

pub use layout::{get_children_from_layer, Sector};
pub use room_generator::{Layout, RoomGenerator};
pub use trail_generator::TrailGenerator;

use std::time::Instant;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::AssetSpawner;
use crate::config::{GenerationTunables, MapConfig};
use crate::error::Result;
use crate::geometry::Point2D;
use crate::rooms::{RoomKind, RoomSet};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// Seconds spent in `generate`.
    pub generation_time: f64,
    pub room_count: usize,
    pub trail_count: usize,
    pub asset_count: usize,
    /// Rooms still unreachable from the spawn room when generation ended.
    pub isolated_rooms: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub rooms: RoomSet,
    pub center: Point2D,
    pub radius: f64,
    pub stats: GenerationStats,
}

pub struct MapGenerator {
    config: MapConfig,
    tunables: GenerationTunables,
    seed: u64,
    rng: StdRng,
}

impl MapGenerator {
    pub fn new(config: MapConfig, tunables: GenerationTunables, seed: u64) -> Self {
        MapGenerator {
            config,
            tunables,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn tunables(&self) -> &GenerationTunables {
        &self.tunables
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Places every room without connecting any of them.
    pub fn layout(&mut self) -> Result<Layout> {
        RoomGenerator::new(&self.config, &self.tunables).build_layout(&mut self.rng)
    }

    /// Connects each parent/child pair of `layout` and returns the rooms.
    pub fn connect_layout(&mut self, layout: Layout) -> RoomSet {
        let Layout { mut rooms, connections } = layout;
        TrailGenerator::new(&self.config.trails, &self.tunables).connect_primary(
            &mut rooms,
            &connections,
            &mut self.rng,
        );
        rooms
    }

    /// Runs the whole pipeline: layout, primary trails, loop-back, isolated
    /// repair, optional degree balancing, room population and boundary
    /// decoration.
    pub fn generate<S: AssetSpawner>(&mut self, spawner: &mut S) -> Result<GeneratedMap> {
        let start = Instant::now();
        let room_generator = RoomGenerator::new(&self.config, &self.tunables);
        let Layout { mut rooms, connections } = room_generator.build_layout(&mut self.rng)?;

        let mut trails = TrailGenerator::new(&self.config.trails, &self.tunables);
        trails.connect_primary(&mut rooms, &connections, &mut self.rng);
        trails.circular_connection(&mut rooms, &mut self.rng);
        trails.find_and_connect_isolated(&mut rooms, &mut self.rng);
        if self.tunables.balance_degrees {
            trails.balance_degrees(&mut rooms, &mut self.rng);
        }

        for id in rooms.live_ids() {
            if rooms.get(id).kind != RoomKind::Room {
                continue;
            }
            let template = self.config.rooms.require(&rooms.get(id).room_name)?;
            let assets = spawner.spawn(rooms.get(id), template, &mut self.rng);
            rooms.get_mut(id).add_room_assets(assets);
        }
        room_generator.decorate_boundary(&mut rooms, spawner, &mut self.rng)?;

        let stats = GenerationStats {
            generation_time: start.elapsed().as_secs_f64(),
            room_count: rooms.count_kind(RoomKind::Room),
            trail_count: rooms.count_kind(RoomKind::Trail),
            asset_count: rooms.live().map(|r| r.assets().len()).sum(),
            isolated_rooms: rooms.isolated_groups().iter().map(Vec::len).sum(),
        };
        info!(
            "Generated map (seed {}): {} rooms, {} trails, {} assets, {} isolated in {:.3}s",
            self.seed,
            stats.room_count,
            stats.trail_count,
            stats.asset_count,
            stats.isolated_rooms,
            stats.generation_time
        );

        Ok(GeneratedMap {
            rooms,
            center: self.config.info.center(),
            radius: self.config.info.map_radius,
            stats,
        })
    }
}
