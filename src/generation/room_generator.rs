// src/generation/room_generator.rs

use std::f64::consts::TAU;

use log::{debug, info, warn};
use rand::Rng;

use super::layout::{get_children_from_layer, Sector};
use crate::assets::AssetSpawner;
use crate::config::{GenerationTunables, MapConfig};
use crate::error::{MapGenError, Result};
use crate::geometry::{Area, Point2D};
use crate::rooms::{RoomId, RoomKind, RoomSet};

/// Segments of the circle used as the map boundary.
const BOUNDARY_SEGMENTS: usize = 96;

/// Rooms placed on their rings, before any trail exists.
#[derive(Debug, Clone)]
pub struct Layout {
    pub rooms: RoomSet,
    /// Every parent/child pair, in placement order.
    pub connections: Vec<(RoomId, RoomId)>,
}

/// Lays rooms out ring by ring around the map center.
pub struct RoomGenerator<'a> {
    config: &'a MapConfig,
    tunables: &'a GenerationTunables,
}

impl<'a> RoomGenerator<'a> {
    pub fn new(config: &'a MapConfig, tunables: &'a GenerationTunables) -> Self {
        Self { config, tunables }
    }

    /// Builds the room tree. Layer 0 holds the single spawn room at the map
    /// center; every later layer splits each parent's sector among the
    /// children assigned to it.
    pub fn build_layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Layout> {
        let info = &self.config.info;
        let center = info.center();
        let mut rooms = RoomSet::new();
        let mut connections = Vec::new();

        let root_spec = info
            .map_layers
            .first()
            .and_then(|l| l.rooms.first())
            .ok_or_else(|| MapGenError::InvalidMap("layer 0 must name the spawn room".to_string()))?;
        let root = self.create_room(&mut rooms, &root_spec.name, 0, center, rng)?;
        info!("Placed spawn room '{}' at ({:.0}, {:.0})", root_spec.name, center.x, center.y);

        let mut sectors = vec![Sector::new(root, 0.0, TAU)];
        for pair in info.map_layers.windows(2) {
            let (parent_layer, layer) = (&pair[0], &pair[1]);
            if sectors.is_empty() {
                warn!("Layer {} has no parents, skipping it and every layer after it", layer.level);
                break;
            }

            // Required children first, then the pool goes to whichever
            // parent has the fewest so far. The spawn room's ring is filled
            // from the pool alone.
            let mut assigned: Vec<Vec<String>> = sectors
                .iter()
                .map(|sector| {
                    if parent_layer.level == 0 {
                        return Vec::new();
                    }
                    parent_layer
                        .room_spec(&rooms.get(sector.room).room_name)
                        .map(|spec| spec.required_children.clone())
                        .unwrap_or_default()
                })
                .collect();
            for name in get_children_from_layer(layer, rng) {
                if let Some(target) = (0..assigned.len()).min_by_key(|&i| assigned[i].len()) {
                    assigned[target].push(name);
                }
            }

            let mut next_sectors = Vec::new();
            let mut placed = Vec::new();
            for (sector, names) in sectors.iter().zip(assigned) {
                for (mut slice, name) in sector.subdivide(names.len()).into_iter().zip(names) {
                    let angle = slice.placement_angle(self.tunables.sector_buffer, rng);
                    let origin = Point2D::from_polar(center, layer.radius, angle);
                    let child = self.create_room(&mut rooms, &name, layer.level, origin, rng)?;
                    rooms.set_parent(child, sector.room);
                    connections.push((sector.room, child));
                    debug!("Placed '{}' {} on layer {} at angle {:.3}", name, child, layer.level, angle);

                    slice.room = child;
                    next_sectors.push(slice);
                    placed.push(child);
                }
            }

            rooms.link_siblings(&placed);
            info!("Layer {} placed {} rooms at radius {}", layer.level, placed.len(), layer.radius);
            sectors = next_sectors;
        }

        Ok(Layout { rooms, connections })
    }

    fn create_room<R: Rng + ?Sized>(
        &self,
        rooms: &mut RoomSet,
        name: &str,
        layer: usize,
        origin: Point2D,
        rng: &mut R,
    ) -> Result<RoomId> {
        let template = self.config.rooms.require(name)?;
        let area = Area::from_template(name, origin, template, rng);
        let id = rooms.insert(name, RoomKind::Room, layer, origin, area);
        let room = rooms.get_mut(id);
        room.is_spawn = template.is_spawn;
        room.is_boss = template.is_boss;
        Ok(id)
    }

    /// Spawns boundary decorations over a circle covering the whole map and
    /// hands each one to the room whose bounding-box center is nearest.
    /// Returns how many assets were placed; maps without a boundary config
    /// place none.
    pub fn decorate_boundary<S, R>(&self, rooms: &mut RoomSet, spawner: &mut S, rng: &mut R) -> Result<usize>
    where
        S: AssetSpawner,
        R: Rng + ?Sized,
    {
        let path = match &self.config.boundary_path {
            Some(path) => path,
            None => return Ok(0),
        };

        let info = &self.config.info;
        let boundary = Area::circle("map_boundary", info.center(), info.map_radius, BOUNDARY_SEGMENTS);
        let assets = {
            let exclusions = rooms.obstacles(&[]);
            spawner.spawn_boundary_from_file(path, &boundary, &exclusions, rng)?
        };

        let mut placed = 0;
        for asset in assets {
            if let Some(owner) = rooms.nearest_by_bbox_center(asset.position) {
                rooms.get_mut(owner).add_room_asset(asset);
                placed += 1;
            }
        }
        info!("Assigned {} boundary assets to rooms", placed);
        Ok(placed)
    }
}
