// src/assets/scatter.rs

use std::path::Path;

use log::info;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::AssetSpawner;
use crate::config::{AssetSpec, BoundaryConfig, Placement, RoomTemplate};
use crate::error::Result;
use crate::geometry::{Area, Point2D};
use crate::rooms::{Asset, Room};
use crate::utils::util::offset_from_percent;

const DEFAULT_PLACEMENT_ATTEMPTS: usize = 64;
const DEFAULT_ROOM_PERIMETER_SPACING: f64 = 40.0;

/// Places assets straight from their spawn descriptors.
///
/// The last boundary config read is kept so rooms whose template sets
/// `inherits_map_assets` get the map-wide assets as well as their own.
#[derive(Debug, Clone)]
pub struct ScatterSpawner {
    boundary_assets: Vec<AssetSpec>,
    placement_attempts: usize,
    perimeter_spacing: f64,
}

impl Default for ScatterSpawner {
    fn default() -> Self {
        Self {
            boundary_assets: Vec::new(),
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
            perimeter_spacing: DEFAULT_ROOM_PERIMETER_SPACING,
        }
    }
}

impl ScatterSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boundary_assets(&self) -> &[AssetSpec] {
        &self.boundary_assets
    }

    fn instance_count<R: Rng + ?Sized>(spec: &AssetSpec, rng: &mut R) -> u32 {
        let (lo, hi) = if spec.min_number <= spec.max_number {
            (spec.min_number, spec.max_number)
        } else {
            (spec.max_number, spec.min_number)
        };
        rng.random_range(lo..=hi)
    }

    fn place<R: Rng + ?Sized>(&self, spec: &AssetSpec, area: &Area, rng: &mut R) -> Option<Point2D> {
        match spec.position {
            Placement::Center => Some(area.center()),
            Placement::Exact => {
                let bounds = area.bounds();
                let center = area.center();
                Some(Point2D::new(
                    offset_from_percent(spec.ep_x.unwrap_or(50), center.x, bounds.width()),
                    offset_from_percent(spec.ep_y.unwrap_or(50), center.y, bounds.height()),
                ))
            }
            Placement::Random => area.random_point_within(rng, self.placement_attempts),
            Placement::Perimeter => area
                .perimeter_points(self.perimeter_spacing)
                .choose(rng)
                .copied(),
        }
    }
}

fn excluded(point: Point2D, exclusions: &[&Area]) -> bool {
    exclusions.iter().any(|area| area.contains_point(point))
}

impl AssetSpawner for ScatterSpawner {
    fn spawn<R: Rng + ?Sized>(&mut self, room: &Room, template: &RoomTemplate, rng: &mut R) -> Vec<Asset> {
        let inherited: &[AssetSpec] = if template.inherits_map_assets {
            &self.boundary_assets
        } else {
            &[]
        };

        let mut assets = Vec::new();
        for spec in template.assets.iter().chain(inherited) {
            for _ in 0..Self::instance_count(spec, rng) {
                if let Some(position) = self.place(spec, room.area(), rng) {
                    assets.push(Asset::new(spec.name.clone(), position));
                }
            }
        }
        assets
    }

    fn spawn_boundary_from_file<R: Rng + ?Sized>(
        &mut self,
        path: &Path,
        boundary: &Area,
        exclusions: &[&Area],
        rng: &mut R,
    ) -> Result<Vec<Asset>> {
        let config = BoundaryConfig::load(path)?;

        let mut assets = Vec::new();
        for spec in &config.assets {
            if spec.position == Placement::Perimeter {
                for point in boundary.perimeter_points(config.perimeter_spacing) {
                    if !excluded(point, exclusions) {
                        assets.push(Asset::new(spec.name.clone(), point));
                    }
                }
                continue;
            }

            let tries = if spec.position == Placement::Random {
                self.placement_attempts
            } else {
                1
            };
            for _ in 0..Self::instance_count(spec, rng) {
                for _ in 0..tries {
                    match self.place(spec, boundary, rng) {
                        Some(point) if !excluded(point, exclusions) => {
                            assets.push(Asset::new(spec.name.clone(), point));
                            break;
                        }
                        _ => {}
                    }
                }
            }
        }

        info!(
            "Spawned {} boundary assets from {}",
            assets.len(),
            path.display()
        );
        self.boundary_assets = config.assets;
        Ok(assets)
    }
}
