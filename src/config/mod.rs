// src/config/mod.rs

//! Typed map configuration.
//!
//! A map directory looks like:
//!
//! ```text
//! <map_dir>/map_info.json
//! <map_dir>/rooms/<room_name>.json
//! <map_dir>/trails/*.json
//! <map_dir>/<map_boundary>
//! ```

mod map_info;
mod room_template;
mod trail_template;
mod tunables;

pub use map_info::{LayerSpec, MapInfo, RoomSpec};
pub use room_template::{AssetSpec, BoundaryConfig, Placement, RoomCatalog, RoomGeometry, RoomTemplate};
pub use trail_template::TrailTemplate;
pub use tunables::GenerationTunables;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;

use crate::error::{MapGenError, Result};

pub const MAP_INFO_FILE: &str = "map_info.json";
pub const ROOMS_DIR: &str = "rooms";
pub const TRAILS_DIR: &str = "trails";

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| MapGenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| MapGenError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Everything needed to generate one map.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub info: MapInfo,
    pub rooms: RoomCatalog,
    pub trails: Vec<TrailTemplate>,
    pub boundary_path: Option<PathBuf>,
}

impl MapConfig {
    /// Assembles and validates an in-memory configuration.
    pub fn new(
        mut info: MapInfo,
        rooms: RoomCatalog,
        trails: Vec<TrailTemplate>,
        boundary_path: Option<PathBuf>,
    ) -> Result<Self> {
        info.validate()?;
        if trails.is_empty() {
            return Err(MapGenError::NoTrailTemplates(PathBuf::from(TRAILS_DIR)));
        }
        for name in info.referenced_room_names() {
            rooms.require(&name)?;
        }
        Ok(Self { info, rooms, trails, boundary_path })
    }

    pub fn load(map_dir: &Path) -> Result<Self> {
        let info: MapInfo = load_json(&map_dir.join(MAP_INFO_FILE))?;
        let rooms = RoomCatalog::load(&map_dir.join(ROOMS_DIR), &info.referenced_room_names())?;
        let trails = TrailTemplate::load_dir(&map_dir.join(TRAILS_DIR))?;
        let boundary_path = info.map_boundary.as_ref().map(|b| map_dir.join(b));

        info!(
            "Loaded map config from {}: {} layers, {} room templates, {} trail templates",
            map_dir.display(),
            info.map_layers.len(),
            rooms.len(),
            trails.len()
        );
        Self::new(info, rooms, trails, boundary_path)
    }
}
