// src/editor/mod.rs

//! Dev-mode session: holds the current map behind a shared lock so viewers
//! can read it while the session regenerates or exports rooms.

use std::path::Path;
use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

use crate::assets::AssetSpawner;
use crate::config::{GenerationTunables, MapConfig};
use crate::error::{MapGenError, Result};
use crate::generation::{GeneratedMap, MapGenerator};

pub struct MapSession<S: AssetSpawner> {
    config: MapConfig,
    tunables: GenerationTunables,
    seed: u64,
    spawner: S,
    /// The current map. Readers clone the `Arc` and take read locks;
    /// `regenerate` swaps the contents under a write lock.
    map: Arc<RwLock<GeneratedMap>>,
}

impl<S: AssetSpawner> MapSession<S> {
    /// Generates the first map with `seed`.
    pub fn new(config: MapConfig, tunables: GenerationTunables, seed: u64, mut spawner: S) -> Result<Self> {
        let map = MapGenerator::new(config.clone(), tunables.clone(), seed).generate(&mut spawner)?;
        Ok(Self {
            config,
            tunables,
            seed,
            spawner,
            map: Arc::new(RwLock::new(map)),
        })
    }

    pub fn map(&self) -> Arc<RwLock<GeneratedMap>> {
        Arc::clone(&self.map)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Throws the current rooms away and builds a new map with the next
    /// seed. Blocks until done; on error the old map stays in place.
    pub fn regenerate(&mut self) -> Result<()> {
        let seed = self.seed.wrapping_add(1);
        let map = MapGenerator::new(self.config.clone(), self.tunables.clone(), seed)
            .generate(&mut self.spawner)?;
        *self.map.write() = map;
        self.seed = seed;
        info!("Regenerated map with seed {}", seed);
        Ok(())
    }

    /// Writes the first live room named `room_name` out as a static room
    /// template. The template is named after the output file.
    pub fn export_room_template(&self, room_name: &str, out_path: &Path) -> Result<()> {
        let map = self.map.read();
        let id = map
            .rooms
            .find_by_name(room_name)
            .ok_or_else(|| MapGenError::UnknownRoom(room_name.to_string()))?;
        let template_name = out_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| room_name.to_string());

        map.rooms.write_static_room_json(id, &template_name, out_path)?;
        info!("Exported room '{}' {} to {}", room_name, id, out_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{NullSpawner, ScatterSpawner};
    use crate::config::{AssetSpec, LayerSpec, MapInfo, Placement, RoomCatalog, RoomSpec, RoomTemplate, TrailTemplate};

    fn config() -> MapConfig {
        let layer = |level, radius, name: &str, max| LayerSpec {
            level,
            radius,
            max_rooms: max,
            min_rooms: None,
            rooms: vec![RoomSpec {
                name: name.to_string(),
                min_instances: 0,
                max_instances: max,
                required_children: Vec::new(),
            }],
        };
        let info = MapInfo {
            map_radius: 800.0,
            map_boundary: None,
            map_layers: vec![layer(0, 0.0, "spawn", 1), layer(1, 400.0, "den", 3)],
        };
        let mut rooms = RoomCatalog::new();
        let mut spawn = RoomTemplate::square("spawn", 200, 200);
        spawn.is_spawn = true;
        spawn.assets = vec![AssetSpec::exact("lamp", 75, 25)];
        rooms.insert(spawn);
        rooms.insert(RoomTemplate::square("den", 50, 50));
        MapConfig::new(info, rooms, vec![TrailTemplate::new("path", 8, 12, 2)], None).unwrap()
    }

    #[test]
    fn test_regenerate_swaps_shared_map() {
        let mut session = MapSession::new(config(), GenerationTunables::default(), 10, NullSpawner).unwrap();
        let shared = session.map();
        let origins = |map: &GeneratedMap| -> Vec<_> {
            map.rooms.layer(1).iter().map(|&id| map.rooms.get(id).origin).collect()
        };
        let before = origins(&shared.read());

        session.regenerate().unwrap();
        assert_eq!(session.seed(), 11);

        let after = origins(&shared.read());
        assert_eq!(after.len(), 3);
        assert_ne!(before, after);
    }

    #[test]
    fn test_export_spawn_room_template() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("spawn_static.json");
        let session = MapSession::new(config(), GenerationTunables::default(), 1, ScatterSpawner::new()).unwrap();

        session.export_room_template("spawn", &out).unwrap();
        let template = RoomTemplate::load(&out).unwrap();

        assert_eq!(template.name, "spawn_static");
        assert_eq!(template.min_width, 200);
        assert!(template.is_spawn);
        assert_eq!(template.assets.len(), 2);
        assert_eq!(template.assets[0].name, "lamp");
        assert_eq!((template.assets[0].ep_x, template.assets[0].ep_y), (Some(75), Some(25)));
        assert_eq!(template.assets[1].position, Placement::Center);
    }

    #[test]
    fn test_export_unknown_room() {
        let dir = tempfile::tempdir().unwrap();
        let session = MapSession::new(config(), GenerationTunables::default(), 1, NullSpawner).unwrap();
        let err = session
            .export_room_template("throne", &dir.path().join("x.json"))
            .unwrap_err();
        assert!(matches!(err, MapGenError::UnknownRoom(name) if name == "throne"));
    }
}
