// src/config/room_template.rs

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::load_json;
use crate::error::{MapGenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomGeometry {
    #[default]
    Square,
    Circle,
    Random,
}

/// Where an asset is put inside its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Placement {
    #[default]
    Random,
    Center,
    /// At `(ep_x, ep_y)`, percentages of the room's bounding box (50 = center).
    Exact,
    /// Spread along the outline.
    Perimeter,
}

/// Spawn descriptor consumed by an `AssetSpawner`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub name: String,
    #[serde(default)]
    pub position: Placement,
    #[serde(default = "one")]
    pub min_number: u32,
    #[serde(default = "one")]
    pub max_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ep_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ep_y: Option<i32>,
}

fn one() -> u32 {
    1
}

impl AssetSpec {
    pub fn exact(name: impl Into<String>, ep_x: i32, ep_y: i32) -> Self {
        Self {
            name: name.into(),
            position: Placement::Exact,
            min_number: 1,
            max_number: 1,
            ep_x: Some(ep_x),
            ep_y: Some(ep_y),
        }
    }

    pub fn center(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Placement::Center,
            min_number: 1,
            max_number: 1,
            ep_x: None,
            ep_y: None,
        }
    }
}

/// Per-room JSON (`rooms/<name>.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    #[serde(default)]
    pub name: String,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    #[serde(default)]
    pub edge_smoothness: u32,
    #[serde(default)]
    pub geometry: RoomGeometry,
    #[serde(default)]
    pub inherits_map_assets: bool,
    #[serde(default)]
    pub is_spawn: bool,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
}

impl RoomTemplate {
    /// A plain square room with fixed size and no assets.
    pub fn square(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
            edge_smoothness: 0,
            geometry: RoomGeometry::Square,
            inherits_map_assets: false,
            is_spawn: false,
            is_boss: false,
            assets: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut template: RoomTemplate = load_json(path)?;
        if template.name.is_empty() {
            template.name = file_stem(path);
        }
        Ok(template)
    }
}

/// Boundary decoration config referenced by `map_info.map_boundary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
    #[serde(default = "default_perimeter_spacing")]
    pub perimeter_spacing: f64,
}

fn default_perimeter_spacing() -> f64 {
    120.0
}

impl BoundaryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }
}

/// Room templates keyed by room name.
#[derive(Debug, Clone, Default)]
pub struct RoomCatalog {
    templates: BTreeMap<String, RoomTemplate>,
}

impl RoomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `<dir>/<name>.json` for every requested name.
    pub fn load(dir: &Path, names: &[String]) -> Result<Self> {
        let mut catalog = Self::new();
        for name in names {
            let path = dir.join(format!("{}.json", name));
            if !path.is_file() {
                return Err(MapGenError::MissingRoomTemplate(name.clone()));
            }
            let mut template = RoomTemplate::load(&path)?;
            template.name = name.clone();
            catalog.insert(template);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, template: RoomTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Option<&RoomTemplate> {
        self.templates.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&RoomTemplate> {
        self.get(name)
            .ok_or_else(|| MapGenError::MissingRoomTemplate(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_template_defaults() {
        let json = r#"{ "min_width": 100, "max_width": 200, "min_height": 80, "max_height": 90,
                        "assets": [ { "name": "rock", "max_number": 3 } ] }"#;
        let template: RoomTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.geometry, RoomGeometry::Square);
        assert!(!template.is_spawn);
        assert_eq!(template.assets[0].position, Placement::Random);
        assert_eq!(template.assets[0].min_number, 1);
        assert_eq!(template.assets[0].max_number, 3);
    }

    #[test]
    fn test_catalog_loads_named_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("cave.json"),
            r#"{ "min_width": 10, "max_width": 20, "min_height": 10, "max_height": 20, "geometry": "Circle" }"#,
        )
        .unwrap();

        let catalog = RoomCatalog::load(dir.path(), &["cave".to_string()]).unwrap();
        let cave = catalog.require("cave").unwrap();
        assert_eq!(cave.name, "cave");
        assert_eq!(cave.geometry, RoomGeometry::Circle);
    }

    #[test]
    fn test_catalog_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = RoomCatalog::load(dir.path(), &["ghost".to_string()]).unwrap_err();
        assert!(matches!(err, MapGenError::MissingRoomTemplate(name) if name == "ghost"));
    }

    #[test]
    fn test_malformed_template_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let err = RoomCatalog::load(dir.path(), &["bad".to_string()]).unwrap_err();
        assert!(matches!(err, MapGenError::Json { .. }));
    }
}
