// src/config/map_info.rs

use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, Result};
use crate::geometry::Point2D;

/// Contents of `map_info.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapInfo {
    pub map_radius: f64,
    /// Boundary asset config file, relative to the map directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_boundary: Option<String>,
    pub map_layers: Vec<LayerSpec>,
}

/// One concentric ring of rooms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerSpec {
    pub level: usize,
    pub radius: f64,
    pub max_rooms: usize,
    /// Defaults to `max_rooms` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rooms: Option<usize>,
    pub rooms: Vec<RoomSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomSpec {
    pub name: String,
    #[serde(default)]
    pub min_instances: usize,
    pub max_instances: usize,
    #[serde(default)]
    pub required_children: Vec<String>,
}

impl LayerSpec {
    pub fn min_rooms(&self) -> usize {
        self.min_rooms.unwrap_or(self.max_rooms)
    }

    pub fn room_spec(&self, name: &str) -> Option<&RoomSpec> {
        self.rooms.iter().find(|r| r.name == name)
    }

    fn validate(&self) -> Result<()> {
        if self.min_rooms() > self.max_rooms {
            return Err(MapGenError::InvalidLayer {
                level: self.level,
                reason: format!("min_rooms {} exceeds max_rooms {}", self.min_rooms(), self.max_rooms),
            });
        }
        if self.radius < 0.0 {
            return Err(MapGenError::InvalidLayer {
                level: self.level,
                reason: format!("negative radius {}", self.radius),
            });
        }
        for spec in &self.rooms {
            if spec.min_instances > spec.max_instances {
                return Err(MapGenError::InvalidLayer {
                    level: self.level,
                    reason: format!(
                        "room '{}' has min_instances {} above max_instances {}",
                        spec.name, spec.min_instances, spec.max_instances
                    ),
                });
            }
        }
        Ok(())
    }
}

impl MapInfo {
    /// The map is laid out in positive coordinates around this point.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.map_radius, self.map_radius)
    }

    pub fn layer(&self, level: usize) -> Option<&LayerSpec> {
        self.map_layers.iter().find(|l| l.level == level)
    }

    /// Sorts layers by level and checks they form a contiguous range from 0.
    pub fn validate(&mut self) -> Result<()> {
        if !(self.map_radius > 0.0) {
            return Err(MapGenError::InvalidMap(format!(
                "map_radius must be positive, got {}",
                self.map_radius
            )));
        }

        self.map_layers.sort_by_key(|l| l.level);
        for (i, layer) in self.map_layers.iter().enumerate() {
            if layer.level != i {
                return Err(MapGenError::InvalidLayer {
                    level: layer.level,
                    reason: format!("expected level {}", i),
                });
            }
            layer.validate()?;
        }

        match self.map_layers.first() {
            Some(root) if !root.rooms.is_empty() => Ok(()),
            _ => Err(MapGenError::InvalidMap(
                "layer 0 must name the spawn room".to_string(),
            )),
        }
    }

    /// Every room name referenced by a layer or as a required child.
    pub fn referenced_room_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .map_layers
            .iter()
            .flat_map(|l| l.rooms.iter())
            .flat_map(|r| std::iter::once(r.name.clone()).chain(r.required_children.iter().cloned()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_JSON: &str = r#"{
        "map_radius": 1500,
        "map_boundary": "boundary.json",
        "map_layers": [
            { "level": 1, "radius": 500, "max_rooms": 4, "min_rooms": 2,
              "rooms": [ { "name": "cave", "max_instances": 4, "required_children": ["shrine"] } ] },
            { "level": 0, "radius": 0, "max_rooms": 1,
              "rooms": [ { "name": "spawn", "max_instances": 1 } ] }
        ]
    }"#;

    #[test]
    fn test_parse_and_validate() {
        let mut info: MapInfo = serde_json::from_str(MAP_JSON).unwrap();
        info.validate().unwrap();
        assert_eq!(info.map_layers[0].level, 0);
        assert_eq!(info.map_layers[1].min_rooms(), 2);
        assert_eq!(info.map_layers[0].min_rooms(), 1);
        assert_eq!(info.map_boundary.as_deref(), Some("boundary.json"));
        assert_eq!(info.referenced_room_names(), vec!["cave", "shrine", "spawn"]);
    }

    #[test]
    fn test_gap_in_levels_is_rejected() {
        let mut info: MapInfo = serde_json::from_str(MAP_JSON).unwrap();
        info.map_layers[1].level = 2;
        assert!(matches!(info.validate(), Err(MapGenError::InvalidLayer { .. })));
    }

    #[test]
    fn test_min_above_max_is_rejected() {
        let mut info: MapInfo = serde_json::from_str(MAP_JSON).unwrap();
        info.map_layers[0].min_rooms = Some(9);
        assert!(info.validate().is_err());
    }

    #[test]
    fn test_non_positive_radius_is_rejected() {
        let mut info: MapInfo = serde_json::from_str(MAP_JSON).unwrap();
        info.map_radius = 0.0;
        assert!(matches!(info.validate(), Err(MapGenError::InvalidMap(_))));
    }
}
