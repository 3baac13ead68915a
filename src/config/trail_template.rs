// src/config/trail_template.rs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::load_json;
use super::room_template::file_stem;
use crate::error::{MapGenError, Result};

/// A trail shape: width range and how much the centerline wanders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailTemplate {
    #[serde(default)]
    pub name: String,
    pub min_width: u32,
    pub max_width: u32,
    #[serde(default)]
    pub curvyness: u32,
}

impl TrailTemplate {
    pub fn new(name: impl Into<String>, min_width: u32, max_width: u32, curvyness: u32) -> Self {
        Self { name: name.into(), min_width, max_width, curvyness }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut template: TrailTemplate = load_json(path)?;
        if template.name.is_empty() {
            template.name = file_stem(path);
        }
        Ok(template)
    }

    /// Loads every `.json` file in `dir`, ordered by file name.
    pub fn load_dir(dir: &Path) -> Result<Vec<TrailTemplate>> {
        if !dir.is_dir() {
            return Err(MapGenError::MissingTrailDirectory(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| MapGenError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| MapGenError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(MapGenError::NoTrailTemplates(dir.to_path_buf()));
        }

        paths.iter().map(|p| TrailTemplate::load(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dir_sorted_and_named() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_wide.json"), r#"{ "min_width": 40, "max_width": 60, "curvyness": 4 }"#).unwrap();
        fs::write(dir.path().join("a_narrow.json"), r#"{ "name": "narrow", "min_width": 10, "max_width": 20 }"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let trails = TrailTemplate::load_dir(dir.path()).unwrap();
        assert_eq!(trails.len(), 2);
        assert_eq!(trails[0].name, "narrow");
        assert_eq!(trails[0].curvyness, 0);
        assert_eq!(trails[1].name, "b_wide");
        assert_eq!(trails[1].curvyness, 4);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrailTemplate::load_dir(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, MapGenError::MissingTrailDirectory(_)));
    }

    #[test]
    fn test_empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrailTemplate::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, MapGenError::NoTrailTemplates(_)));
    }
}
