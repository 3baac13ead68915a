// src/error.rs

//! Setup-time errors. Generation itself never fails: rejected trail shapes
//! and unrepaired groups are logged and left as-is.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapGenError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("trail directory {0} does not exist")]
    MissingTrailDirectory(PathBuf),

    #[error("trail directory {0} contains no trail templates")]
    NoTrailTemplates(PathBuf),

    #[error("no room template found for room '{0}'")]
    MissingRoomTemplate(String),

    #[error("invalid layer {level}: {reason}")]
    InvalidLayer { level: usize, reason: String },

    #[error("invalid map: {0}")]
    InvalidMap(String),

    #[error("no live room named '{0}'")]
    UnknownRoom(String),

    #[error("failed to serialize room template: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapGenError>;
