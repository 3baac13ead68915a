// src/lib.rs

pub mod assets;
pub mod config;
pub mod editor;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod rooms;
pub mod utils;
