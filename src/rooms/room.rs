// src/rooms/room.rs

use std::fmt;

use serde_json::Value;

use super::Asset;
use crate::config::{AssetSpec, RoomGeometry, RoomTemplate};
use crate::error::Result;
use crate::geometry::{Area, Point2D};
use crate::utils::util::percent_offset;

/// Asset name used for the player spawn entry of exported spawn rooms.
pub const PLAYER_SPAWN_ASSET: &str = "player";

/// Stable index into a `RoomSet`. Never reused, even after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub(crate) usize);

impl RoomId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomKind {
    Room,
    Trail,
}

impl RoomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Room => "room",
            RoomKind::Trail => "trail",
        }
    }
}

/// A node of the room graph.
///
/// Tree links (`parent`, `children`, siblings) come from the radial layout;
/// `connected_rooms` holds the undirected trail graph. The edge methods here
/// only touch this room: use `RoomSet::connect`/`disconnect` to keep both
/// endpoints in sync.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    pub origin: Point2D,
    pub room_name: String,
    pub kind: RoomKind,
    pub layer: usize,
    pub is_spawn: bool,
    pub is_boss: bool,
    parent: Option<RoomId>,
    children: Vec<RoomId>,
    left_sibling: Option<RoomId>,
    right_sibling: Option<RoomId>,
    connected_rooms: Vec<RoomId>,
    room_area: Area,
    assets: Vec<Asset>,
    removed: bool,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        room_name: impl Into<String>,
        kind: RoomKind,
        layer: usize,
        origin: Point2D,
        room_area: Area,
    ) -> Self {
        Self {
            id,
            origin,
            room_name: room_name.into(),
            kind,
            layer,
            is_spawn: false,
            is_boss: false,
            parent: None,
            children: Vec::new(),
            left_sibling: None,
            right_sibling: None,
            connected_rooms: Vec::new(),
            room_area,
            assets: Vec::new(),
            removed: false,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn parent(&self) -> Option<RoomId> {
        self.parent
    }

    pub fn children(&self) -> &[RoomId] {
        &self.children
    }

    pub fn left_sibling(&self) -> Option<RoomId> {
        self.left_sibling
    }

    pub fn right_sibling(&self) -> Option<RoomId> {
        self.right_sibling
    }

    pub fn connected_rooms(&self) -> &[RoomId] {
        &self.connected_rooms
    }

    pub fn area(&self) -> &Area {
        &self.room_area
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_trail(&self) -> bool {
        self.kind == RoomKind::Trail
    }

    pub fn is_connected_to(&self, other: RoomId) -> bool {
        self.connected_rooms.contains(&other)
    }

    /// One-sided edge insert. Self-loops and duplicates are ignored.
    pub fn add_connecting_room(&mut self, other: RoomId) -> bool {
        if other == self.id || self.connected_rooms.contains(&other) {
            return false;
        }
        self.connected_rooms.push(other);
        true
    }

    /// One-sided edge removal.
    pub fn remove_connecting_room(&mut self, other: RoomId) -> bool {
        let before = self.connected_rooms.len();
        self.connected_rooms.retain(|&r| r != other);
        self.connected_rooms.len() != before
    }

    pub fn set_sibling_left(&mut self, sibling: Option<RoomId>) {
        self.left_sibling = sibling;
    }

    pub fn set_sibling_right(&mut self, sibling: Option<RoomId>) {
        self.right_sibling = sibling;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<RoomId>) {
        self.parent = parent;
    }

    pub(crate) fn add_child(&mut self, child: RoomId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: RoomId) {
        self.children.retain(|&c| c != child);
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
        self.connected_rooms.clear();
    }

    /// Takes ownership of `assets`.
    pub fn add_room_assets(&mut self, assets: Vec<Asset>) {
        self.assets.extend(assets);
    }

    pub fn add_room_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Drains the room's assets; a second call returns nothing.
    pub fn get_room_assets(&mut self) -> Vec<Asset> {
        std::mem::take(&mut self.assets)
    }

    /// Snapshots the placed assets into a template whose `Exact` positions
    /// reproduce this layout in any room of the same footprint.
    pub fn to_static_template(&self, name: &str) -> RoomTemplate {
        let bounds = self.room_area.bounds();
        let center = self.room_area.center();
        let width = bounds.width();
        let height = bounds.height();

        let mut assets: Vec<AssetSpec> = self
            .assets
            .iter()
            .map(|asset| {
                AssetSpec::exact(
                    asset.name.clone(),
                    percent_offset(asset.position.x, center.x, width),
                    percent_offset(asset.position.y, center.y, height),
                )
            })
            .collect();

        if self.is_spawn {
            assets.push(AssetSpec::center(PLAYER_SPAWN_ASSET));
        }

        RoomTemplate {
            name: name.to_string(),
            min_width: width.round() as u32,
            max_width: width.round() as u32,
            min_height: height.round() as u32,
            max_height: height.round() as u32,
            edge_smoothness: 0,
            geometry: RoomGeometry::Square,
            inherits_map_assets: false,
            is_spawn: self.is_spawn,
            is_boss: self.is_boss,
            assets,
        }
    }

    pub fn create_static_room_json(&self, name: &str) -> Result<Value> {
        Ok(serde_json::to_value(self.to_static_template(name))?)
    }
}
