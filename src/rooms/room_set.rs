// src/rooms/room_set.rs

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::Path;

use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use super::{Room, RoomId, RoomKind};
use crate::error::{MapGenError, Result};
use crate::geometry::{Area, Point2D};

/// Arena owning every room of a map. Ids index into it and stay valid after
/// removal: removed rooms are tombstoned and skipped by `live()`.
#[derive(Debug, Clone, Default)]
pub struct RoomSet {
    rooms: Vec<Room>,
}

impl RoomSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        room_name: impl Into<String>,
        kind: RoomKind,
        layer: usize,
        origin: Point2D,
        area: Area,
    ) -> RoomId {
        let id = RoomId(self.rooms.len());
        self.rooms.push(Room::new(id, room_name, kind, layer, origin, area));
        id
    }

    /// # Panics
    /// If `id` did not come from this set.
    pub fn get(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub fn get_mut(&mut self, id: RoomId) -> &mut Room {
        &mut self.rooms[id.0]
    }

    pub fn is_live(&self, id: RoomId) -> bool {
        self.rooms.get(id.0).is_some_and(|r| !r.is_removed())
    }

    pub fn live(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| !r.is_removed())
    }

    pub fn live_ids(&self) -> Vec<RoomId> {
        self.live().map(|r| r.id()).collect()
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn count_kind(&self, kind: RoomKind) -> usize {
        self.live().filter(|r| r.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    /// Live rooms on `layer`, in insertion order.
    pub fn layer(&self, layer: usize) -> Vec<RoomId> {
        self.live()
            .filter(|r| r.kind == RoomKind::Room && r.layer == layer)
            .map(|r| r.id())
            .collect()
    }

    /// The spawn room: the first live layer-0 room.
    pub fn root(&self) -> Option<RoomId> {
        self.live()
            .find(|r| r.kind == RoomKind::Room && r.layer == 0)
            .map(|r| r.id())
    }

    /// First live room named `name`. Trails are named after their template
    /// and are never matched.
    pub fn find_by_name(&self, name: &str) -> Option<RoomId> {
        self.live()
            .find(|r| r.kind == RoomKind::Room && r.room_name == name)
            .map(|r| r.id())
    }

    pub fn set_parent(&mut self, child: RoomId, parent: RoomId) {
        self.get_mut(child).set_parent(Some(parent));
        self.get_mut(parent).add_child(child);
    }

    /// Links `ids` into a left-to-right sibling chain.
    pub fn link_siblings(&mut self, ids: &[RoomId]) {
        for pair in ids.windows(2) {
            self.get_mut(pair[0]).set_sibling_right(Some(pair[1]));
            self.get_mut(pair[1]).set_sibling_left(Some(pair[0]));
        }
    }

    /// Adds the undirected edge `a <-> b`. Returns false for self-loops,
    /// removed rooms and edges that already exist.
    pub fn connect(&mut self, a: RoomId, b: RoomId) -> bool {
        if a == b || !self.is_live(a) || !self.is_live(b) {
            return false;
        }
        let added = self.get_mut(a).add_connecting_room(b);
        self.get_mut(b).add_connecting_room(a);
        added
    }

    pub fn disconnect(&mut self, a: RoomId, b: RoomId) -> bool {
        let removed = self.get_mut(a).remove_connecting_room(b);
        self.get_mut(b).remove_connecting_room(a);
        removed
    }

    /// Tombstones a room, dropping its edges, tree link and sibling links.
    pub fn remove(&mut self, id: RoomId) {
        if !self.is_live(id) {
            return;
        }

        let neighbors = self.get(id).connected_rooms().to_vec();
        for n in neighbors {
            self.disconnect(id, n);
        }

        if let Some(parent) = self.get(id).parent() {
            self.get_mut(parent).remove_child(id);
        }

        let left = self.get(id).left_sibling();
        let right = self.get(id).right_sibling();
        if let Some(l) = left {
            self.get_mut(l).set_sibling_right(right);
        }
        if let Some(r) = right {
            self.get_mut(r).set_sibling_left(left);
        }

        self.get_mut(id).mark_removed();
    }

    pub fn degree(&self, id: RoomId) -> usize {
        self.get(id).connected_rooms().len()
    }

    /// Rooms reachable in one step, looking through trail rooms to the room
    /// on their other end.
    pub fn logical_neighbors(&self, id: RoomId) -> Vec<RoomId> {
        let mut out = Vec::new();
        for &c in self.get(id).connected_rooms() {
            if self.get(c).is_trail() {
                out.extend(self.get(c).connected_rooms().iter().copied().filter(|&n| n != id));
            } else {
                out.push(c);
            }
        }
        out.sort();
        out.dedup();
        out
    }

    /// Trail rooms whose only edges are `a` and `b`.
    pub fn bridging_trails(&self, a: RoomId, b: RoomId) -> Vec<RoomId> {
        self.get(a)
            .connected_rooms()
            .iter()
            .copied()
            .filter(|&t| {
                let trail = self.get(t);
                trail.is_trail()
                    && trail.connected_rooms().len() == 2
                    && trail.is_connected_to(a)
                    && trail.is_connected_to(b)
            })
            .collect()
    }

    /// Breadth-first walk over `connected_rooms` starting at `start`.
    pub fn reachable_from(&self, start: RoomId) -> BTreeSet<RoomId> {
        let mut seen = BTreeSet::new();
        if !self.is_live(start) {
            return seen;
        }

        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(id) = queue.pop_front() {
            for &next in self.get(id).connected_rooms() {
                if self.is_live(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    pub fn reachable_from_root(&self) -> BTreeSet<RoomId> {
        self.root()
            .map(|root| self.reachable_from(root))
            .unwrap_or_default()
    }

    /// True if some layer-0 room can be reached from `id`.
    pub fn has_root_path(&self, id: RoomId) -> bool {
        self.reachable_from(id)
            .iter()
            .any(|&r| self.get(r).layer == 0 && self.get(r).kind == RoomKind::Room)
    }

    /// Live rooms the spawn room cannot reach, grouped into maximal connected
    /// components. Groups are ordered by their smallest id.
    pub fn isolated_groups(&self) -> Vec<Vec<RoomId>> {
        let reachable = self.reachable_from_root();
        let isolated: Vec<RoomId> = self
            .live()
            .map(|r| r.id())
            .filter(|id| !reachable.contains(id))
            .collect();
        if isolated.is_empty() {
            return Vec::new();
        }

        let index: BTreeMap<RoomId, usize> =
            isolated.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut uf = QuickUnionUf::<UnionBySize>::new(isolated.len());
        for (i, &id) in isolated.iter().enumerate() {
            for n in self.get(id).connected_rooms() {
                if let Some(&j) = index.get(n) {
                    uf.union(i, j);
                }
            }
        }

        let mut groups: BTreeMap<usize, Vec<RoomId>> = BTreeMap::new();
        for (i, &id) in isolated.iter().enumerate() {
            groups.entry(uf.find(i)).or_default().push(id);
        }
        let mut out: Vec<Vec<RoomId>> = groups.into_values().collect();
        out.sort_by_key(|g| g[0]);
        out
    }

    /// Ancestors of `id` from its parent up to the root.
    pub fn lineage(&self, id: RoomId) -> Vec<RoomId> {
        let mut out = Vec::new();
        let mut current = self.get(id).parent();
        while let Some(p) = current {
            if out.contains(&p) {
                break;
            }
            out.push(p);
            current = self.get(p).parent();
        }
        out
    }

    /// Polygons of every live room except `exclude`.
    pub fn obstacles(&self, exclude: &[RoomId]) -> Vec<&Area> {
        self.live()
            .filter(|r| !exclude.contains(&r.id()))
            .map(|r| r.area())
            .collect()
    }

    /// Live room whose bounding-box center is closest to `point`.
    pub fn nearest_by_bbox_center(&self, point: Point2D) -> Option<RoomId> {
        self.live()
            .map(|r| (r.id(), r.area().center().distance_to(&point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn write_static_room_json(&self, id: RoomId, name: &str, path: &Path) -> Result<()> {
        if !self.is_live(id) {
            return Err(MapGenError::UnknownRoom(id.to_string()));
        }
        let json = self.get(id).create_static_room_json(name)?;
        let text = serde_json::to_string_pretty(&json)?;
        fs::write(path, text).map_err(|source| MapGenError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(set: &mut RoomSet, name: &str, layer: usize, x: f64, y: f64) -> RoomId {
        let origin = Point2D::new(x, y);
        set.insert(name, RoomKind::Room, layer, origin, Area::rectangle(name, origin, 20.0, 20.0))
    }

    fn trail(set: &mut RoomSet, a: RoomId, b: RoomId) -> RoomId {
        let origin = set.get(a).origin.lerp(&set.get(b).origin, 0.5);
        let t = set.insert("trail", RoomKind::Trail, 0, origin, Area::rectangle("trail", origin, 5.0, 5.0));
        set.connect(t, a);
        set.connect(t, b);
        t
    }

    #[test]
    fn test_connect_is_symmetric_and_deduplicated() {
        let mut set = RoomSet::new();
        let a = square(&mut set, "a", 0, 0.0, 0.0);
        let b = square(&mut set, "b", 1, 100.0, 0.0);
        assert!(set.connect(a, b));
        assert!(!set.connect(b, a));
        assert!(!set.connect(a, a));
        assert_eq!(set.get(a).connected_rooms(), &[b]);
        assert_eq!(set.get(b).connected_rooms(), &[a]);
        assert!(set.disconnect(b, a));
        assert!(set.get(a).connected_rooms().is_empty());
    }

    #[test]
    fn test_tree_and_siblings() {
        let mut set = RoomSet::new();
        let root = square(&mut set, "root", 0, 0.0, 0.0);
        let c1 = square(&mut set, "c1", 1, 100.0, 0.0);
        let c2 = square(&mut set, "c2", 1, 0.0, 100.0);
        let c3 = square(&mut set, "c3", 1, -100.0, 0.0);
        for c in [c1, c2, c3] {
            set.set_parent(c, root);
        }
        set.link_siblings(&[c1, c2, c3]);

        assert_eq!(set.get(root).children(), &[c1, c2, c3]);
        assert_eq!(set.get(c2).left_sibling(), Some(c1));
        assert_eq!(set.get(c2).right_sibling(), Some(c3));
        assert_eq!(set.lineage(c3), vec![root]);

        set.remove(c2);
        assert_eq!(set.get(c1).right_sibling(), Some(c3));
        assert_eq!(set.get(c3).left_sibling(), Some(c1));
        assert_eq!(set.get(root).children(), &[c1, c3]);
        assert_eq!(set.layer(1), vec![c1, c3]);
    }

    #[test]
    fn test_isolated_groups() {
        let mut set = RoomSet::new();
        let root = square(&mut set, "root", 0, 0.0, 0.0);
        let a = square(&mut set, "a", 1, 100.0, 0.0);
        let b = square(&mut set, "b", 1, 200.0, 0.0);
        let c = square(&mut set, "c", 1, 300.0, 0.0);
        let d = square(&mut set, "d", 1, 400.0, 0.0);
        trail(&mut set, root, a);
        let bc = trail(&mut set, b, c);

        let groups = set.isolated_groups();
        assert_eq!(groups, vec![vec![b, c, bc], vec![d]]);
        assert!(set.has_root_path(a));
        assert!(!set.has_root_path(b));
    }

    #[test]
    fn test_logical_neighbors_and_bridges() {
        let mut set = RoomSet::new();
        let a = square(&mut set, "a", 0, 0.0, 0.0);
        let b = square(&mut set, "b", 1, 100.0, 0.0);
        let t = trail(&mut set, a, b);

        assert_eq!(set.logical_neighbors(a), vec![b]);
        assert_eq!(set.bridging_trails(a, b), vec![t]);

        set.remove(t);
        assert!(!set.is_live(t));
        assert!(set.get(a).connected_rooms().is_empty());
        assert_eq!(set.obstacles(&[]).len(), 2);
        assert_eq!(set.isolated_groups(), vec![vec![b]]);
    }

    #[test]
    fn test_nearest_by_bbox_center() {
        let mut set = RoomSet::new();
        let a = square(&mut set, "a", 0, 0.0, 0.0);
        let b = square(&mut set, "b", 1, 100.0, 0.0);
        assert_eq!(set.nearest_by_bbox_center(Point2D::new(80.0, 5.0)), Some(b));
        assert_eq!(set.nearest_by_bbox_center(Point2D::new(-5.0, 5.0)), Some(a));
    }

    #[test]
    fn test_write_static_room_json() {
        let mut set = RoomSet::new();
        let a = square(&mut set, "a", 0, 50.0, 50.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_static.json");
        set.write_static_room_json(a, "a_static", &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "a_static");
        assert_eq!(value["min_width"], 20);
    }

    #[test]
    fn test_write_static_room_json_into_missing_directory() {
        let mut set = RoomSet::new();
        let a = square(&mut set, "a", 0, 50.0, 50.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a_static.json");

        let err = set.write_static_room_json(a, "a_static", &path).unwrap_err();
        assert!(matches!(&err, MapGenError::Io { path: p, .. } if *p == path));
        assert!(err.to_string().starts_with("I/O error on"));
    }

    #[test]
    fn test_find_by_name_skips_trails() {
        let mut set = RoomSet::new();
        let a = square(&mut set, "a", 0, 0.0, 0.0);
        let b = square(&mut set, "b", 1, 100.0, 0.0);
        let t = trail(&mut set, a, b);

        assert_eq!(set.get(t).room_name, "trail");
        assert_eq!(set.find_by_name("trail"), None);
        assert_eq!(set.find_by_name("b"), Some(b));

        let twin = square(&mut set, "trail", 1, 200.0, 0.0);
        assert_eq!(set.find_by_name("trail"), Some(twin));
    }
}
