// src/generation/trail_generator.rs

//! Connects the room tree with trails and repairs the resulting graph.

use std::collections::BTreeSet;

use log::{debug, info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::trail_geometry::attempt_trail_connection;
use crate::config::{GenerationTunables, TrailTemplate};
use crate::rooms::{RoomId, RoomKind, RoomSet};

/// Repair attempts per extra intersection allowed within one pairing.
const ATTEMPTS_PER_ESCALATION: usize = 25;

fn pair_key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct TrailGenerator<'a> {
    trails: &'a [TrailTemplate],
    tunables: &'a GenerationTunables,
    illegal_pairs: BTreeSet<(RoomId, RoomId)>,
    allowed_bonus: usize,
}

impl<'a> TrailGenerator<'a> {
    pub fn new(trails: &'a [TrailTemplate], tunables: &'a GenerationTunables) -> Self {
        Self {
            trails,
            tunables,
            illegal_pairs: BTreeSet::new(),
            allowed_bonus: 0,
        }
    }

    pub fn is_illegal(&self, a: RoomId, b: RoomId) -> bool {
        self.illegal_pairs.contains(&pair_key(a, b))
    }

    /// Extra intersections the repair pass has earned through escalation.
    pub fn allowed_bonus(&self) -> usize {
        self.allowed_bonus
    }

    /// Up to `attempts` shapes between `a` and `b`, each with a freshly drawn
    /// template. The intersection budget grows by one every
    /// `ATTEMPTS_PER_ESCALATION` attempts when `escalate` is set.
    fn try_connect<R: Rng + ?Sized>(
        &self,
        rooms: &mut RoomSet,
        a: RoomId,
        b: RoomId,
        attempts: usize,
        allowed: usize,
        escalate: bool,
        rng: &mut R,
    ) -> Option<RoomId> {
        for attempt in 0..attempts {
            let template = self.trails.choose(rng)?;
            let budget = if escalate {
                allowed + attempt / ATTEMPTS_PER_ESCALATION
            } else {
                allowed
            };
            if let Some(trail) =
                attempt_trail_connection(rooms, a, b, template, budget, self.tunables, rng)
            {
                return Some(trail);
            }
        }
        None
    }

    /// One trail per parent/child pair. Returns how many were connected.
    pub fn connect_primary<R: Rng + ?Sized>(
        &mut self,
        rooms: &mut RoomSet,
        connections: &[(RoomId, RoomId)],
        rng: &mut R,
    ) -> usize {
        let mut connected = 0;
        for &(parent, child) in connections {
            match self.try_connect(
                rooms,
                parent,
                child,
                self.tunables.primary_attempts,
                self.tunables.primary_allowed_intersections,
                false,
                rng,
            ) {
                Some(_) => connected += 1,
                None => warn!(
                    "Could not connect '{}' {} to '{}' {} after {} attempts",
                    rooms.get(parent).room_name,
                    parent,
                    rooms.get(child).room_name,
                    child,
                    self.tunables.primary_attempts
                ),
            }
        }
        info!("Connected {}/{} parent/child pairs", connected, connections.len());
        connected
    }

    /// Hops outward from the deepest room across siblings and their parents
    /// until it joins a room on that room's own ancestor line, closing a loop
    /// in the graph. Returns how many trails were added.
    pub fn circular_connection<R: Rng + ?Sized>(&mut self, rooms: &mut RoomSet, rng: &mut R) -> usize {
        let outermost = match rooms
            .live()
            .filter(|r| r.kind == RoomKind::Room)
            .max_by_key(|r| (r.layer, std::cmp::Reverse(r.id())))
        {
            Some(room) if room.layer > 0 => room.id(),
            _ => return 0,
        };

        let lineage: BTreeSet<RoomId> = rooms.lineage(outermost).into_iter().collect();
        let mut visited = BTreeSet::from([outermost]);
        let mut current = outermost;
        let mut failures = 0;
        let mut added = 0;

        'hops: loop {
            let candidates = self.circular_candidates(rooms, current, &visited);
            if candidates.is_empty() {
                debug!("Loop-back from {} ran out of candidates at {}", outermost, current);
                break;
            }

            for next in candidates {
                visited.insert(next);
                let trail = self.try_connect(
                    rooms,
                    current,
                    next,
                    self.tunables.repair_attempts,
                    self.tunables.primary_allowed_intersections,
                    false,
                    rng,
                );
                if trail.is_some() {
                    added += 1;
                    failures = 0;
                    if lineage.contains(&next) {
                        info!("Loop-back from {} closed at {} with {} trails", outermost, next, added);
                        break 'hops;
                    }
                    current = next;
                    continue 'hops;
                }

                failures += 1;
                if failures > self.tunables.circular_failure_streak {
                    warn!("Loop-back from {} gave up after {} failed hops", outermost, failures);
                    break 'hops;
                }
            }
        }
        added
    }

    /// Right then left sibling, their parents, then the children of all of
    /// those. Only unvisited rooms not already joined to `current`.
    fn circular_candidates(
        &self,
        rooms: &RoomSet,
        current: RoomId,
        visited: &BTreeSet<RoomId>,
    ) -> Vec<RoomId> {
        let room = rooms.get(current);
        let siblings: Vec<RoomId> = [room.right_sibling(), room.left_sibling()]
            .into_iter()
            .flatten()
            .collect();
        let parents: Vec<RoomId> = siblings.iter().filter_map(|&s| rooms.get(s).parent()).collect();
        let children: Vec<RoomId> = siblings
            .iter()
            .chain(parents.iter())
            .flat_map(|&r| rooms.get(r).children().to_vec())
            .collect();

        let joined = rooms.logical_neighbors(current);
        let mut out: Vec<RoomId> = Vec::new();
        for id in siblings.into_iter().chain(parents).chain(children) {
            if id != current
                && rooms.is_live(id)
                && rooms.get(id).kind == RoomKind::Room
                && !visited.contains(&id)
                && !joined.contains(&id)
                && !self.is_illegal(current, id)
                && !out.contains(&id)
            {
                out.push(id);
            }
        }
        out
    }

    /// Connects every group of rooms the spawn room cannot reach back to the
    /// reachable part of the graph. Returns true once nothing is isolated;
    /// false if the pass cap ran out first.
    pub fn find_and_connect_isolated<R: Rng + ?Sized>(&mut self, rooms: &mut RoomSet, rng: &mut R) -> bool {
        for pass in 0..self.tunables.repair_pass_cap {
            let groups = rooms.isolated_groups();
            if groups.is_empty() {
                if pass > 0 {
                    info!("Reconnected every isolated group after {} passes", pass);
                }
                return true;
            }

            if pass > 0 && pass % self.tunables.escalation_period.max(1) == 0 {
                self.allowed_bonus += 1;
                debug!("Repair pass {}: allowing {} extra intersections", pass, self.allowed_bonus);
            }

            let mut repaired = 0;
            for group in groups {
                if self.connect_group(rooms, &group, rng) {
                    repaired += 1;
                }
            }
            debug!("Repair pass {} reconnected {} groups", pass, repaired);
        }

        warn!(
            "Gave up on {} isolated rooms after {} repair passes",
            rooms.isolated_groups().iter().map(Vec::len).sum::<usize>(),
            self.tunables.repair_pass_cap
        );
        false
    }

    fn connect_group<R: Rng + ?Sized>(&mut self, rooms: &mut RoomSet, group: &[RoomId], rng: &mut R) -> bool {
        // A group made only of trails is a corridor left dangling by pruning.
        if group.iter().all(|&id| rooms.get(id).is_trail()) {
            for &id in group {
                rooms.remove(id);
            }
            debug!("Dropped {} dangling trail rooms", group.len());
            return true;
        }

        let mut members: Vec<RoomId> = group
            .iter()
            .copied()
            .filter(|&id| rooms.get(id).kind == RoomKind::Room)
            .collect();
        members.sort_by_key(|&id| (rooms.degree(id), id));

        let reachable = rooms.reachable_from_root();
        let allowed = self.tunables.primary_allowed_intersections + self.allowed_bonus;

        for member in members {
            let mut candidates: Vec<RoomId> = reachable
                .iter()
                .copied()
                .filter(|&c| rooms.get(c).kind == RoomKind::Room && !self.is_illegal(member, c))
                .collect();
            candidates.sort_by_key(|&c| (rooms.degree(c), c));

            let picked: Vec<RoomId> = candidates
                .into_iter()
                .filter(|&c| rooms.has_root_path(c))
                .take(self.tunables.repair_candidate_cap)
                .collect();

            for candidate in picked {
                if let Some(trail) = self.try_connect(
                    rooms,
                    member,
                    candidate,
                    self.tunables.repair_attempts,
                    allowed,
                    true,
                    rng,
                ) {
                    debug!("Trail {} joins isolated {} to {}", trail, member, candidate);
                    return true;
                }
            }
        }
        false
    }

    /// Drops the link between `a` and `b`: the direct edge if there is one and
    /// every trail bridging only the two. The pair is never proposed again.
    pub fn remove_connection(&mut self, rooms: &mut RoomSet, a: RoomId, b: RoomId) -> bool {
        let mut removed = rooms.disconnect(a, b);
        for trail in rooms.bridging_trails(a, b) {
            rooms.remove(trail);
            removed = true;
        }
        self.illegal_pairs.insert(pair_key(a, b));
        if removed {
            debug!("Removed connection {} <-> {}", a, b);
        }
        removed
    }

    /// Every (hub, neighbor) pair where both rooms are over-connected and the
    /// hub sits deep enough in the tree.
    fn overloaded_pairs(&self, rooms: &RoomSet) -> Vec<(RoomId, RoomId)> {
        let min_degree = self.tunables.hub_min_degree;
        let mut pairs = BTreeSet::new();
        for hub in rooms.live() {
            if hub.kind != RoomKind::Room
                || hub.layer <= self.tunables.hub_min_layer
                || rooms.degree(hub.id()) <= min_degree
            {
                continue;
            }
            for neighbor in rooms.logical_neighbors(hub.id()) {
                if rooms.get(neighbor).kind == RoomKind::Room && rooms.degree(neighbor) > min_degree {
                    pairs.insert(pair_key(hub.id(), neighbor));
                }
            }
        }
        pairs.into_iter().collect()
    }

    /// Removes one random over-connected edge. Returns the pair removed.
    pub fn remove_random_connection<R: Rng + ?Sized>(
        &mut self,
        rooms: &mut RoomSet,
        rng: &mut R,
    ) -> Option<(RoomId, RoomId)> {
        let pairs = self.overloaded_pairs(rooms);
        let &(a, b) = pairs.choose(rng)?;
        self.remove_connection(rooms, a, b);
        Some((a, b))
    }

    /// Prunes one overloaded edge and repairs whatever it cut off.
    pub fn remove_and_connect<R: Rng + ?Sized>(&mut self, rooms: &mut RoomSet, rng: &mut R) -> bool {
        match self.remove_random_connection(rooms, rng) {
            Some(_) => self.find_and_connect_isolated(rooms, rng),
            None => false,
        }
    }

    /// Keeps pruning overloaded edges until none are left, or once per pair
    /// found at the start.
    pub fn balance_degrees<R: Rng + ?Sized>(&mut self, rooms: &mut RoomSet, rng: &mut R) -> usize {
        let budget = self.overloaded_pairs(rooms).len();
        let mut pruned = 0;
        for _ in 0..budget {
            if self.remove_random_connection(rooms, rng).is_none() {
                break;
            }
            pruned += 1;
            self.find_and_connect_isolated(rooms, rng);
        }
        info!("Degree balancing pruned {} connections", pruned);
        pruned
    }
}
