// src/generation/trail_geometry.rs

//! Stateless trail geometry: jittered centerlines, ribbon extrusion, boundary
//! ray-marching and the single-attempt trail connection.

use log::debug;
use rand::Rng;
use rayon::prelude::*;

use crate::config::{GenerationTunables, TrailTemplate};
use crate::geometry::{Area, Point2D};
use crate::rooms::{RoomId, RoomKind, RoomSet};

/// Ray-march step length used by `compute_edge_point`.
pub const EDGE_STEP: f64 = 2.0;
/// Ray-march step cap used by `compute_edge_point`.
pub const EDGE_MAX_STEPS: usize = 5000;

const INTERIOR_WALK_STEPS: usize = 8;
const MIN_TRAIL_WIDTH: f64 = 1.0;

/// Straight segment `start -> end` with `curvyness` interior points pushed
/// sideways by up to a quarter of the segment length (scaled by
/// `curvyness / 8`).
pub fn build_centerline<R: Rng + ?Sized>(
    start: Point2D,
    end: Point2D,
    curvyness: u32,
    rng: &mut R,
) -> Vec<Point2D> {
    let mut points = Vec::with_capacity(curvyness as usize + 2);
    points.push(start);

    if curvyness > 0 {
        let segment = end - start;
        let length = segment.length();
        let normal = segment.perpendicular().normalize().unwrap_or(Point2D::ORIGIN);
        let max_offset = length * 0.25 * (curvyness as f64 / 8.0);

        for i in 1..=curvyness {
            let t = i as f64 / (curvyness as f64 + 1.0);
            let offset = rng.random_range(-max_offset..=max_offset);
            points.push(start.lerp(&end, t) + normal * offset);
        }
    }

    points.push(end);
    points
}

/// Extrudes a polyline into a closed ribbon `width` wide: the left offsets in
/// order followed by the right offsets in reverse.
pub fn extrude_centerline(centerline: &[Point2D], width: f64) -> Area {
    let half = width / 2.0;
    let n = centerline.len();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    let mut last_normal = Point2D::new(0.0, 1.0);

    for i in 0..n {
        let tangent = if n < 2 {
            Point2D::ORIGIN
        } else if i == 0 {
            centerline[1] - centerline[0]
        } else if i == n - 1 {
            centerline[n - 1] - centerline[n - 2]
        } else {
            centerline[i + 1] - centerline[i - 1]
        };

        // Keep the previous normal through zero-length tangents.
        if let Some(normal) = tangent.perpendicular().normalize() {
            last_normal = normal;
        }

        left.push(centerline[i] + last_normal * half);
        right.push(centerline[i] - last_normal * half);
    }

    left.extend(right.into_iter().rev());
    Area::from_points("trail", left)
}

/// Last point inside `polygon` when walking from `center` toward `toward`.
pub fn compute_edge_point(center: Point2D, toward: Point2D, polygon: &Area) -> Point2D {
    compute_edge_point_with(center, toward, polygon, EDGE_STEP, EDGE_MAX_STEPS)
}

pub fn compute_edge_point_with(
    center: Point2D,
    toward: Point2D,
    polygon: &Area,
    step: f64,
    max_steps: usize,
) -> Point2D {
    let direction = match (toward - center).normalize() {
        Some(d) => d,
        None => return center,
    };

    let mut last_inside = center;
    let mut entered = polygon.contains_point(center);
    for i in 1..=max_steps {
        let probe = center + direction * (step * i as f64);
        if polygon.contains_point(probe) {
            last_inside = probe;
            entered = true;
        } else if entered {
            break;
        }
    }
    last_inside
}

/// Where a trail meets one room: a point inside, the boundary crossing and a
/// point just outside.
#[derive(Debug, Clone, Copy)]
struct RoomAnchors {
    interior: Point2D,
    edge: Point2D,
    outside: Point2D,
}

fn room_anchors(area: &Area, toward: Point2D, tunables: &GenerationTunables) -> RoomAnchors {
    let center = area.center();
    let direction = (toward - center).normalize().unwrap_or(Point2D::new(1.0, 0.0));
    let edge = compute_edge_point_with(
        center,
        center + direction,
        area,
        tunables.edge_step,
        tunables.edge_max_steps,
    );

    let depth = tunables.interior_depth.min(edge.distance_to(&center));
    let mut candidate = edge - direction * depth;
    let mut interior = center;
    for _ in 0..INTERIOR_WALK_STEPS {
        if area.contains_point(candidate) {
            interior = candidate;
            break;
        }
        candidate = candidate.lerp(&center, 0.5);
    }

    RoomAnchors {
        interior,
        edge,
        outside: edge + direction * tunables.edge_overshoot,
    }
}

fn push_distinct(points: &mut Vec<Point2D>, p: Point2D) {
    if points.last().map_or(true, |last| last.distance_to(&p) > f64::EPSILON) {
        points.push(p);
    }
}

/// Samples one trail shape between two room polygons and returns it if it
/// overlaps at most `allowed_intersections` of `obstacles`.
pub fn plan_trail<R: Rng + ?Sized>(
    area_a: &Area,
    area_b: &Area,
    obstacles: &[&Area],
    template: &TrailTemplate,
    allowed_intersections: usize,
    tunables: &GenerationTunables,
    rng: &mut R,
) -> Option<Area> {
    let (lo, hi) = if template.min_width <= template.max_width {
        (template.min_width, template.max_width)
    } else {
        (template.max_width, template.min_width)
    };
    let width = (rng.random_range(lo..=hi) as f64).max(MIN_TRAIL_WIDTH);

    let a = room_anchors(area_a, area_b.center(), tunables);
    let b = room_anchors(area_b, area_a.center(), tunables);

    let mut centerline = Vec::new();
    push_distinct(&mut centerline, a.interior);
    push_distinct(&mut centerline, a.edge);
    for p in build_centerline(a.outside, b.outside, template.curvyness, rng) {
        push_distinct(&mut centerline, p);
    }
    push_distinct(&mut centerline, b.edge);
    push_distinct(&mut centerline, b.interior);

    let ribbon = extrude_centerline(&centerline, width);

    let hits = obstacles
        .par_iter()
        .filter(|obstacle| ribbon.intersects(obstacle))
        .count();

    if hits <= allowed_intersections {
        Some(ribbon)
    } else {
        debug!(
            "Rejected '{}' trail of width {:.1}: {} intersections (allowed {})",
            template.name, width, hits, allowed_intersections
        );
        None
    }
}

/// One connection attempt between rooms `a` and `b`. On success a trail room
/// wrapping the ribbon joins the set, connected to both rooms. On rejection
/// nothing changes.
pub fn attempt_trail_connection<R: Rng + ?Sized>(
    rooms: &mut RoomSet,
    a: RoomId,
    b: RoomId,
    template: &TrailTemplate,
    allowed_intersections: usize,
    tunables: &GenerationTunables,
    rng: &mut R,
) -> Option<RoomId> {
    let ribbon = {
        let obstacles = rooms.obstacles(&[a, b]);
        plan_trail(
            rooms.get(a).area(),
            rooms.get(b).area(),
            &obstacles,
            template,
            allowed_intersections,
            tunables,
            rng,
        )?
    };

    let layer = rooms.get(a).layer.max(rooms.get(b).layer);
    let origin = ribbon.center();
    let trail = rooms.insert(template.name.clone(), RoomKind::Trail, layer, origin, ribbon);
    rooms.connect(trail, a);
    rooms.connect(trail, b);
    debug!("Trail {} '{}' connects {} and {}", trail, template.name, a, b);
    Some(trail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment2D;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn room(set: &mut RoomSet, name: &str, x: f64, y: f64, size: f64) -> RoomId {
        let origin = Point2D::new(x, y);
        set.insert(name, RoomKind::Room, 1, origin, Area::rectangle(name, origin, size, size))
    }

    #[test]
    fn test_straight_centerline() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Point2D::new(3.0, 4.0);
        let q = Point2D::new(-20.0, 9.0);
        assert_eq!(build_centerline(p, q, 0, &mut rng), vec![p, q]);
    }

    #[test]
    fn test_curvy_centerline_stays_within_offset() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = Point2D::new(0.0, 0.0);
        let q = Point2D::new(400.0, 0.0);
        let line = build_centerline(p, q, 8, &mut rng);

        assert_eq!(line.len(), 10);
        assert_eq!(line[0], p);
        assert_eq!(line[9], q);
        for (i, point) in line.iter().enumerate().skip(1).take(8) {
            assert_approx_eq!(point.x, 400.0 * i as f64 / 9.0);
            assert!(point.y.abs() <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_extrude_two_points_is_rectangle() {
        let area = extrude_centerline(&[Point2D::new(0.0, 0.0), Point2D::new(50.0, 0.0)], 10.0);
        let expected = [
            Point2D::new(0.0, 5.0),
            Point2D::new(50.0, 5.0),
            Point2D::new(50.0, -5.0),
            Point2D::new(0.0, -5.0),
        ];
        assert_eq!(area.points().len(), 4);
        for (got, want) in area.points().iter().zip(expected.iter()) {
            assert_approx_eq!(got.x, want.x);
            assert_approx_eq!(got.y, want.y);
        }
        assert_approx_eq!(area.bounds().width(), 50.0);
        assert_approx_eq!(area.bounds().height(), 10.0);
    }

    #[test]
    fn test_extrude_bent_line_contains_centerline() {
        let line = [Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0), Point2D::new(100.0, 100.0)];
        let area = extrude_centerline(&line, 20.0);
        assert_eq!(area.points().len(), 6);
        assert!(area.contains_point(Point2D::new(50.0, 0.0)));
        assert!(area.contains_point(Point2D::new(100.0, 50.0)));
        assert!(!area.contains_point(Point2D::new(50.0, 50.0)));
    }

    #[test]
    fn test_edge_point_stays_inside() {
        let shapes = [
            Area::rectangle("r", Point2D::new(0.0, 0.0), 120.0, 60.0),
            Area::circle("c", Point2D::new(0.0, 0.0), 75.0, 24),
        ];
        for shape in &shapes {
            for k in 0..16 {
                let angle = std::f64::consts::TAU * k as f64 / 16.0;
                let toward = Point2D::from_polar(Point2D::ORIGIN, 500.0, angle);
                let edge = compute_edge_point(Point2D::ORIGIN, toward, shape);
                assert!(shape.contains_point(edge));
                assert!(edge.length() > 20.0);
            }
        }
    }

    #[test]
    fn test_edge_point_zero_direction() {
        let area = Area::rectangle("r", Point2D::new(5.0, 5.0), 10.0, 10.0);
        let c = Point2D::new(5.0, 5.0);
        assert_eq!(compute_edge_point(c, c, &area), c);
    }

    #[test]
    fn test_obstacle_blocks_when_no_intersections_allowed() {
        let tunables = GenerationTunables::default();
        let template = TrailTemplate::new("straight", 10, 10, 0);
        let mut set = RoomSet::new();
        let a = room(&mut set, "a", 0.0, 0.0, 100.0);
        let b = room(&mut set, "b", 600.0, 0.0, 100.0);
        room(&mut set, "block", 300.0, 0.0, 100.0);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(attempt_trail_connection(&mut set, a, b, &template, 0, &tunables, &mut rng).is_none());
        assert_eq!(set.live_count(), 3);
        assert!(set.get(a).connected_rooms().is_empty());

        let trail = attempt_trail_connection(&mut set, a, b, &template, 1, &tunables, &mut rng).unwrap();
        assert_eq!(set.live_count(), 4);
        assert_eq!(set.get(trail).kind, RoomKind::Trail);
        assert_eq!(set.get(trail).connected_rooms(), &[a, b]);
        assert_eq!(set.get(a).connected_rooms(), &[trail]);
        assert_eq!(set.get(b).connected_rooms(), &[trail]);
    }

    #[test]
    fn test_ribbon_reaches_into_both_rooms() {
        let tunables = GenerationTunables::default();
        let template = TrailTemplate::new("straight", 8, 8, 0);
        let area_a = Area::rectangle("a", Point2D::new(0.0, 0.0), 100.0, 100.0);
        let area_b = Area::rectangle("b", Point2D::new(400.0, 0.0), 100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(4);

        let ribbon = plan_trail(&area_a, &area_b, &[], &template, 0, &tunables, &mut rng).unwrap();
        assert!(ribbon.intersects(&area_a));
        assert!(ribbon.intersects(&area_b));
        assert!(ribbon.contains_point(Point2D::new(200.0, 0.0)));
        // The interior anchor sits 40 units inside the 50-unit half width.
        assert!(ribbon.contains_point(Point2D::new(12.0, 0.0)));
        assert!(!ribbon.contains_point(Point2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_accepted_trails_respect_budget() {
        let tunables = GenerationTunables::default();
        let template = TrailTemplate::new("wiggle", 6, 30, 6);
        let area_a = Area::rectangle("a", Point2D::new(0.0, 0.0), 80.0, 80.0);
        let area_b = Area::rectangle("b", Point2D::new(500.0, 0.0), 80.0, 80.0);
        let obstacles = [
            Area::rectangle("o1", Point2D::new(250.0, 0.0), 40.0, 40.0),
            Area::rectangle("o2", Point2D::new(250.0, 60.0), 40.0, 40.0),
            Area::rectangle("o3", Point2D::new(250.0, -60.0), 40.0, 40.0),
        ];
        let refs: Vec<&Area> = obstacles.iter().collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(ribbon) = plan_trail(&area_a, &area_b, &refs, &template, 1, &tunables, &mut rng) {
                let hits = obstacles.iter().filter(|o| ribbon.intersects(o)).count();
                assert!(hits <= 1, "seed {} accepted {} hits", seed, hits);
            }
        }
    }

    #[test]
    fn test_segment_sanity_for_ribbon_edges() {
        let ribbon = extrude_centerline(&[Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)], 2.0);
        let top = Segment2D::new(ribbon.points()[0], ribbon.points()[1]);
        let bottom = Segment2D::new(ribbon.points()[2], ribbon.points()[3]);
        assert!(!top.intersects(&bottom));
    }
}
