// src/geometry/area.rs

//! Closed polygon regions. Rooms, trails and the map boundary are all `Area`s.

use std::f64::consts::TAU;

use rand::Rng;

use super::{BoundingBox, Point2D, Segment2D};
use crate::config::{RoomGeometry, RoomTemplate};

const MIN_CIRCLE_SEGMENTS: usize = 8;
const MAX_CIRCLE_SEGMENTS: usize = 128;

/// A simple (possibly concave) polygon with a cached bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    name: String,
    points: Vec<Point2D>,
    bounds: BoundingBox,
}

impl Area {
    pub fn from_points(name: impl Into<String>, points: Vec<Point2D>) -> Self {
        let bounds = BoundingBox::from_points(&points);
        Self { name: name.into(), points, bounds }
    }

    /// Axis-aligned rectangle centered on `center`.
    pub fn rectangle(name: impl Into<String>, center: Point2D, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::from_points(
            name,
            vec![
                Point2D::new(center.x - hw, center.y - hh),
                Point2D::new(center.x + hw, center.y - hh),
                Point2D::new(center.x + hw, center.y + hh),
                Point2D::new(center.x - hw, center.y + hh),
            ],
        )
    }

    /// Regular polygon approximating a circle.
    pub fn circle(name: impl Into<String>, center: Point2D, radius: f64, segments: usize) -> Self {
        Self::ellipse(name, center, radius, radius, segments)
    }

    pub fn ellipse(
        name: impl Into<String>,
        center: Point2D,
        radius_x: f64,
        radius_y: f64,
        segments: usize,
    ) -> Self {
        let segments = segments.clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS);
        let points = (0..segments)
            .map(|i| {
                let angle = TAU * i as f64 / segments as f64;
                Point2D::new(center.x + radius_x * angle.cos(), center.y + radius_y * angle.sin())
            })
            .collect();
        Self::from_points(name, points)
    }

    /// Irregular star-shaped blob inscribed in a `width` x `height` ellipse.
    /// Higher `smoothness` means more vertices and less radial jitter.
    pub fn blob<R: Rng + ?Sized>(
        name: impl Into<String>,
        center: Point2D,
        width: f64,
        height: f64,
        smoothness: u32,
        rng: &mut R,
    ) -> Self {
        let segments = segments_for_smoothness(smoothness);
        let jitter = 0.35 / (1.0 + smoothness as f64);
        let points = (0..segments)
            .map(|i| {
                let angle = TAU * i as f64 / segments as f64;
                let scale = 1.0 - jitter * rng.random::<f64>();
                Point2D::new(
                    center.x + width / 2.0 * scale * angle.cos(),
                    center.y + height / 2.0 * scale * angle.sin(),
                )
            })
            .collect();
        Self::from_points(name, points)
    }

    /// Builds a room footprint from its template, sampling width and height
    /// inside the template's ranges.
    pub fn from_template<R: Rng + ?Sized>(
        name: impl Into<String>,
        center: Point2D,
        template: &RoomTemplate,
        rng: &mut R,
    ) -> Self {
        let width = sample_dimension(template.min_width, template.max_width, rng);
        let height = sample_dimension(template.min_height, template.max_height, rng);
        match template.geometry {
            RoomGeometry::Square => Self::rectangle(name, center, width, height),
            RoomGeometry::Circle => Self::ellipse(
                name,
                center,
                width / 2.0,
                height / 2.0,
                segments_for_smoothness(template.edge_smoothness),
            ),
            RoomGeometry::Random => {
                Self::blob(name, center, width, height, template.edge_smoothness, rng)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point2D {
        self.bounds.center()
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    fn edges(&self) -> impl Iterator<Item = Segment2D> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment2D::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Even-odd ray casting test.
    pub fn contains_point(&self, point: Point2D) -> bool {
        if self.is_degenerate() || !self.bounds.contains_point(point.x, point.y) {
            return false;
        }

        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > point.y) != (pj.y > point.y) {
                let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True if the two polygons overlap or touch.
    pub fn intersects(&self, other: &Area) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        if !self.bounds.intersects(&other.bounds) {
            return false;
        }

        let other_edges: Vec<Segment2D> = other.edges().collect();
        for edge in self.edges() {
            if other_edges.iter().any(|o| edge.intersects(o)) {
                return true;
            }
        }

        // No crossing edges: either disjoint or one fully inside the other.
        self.contains_point(other.points[0]) || other.contains_point(self.points[0])
    }

    /// Points spaced roughly `spacing` apart along the outline.
    pub fn perimeter_points(&self, spacing: f64) -> Vec<Point2D> {
        if spacing <= 0.0 || self.points.is_empty() {
            return self.points.clone();
        }

        let mut out = Vec::new();
        for edge in self.edges() {
            let length = edge.length();
            let steps = (length / spacing).floor().max(1.0) as usize;
            for s in 0..steps {
                out.push(edge.start.lerp(&edge.end, s as f64 / steps as f64));
            }
        }
        out
    }

    /// Rejection-samples a point inside the polygon.
    pub fn random_point_within<R: Rng + ?Sized>(&self, rng: &mut R, attempts: usize) -> Option<Point2D> {
        if self.is_degenerate() || self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0 {
            return None;
        }
        for _ in 0..attempts {
            let candidate = Point2D::new(
                rng.random_range(self.bounds.min_x..=self.bounds.max_x),
                rng.random_range(self.bounds.min_y..=self.bounds.max_y),
            );
            if self.contains_point(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

fn segments_for_smoothness(smoothness: u32) -> usize {
    (12 + 4 * smoothness as usize).clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS)
}

fn sample_dimension<R: Rng + ?Sized>(min: u32, max: u32, rng: &mut R) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.random_range(lo..=hi) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn l_shape() -> Area {
        Area::from_points(
            "l",
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(10.0, 0.0),
                Point2D::new(10.0, 4.0),
                Point2D::new(4.0, 4.0),
                Point2D::new(4.0, 10.0),
                Point2D::new(0.0, 10.0),
            ],
        )
    }

    #[test]
    fn test_rectangle_bounds_and_center() {
        let area = Area::rectangle("r", Point2D::new(50.0, 20.0), 40.0, 10.0);
        assert_approx_eq!(area.bounds().width(), 40.0);
        assert_approx_eq!(area.bounds().height(), 10.0);
        assert_approx_eq!(area.center().x, 50.0);
        assert_approx_eq!(area.center().y, 20.0);
    }

    #[test]
    fn test_contains_point_concave() {
        let area = l_shape();
        assert!(area.contains_point(Point2D::new(2.0, 8.0)));
        assert!(area.contains_point(Point2D::new(8.0, 2.0)));
        assert!(!area.contains_point(Point2D::new(8.0, 8.0)));
        assert!(!area.contains_point(Point2D::new(-1.0, 2.0)));
    }

    #[test]
    fn test_intersects_crossing_and_nested() {
        let big = Area::rectangle("big", Point2D::new(0.0, 0.0), 100.0, 100.0);
        let small = Area::rectangle("small", Point2D::new(0.0, 0.0), 10.0, 10.0);
        let crossing = Area::rectangle("cross", Point2D::new(50.0, 0.0), 20.0, 20.0);
        let far = Area::rectangle("far", Point2D::new(500.0, 0.0), 20.0, 20.0);

        assert!(big.intersects(&small));
        assert!(small.intersects(&big));
        assert!(big.intersects(&crossing));
        assert!(!big.intersects(&far));
    }

    #[test]
    fn test_concave_bbox_overlap_without_intersection() {
        let area = l_shape();
        let tucked = Area::rectangle("tucked", Point2D::new(8.0, 8.0), 2.0, 2.0);
        assert!(!area.intersects(&tucked));
    }

    #[test]
    fn test_circle_contains_center() {
        let circle = Area::circle("c", Point2D::new(5.0, 5.0), 30.0, 32);
        assert_eq!(circle.points().len(), 32);
        assert!(circle.contains_point(Point2D::new(5.0, 5.0)));
        assert!(!circle.contains_point(Point2D::new(5.0, 40.0)));
    }

    #[test]
    fn test_perimeter_points_spacing() {
        let area = Area::rectangle("r", Point2D::ORIGIN, 10.0, 10.0);
        let points = area.perimeter_points(2.5);
        assert_eq!(points.len(), 16);
    }

    #[test]
    fn test_blob_and_random_point() {
        let mut rng = StdRng::seed_from_u64(11);
        let blob = Area::blob("b", Point2D::new(100.0, 100.0), 80.0, 60.0, 2, &mut rng);
        assert!(blob.contains_point(Point2D::new(100.0, 100.0)));
        let p = blob.random_point_within(&mut rng, 200).unwrap();
        assert!(blob.contains_point(p));
    }

    #[test]
    fn test_degenerate_area() {
        let line = Area::from_points("line", vec![Point2D::ORIGIN, Point2D::new(1.0, 1.0)]);
        assert!(line.is_degenerate());
        assert!(!line.contains_point(Point2D::new(0.5, 0.5)));
        assert!(!line.intersects(&Area::rectangle("r", Point2D::ORIGIN, 4.0, 4.0)));
    }
}
