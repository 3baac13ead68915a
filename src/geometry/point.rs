// src/geometry/point.rs

use std::ops::{Add, Mul, Sub};

/// A point (or free vector) in map space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts polar coordinates around `center` into a point.
    pub fn from_polar(center: Point2D, radius: f64, angle: f64) -> Self {
        Self::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalize(&self) -> Option<Point2D> {
        let length = self.length();
        if length <= f64::EPSILON {
            return None;
        }
        Some(Point2D::new(self.x / length, self.y / length))
    }

    /// The vector rotated a quarter turn counter-clockwise.
    pub fn perpendicular(&self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy)]
pub struct Segment2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment2D {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    // Positive on the left of start->end, negative on the right, zero on the line.
    fn classify_point(&self, point: &Point2D) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        dx * (point.y - self.start.y) - dy * (point.x - self.start.x)
    }

    // Assumes `point` is collinear with the segment.
    fn on_segment(&self, point: &Point2D) -> bool {
        point.x <= self.start.x.max(self.end.x)
            && point.x >= self.start.x.min(self.end.x)
            && point.y <= self.start.y.max(self.end.y)
            && point.y >= self.start.y.min(self.end.y)
    }

    /// Returns true if the two segments share at least one point.
    pub fn intersects(&self, other: &Segment2D) -> bool {
        let d1 = self.classify_point(&other.start);
        let d2 = self.classify_point(&other.end);
        let d3 = other.classify_point(&self.start);
        let d4 = other.classify_point(&self.end);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && self.on_segment(&other.start))
            || (d2 == 0.0 && self.on_segment(&other.end))
            || (d3 == 0.0 && other.on_segment(&self.start))
            || (d4 == 0.0 && other.on_segment(&self.end))
    }
}
