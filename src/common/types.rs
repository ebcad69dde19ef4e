//! Common types used throughout rrt_planning

use nalgebra::Vector2;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_squared(&self, other: &Point2D) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    /// Distance and bearing (atan2) from `self` towards `to`.
    ///
    /// Coincident points give `(0.0, 0.0)`.
    pub fn distance_and_angle(&self, to: &Point2D) -> (f64, f64) {
        let dx = to.x - self.x;
        let dy = to.y - self.y;
        let d = dx.hypot(dy);
        let theta = dy.atan2(dx);
        (d, theta)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(xy: [f64; 2]) -> Self {
        Self { x: xy[0], y: xy[1] }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Path represented as a sequence of 2D points
#[derive(Debug, Clone, PartialEq)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2D> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2D> {
        self.points.last()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn total_length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points.windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }
}

/// Circular obstacle (center + radius)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleObstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// True when `point` lies inside the circle or on its boundary.
    pub fn collides_with(&self, point: &Point2D) -> bool {
        self.center().distance_squared(point) <= self.radius * self.radius
    }
}

impl From<(f64, f64, f64)> for CircleObstacle {
    fn from(t: (f64, f64, f64)) -> Self {
        Self::new(t.0, t.1, t.2)
    }
}

/// Axis-aligned rectangle, used as the optional play area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl AreaBounds {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        AreaBounds { xmin, xmax, ymin, ymax }
    }

    /// Inclusive containment test
    pub fn contains(&self, point: &Point2D) -> bool {
        point.x >= self.xmin && point.x <= self.xmax &&
        point.y >= self.ymin && point.y <= self.ymax
    }
}

/// Sampling interval applied to both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandArea {
    pub min: f64,
    pub max: f64,
}

impl RandArea {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl From<[f64; 2]> for RandArea {
    fn from(area: [f64; 2]) -> Self {
        Self::new(area[0], area[1])
    }
}
