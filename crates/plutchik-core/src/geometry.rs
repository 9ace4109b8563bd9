//! Plane geometry used to build petals: rotation, circle intersections,
//! lens shapes and region cutting, on top of `geo`.
//!
//! Angles are radians, counterclockwise positive, rotating about the origin.
//! Regions are `MultiPolygon`s because a boolean cut may leave several parts.

use geo::{Area, BooleanOps, BoundingRect, EuclideanDistance, Rotate};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub use geo::{Coord, LineString, MultiPolygon, Point, Polygon, Rect};

/// Vertices used to approximate a full circle before boolean operations.
pub const CIRCLE_SEGMENTS: usize = 128;

pub const ORIGIN: Point = Point(Coord { x: 0.0, y: 0.0 });

/// Distance from the origin.
pub fn norm(point: Point) -> f64 {
    point.euclidean_distance(&ORIGIN)
}

/// Rotates `point` about the origin by `angle` radians.
pub fn rotate_point(point: Point, angle: f64) -> Point {
    point.rotate_around_point(angle.to_degrees(), ORIGIN)
}

/// Rotates every part of `region` about the origin by `angle` radians.
pub fn rotate_region(region: &MultiPolygon, angle: f64) -> MultiPolygon {
    region.rotate_around_point(angle.to_degrees(), ORIGIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// Inscribed regular polygon with `segments` vertices.
    pub fn to_polygon(&self, segments: usize) -> Polygon {
        let segments = segments.max(3);
        let ring: Vec<Coord> = (0..segments)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / segments as f64;
                Coord {
                    x: self.center.x() + self.radius * t.cos(),
                    y: self.center.y() + self.radius * t.sin(),
                }
            })
            .collect();
        Polygon::new(LineString::from(ring), vec![])
    }
}

/// True when `region` covers no area.
pub fn is_blank(region: &MultiPolygon) -> bool {
    region.0.is_empty() || region.unsigned_area() <= 0.0
}

/// Farthest exterior vertex from the origin.
pub fn max_radius(region: &MultiPolygon) -> f64 {
    region
        .0
        .iter()
        .flat_map(|polygon| polygon.exterior().points())
        .map(norm)
        .fold(0.0, f64::max)
}

/// Area of the region shared by two circles, in closed form.
pub fn circle_intersection_area(a: Circle, b: Circle) -> f64 {
    let d = a.center.euclidean_distance(&b.center);
    let (r1, r2) = (a.radius, b.radius);
    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= (r1 - r2).abs() {
        return PI * r1.min(r2).powi(2);
    }
    let alpha = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let beta = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();
    let kite = 0.5
        * ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2))
            .max(0.0)
            .sqrt();
    r1 * r1 * alpha + r2 * r2 * beta - kite
}

/// Lens shared by two circles. Disjoint circles give an empty region; a
/// circle contained in the other gives the smaller circle.
pub fn lens_shape(a: Circle, b: Circle) -> MultiPolygon {
    a.to_polygon(CIRCLE_SEGMENTS)
        .intersection(&b.to_polygon(CIRCLE_SEGMENTS))
}

/// Lens-shaped petal pointing along +y, from the origin to `(0, tip)`.
///
/// Both circles pass through the origin and the tip; their centres sit at
/// `(±x, tip / 2)` with `x = height_width_ratio * (tip - offset)`, so a
/// smaller ratio gives a fatter petal. A tip at or inside the offset circle
/// yields no petal.
pub fn petal_lens(tip: f64, offset: f64, height_width_ratio: f64) -> MultiPolygon {
    if tip <= offset {
        return MultiPolygon(vec![]);
    }
    let x = height_width_ratio * (tip - offset);
    let y = tip / 2.0;
    let radius = x.hypot(y);
    lens_shape(
        Circle::new(Point::new(x, y), radius),
        Circle::new(Point::new(-x, y), radius),
    )
}

/// Part of `region` inside the origin-centred disk of `radius`.
pub fn clip_to_disk(region: &MultiPolygon, radius: f64) -> MultiPolygon {
    if radius <= 0.0 {
        return MultiPolygon(vec![]);
    }
    if max_radius(region) <= radius {
        return region.clone();
    }
    let disk = MultiPolygon(vec![Circle::new(ORIGIN, radius).to_polygon(CIRCLE_SEGMENTS)]);
    region.intersection(&disk)
}

/// Cuts `region` along the y axis into its `(x <= 0, x >= 0)` halves.
pub fn split_at_axis(region: &MultiPolygon) -> (MultiPolygon, MultiPolygon) {
    let Some(bounds) = region.bounding_rect() else {
        return (MultiPolygon(vec![]), MultiPolygon(vec![]));
    };
    // Cutters overhang the region so only the axis edge does any cutting.
    let (min, max) = (bounds.min(), bounds.max());
    let pad = 1.0 + (max.x - min.x).max(max.y - min.y);
    let half = |from: f64, to: f64| {
        if to - from <= 0.0 {
            return MultiPolygon(vec![]);
        }
        let cutter = Rect::new(
            Coord { x: from, y: min.y - pad },
            Coord { x: to, y: max.y + pad },
        );
        region.intersection(&MultiPolygon(vec![cutter.to_polygon()]))
    };
    let (left, right) = (min.x.min(0.0) - pad, max.x.max(0.0) + pad);
    (half(left, max.x.min(0.0)), half(min.x.max(0.0), right))
}

/// Open polyline along an origin-centred arc from `start` to `end`.
pub fn arc_points(radius: f64, start: f64, end: f64, segments: usize) -> Vec<Point> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = start + (end - start) * i as f64 / segments as f64;
            Point::new(radius * t.cos(), radius * t.sin())
        })
        .collect()
}
