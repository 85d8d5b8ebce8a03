//! Barycentric transform for triad widgets
//!
//! A triad is a point dragged inside an equilateral triangle drawn on a fixed
//! 500x500 canvas. The three barycentric weights of that point express a
//! three-way tradeoff between the concepts labelled at the vertices.
//!
//! Every caller (live preview, ingestion, export, review) goes through
//! [`weights`] with [`TriangleGeometry::standard`], so the same point always
//! produces bit-identical weights.
//!
//! # Clamping
//!
//! Each weight is clamped to a minimum of 0 independently. There is no upper
//! clamp and no renormalization, so a point far outside the triangle yields
//! one large weight with the others at 0 and the sum exceeds 1.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Canvas edge length in pixels
pub const CANVAS_SIZE: f64 = 500.0;

/// Gap between canvas edge and triangle circumcircle in pixels
pub const CANVAS_MARGIN: f64 = 100.0;

/// Pixel position on the triad canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Triangle vertices: apex first, then bottom-left, then bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriangleGeometry {
    pub v1: Point,
    pub v2: Point,
    pub v3: Point,
}

impl TriangleGeometry {
    /// Geometry shared by both triads for the lifetime of the process
    pub fn standard() -> Self {
        Self::from_canvas(CANVAS_SIZE, CANVAS_MARGIN)
    }

    /// Equilateral triangle pointing up, inscribed in a circle of radius
    /// `size/2 - margin` centred on the canvas
    pub fn from_canvas(size: f64, margin: f64) -> Self {
        let cx = size / 2.0;
        let cy = size / 2.0;
        let r = size / 2.0 - margin;
        let (sin30, cos30) = (PI / 6.0).sin_cos();

        Self {
            v1: Point::new(cx, cy - r),
            v2: Point::new(cx - r * cos30, cy + r * sin30),
            v3: Point::new(cx + r * cos30, cy + r * sin30),
        }
    }

    /// Centroid of the triangle
    pub fn centroid(&self) -> Point {
        Point::new(
            (self.v1.x + self.v2.x + self.v3.x) / 3.0,
            (self.v1.y + self.v2.y + self.v3.y) / 3.0,
        )
    }
}

impl Default for TriangleGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Barycentric weights of a point, ordered by vertex (apex, left, right)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Weights {
    /// Each weight times 100, rounded to the nearest integer independently
    ///
    /// The three values may not sum to exactly 100.
    pub fn percentages(&self) -> [u32; 3] {
        [to_percent(self.a), to_percent(self.b), to_percent(self.c)]
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    fn clamped(self) -> Self {
        Self {
            a: self.a.max(0.0),
            b: self.b.max(0.0),
            c: self.c.max(0.0),
        }
    }
}

fn to_percent(weight: f64) -> u32 {
    // Clamped weights are never negative, so round() matches half-up rounding
    (weight * 100.0).round() as u32
}

/// Unclamped barycentric weights; components are negative outside the triangle
pub fn raw_weights(point: Point, geometry: &TriangleGeometry) -> Weights {
    let TriangleGeometry { v1, v2, v3 } = *geometry;

    let denom = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    let a = ((v2.y - v3.y) * (point.x - v3.x) + (v3.x - v2.x) * (point.y - v3.y)) / denom;
    let b = ((v3.y - v1.y) * (point.x - v3.x) + (v1.x - v3.x) * (point.y - v3.y)) / denom;
    let c = 1.0 - a - b;

    Weights { a, b, c }
}

/// Clamped barycentric weights (each component >= 0)
pub fn weights(point: Point, geometry: &TriangleGeometry) -> Weights {
    raw_weights(point, geometry).clamped()
}

/// Weights against the standard canvas geometry
pub fn standard_weights(point: Point) -> Weights {
    weights(point, &TriangleGeometry::standard())
}

/// Rounded percentages against the standard canvas geometry
pub fn standard_percentages(point: Point) -> [u32; 3] {
    standard_weights(point).percentages()
}

/// True when the point lies inside or on the edge of the triangle
///
/// The capture widget ignores drags for which this is false.
pub fn contains(point: Point, geometry: &TriangleGeometry) -> bool {
    let w = raw_weights(point, geometry);
    w.a >= 0.0 && w.b >= 0.0 && w.c >= 0.0
}
