//! Zone footprints: circle, rectangle, and polygon.
//!
//! All three shapes answer the same three questions: cached bounds,
//! exact containment, and border particle points. Containment is
//! strict for circles and rectangles (a point exactly on the boundary
//! is outside), which keeps two abutting zones from both claiming a
//! shared edge. Polygon containment uses an eastward ray crossing
//! count with half-open edge spans.

use std::f32::consts::TAU;

use cordon_core::{Aabb, Vec2};

use crate::error::ZoneDefinitionError;
use crate::line::Line;

/// Arc spacing in world units between circle border points.
pub const CIRCLE_SPACING: f32 = 18.0;

/// Spacing in world units between border points on straight edges.
pub const EDGE_SPACING: f32 = 10.0;

/// The geometric footprint of a zone on the ground plane.
///
/// Circles and rectangles are positioned by the zone center passed to
/// each method; a polygon carries absolute vertices and ignores the
/// center argument.
#[derive(Clone, Debug, PartialEq)]
pub enum ZoneShape {
    /// A circle of the given radius around the zone center.
    Circle {
        /// Radius in world units, finite and positive.
        radius: f32,
    },
    /// An axis-aligned rectangle centered on the zone center.
    Rect {
        /// Full east-west extent.
        size_x: f32,
        /// Full north-south extent.
        size_z: f32,
    },
    /// An arbitrary simple polygon with absolute vertices.
    Polygon(Polygon),
}

impl ZoneShape {
    /// Bounding rectangle of the shape positioned at `center`.
    pub fn bounds(&self, center: Vec2) -> Aabb {
        match self {
            Self::Circle { radius } => Aabb::from_corners(
                Vec2::new(center.x - radius, center.z - radius),
                Vec2::new(center.x + radius, center.z + radius),
            ),
            Self::Rect { size_x, size_z } => Aabb::from_corners(
                Vec2::new(center.x - size_x / 2.0, center.z - size_z / 2.0),
                Vec2::new(center.x + size_x / 2.0, center.z + size_z / 2.0),
            ),
            Self::Polygon(poly) => poly.bounds,
        }
    }

    /// Exact containment test for a shape positioned at `center`.
    pub fn contains(&self, center: Vec2, pt: Vec2) -> bool {
        match self {
            Self::Circle { radius } => pt.distance_squared(center) < radius * radius,
            Self::Rect { size_x, size_z } => {
                let dx = pt.x - center.x;
                let dz = pt.z - center.z;
                dx > -size_x / 2.0 && dx < size_x / 2.0 && dz > -size_z / 2.0 && dz < size_z / 2.0
            }
            Self::Polygon(poly) => poly.contains(pt),
        }
    }

    /// Evenly spaced points tracing the shape's border, for particle
    /// effects marking the zone edge.
    pub fn border_points(&self, center: Vec2) -> Vec<Vec2> {
        match self {
            Self::Circle { radius } => circle_border(center, *radius),
            Self::Rect { size_x, size_z } => rect_border(center, *size_x, *size_z),
            Self::Polygon(poly) => poly.border_points(),
        }
    }
}

fn circle_border(center: Vec2, radius: f32) -> Vec<Vec2> {
    let step = CIRCLE_SPACING / radius;
    if !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut angle = 0.0f32;
    while angle < TAU {
        out.push(Vec2::new(
            center.x + angle.cos() * radius,
            center.z + angle.sin() * radius,
        ));
        angle += step;
    }
    out
}

fn rect_border(center: Vec2, size_x: f32, size_z: f32) -> Vec<Vec2> {
    let min_x = center.x - size_x / 2.0;
    let max_x = center.x + size_x / 2.0;
    let min_z = center.z - size_z / 2.0;
    let max_z = center.z + size_z / 2.0;

    let mut out = vec![
        Vec2::new(min_x, min_z),
        Vec2::new(max_x, min_z),
        Vec2::new(max_x, max_z),
        Vec2::new(min_x, max_z),
    ];

    let step_x = Line::normalize_spacing(size_x, EDGE_SPACING);
    if step_x.is_finite() && step_x > 0.0 {
        let mut i = step_x;
        while i < size_x {
            out.push(Vec2::new(min_x + i, min_z));
            out.push(Vec2::new(min_x + i, max_z));
            i += step_x;
        }
    }

    let step_z = Line::normalize_spacing(size_z, EDGE_SPACING);
    if step_z.is_finite() && step_z > 0.0 {
        let mut i = step_z;
        while i < size_z {
            out.push(Vec2::new(min_x, min_z + i));
            out.push(Vec2::new(max_x, min_z + i));
            i += step_z;
        }
    }

    out
}

/// A simple polygon with precomputed edges and bounds.
///
/// Vertices are absolute world coordinates in authoring order. The
/// closing edge from the last vertex back to the first is implicit in
/// the record and materialized here.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
    edges: Vec<Line>,
    /// Bounding rectangle of all vertices.
    pub bounds: Aabb,
}

impl Polygon {
    /// Build a polygon from its vertices.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneDefinitionError::TooFewPoints`] for fewer than
    /// three vertices and [`ZoneDefinitionError::InvalidPoint`] for a
    /// non-finite vertex.
    pub fn new(points: Vec<Vec2>) -> Result<Self, ZoneDefinitionError> {
        if points.len() < 3 {
            return Err(ZoneDefinitionError::TooFewPoints {
                count: points.len(),
            });
        }
        for (index, p) in points.iter().enumerate() {
            if !p.x.is_finite() || !p.z.is_finite() {
                return Err(ZoneDefinitionError::InvalidPoint { index });
            }
        }
        let mut edges = Vec::with_capacity(points.len());
        for i in 0..points.len() {
            let next = (i + 1) % points.len();
            edges.push(Line::new(points[i], points[next]));
        }
        let bounds = match Aabb::around(&points) {
            Some(b) => b,
            // Unreachable past the length check above.
            None => Aabb::from_corners(Vec2::default(), Vec2::default()),
        };
        Ok(Self {
            points,
            edges,
            bounds,
        })
    }

    /// Vertices in authoring order.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Edges in authoring order, closing edge last.
    pub fn edges(&self) -> &[Line] {
        &self.edges
    }

    /// Ray-crossing containment test.
    ///
    /// A point is inside when an eastward ray from it crosses an odd
    /// number of edges.
    pub fn contains(&self, pt: Vec2) -> bool {
        let mut crossings = 0usize;
        for edge in &self.edges {
            if edge.intersects_ray_from(pt) {
                crossings += 1;
            }
        }
        crossings % 2 == 1
    }

    /// Every vertex plus evenly spaced points along each edge.
    pub fn border_points(&self) -> Vec<Vec2> {
        let mut out = Vec::new();
        for edge in &self.edges {
            out.push(edge.p1);
            if edge.length <= 0.0 {
                continue;
            }
            let step = Line::normalize_spacing(edge.length, EDGE_SPACING);
            if !step.is_finite() || step <= 0.0 {
                continue;
            }
            let mut i = step;
            while i < edge.length {
                out.push(edge.point_at_distance(i));
                i += step;
            }
        }
        out
    }
}
