//! Line segments on the ground plane.
//!
//! Polygon edges are stored as [`Line`] values with their slope and
//! intercept precomputed, so the per-poll crossing test costs one
//! comparison pair and one division-free evaluation.

use cordon_core::Vec2;

/// A ground-plane line segment with cached derived quantities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// First endpoint.
    pub p1: Vec2,
    /// Second endpoint.
    pub p2: Vec2,
    /// Rise over run, `(p2.z - p1.z) / (p2.x - p1.x)`.
    ///
    /// Infinite or NaN for vertical segments; callers route through
    /// [`Line::x_at_z`], which special-cases verticality on the
    /// endpoints instead of the slope.
    pub slope: f32,
    /// Z-axis intercept of the infinite line through the segment.
    pub intercept: f32,
    /// Euclidean length of the segment.
    pub length: f32,
}

impl Line {
    /// Build a segment between two points, caching slope, intercept,
    /// and length.
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        let slope = (p2.z - p1.z) / (p2.x - p1.x);
        Self {
            p1,
            p2,
            slope,
            intercept: p1.z - slope * p1.x,
            length: p1.distance(p2),
        }
    }

    /// Whether the segment is vertical on the ground plane.
    pub fn is_vertical(&self) -> bool {
        self.p1.x == self.p2.x
    }

    /// X coordinate where the infinite line through the segment
    /// reaches the given Z.
    ///
    /// For vertical segments this is the shared X of both endpoints.
    pub fn x_at_z(&self, z: f32) -> f32 {
        if self.is_vertical() {
            self.p1.x
        } else {
            (z - self.intercept) / self.slope
        }
    }

    /// Crossing test for the point-in-polygon scan.
    ///
    /// Counts this segment as crossed by an eastward ray from `pt`
    /// when `pt.z` falls in the half-open span `[min_z, max_z)` and
    /// the segment at that Z sits at or east of the point. The
    /// half-open span keeps a ray through a shared vertex from
    /// counting both incident edges.
    pub fn intersects_ray_from(&self, pt: Vec2) -> bool {
        let (min_z, max_z) = if self.p1.z <= self.p2.z {
            (self.p1.z, self.p2.z)
        } else {
            (self.p2.z, self.p1.z)
        };
        if pt.z < min_z || pt.z >= max_z {
            return false;
        }
        self.x_at_z(pt.z) >= pt.x
    }

    /// The point `distance` along the segment from `p1` towards `p2`.
    pub fn point_at_distance(&self, distance: f32) -> Vec2 {
        if self.length == 0.0 {
            return self.p1;
        }
        let t = distance / self.length;
        Vec2::new(
            self.p1.x + (self.p2.x - self.p1.x) * t,
            self.p1.z + (self.p2.z - self.p1.z) * t,
        )
    }

    /// Adjust a requested border spacing so it divides `length` into a
    /// whole number of steps.
    ///
    /// The adjusted spacing rounds towards whichever whole step count
    /// is nearer: a remainder under half a step snaps down to
    /// `length / floor`, otherwise up to `length / (floor + 1)`.
    /// A `length` under half the spacing snaps down to a floor of
    /// zero and yields infinity; border walkers treat a non-finite
    /// spacing as a segment too short for interior points.
    pub fn normalize_spacing(length: f32, spacing: f32) -> f32 {
        let answer = length / spacing;
        let can_fit = answer.floor();
        let remainder = ((answer - can_fit) * spacing).round();
        if remainder == 0.0 {
            spacing
        } else if remainder < spacing / 2.0 {
            length / can_fit
        } else {
            length / (can_fit + 1.0)
        }
    }
}
