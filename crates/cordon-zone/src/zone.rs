//! Validated runtime zones.

use std::sync::OnceLock;

use cordon_core::{parse_tag, Aabb, TagDescriptor, Vec2, Vec3};
use tracing::warn;

use crate::error::ZoneDefinitionError;
use crate::record::{ShapeRecord, ZoneRecord};
use crate::shape::{Polygon, ZoneShape};
use crate::transform::MapTransform;

/// A validated zone in world coordinates.
///
/// Zones are immutable once built; the tracker shares them behind
/// `Arc` and a reload swaps whole zone sets rather than mutating
/// zones in place. Construction goes through [`Zone::from_record`],
/// which validates the record and resolves map coordinates, so every
/// `Zone` in existence satisfies the definition rules.
#[derive(Debug)]
pub struct Zone {
    name: String,
    short_name: Option<String>,
    center: Vec2,
    shape: ZoneShape,
    min_height: Option<f32>,
    max_height: Option<f32>,
    from_map_coordinates: bool,
    bounds: Aabb,
    bounds_area: f32,
    tags: Vec<TagDescriptor>,
    border: OnceLock<Vec<Vec2>>,
}

impl Zone {
    /// Build a zone from an authored record.
    ///
    /// Map-coordinate records are converted to world space through
    /// `transform`; positions, radii, extents, and polygon vertices
    /// are all scaled, heights are already world-space and pass
    /// through untouched. Tag strings that parse to an empty name are
    /// dropped with a warning rather than failing the zone.
    ///
    /// # Errors
    ///
    /// Returns any [`ZoneDefinitionError`] the record fails with, or
    /// [`ZoneDefinitionError::MapTransformUnavailable`] when the
    /// record needs a transform and none was supplied.
    pub fn from_record(
        record: &ZoneRecord,
        transform: Option<&MapTransform>,
    ) -> Result<Self, ZoneDefinitionError> {
        record.validate()?;

        let transform = if record.use_map_coordinates {
            Some(transform.ok_or(ZoneDefinitionError::MapTransformUnavailable)?)
        } else {
            None
        };

        let raw_center = Vec2::new(record.x, record.z);
        let center = match transform {
            Some(t) => t.point(raw_center),
            None => raw_center,
        };

        let shape = match &record.shape {
            ShapeRecord::Circle { radius } => ZoneShape::Circle {
                radius: match transform {
                    Some(t) => t.distance(*radius),
                    None => *radius,
                },
            },
            ShapeRecord::Rect { size_x, size_z } => match transform {
                Some(t) => ZoneShape::Rect {
                    size_x: t.distance(*size_x),
                    size_z: t.distance(*size_z),
                },
                None => ZoneShape::Rect {
                    size_x: *size_x,
                    size_z: *size_z,
                },
            },
            ShapeRecord::Polygon { points } => {
                let world: Vec<Vec2> = match transform {
                    Some(t) => points.iter().map(|p| t.point(*p)).collect(),
                    None => points.clone(),
                };
                ZoneShape::Polygon(Polygon::new(world)?)
            }
        };

        let mut tags = Vec::with_capacity(record.tags.len());
        for raw in &record.tags {
            let tag = parse_tag(raw);
            if tag.is_valid() {
                tags.push(tag);
            } else {
                warn!(zone = %record.name, raw = %raw, "dropping malformed tag");
            }
        }

        let bounds = shape.bounds(center);
        Ok(Self {
            name: record.name.clone(),
            short_name: record.short_name.clone(),
            center,
            shape,
            min_height: record.min_height,
            max_height: record.max_height,
            from_map_coordinates: record.use_map_coordinates,
            bounds_area: bounds.area(),
            bounds,
            tags,
            border: OnceLock::new(),
        })
    }

    /// Display name, unique within a zone set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abbreviated name, when the author supplied one.
    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    /// World-space center.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// The zone's footprint.
    pub fn shape(&self) -> &ZoneShape {
        &self.shape
    }

    /// Lower vertical limit, if bounded below.
    pub fn min_height(&self) -> Option<f32> {
        self.min_height
    }

    /// Upper vertical limit, if bounded above.
    pub fn max_height(&self) -> Option<f32> {
        self.max_height
    }

    /// Whether the record was authored in map-image coordinates.
    pub fn from_map_coordinates(&self) -> bool {
        self.from_map_coordinates
    }

    /// Cached bounding rectangle around the footprint.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Area of the bounding rectangle, cached at construction.
    pub fn bounds_area(&self) -> f32 {
        self.bounds_area
    }

    /// Parsed tags in authoring order.
    pub fn tags(&self) -> &[TagDescriptor] {
        &self.tags
    }

    /// ASCII case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Lowercased name, used as the lookup key in zone sets and
    /// membership maps.
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Ground-plane membership test: cheap bounds rejection first,
    /// exact shape predicate second.
    pub fn contains_2d(&self, pt: Vec2) -> bool {
        self.bounds.contains(pt) && self.shape.contains(self.center, pt)
    }

    /// Full membership test including the vertical extent.
    ///
    /// Height limits are inclusive on both ends; an open end admits
    /// any height on that side.
    pub fn contains(&self, pt: Vec3) -> bool {
        if let Some(min) = self.min_height {
            if pt.y < min {
                return false;
            }
        }
        if let Some(max) = self.max_height {
            if pt.y > max {
                return false;
            }
        }
        self.contains_2d(pt.ground())
    }

    /// Border particle points, computed on first use and cached for
    /// the zone's lifetime.
    pub fn border_points(&self) -> &[Vec2] {
        self.border
            .get_or_init(|| self.shape.border_points(self.center))
    }
}
