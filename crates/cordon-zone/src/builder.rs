//! Fluent construction of zone records.

use cordon_core::Vec2;

use crate::error::ZoneDefinitionError;
use crate::record::{ShapeRecord, ZoneRecord};

/// Builds a [`ZoneRecord`] field by field.
///
/// The builder defers all validation to [`ZoneBuilder::finish`], so
/// partially configured builders can be passed around freely. The
/// position starts as NaN, which validation reports as unset if no
/// `position` call arrives.
#[derive(Clone, Debug)]
pub struct ZoneBuilder {
    name: String,
    short_name: Option<String>,
    x: f32,
    z: f32,
    use_map_coordinates: bool,
    min_height: Option<f32>,
    max_height: Option<f32>,
    tags: Vec<String>,
    shape: Option<ShapeRecord>,
}

impl ZoneBuilder {
    /// Start a record with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            x: f32::NAN,
            z: f32::NAN,
            use_map_coordinates: false,
            min_height: None,
            max_height: None,
            tags: Vec::new(),
            shape: None,
        }
    }

    /// Set the abbreviated name.
    pub fn short_name(mut self, short: impl Into<String>) -> Self {
        self.short_name = Some(short.into());
        self
    }

    /// Set the center position.
    pub fn position(mut self, x: f32, z: f32) -> Self {
        self.x = x;
        self.z = z;
        self
    }

    /// Mark the record as authored in map-image coordinates.
    pub fn map_coordinates(mut self) -> Self {
        self.use_map_coordinates = true;
        self
    }

    /// Set the vertical extent. Pass `None` to leave either end open.
    pub fn heights(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    /// Use a circular footprint.
    pub fn circle(mut self, radius: f32) -> Self {
        self.shape = Some(ShapeRecord::Circle { radius });
        self
    }

    /// Use a rectangular footprint.
    pub fn rect(mut self, size_x: f32, size_z: f32) -> Self {
        self.shape = Some(ShapeRecord::Rect { size_x, size_z });
        self
    }

    /// Use a polygonal footprint.
    pub fn polygon(mut self, points: Vec<Vec2>) -> Self {
        self.shape = Some(ShapeRecord::Polygon { points });
        self
    }

    /// Append a raw tag string.
    pub fn tag(mut self, raw: impl Into<String>) -> Self {
        self.tags.push(raw.into());
        self
    }

    /// Produce the validated record.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneDefinitionError::ShapeMissing`] when no shape
    /// method was called, or whatever
    /// [`ZoneRecord::validate`] reports.
    pub fn finish(self) -> Result<ZoneRecord, ZoneDefinitionError> {
        let shape = self.shape.ok_or(ZoneDefinitionError::ShapeMissing)?;
        let record = ZoneRecord {
            name: self.name,
            short_name: self.short_name,
            x: self.x,
            z: self.z,
            use_map_coordinates: self.use_map_coordinates,
            min_height: self.min_height,
            max_height: self.max_height,
            tags: self.tags,
            shape,
        };
        record.validate()?;
        Ok(record)
    }
}
