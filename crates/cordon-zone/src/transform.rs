//! Map-image to world coordinate conversion.

use cordon_core::Vec2;

use crate::error::ZoneDefinitionError;

/// Converts positions and distances authored against a square map
/// image into world coordinates.
///
/// The map image renders a `world_size` by `world_size` world into a
/// square of the same pixel dimensions, with `world_border` pixels of
/// out-of-bounds margin on every edge. Image origin is the top-left
/// corner; world origin is the center, with the image's downward axis
/// mapping to negative Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapTransform {
    world_size: f32,
    multiplier: f32,
}

impl MapTransform {
    /// Build a transform for a map image.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneDefinitionError::InvalidTransform`] when either
    /// parameter is not finite, the size is not positive, or the
    /// border consumes the whole image.
    pub fn new(world_size: f32, world_border: f32) -> Result<Self, ZoneDefinitionError> {
        if !world_size.is_finite() || !world_border.is_finite() {
            return Err(ZoneDefinitionError::InvalidTransform {
                reason: "size and border must be finite",
            });
        }
        if world_size <= 0.0 {
            return Err(ZoneDefinitionError::InvalidTransform {
                reason: "size must be positive",
            });
        }
        if world_border < 0.0 {
            return Err(ZoneDefinitionError::InvalidTransform {
                reason: "border must not be negative",
            });
        }
        if 2.0 * world_border >= world_size {
            return Err(ZoneDefinitionError::InvalidTransform {
                reason: "border consumes the whole image",
            });
        }
        Ok(Self {
            world_size,
            multiplier: (world_size - 2.0 * world_border) / world_size,
        })
    }

    /// Image-unit to world-unit scale factor.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Convert an image-space point to world space.
    ///
    /// Recenters on the image midpoint, scales, and flips the
    /// vertical axis so image-down becomes world-south.
    pub fn point(&self, image: Vec2) -> Vec2 {
        let half = self.world_size / 2.0;
        Vec2::new(
            (image.x - half) * self.multiplier,
            (image.z - half) * -self.multiplier,
        )
    }

    /// Convert an image-space distance (radius, extent) to world
    /// units.
    pub fn distance(&self, image: f32) -> f32 {
        image * self.multiplier
    }
}
