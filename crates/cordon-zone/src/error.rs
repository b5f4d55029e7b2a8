//! Definition-time validation errors.

use std::error::Error;
use std::fmt;

/// A zone record failed validation and cannot become a runtime zone.
///
/// Raised when a record is checked, either directly via
/// [`crate::record::ZoneRecord::validate`] or during assembly in
/// [`crate::provider::build_zone_set`]. One record failing never
/// affects its siblings; the provider isolates each failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneDefinitionError {
    /// The zone name is empty.
    NameMissing,
    /// The zone name exceeds the maximum length.
    NameTooLong {
        /// Observed length in characters.
        len: usize,
    },
    /// The short name exceeds the maximum length.
    ShortNameTooLong {
        /// Observed length in characters.
        len: usize,
    },
    /// The center position is unset or not finite.
    InvalidPosition {
        /// East-west coordinate as given.
        x: f32,
        /// North-south coordinate as given.
        z: f32,
    },
    /// A circle radius must be finite and strictly positive.
    InvalidRadius {
        /// The offending radius.
        value: f32,
    },
    /// A rectangle extent must be finite and strictly positive.
    InvalidSize {
        /// Which axis failed, `"x"` or `"z"`.
        axis: &'static str,
        /// The offending extent.
        value: f32,
    },
    /// A polygon needs at least three points.
    TooFewPoints {
        /// How many points the record supplied.
        count: usize,
    },
    /// A polygon point is not finite.
    InvalidPoint {
        /// Index of the offending point.
        index: usize,
    },
    /// Minimum height exceeds maximum height.
    HeightOrder {
        /// Lower bound as given.
        min: f32,
        /// Upper bound as given.
        max: f32,
    },
    /// Another zone already uses this name (case-insensitive).
    DuplicateName {
        /// The colliding name, as given by the later record.
        name: String,
    },
    /// The record declares no shape.
    ShapeMissing,
    /// The record is authored in map coordinates but no transform
    /// was supplied.
    MapTransformUnavailable,
    /// The map transform parameters are unusable.
    InvalidTransform {
        /// Human-readable rejection reason.
        reason: &'static str,
    },
}

impl fmt::Display for ZoneDefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameMissing => write!(f, "zone name is empty"),
            Self::NameTooLong { len } => {
                write!(f, "zone name is {len} characters, maximum is 128")
            }
            Self::ShortNameTooLong { len } => {
                write!(f, "zone short name is {len} characters, maximum is 64")
            }
            Self::InvalidPosition { x, z } => {
                write!(f, "zone center ({x}, {z}) is unset or not finite")
            }
            Self::InvalidRadius { value } => {
                write!(f, "circle radius {value} must be finite and positive")
            }
            Self::InvalidSize { axis, value } => {
                write!(f, "rectangle {axis} extent {value} must be finite and positive")
            }
            Self::TooFewPoints { count } => {
                write!(f, "polygon has {count} points, at least 3 required")
            }
            Self::InvalidPoint { index } => {
                write!(f, "polygon point {index} is not finite")
            }
            Self::HeightOrder { min, max } => {
                write!(f, "minimum height {min} exceeds maximum height {max}")
            }
            Self::DuplicateName { name } => {
                write!(f, "zone name {name:?} is already in use")
            }
            Self::ShapeMissing => write!(f, "zone record declares no shape"),
            Self::MapTransformUnavailable => {
                write!(
                    f,
                    "record uses map coordinates but no map transform is configured"
                )
            }
            Self::InvalidTransform { reason } => {
                write!(f, "map transform rejected: {reason}")
            }
        }
    }
}

impl Error for ZoneDefinitionError {}
