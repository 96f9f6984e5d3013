//! Coordinate transform from SVG user units into footprint device units.
//!
//! One `Transform` is built per document (translation from the drawing's
//! bounding-box center, scale from the unit conversion and the user factor)
//! and applied identically to every point of every contour, so contours stay
//! mutually consistent after transform.

use crate::geometry::Point;

/// Inkscape writes 90 DPI documents; all unit factors derive from that.
pub const SVG_DPI: f64 = 90.0;
pub const MM_PER_INCH: f64 = 25.4;

/// Output units for the generated footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    /// Millimeters, written as floating point.
    Millimeters,
    /// Legacy tenth-of-a-mil integer units (10000 DPI).
    Decimil,
}

impl Units {
    /// Scale from 90 DPI SVG user units into this unit system.
    pub fn scale_from_svg(self) -> f64 {
        match self {
            Units::Millimeters => MM_PER_INCH / SVG_DPI,
            Units::Decimil => 10000.0 / SVG_DPI,
        }
    }

    /// Decimil output is integer-quantized.
    pub fn quantized(self) -> bool {
        matches!(self, Units::Decimil)
    }

    pub fn from_name(name: &str) -> Option<Units> {
        match name {
            "mm" => Some(Units::Millimeters),
            "decimil" => Some(Units::Decimil),
            _ => None,
        }
    }
}

pub fn decimil_to_mm(decimil: f64) -> f64 {
    decimil * 0.00254
}

pub fn mm_to_decimil(mm: f64) -> f64 {
    (mm * 393.700787).round()
}

/// Per-document point transform: translate, scale, optional X mirror,
/// optional integer quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset applied before scaling (negated drawing center).
    pub translation: Point,
    /// Combined unit-conversion and user scale factor.
    pub scale: f64,
    /// Round both coordinates to the nearest integer (legacy decimil mode).
    pub quantize: bool,
}

impl Transform {
    pub fn new(translation: Point, scale: f64, quantize: bool) -> Self {
        Self {
            translation,
            scale,
            quantize,
        }
    }

    /// Build the transform that centers a drawing with the given bounding
    /// box at the origin and scales it into `units`.
    pub fn centering(bbox: (Point, Point), scale_factor: f64, units: Units) -> Self {
        let (min, max) = bbox;
        let adjust_x = min.x + (max.x - min.x) / 2.0;
        let adjust_y = min.y + (max.y - min.y) / 2.0;

        Self {
            translation: Point::new(-adjust_x, -adjust_y),
            scale: scale_factor * units.scale_from_svg(),
            quantize: units.quantized(),
        }
    }

    /// Transform a single point. `flip` negates X to produce the mirrored
    /// back-side copy of a footprint.
    pub fn apply(&self, point: Point, flip: bool) -> Point {
        let mut x = (point.x + self.translation.x) * self.scale;
        let y = (point.y + self.translation.y) * self.scale;

        if flip {
            x = -x;
        }

        if self.quantize {
            Point::new(x.round(), y.round())
        } else {
            Point::new(x, y)
        }
    }
}
