//! # svgmod
//!
//! Convert SVG drawings into KiCad footprint modules.
//!
//! The pipeline: import layered shapes from an SVG document, transform
//! them into footprint coordinates, merge each shape's holes into its
//! outer boundary (KiCad polygons cannot contain holes), and serialize
//! the result in the legacy `.mod` or pretty `.kicad_mod` dialect.

pub mod contour;
pub mod export;
pub mod geometry;
pub mod layers;
pub mod merge;
pub mod svg;
pub mod transform;

// Re-export common types at crate root for convenience.
pub use contour::Contour;
pub use export::{write_footprint, ExportError, ExportOptions, OutputFormat};
pub use geometry::{Point, Segment};
pub use layers::{LayerInfo, LayerMap};
pub use merge::{merge_holes, MergedOutline};
pub use svg::{import_drawing, Drawing, ImportOptions, Shape, SvgError};
pub use transform::{Transform, Units};
