//! CLI command implementations.
//!
//! - `convert` - Convert an SVG drawing into a KiCad footprint module
//! - `inspect` - Report the layers and shapes found in an SVG

pub mod common;
pub mod convert;
pub mod inspect;

pub use convert::cmd_convert;
pub use inspect::cmd_inspect;
