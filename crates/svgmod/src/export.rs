//! Footprint serialization.
//!
//! Two dialects are supported: the legacy `.mod` library format
//! (PCBNEW-LibModule-V1, numeric layers, optional decimil integer units,
//! front and mirrored back modules in one library) and the s-expression
//! `.kicad_mod` "pretty" format (named layers, millimeters, one front
//! module per file).
//!
//! Filled regions are merged into a single outline first; neither dialect
//! can express a polygon with holes. Stroked outlines follow each source
//! contour separately and need no merging.

use std::io::{self, Write};

use crate::contour::Contour;
use crate::geometry::Point;
use crate::layers::LayerMap;
use crate::merge::merge_holes;
use crate::svg::{Drawing, Shape};
use crate::transform::{decimil_to_mm, mm_to_decimil, Transform, Units};

/// Decimil label geometry shared by both dialects.
const LABEL_OFFSET: f64 = 1200.0;
const LABEL_SIZE: f64 = 600.0;
const LABEL_PEN: f64 = 120.0;

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    /// The drawing has no points, so no bounding box and no transform.
    EmptyDrawing,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "write error: {}", e),
            ExportError::EmptyDrawing => write!(f, "drawing contains no points to export"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::EmptyDrawing => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// PCBNEW-LibModule-V1 library file (`.mod`).
    Legacy,
    /// S-expression module file (`.kicad_mod`).
    Pretty,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name {
            "legacy" => Some(OutputFormat::Legacy),
            "pretty" => Some(OutputFormat::Pretty),
            _ => None,
        }
    }
}

/// Everything the writers need besides the drawing itself.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub module_name: String,
    pub module_value: String,
    pub scale_factor: f64,
    /// Requested units; the pretty format always writes millimeters.
    pub units: Units,
    pub format: OutputFormat,
    /// Omit the mirrored back-side module (legacy format only).
    pub front_only: bool,
    /// Source file name recorded in the library header.
    pub source_name: String,
    /// Edit timestamp for the pretty header, seconds since the epoch.
    pub timestamp: u64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            module_name: "svgmod".to_string(),
            module_value: "G***".to_string(),
            scale_factor: 1.0,
            units: Units::Millimeters,
            format: OutputFormat::Legacy,
            front_only: false,
            source_name: String::new(),
            timestamp: 0,
        }
    }
}

impl ExportOptions {
    /// The units actually written. Pretty output is metric regardless of
    /// the request.
    pub fn effective_units(&self) -> Units {
        match self.format {
            OutputFormat::Pretty => Units::Millimeters,
            OutputFormat::Legacy => self.units,
        }
    }

    /// Legacy libraries with both sides suffix the module name per side.
    fn module_name_for(&self, front: bool) -> String {
        if self.format == OutputFormat::Legacy && !self.front_only {
            if front {
                format!("{}-Front", self.module_name)
            } else {
                format!("{}-Back", self.module_name)
            }
        } else {
            self.module_name.clone()
        }
    }
}

/// Write the complete footprint file for `drawing` to `out`.
pub fn write_footprint<W: Write>(
    out: &mut W,
    drawing: &Drawing,
    layer_map: &LayerMap,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let units = options.effective_units();
    let bbox = drawing.bounding_box().ok_or(ExportError::EmptyDrawing)?;
    let transform = Transform::centering(bbox, options.scale_factor, units);

    match options.format {
        OutputFormat::Pretty => {
            write_pretty_intro(out, options)?;
            write_module(out, drawing, layer_map, options, &transform, bbox, units, true)?;
        }
        OutputFormat::Legacy => {
            write_legacy_intro(out, options, units)?;
            write_module(out, drawing, layer_map, options, &transform, bbox, units, true)?;
            if !options.front_only {
                write_module(out, drawing, layer_map, options, &transform, bbox, units, false)?;
            }
            out.write_all(b"$EndLIBRARY")?;
        }
    }

    Ok(())
}

fn write_legacy_intro<W: Write>(
    out: &mut W,
    options: &ExportOptions,
    units: Units,
) -> io::Result<()> {
    let date = chrono::Local::now().format("%a %d %b %Y %I:%M:%S %p %Z");

    let units_line = if units == Units::Millimeters {
        "\nUnits mm"
    } else {
        ""
    };

    let mut modules_list = options.module_name_for(true);
    if !options.front_only {
        modules_list.push('\n');
        modules_list.push_str(&options.module_name_for(false));
    }

    write!(
        out,
        "PCBNEW-LibModule-V1  {}{}\n$INDEX\n{}\n$EndINDEX\n#\n# {}\n#\n",
        date, units_line, modules_list, options.source_name
    )
}

fn write_pretty_intro<W: Write>(out: &mut W, options: &ExportOptions) -> io::Result<()> {
    write!(
        out,
        "(module {} (layer F.Cu) (tedit {:8X})\n  (attr smd)\n  (descr \"Imported from {}\")\n  (tags svgmod)\n",
        options.module_name, options.timestamp, options.source_name
    )
}

/// Write one module: labels, then every shape of every mapped layer. The
/// back-side module mirrors geometry across the Y axis.
#[allow(clippy::too_many_arguments)]
fn write_module<W: Write>(
    out: &mut W,
    drawing: &Drawing,
    layer_map: &LayerMap,
    options: &ExportOptions,
    transform: &Transform,
    bbox: (Point, Point),
    units: Units,
    front: bool,
) -> io::Result<()> {
    let module_name = options.module_name_for(front);
    let side = if front { "F" } else { "B" };

    let min_point = transform.apply(bbox.0, false);
    let max_point = transform.apply(bbox.1, false);

    let (label_size, label_pen, reference_y, value_y) = if units == Units::Millimeters {
        (
            decimil_to_mm(LABEL_SIZE),
            decimil_to_mm(LABEL_PEN),
            min_point.y - decimil_to_mm(LABEL_OFFSET),
            max_point.y + decimil_to_mm(LABEL_OFFSET),
        )
    } else {
        (
            LABEL_SIZE,
            LABEL_PEN,
            min_point.y - LABEL_OFFSET,
            max_point.y + LABEL_OFFSET,
        )
    };

    match options.format {
        OutputFormat::Pretty => {
            write!(
                out,
                "  (fp_text reference {0} (at 0 {1}) (layer {2}.SilkS) hide\n    (effects (font (size {3} {3}) (thickness {4})))\n  )\n  (fp_text value {5} (at 0 {6}) (layer {2}.SilkS) hide\n    (effects (font (size {3} {3}) (thickness {4})))\n  )",
                module_name,
                reference_y,
                side,
                label_size,
                label_pen,
                options.module_value,
                value_y,
            )?;
        }
        OutputFormat::Legacy => {
            write!(
                out,
                "$MODULE {0}\nPo 0 0 0 15 00000000 00000000 ~~\nLi {0}\nT0 0 {1} {2} {2} 0 {3} N I 21 \"{0}\"\nT1 0 {4} {2} {2} 0 {3} N I 21 \"{5}\"\n",
                module_name, reference_y, label_size, label_pen, value_y, options.module_value,
            )?;
        }
    }

    for (name, info) in layer_map.iter() {
        let layer = match options.format {
            OutputFormat::Pretty => match info.pretty {
                Some(pretty) => format!("{}.{}", side, pretty),
                None => continue,
            },
            OutputFormat::Legacy => {
                let Some(front_layer) = info.front else { continue };
                let number = if front {
                    front_layer
                } else {
                    info.back.unwrap_or(front_layer)
                };
                number.to_string()
            }
        };

        for shape in drawing.shapes.iter().filter(|shape| shape.layer == name) {
            write_shape(out, shape, &layer, options, transform, units, !front)?;
        }
    }

    match options.format {
        OutputFormat::Pretty => out.write_all(b"\n)"),
        OutputFormat::Legacy => writeln!(out, "$EndMODULE {}", module_name),
    }
}

fn write_shape<W: Write>(
    out: &mut W,
    shape: &Shape,
    layer: &str,
    options: &ExportOptions,
    transform: &Transform,
    units: Units,
    flip: bool,
) -> io::Result<()> {
    let mut container = shape.container.clone();
    container.process(flip, transform);

    let mut holes: Vec<Contour> = shape.holes.clone();
    for hole in &mut holes {
        hole.process(flip, transform);
    }

    let stroke_width = if units == Units::Millimeters {
        shape.stroke_width
    } else {
        mm_to_decimil(shape.stroke_width)
    };

    if shape.fill {
        let merged = merge_holes(&container, &holes);
        write_polygon_filled(out, &merged.points, layer, options.format, units, stroke_width)?;
    }

    // Pretty shapes with both fill and stroke render as the filled polygon
    // alone.
    if shape.stroke && !(options.format == OutputFormat::Pretty && shape.fill) {
        write_polygon_outline(out, &container.points, layer, options.format, stroke_width)?;
        for hole in &holes {
            write_polygon_outline(out, &hole.points, layer, options.format, stroke_width)?;
        }
    }

    Ok(())
}

fn write_polygon_filled<W: Write>(
    out: &mut W,
    points: &[Point],
    layer: &str,
    format: OutputFormat,
    units: Units,
    stroke_width: f64,
) -> io::Result<()> {
    eprintln!("    Writing filled polygon with {} points", points.len());

    match format {
        OutputFormat::Pretty => {
            write!(out, "\n  (fp_poly\n    (pts \n")?;
            for point in points {
                writeln!(out, "      (xy {} {})", point.x, point.y)?;
            }
            write!(
                out,
                "    )\n    (layer {})\n    (width {})\n  )",
                layer, stroke_width
            )?;
        }
        OutputFormat::Legacy => {
            let pen = if units == Units::Millimeters {
                decimil_to_mm(1.0)
            } else {
                1.0
            };

            writeln!(out, "DP 0 0 0 0 {} {} {}", points.len(), pen, layer)?;
            for point in points {
                writeln!(out, "Dl {} {}", point.x, point.y)?;
            }
        }
    }

    Ok(())
}

fn write_polygon_outline<W: Write>(
    out: &mut W,
    points: &[Point],
    layer: &str,
    format: OutputFormat,
    stroke_width: f64,
) -> io::Result<()> {
    eprintln!("    Writing polygon outline with {} points", points.len());

    for pair in points.windows(2) {
        match format {
            OutputFormat::Pretty => {
                write!(
                    out,
                    "\n  (fp_line\n    (start {} {})\n    (end {} {})\n    (layer {})\n    (width {})\n  )",
                    pair[0].x, pair[0].y, pair[1].x, pair[1].y, layer, stroke_width
                )?;
            }
            OutputFormat::Legacy => {
                writeln!(
                    out,
                    "DS {} {} {} {} {} {}",
                    pair[0].x, pair[0].y, pair[1].x, pair[1].y, stroke_width, layer
                )?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_contour(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
        Contour::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
            Point::new(x0, y0),
        ])
    }

    fn filled_shape(layer: &str) -> Shape {
        Shape {
            layer: layer.to_string(),
            container: square_contour(0.0, 0.0, 90.0, 90.0),
            holes: vec![square_contour(30.0, 30.0, 60.0, 60.0)],
            fill: true,
            stroke: false,
            stroke_width: 0.0,
        }
    }

    fn drawing(shapes: Vec<Shape>) -> Drawing {
        Drawing {
            shapes,
            document_size: None,
        }
    }

    fn export(drawing: &Drawing, options: &ExportOptions) -> String {
        let mut out = Vec::new();
        write_footprint(&mut out, drawing, &LayerMap::kicad_default(), options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn legacy_library_has_front_and_back_modules() {
        let drawing = drawing(vec![filled_shape("SilkS")]);
        let options = ExportOptions {
            module_name: "logo".to_string(),
            source_name: "logo.svg".to_string(),
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        assert!(text.starts_with("PCBNEW-LibModule-V1"));
        assert!(text.contains("Units mm"));
        assert!(text.contains("$INDEX\nlogo-Front\nlogo-Back\n$EndINDEX"));
        assert!(text.contains("$MODULE logo-Front"));
        assert!(text.contains("$MODULE logo-Back"));
        assert!(text.contains("$EndMODULE logo-Back"));
        assert!(text.ends_with("$EndLIBRARY"));
        // SilkS maps to 21 on the front and 20 on the back.
        assert!(text.contains(" 21\n"));
        assert!(text.contains(" 20\n"));
    }

    #[test]
    fn front_only_omits_back_module() {
        let drawing = drawing(vec![filled_shape("SilkS")]);
        let options = ExportOptions {
            module_name: "logo".to_string(),
            front_only: true,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        assert!(text.contains("$MODULE logo\n"));
        assert!(!text.contains("-Back"));
        assert!(!text.contains("-Front"));
    }

    #[test]
    fn filled_shape_with_hole_writes_merged_polygon() {
        let drawing = drawing(vec![filled_shape("SilkS")]);
        let options = ExportOptions {
            front_only: true,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        // Container (5) + hole (5) + synthetic repeat of the bridge point.
        assert!(text.contains("DP 0 0 0 0 11 "));
        assert_eq!(text.matches("Dl ").count(), 11);
    }

    #[test]
    fn decimil_points_are_integers() {
        let drawing = drawing(vec![filled_shape("SilkS")]);
        let options = ExportOptions {
            units: Units::Decimil,
            front_only: true,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        assert!(!text.contains("Units mm"));
        for line in text.lines().filter(|line| line.starts_with("Dl ")) {
            assert!(!line.contains('.'), "decimil point has a fraction: {}", line);
        }
    }

    #[test]
    fn stroke_only_shape_outlines_each_contour() {
        let mut shape = filled_shape("SilkS");
        shape.fill = false;
        shape.stroke = true;
        shape.stroke_width = 0.5;
        let drawing = drawing(vec![shape]);
        let options = ExportOptions {
            front_only: true,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        assert!(!text.contains("DP "));
        // Container and hole each have 4 edges.
        assert_eq!(text.matches("DS ").count(), 8);
        assert!(text.contains(" 0.5 21\n"));
    }

    #[test]
    fn pretty_module_structure() {
        let drawing = drawing(vec![filled_shape("SilkS")]);
        let options = ExportOptions {
            module_name: "logo".to_string(),
            module_value: "G***".to_string(),
            format: OutputFormat::Pretty,
            source_name: "logo.svg".to_string(),
            timestamp: 0x5E240D00,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        assert!(text.starts_with("(module logo (layer F.Cu) (tedit 5E240D00)"));
        assert!(text.contains("(attr smd)"));
        assert!(text.contains("(descr \"Imported from logo.svg\")"));
        assert!(text.contains("(fp_text reference logo"));
        assert!(text.contains("(fp_text value G***"));
        assert!(text.contains("(fp_poly"));
        assert!(text.contains("(layer F.SilkS)"));
        assert!(text.ends_with("\n)"));
    }

    #[test]
    fn pretty_fill_and_stroke_writes_fill_only() {
        let mut shape = filled_shape("SilkS");
        shape.stroke = true;
        shape.stroke_width = 0.5;
        let drawing = drawing(vec![shape]);
        let options = ExportOptions {
            format: OutputFormat::Pretty,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        assert!(text.contains("(fp_poly"));
        assert!(!text.contains("(fp_line"));
    }

    #[test]
    fn pretty_skips_layers_without_pretty_names() {
        let drawing = drawing(vec![filled_shape("Edge.Cuts")]);
        let options = ExportOptions {
            format: OutputFormat::Pretty,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);
        assert!(!text.contains("(fp_poly"));
    }

    #[test]
    fn legacy_skips_pretty_only_layers() {
        let drawing = drawing(vec![filled_shape("CrtYd")]);
        let options = ExportOptions {
            front_only: true,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);
        assert!(!text.contains("DP "));
    }

    #[test]
    fn back_module_mirrors_x() {
        let drawing = drawing(vec![Shape {
            layer: "SilkS".to_string(),
            container: Contour::new(vec![
                Point::new(0.0, 0.0),
                Point::new(90.0, 0.0),
                Point::new(45.0, 90.0),
                Point::new(0.0, 0.0),
            ]),
            holes: vec![],
            fill: true,
            stroke: false,
            stroke_width: 0.0,
        }]);
        let options = ExportOptions {
            units: Units::Decimil,
            ..ExportOptions::default()
        };

        let text = export(&drawing, &options);

        let front = text.find("$MODULE svgmod-Front").unwrap();
        let back = text.find("$MODULE svgmod-Back").unwrap();
        // (0,0) centers to x = -5000 on the front and mirrors to 5000.
        assert!(text[front..back].contains("Dl -5000 -5000"));
        assert!(text[back..].contains("Dl 5000 -5000"));
    }

    #[test]
    fn empty_drawing_is_an_error() {
        let drawing = drawing(vec![]);
        let result = write_footprint(
            &mut Vec::new(),
            &drawing,
            &LayerMap::kicad_default(),
            &ExportOptions::default(),
        );
        assert!(matches!(result, Err(ExportError::EmptyDrawing)));
    }
}
