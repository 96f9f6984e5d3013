//! `inspect` - report the layers and shapes found in an SVG drawing.
//!
//! Useful for checking why a conversion came out empty: shows which
//! groups matched the layer table and how many contours each shape
//! carries, before any transform or merge runs.

use serde::Serialize;
use svgmod::{import_drawing, ImportOptions, LayerMap, SvgError};

use super::common::read_svg_input;

#[derive(Serialize)]
struct ShapeReport {
    layer: String,
    container_points: usize,
    holes: usize,
    fill: bool,
    stroke: bool,
    stroke_width: f64,
}

#[derive(Serialize)]
struct InspectReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    document_size: Option<(f64, f64)>,
    /// min_x, min_y, max_x, max_y in SVG user units.
    #[serde(skip_serializing_if = "Option::is_none")]
    bounding_box: Option<[f64; 4]>,
    layers: Vec<String>,
    shapes: Vec<ShapeReport>,
}

pub fn cmd_inspect(args: &[String]) {
    let mut input_path: Option<&str> = None;
    let mut tolerance = 0.1_f32;
    let mut json_output = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-i" | "--input-file" => {
                i += 1;
                if i < args.len() {
                    input_path = Some(&args[i]);
                }
            }
            "-t" | "--tolerance" => {
                i += 1;
                if i < args.len() {
                    tolerance = args[i].parse().unwrap_or(0.1);
                }
            }
            "--json" => {
                json_output = true;
            }
            other => {
                eprintln!("Unknown option: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input_path.unwrap_or_else(|| {
        eprintln!("Error: input file required (-i, use '-' for stdin)");
        std::process::exit(1);
    });

    let svg_content = read_svg_input(input_path).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let layer_map = LayerMap::kicad_default();
    let import_options = ImportOptions {
        curve_tolerance: tolerance,
    };

    let drawing = match import_drawing(&svg_content, &layer_map, &import_options) {
        Ok(drawing) => drawing,
        Err(SvgError::NoLayers) => {
            eprintln!("No recognized layer groups found.");
            eprintln!("Run the 'layers' command for the accepted names.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut layers: Vec<String> = Vec::new();
    for shape in &drawing.shapes {
        if !layers.contains(&shape.layer) {
            layers.push(shape.layer.clone());
        }
    }

    let report = InspectReport {
        document_size: drawing.document_size,
        bounding_box: drawing
            .bounding_box()
            .map(|(min, max)| [min.x, min.y, max.x, max.y]),
        layers,
        shapes: drawing
            .shapes
            .iter()
            .map(|shape| ShapeReport {
                layer: shape.layer.clone(),
                container_points: shape.container.points.len(),
                holes: shape.holes.len(),
                fill: shape.fill,
                stroke: shape.stroke,
                stroke_width: shape.stroke_width,
            })
            .collect(),
    };

    if json_output {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        if let Some((width, height)) = report.document_size {
            println!("Document size: {} x {}", width, height);
        }
        if let Some([min_x, min_y, max_x, max_y]) = report.bounding_box {
            println!(
                "Bounding box: ({}, {}) - ({}, {})",
                min_x, min_y, max_x, max_y
            );
        }
        println!("Layers: {}", report.layers.join(", "));
        println!("Shapes:");
        for shape in &report.shapes {
            let style = match (shape.fill, shape.stroke) {
                (true, true) => "fill+stroke",
                (true, false) => "fill",
                (false, true) => "stroke",
                (false, false) => "none",
            };
            println!(
                "  {}: {} points, {} holes, {}",
                shape.layer, shape.container_points, shape.holes, style
            );
        }
    }
}
