//! SVG import - extract layered shapes from SVG files.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, shape-to-path)
//! then walks the tree to extract path data as contours. Layer groups are
//! recognized by their Inkscape label; usvg does not preserve foreign
//! attributes, so a preliminary quick-xml pass records each group's
//! `inkscape:label` keyed by its `id`.
//!
//! ## Curve flattening
//!
//! SVG paths contain Bézier curves (cubic and quadratic). These are
//! flattened into line segments with lyon_geom at a configurable tolerance
//! before any polygon operation runs.

use std::collections::HashMap;

use lyon_geom::{point, CubicBezierSegment, QuadraticBezierSegment};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::contour::Contour;
use crate::geometry::Point;
use crate::layers::LayerMap;
use crate::transform::{MM_PER_INCH, SVG_DPI};

/// Error type for SVG import.
#[derive(Debug)]
pub enum SvgError {
    ParseError(String),
    XmlError(String),
    NoLayers,
}

impl std::fmt::Display for SvgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SvgError::ParseError(msg) => write!(f, "SVG parse error: {}", msg),
            SvgError::XmlError(msg) => write!(f, "XML scan error: {}", msg),
            SvgError::NoLayers => write!(f, "No recognized layer groups found in SVG"),
        }
    }
}

impl std::error::Error for SvgError {}

/// Import tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    /// Tolerance for curve flattening. Lower = more points, smoother
    /// curves, slower.
    pub curve_tolerance: f32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            curve_tolerance: 0.1,
        }
    }
}

/// One filled/stroked region on a layer: a container contour plus the
/// holes enclosed by it, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Canonical layer name from the layer map.
    pub layer: String,
    pub container: Contour,
    pub holes: Vec<Contour>,
    pub fill: bool,
    pub stroke: bool,
    /// Stroke width in millimeters (already unit-converted).
    pub stroke_width: f64,
}

/// A parsed document: every shape found on a recognized layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub shapes: Vec<Shape>,
    /// Document width/height attribute values, if present (SVG user units).
    pub document_size: Option<(f64, f64)>,
}

impl Drawing {
    /// Bounding box over every contour of every shape, in source units.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let mut bbox: Option<(Point, Point)> = None;

        for shape in &self.shapes {
            for contour in std::iter::once(&shape.container).chain(shape.holes.iter()) {
                if let Some((min, max)) = contour.bounding_box() {
                    bbox = Some(match bbox {
                        None => (min, max),
                        Some((lo, hi)) => (
                            Point::new(lo.x.min(min.x), lo.y.min(min.y)),
                            Point::new(hi.x.max(max.x), hi.y.max(max.y)),
                        ),
                    });
                }
            }
        }

        bbox
    }
}

/// Parse SVG content and extract all shapes on recognized layers.
pub fn import_drawing(
    svg_content: &str,
    layer_map: &LayerMap,
    options: &ImportOptions,
) -> Result<Drawing, SvgError> {
    let (labels, document_size) = scan_group_labels(svg_content)?;

    let usvg_options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &usvg_options)
        .map_err(|e| SvgError::ParseError(e.to_string()))?;

    let mut shapes = Vec::new();
    collect_from_group(
        tree.root(),
        &labels,
        layer_map,
        None,
        options.curve_tolerance,
        &mut shapes,
    );

    if shapes.is_empty() {
        return Err(SvgError::NoLayers);
    }

    Ok(Drawing {
        shapes,
        document_size,
    })
}

/// Streaming pass over the raw XML: collect `id -> inkscape:label` for
/// every group, plus the document width/height.
fn scan_group_labels(
    content: &str,
) -> Result<(HashMap<String, String>, Option<(f64, f64)>), SvgError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut labels = HashMap::new();
    let mut width: Option<f64> = None;
    let mut height: Option<f64> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                // Compare local names so namespace-prefixed documents
                // (<svg:g>) still match.
                match e.name().local_name().as_ref() {
                    b"g" => {
                        let mut id: Option<String> = None;
                        let mut label: Option<String> = None;

                        for attr in e.attributes().flatten() {
                            let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
                            let value = std::str::from_utf8(&attr.value).unwrap_or("");
                            match key {
                                "id" => id = Some(value.to_string()),
                                "inkscape:label" => label = Some(value.to_string()),
                                _ => {}
                            }
                        }

                        if let (Some(id), Some(label)) = (id, label) {
                            labels.insert(id, label);
                        }
                    }
                    b"svg" => {
                        for attr in e.attributes().flatten() {
                            let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
                            let value = std::str::from_utf8(&attr.value).unwrap_or("");
                            match key {
                                "width" => width = parse_length(value),
                                "height" => height = parse_length(value),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SvgError::XmlError(format!(
                    "at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    let document_size = match (width, height) {
        (Some(w), Some(h)) => Some((w, h)),
        _ => None,
    };

    Ok((labels, document_size))
}

fn parse_length(value: &str) -> Option<f64> {
    value
        .parse::<svgtypes::Length>()
        .ok()
        .map(|length| length.number)
}

/// Recursively collect shapes from a usvg group. `layer` is the canonical
/// layer name once inside a recognized layer group; everything outside
/// layer groups is pruned.
fn collect_from_group(
    group: &usvg::Group,
    labels: &HashMap<String, String>,
    layer_map: &LayerMap,
    layer: Option<&str>,
    tolerance: f32,
    shapes: &mut Vec<Shape>,
) {
    for child in group.children() {
        match child {
            usvg::Node::Group(child_group) => {
                let next_layer = match layer {
                    Some(name) => Some(name),
                    None => {
                        let id = child_group.id();
                        let label = labels.get(id).map(String::as_str).unwrap_or(id);
                        let matched = layer_map.match_label(label);
                        if matched.is_some() {
                            eprintln!("Found layer: {}", label);
                        }
                        matched
                    }
                };
                collect_from_group(child_group, labels, layer_map, next_layer, tolerance, shapes);
            }
            usvg::Node::Path(path) => {
                if let Some(layer_name) = layer {
                    if let Some(shape) = path_to_shape(path, layer_name, tolerance) {
                        shapes.push(shape);
                    }
                }
            }
            other => {
                if layer.is_some() {
                    let kind = match other {
                        usvg::Node::Text(_) => "text",
                        usvg::Node::Image(_) => "image",
                        _ => "element",
                    };
                    eprintln!("Unsupported SVG {} on a layer; skipping", kind);
                }
            }
        }
    }
}

/// Convert a usvg path into a shape: subpaths split at MoveTo, first
/// subpath is the container, the rest are holes.
fn path_to_shape(path: &usvg::Path, layer: &str, tolerance: f32) -> Option<Shape> {
    let data = path.data();
    let ts = path.abs_transform();

    let mut subpaths: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut last_point: Option<(f32, f32)> = None;

    // Map a local point through the node's absolute transform.
    let map = |x: f32, y: f32| -> Point {
        Point::new(
            (ts.sx * x + ts.kx * y + ts.tx) as f64,
            (ts.ky * x + ts.sy * y + ts.ty) as f64,
        )
    };

    let push = |current: &mut Vec<Point>, p: Point| {
        // Curve flattening can emit exactly repeated points; drop them.
        if current.last() != Some(&p) {
            current.push(p);
        }
    };

    for cmd in data.segments() {
        match cmd {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                if !current.is_empty() {
                    subpaths.push(std::mem::take(&mut current));
                }
                push(&mut current, map(p.x, p.y));
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                push(&mut current, map(p.x, p.y));
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(tolerance, &mut |segment| {
                        push(&mut current, map(segment.to.x, segment.to.y));
                    });
                } else {
                    push(&mut current, map(p.x, p.y));
                }
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(tolerance, &mut |segment| {
                        push(&mut current, map(segment.to.x, segment.to.y));
                    });
                } else {
                    push(&mut current, map(p.x, p.y));
                }
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::Close => {
                // The contour processing step closes rings itself.
            }
        }
    }

    if !current.is_empty() {
        subpaths.push(current);
    }

    if subpaths.is_empty() {
        return None;
    }

    let mut contours = subpaths.into_iter().map(Contour::new);
    let container = contours.next()?;
    let holes: Vec<Contour> = contours.collect();

    let fill = path.fill().is_some();
    let stroke = path.stroke().is_some();
    let stroke_width = path
        .stroke()
        .map(|s| s.width().get() as f64 * MM_PER_INCH / SVG_DPI)
        .unwrap_or(0.0);

    Some(Shape {
        layer: layer.to_string(),
        container,
        holes,
        fill,
        stroke,
        stroke_width,
    })
}
