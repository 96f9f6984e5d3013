//! Closed polygon contours and the processing steps that normalize them.
//!
//! A contour is an ordered point sequence that semantically forms a closed
//! polygon: after `process` the first and last points are exactly equal and
//! no two consecutive points coincide. Insertion order is significant - it
//! defines the boundary traversal direction and the bridge search order.

use crate::geometry::{Point, Segment};
use crate::transform::Transform;

/// An ordered closed point sequence forming one polygon boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    /// Wrap a point sequence. Fewer than 3 points is suspicious but not
    /// fatal; downstream callers decide whether to render it.
    pub fn new(points: Vec<Point>) -> Self {
        if points.len() < 3 {
            eprintln!(
                "Warning: path segment has only {} points (not a polygon?)",
                points.len()
            );
        }
        Self { points }
    }

    /// True when the first and last points are exactly equal.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Apply the document transform to every point, drop consecutive exact
    /// duplicates, then close the ring if the ends differ. Replaces the
    /// contour's point list.
    pub fn process(&mut self, flip: bool, transform: &Transform) {
        let mut points: Vec<Point> = Vec::with_capacity(self.points.len() + 1);

        for &point in &self.points {
            let point = transform.apply(point, flip);

            // Consecutive-duplicate removal only, against the point just
            // emitted - not global deduplication.
            if points.last() != Some(&point) {
                points.push(point);
            }
        }

        if let Some(&first) = points.first() {
            if points.last() != Some(&first) {
                points.push(first);
            }
        }

        self.points = points;
    }

    /// Return the points reordered to start at `index`, still closed.
    ///
    /// The duplicate closing point is stripped before rotation and a copy of
    /// the new first point appended after. Index 0 returns the sequence
    /// unchanged.
    pub fn points_starting_at(&self, index: usize) -> Vec<Point> {
        if index == 0 {
            return self.points.clone();
        }

        // Strip the end point, which duplicates the start point:
        let open = &self.points[..self.points.len() - 1];

        let mut points = Vec::with_capacity(open.len() + 1);
        points.extend_from_slice(&open[index..]);
        points.extend_from_slice(&open[..index]);
        points.push(points[0]);
        points
    }

    /// Walk this contour's edges in order and report whether any of them
    /// intersects `bridge`. With `exempt_connected`, edges that share the
    /// bridge's terminal point are skipped - the bridge is allowed to touch
    /// the hole it is entering.
    pub fn intersects(&self, bridge: &Segment, exempt_connected: bool) -> bool {
        for pair in self.points.windows(2) {
            let edge = Segment::new(pair[0], pair[1]);

            if exempt_connected && bridge.q_connects(&edge) {
                continue;
            }

            if bridge.intersects(&edge) {
                return true;
            }
        }

        false
    }

    /// Bounding box as (min, max), or None for an empty contour.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        if self.points.is_empty() {
            return None;
        }

        let min_x = self.points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = self.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = self.points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = self.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Some((Point::new(min_x, min_y), Point::new(max_x, max_y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Transform {
        Transform::new(Point::new(0.0, 0.0), 1.0, false)
    }

    fn square() -> Contour {
        Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(0.0, 0.0),
        ])
    }

    #[test]
    fn process_closes_open_contour() {
        let mut c = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ]);
        c.process(false, &identity());
        assert!(c.is_closed());
        assert_eq!(c.points.len(), 4);
    }

    #[test]
    fn process_removes_consecutive_duplicates() {
        let mut c = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 0.0),
        ]);
        c.process(false, &identity());
        for pair in c.points.windows(2) {
            assert_ne!(pair[0], pair[1], "adjacent duplicate survived");
        }
        assert!(c.is_closed());
    }

    #[test]
    fn process_quantization_can_collapse_points() {
        // Two near points quantize to the same integer coordinate and the
        // duplicate is dropped.
        let mut c = Contour::new(vec![
            Point::new(0.1, 0.1),
            Point::new(0.2, 0.2),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ]);
        c.process(false, &Transform::new(Point::new(0.0, 0.0), 1.0, true));
        assert_eq!(
            c.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn rotation_at_zero_is_identity() {
        let c = square();
        assert_eq!(c.points_starting_at(0), c.points);
    }

    #[test]
    fn rotation_keeps_contour_closed() {
        let c = square();
        let rotated = c.points_starting_at(2);
        assert_eq!(rotated.len(), c.points.len());
        assert_eq!(rotated[0], Point::new(4.0, 4.0));
        assert_eq!(rotated[rotated.len() - 1], rotated[0]);
        assert_eq!(rotated[1], Point::new(0.0, 4.0));
        assert_eq!(rotated[2], Point::new(0.0, 0.0));
        assert_eq!(rotated[3], Point::new(4.0, 0.0));
    }

    #[test]
    fn intersects_detects_crossing_edge() {
        let c = square();
        let bridge = Segment::new(Point::new(-1.0, 2.0), Point::new(5.0, 2.0));
        assert!(c.intersects(&bridge, false));
    }

    #[test]
    fn intersects_exempts_connected_edges() {
        let c = square();
        // Bridge terminating on a vertex touches only the two adjacent
        // edges; with the exemption those edges don't count.
        let bridge = Segment::new(Point::new(-1.0, -1.0), Point::new(0.0, 0.0));
        assert!(c.intersects(&bridge, false));
        assert!(!c.intersects(&bridge, true));
    }

    #[test]
    fn missing_edge_cases_still_count_without_exemption() {
        let c = square();
        // Terminates in the middle of an edge: the exemption only covers
        // endpoint connections, so this still intersects.
        let bridge = Segment::new(Point::new(2.0, -1.0), Point::new(2.0, 0.0));
        assert!(c.intersects(&bridge, true));
    }
}
