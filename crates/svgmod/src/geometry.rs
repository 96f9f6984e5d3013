//! Core geometry types: points, segments and orientation tests.
//!
//! Everything here uses exact floating-point comparison. The upstream
//! transform step quantizes coordinates before these tests run, so an
//! epsilon tolerance would change observable results - don't add one.

/// A 2D point in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Orientation of an ordered point triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Find the orientation of the ordered triplet (p, q, r) from the sign of
/// the cross product. An exact zero means collinear.
#[inline]
pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Given three collinear points p, q, r, check whether q lies within the
/// bounding box of segment pr.
#[inline]
pub fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// A directed line segment from `p` to `q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub p: Point,
    pub q: Point,
}

impl Segment {
    #[inline]
    pub fn new(p: Point, q: Point) -> Self {
        Self { p, q }
    }

    /// Return true if this segment and `other` intersect.
    ///
    /// Classic orientation test: the general-position rule plus the four
    /// collinear sub-cases, so touching and overlapping segments count as
    /// intersecting. Dropping any of the degenerate cases misses
    /// shared-endpoint touches.
    pub fn intersects(&self, other: &Segment) -> bool {
        let o1 = orientation(self.p, self.q, other.p);
        let o2 = orientation(self.p, self.q, other.q);
        let o3 = orientation(other.p, other.q, self.p);
        let o4 = orientation(other.p, other.q, self.q);

        // General case:
        if o1 != o2 && o3 != o4 {
            return true;
        }

        // other.p is collinear with self and lies on it:
        (o1 == Orientation::Collinear && on_segment(self.p, other.p, self.q))
            // other.q is collinear with self and lies on it:
            || (o2 == Orientation::Collinear && on_segment(self.p, other.q, self.q))
            // self.p is collinear with other and lies on it:
            || (o3 == Orientation::Collinear && on_segment(other.p, self.p, other.q))
            // self.q is collinear with other and lies on it:
            || (o4 == Orientation::Collinear && on_segment(other.p, self.q, other.q))
    }

    /// Return true if this segment's terminal point coincides exactly with
    /// either endpoint of `other`.
    ///
    /// Lets a bridge touch the hole it is entering without that touch
    /// counting as an intersection.
    #[inline]
    pub fn q_connects(&self, other: &Segment) -> bool {
        self.q == other.p || self.q == other.q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation_tri_state() {
        assert_eq!(
            orientation(pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)),
            Orientation::Collinear
        );
        assert_eq!(
            orientation(pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            orientation(pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, -1.0)),
            Orientation::CounterClockwise
        );
    }

    #[test]
    fn on_segment_bounding_box() {
        assert!(on_segment(pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0)));
        assert!(!on_segment(pt(0.0, 0.0), pt(3.0, 3.0), pt(2.0, 2.0)));
    }

    #[test]
    fn crossing_segments_intersect() {
        let a = Segment::new(pt(0.0, 0.0), pt(4.0, 4.0));
        let b = Segment::new(pt(0.0, 4.0), pt(4.0, 0.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = Segment::new(pt(0.0, 0.0), pt(4.0, 0.0));
        let b = Segment::new(pt(0.0, 1.0), pt(4.0, 1.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn disjoint_collinear_segments_do_not_intersect() {
        let a = Segment::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let b = Segment::new(pt(2.0, 0.0), pt(3.0, 0.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn overlapping_collinear_segments_intersect() {
        let a = Segment::new(pt(0.0, 0.0), pt(2.0, 0.0));
        let b = Segment::new(pt(1.0, 0.0), pt(3.0, 0.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn shared_endpoint_counts_as_intersection() {
        let a = Segment::new(pt(0.0, 0.0), pt(2.0, 2.0));
        let b = Segment::new(pt(2.0, 2.0), pt(4.0, 0.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn endpoint_touching_interior_counts_as_intersection() {
        // b's endpoint lies in the middle of a
        let a = Segment::new(pt(0.0, 0.0), pt(4.0, 0.0));
        let b = Segment::new(pt(2.0, 0.0), pt(2.0, 3.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn q_connects_matches_either_endpoint() {
        let bridge = Segment::new(pt(0.0, 0.0), pt(1.0, 1.0));
        let edge_from = Segment::new(pt(1.0, 1.0), pt(2.0, 1.0));
        let edge_to = Segment::new(pt(2.0, 1.0), pt(1.0, 1.0));
        let unrelated = Segment::new(pt(5.0, 5.0), pt(6.0, 6.0));
        assert!(bridge.q_connects(&edge_from));
        assert!(bridge.q_connects(&edge_to));
        assert!(!bridge.q_connects(&unrelated));
    }

    #[test]
    fn q_connects_is_about_the_terminal_point_only() {
        // The bridge's *origin* matching an endpoint is not a connection.
        let bridge = Segment::new(pt(0.0, 0.0), pt(1.0, 1.0));
        let edge = Segment::new(pt(0.0, 0.0), pt(3.0, 0.0));
        assert!(!bridge.q_connects(&edge));
    }
}
