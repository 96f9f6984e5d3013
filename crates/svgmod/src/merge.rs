//! Hole-to-boundary merging.
//!
//! KiCad will not "pick up the pen" when moving between a polygon outline
//! and holes within it, so each hole is spliced into the container's
//! traversal through a zero-width slit: a bridge segment from a container
//! point to a hole point that does not cross the visible inner space of any
//! hole. The result is a single simple closed polygon.

use crate::contour::Contour;
use crate::geometry::{Point, Segment};

/// A discovered connection for one hole: the container point index to
/// splice at, and the hole's points rotated to start at the bridged vertex.
type Bridge = (usize, Vec<Point>);

/// Result of merging holes into a container outline.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedOutline {
    /// Single closed point sequence tracing the container and every
    /// successfully bridged hole.
    pub points: Vec<Point>,
    /// Holes for which no safe bridge exists; these are absent from
    /// `points`, which misrepresents them as filled area.
    pub dropped: usize,
}

/// Search for a safe connection between `holes[hole_index]` and the
/// container.
///
/// The search is exhaustive and lexicographic: container-point-major, then
/// hole-point-minor, returning the first pair whose bridge segment avoids
/// every hole. Edges of the bridge's own hole that connect to the bridge
/// terminal are exempt - the bridge is allowed to touch the hole it enters.
///
/// Greedy on purpose: the first acceptable pair favors bridges near the
/// start of the container traversal and needs no backtracking. Changing the
/// tie-break (e.g. to a shortest-bridge heuristic) changes observable
/// output on ambiguous inputs.
fn find_bridge(container: &Contour, holes: &[Contour], hole_index: usize) -> Option<Bridge> {
    let hole = &holes[hole_index];

    // Try the next point on the container:
    for cp in 0..container.points.len() {
        let container_point = container.points[cp];

        // Try the next point on the hole (the duplicate closing point
        // offers nothing new):
        for hp in 0..hole.points.len().saturating_sub(1) {
            let bridge = Segment::new(container_point, hole.points[hp]);

            let blocked = holes
                .iter()
                .enumerate()
                .any(|(other, contour)| contour.intersects(&bridge, other == hole_index));

            if !blocked {
                return Some((cp, hole.points_starting_at(hp)));
            }
        }
    }

    eprintln!("Warning: could not insert hole without overlapping other holes; dropping it");
    None
}

/// Merge `holes` into `container`, producing one closed point sequence.
///
/// One bridge is found per hole, bridges are applied in ascending container
/// index order, and each hole's rotated sequence is spliced in between a
/// duplicate pair of the container point, forming a zero-width slit.
/// Unmergeable holes are skipped with a diagnostic; input contours are never
/// mutated.
pub fn merge_holes(container: &Contour, holes: &[Contour]) -> MergedOutline {
    if holes.is_empty() || container.points.is_empty() {
        return MergedOutline {
            points: container.points.clone(),
            dropped: 0,
        };
    }

    let mut insertions: Vec<Bridge> = Vec::with_capacity(holes.len());
    let mut dropped = 0;

    for hole_index in 0..holes.len() {
        match find_bridge(container, holes, hole_index) {
            Some(bridge) => insertions.push(bridge),
            None => dropped += 1,
        }
    }

    // Stable sort keeps hole order for (unexpected) equal container indices.
    insertions.sort_by_key(|insertion| insertion.0);

    let points = &container.points;
    let mut inlined = vec![points[0]];
    let mut ip = 1;

    for (cp, hole_points) in &insertions {
        while ip <= *cp {
            inlined.push(points[ip]);
            ip += 1;
        }

        // Skip the hole's first (and matching last) point when it would
        // duplicate the container point just emitted.
        if inlined.last() == hole_points.first() {
            inlined.extend_from_slice(&hole_points[1..hole_points.len() - 1]);
        } else {
            inlined.extend_from_slice(hole_points);
        }

        // Close the detour and resume the outer walk:
        inlined.push(points[ip - 1]);
    }

    while ip < points.len() {
        inlined.push(points[ip]);
        ip += 1;
    }

    MergedOutline {
        points: inlined,
        dropped,
    }
}
