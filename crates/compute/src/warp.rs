//! Densification ahead of polar projection.
//!
//! Stereographic is strongly non-linear away from the pole, so a straight
//! rendered segment between two distant lat/lon vertices drifts off the true
//! projected curve. Short geometries get every edge subdivided in degree
//! space before they are projected.

use formats::geometry::{Coord, Geometry, Ring};

use crate::dateline::is_seam_edge;

/// Output points per densified edge (start vertex included, end excluded).
pub const WARP_POINTS_PER_EDGE: usize = 16;
/// Rings and lines with more vertices than this are left alone.
pub const WARP_MAX_VERTICES: usize = 16;

// 2^4 sub-segments per edge.
const REFINEMENT_PASSES: u32 = 4;

pub fn densify(geometry: &Geometry) -> Geometry {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geometry.clone(),
        Geometry::LineString(line) => Geometry::LineString(densify_line(line)),
        Geometry::MultiLineString(lines) => {
            Geometry::MultiLineString(lines.iter().map(|l| densify_line(l)).collect())
        }
        Geometry::Polygon(ring) => Geometry::Polygon(densify_ring(ring)),
        Geometry::MultiPolygon(rings) => {
            Geometry::MultiPolygon(rings.iter().map(|r| densify_ring(r)).collect())
        }
    }
}

fn densify_ring(ring: &[Coord]) -> Ring {
    let n = ring.len();
    if n < 2 || n > WARP_MAX_VERTICES {
        return ring.to_vec();
    }
    let mut out = Vec::with_capacity(n * WARP_POINTS_PER_EDGE);
    for i in 0..n {
        push_edge(&mut out, ring[i], ring[(i + 1) % n]);
    }
    out
}

fn densify_line(line: &[Coord]) -> Vec<Coord> {
    let n = line.len();
    if n < 2 || n > WARP_MAX_VERTICES {
        return line.to_vec();
    }
    let mut out = Vec::with_capacity((n - 1) * WARP_POINTS_PER_EDGE + 1);
    for pair in line.windows(2) {
        push_edge(&mut out, pair[0], pair[1]);
    }
    out.push(line[n - 1]);
    out
}

/// Pushes `a` and the interior points of the edge towards `b`.
fn push_edge(out: &mut Vec<Coord>, a: Coord, b: Coord) {
    if a.approx_eq(&b) || is_seam_edge(a, b) {
        out.push(a);
        return;
    }
    let mut points = vec![a, b];
    for _ in 0..REFINEMENT_PASSES {
        points = refine(&points);
    }
    out.extend_from_slice(&points[..points.len() - 1]);
}

/// Inserts the midpoint between every pair of neighbours.
fn refine(points: &[Coord]) -> Vec<Coord> {
    let mut out = Vec::with_capacity(points.len() * 2 - 1);
    for pair in points.windows(2) {
        out.push(pair[0]);
        out.push(Coord::new(
            (pair[0].x + pair[1].x) * 0.5,
            (pair[0].y + pair[1].y) * 0.5,
        ));
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}
