//! Antimeridian (0/360 seam) handling.
//!
//! Only simple polygons and linestrings spanning less than 180 degrees of
//! longitude are split correctly: a jump of more than 180 degrees between two
//! consecutive vertices is read as a seam crossing. Wider shapes come out
//! wrong, and nothing here detects that.

use foundation::bounds::Aabb2;
use foundation::math::{
    Pole, Projection, approx_eq, from_polar_stereographic_m, to_polar_stereographic_m,
    undangle_longitude,
};
use formats::geometry::{Coord, Geometry, Ring};
use tracing::trace;

/// Longitude jump between consecutive vertices read as a seam crossing.
pub const CROSSING_DELTA_DEG: f64 = 180.0;
/// Longitude offsets of the copies emitted by [`dateline_shift`], in order.
pub const SHIFT_OFFSETS_DEG: [f64; 3] = [0.0, 360.0, -360.0];

/// True for a longitude sitting on the seam (0 or 360).
pub fn is_seam_longitude(lon_deg: f64) -> bool {
    approx_eq(lon_deg, 0.0) || approx_eq(lon_deg, 360.0)
}

/// Both ends on the seam: such an edge runs along the seam, never across it.
pub fn is_seam_edge(a: Coord, b: Coord) -> bool {
    is_seam_longitude(a.x) && is_seam_longitude(b.x)
}

pub fn crosses_antimeridian(geometry: &Geometry, projection: Projection) -> bool {
    if geometry.is_point_like() {
        return false;
    }
    if let Some(pole) = projection.pole() {
        return geometry
            .parts()
            .iter()
            .any(|part| projected_extent_touches_seam(part, pole));
    }
    match geometry {
        Geometry::LineString(line) => crosses_cylindrical(line, false),
        Geometry::Polygon(ring) => crosses_cylindrical(ring, true),
        Geometry::MultiLineString(lines) => {
            lines.iter().any(|l| crosses_cylindrical(l, false)) || has_clean_split(lines)
        }
        Geometry::MultiPolygon(rings) => {
            rings.iter().any(|r| crosses_cylindrical(r, true)) || has_clean_split(rings)
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => false,
    }
}

fn crosses_cylindrical(coords: &[Coord], closed: bool) -> bool {
    let Some((min_x, max_x)) = longitude_range(coords) else {
        return false;
    };
    // Raw extent straddling the seam: the shape dangles past 0 or 360.
    if (max_x > 360.0 && min_x < 360.0) || (min_x < 0.0 && max_x > 0.0) {
        return true;
    }
    let seated = seat_seam_vertices(coords, closed);
    edges(&seated, closed)
        .any(|(a, b)| !is_seam_edge(a, b) && (b.x - a.x).abs() > CROSSING_DELTA_DEG)
}

/// Undangles every vertex and moves those sitting on the seam to the side
/// (0 or 360) of the nearest off-seam vertex after them, or before them when
/// a line ends on the seam. Rings look for that vertex cyclically; a ring
/// that is already split keeps its seam vertices where they are.
fn seat_seam_vertices(coords: &[Coord], closed: bool) -> Vec<Coord> {
    let undangled: Vec<Coord> = coords
        .iter()
        .map(|c| Coord::new(undangle_longitude(c.x), c.y))
        .collect();
    if closed && is_already_split(&undangled) {
        return undangled;
    }
    let n = undangled.len();
    let off_seam = |c: &&Coord| !is_seam_longitude(c.x);

    (0..n)
        .map(|i| {
            let c = undangled[i];
            if !is_seam_longitude(c.x) {
                return c;
            }
            let neighbour = if closed {
                (1..n).map(|k| &undangled[(i + k) % n]).find(off_seam)
            } else {
                undangled[i + 1..]
                    .iter()
                    .chain(undangled[..i].iter().rev())
                    .find(off_seam)
            };
            match neighbour {
                Some(nb) if nb.x > 180.0 => Coord::new(360.0, c.y),
                Some(_) => Coord::new(0.0, c.y),
                None => c,
            }
        })
        .collect()
}

/// One part ending exactly on 0 and another starting exactly on 360.
fn has_clean_split(parts: &[Vec<Coord>]) -> bool {
    let ranges: Vec<(f64, f64)> = parts.iter().filter_map(|p| longitude_range(p)).collect();
    let touches_west = ranges.iter().any(|(min, _)| *min == 0.0);
    let touches_east = ranges.iter().any(|(_, max)| *max == 360.0);
    touches_west && touches_east
}

/// Projects the part (unit sphere) and tests its extent against the seam
/// meridian, drawn from the pole out to the equator.
fn projected_extent_touches_seam(part: &[Coord], pole: Pole) -> bool {
    let projected = part
        .iter()
        .map(|c| to_polar_stereographic_m(c.x, c.y, pole, 1.0));
    let Some(extent) = Aabb2::from_points(projected) else {
        return false;
    };
    let equator = to_polar_stereographic_m(0.0, 0.0, pole, 1.0);
    let mut seam = Aabb2::from_point(0.0, 0.0);
    seam.extend_point(equator.x, equator.y);
    extent.intersects(&seam)
}

/// Every longitude into `[0, 360]`. Seam vertices of lines and rings end up
/// on the side of their neighbours, so `-10..0` becomes `350..360`.
pub fn undangle(geometry: &Geometry) -> Geometry {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {
            geometry.map_coords(|c| Coord::new(undangle_longitude(c.x), c.y))
        }
        Geometry::LineString(line) => Geometry::LineString(seat_seam_vertices(line, false)),
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(
            lines.iter().map(|l| seat_seam_vertices(l, false)).collect(),
        ),
        Geometry::Polygon(ring) => Geometry::Polygon(seat_seam_vertices(ring, true)),
        Geometry::MultiPolygon(rings) => Geometry::MultiPolygon(
            rings.iter().map(|r| seat_seam_vertices(r, true)).collect(),
        ),
    }
}

/// Splits a seam-crossing geometry into a MULTI* geometry that does not wrap.
///
/// Polygons always come back as MULTIPOLYGON and lines as MULTILINESTRING,
/// with a single part when nothing crossed. Points are returned unchanged.
pub fn split_on_dateline(geometry: &Geometry, projection: Projection) -> Geometry {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geometry.clone(),
        Geometry::Polygon(ring) => Geometry::MultiPolygon(split_ring(ring, projection)),
        Geometry::MultiPolygon(rings) => Geometry::MultiPolygon(
            rings
                .iter()
                .flat_map(|ring| split_ring(ring, projection))
                .collect(),
        ),
        Geometry::LineString(line) => Geometry::MultiLineString(split_line(line, projection)),
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(
            lines
                .iter()
                .flat_map(|line| split_line(line, projection))
                .collect(),
        ),
    }
}

/// Three copies of every part (as is, +360, -360) so a split shape renders
/// continuously whichever side of the seam the view is on.
pub fn dateline_shift(geometry: &Geometry) -> Geometry {
    fn copies(part: &[Coord]) -> impl Iterator<Item = Vec<Coord>> + '_ {
        SHIFT_OFFSETS_DEG
            .iter()
            .map(move |dx| part.iter().map(|c| Coord::new(c.x + dx, c.y)).collect())
    }

    match geometry {
        Geometry::Point(p) => Geometry::MultiPoint(copies(std::slice::from_ref(p)).flatten().collect()),
        Geometry::MultiPoint(ps) => Geometry::MultiPoint(
            ps.iter()
                .flat_map(|p| copies(std::slice::from_ref(p)).flatten())
                .collect(),
        ),
        Geometry::LineString(line) => Geometry::MultiLineString(copies(line).collect()),
        Geometry::MultiLineString(lines) => {
            Geometry::MultiLineString(lines.iter().flat_map(|l| copies(l)).collect())
        }
        Geometry::Polygon(ring) => Geometry::MultiPolygon(copies(ring).collect()),
        Geometry::MultiPolygon(rings) => {
            Geometry::MultiPolygon(rings.iter().flat_map(|r| copies(r)).collect())
        }
    }
}

/// Lays the parts of a split geometry side by side: parts starting on the 0
/// side of the seam move up by 360, next to the parts ending on 360.
pub fn join_across_seam(geometry: &Geometry) -> Geometry {
    fn joined(parts: &[Vec<Coord>]) -> Vec<Vec<Coord>> {
        let ranges: Vec<Option<(f64, f64)>> = parts.iter().map(|p| longitude_range(p)).collect();
        let reaches_360 = ranges.iter().flatten().any(|(_, max)| approx_eq(*max, 360.0));
        parts
            .iter()
            .zip(&ranges)
            .map(|(part, range)| match range {
                Some((min, max))
                    if reaches_360 && approx_eq(*min, 0.0) && *max <= CROSSING_DELTA_DEG =>
                {
                    part.iter().map(|c| Coord::new(c.x + 360.0, c.y)).collect()
                }
                _ => part.clone(),
            })
            .collect()
    }

    match geometry {
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(joined(lines)),
        Geometry::MultiPolygon(rings) => Geometry::MultiPolygon(joined(rings)),
        other => other.clone(),
    }
}

/// Keeps only the unshifted copy of every part of a [`dateline_shift`] output.
pub fn strip_dateline_shift(geometry: &Geometry) -> Geometry {
    fn originals<T: Clone>(items: &[T]) -> Vec<T> {
        items.iter().step_by(SHIFT_OFFSETS_DEG.len()).cloned().collect()
    }

    match geometry {
        Geometry::MultiPoint(ps) => Geometry::MultiPoint(originals(ps)),
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(originals(lines)),
        Geometry::MultiPolygon(rings) => Geometry::MultiPolygon(originals(rings)),
        single => single.clone(),
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct SeamCrossing {
    /// Seam longitude on the side of the edge's start (0 or 360).
    from_lon: f64,
    /// Seam longitude on the side of the edge's end.
    to_lon: f64,
    lat: f64,
}

fn seam_crossing(a: Coord, b: Coord, projection: Projection) -> Option<SeamCrossing> {
    if is_seam_edge(a, b) {
        return None;
    }
    let delta = b.x - a.x;
    let (from_lon, to_lon, b_unwrapped) = if delta > CROSSING_DELTA_DEG {
        (0.0, 360.0, b.x - 360.0)
    } else if delta < -CROSSING_DELTA_DEG {
        (360.0, 0.0, b.x + 360.0)
    } else {
        return None;
    };

    let lat = match projection.pole() {
        Some(pole) => polar_crossing_latitude(a, b, pole)
            .unwrap_or_else(|| linear_crossing_latitude(a, b.y, b_unwrapped, from_lon)),
        None => linear_crossing_latitude(a, b.y, b_unwrapped, from_lon),
    };
    Some(SeamCrossing {
        from_lon,
        to_lon,
        lat,
    })
}

/// Slope-intercept in degree space.
fn linear_crossing_latitude(a: Coord, b_lat: f64, b_lon: f64, seam_lon: f64) -> f64 {
    let run = b_lon - a.x;
    if run == 0.0 {
        return a.y;
    }
    a.y + (b_lat - a.y) * (seam_lon - a.x) / run
}

/// Intersects the straight projected edge with the zero meridian (x = 0) and
/// reads the colatitude back off its distance from the pole.
fn polar_crossing_latitude(a: Coord, b: Coord, pole: Pole) -> Option<f64> {
    let pa = to_polar_stereographic_m(a.x, a.y, pole, 1.0);
    let pb = to_polar_stereographic_m(b.x, b.y, pole, 1.0);
    let dx = pa.x - pb.x;
    if dx == 0.0 {
        return None;
    }
    let t = pa.x / dx;
    let hit = pa.lerp(pb, t);
    let (_, lat) = from_polar_stereographic_m(0.0, hit.y, pole, 1.0);
    Some(lat)
}

fn split_ring(ring: &[Coord], projection: Projection) -> Vec<Ring> {
    if ring.len() < 2 || is_already_split(ring) {
        return vec![ring.to_vec()];
    }

    let ring = seat_seam_vertices(ring, true);

    let mut parts: [Ring; 2] = [Vec::new(), Vec::new()];
    let mut current = 0;
    let mut crossings: Vec<SeamCrossing> = Vec::new();

    for (a, b) in edges(&ring, true) {
        parts[current].push(a);
        if let Some(crossing) = seam_crossing(a, b, projection) {
            parts[current].push(Coord::new(crossing.from_lon, crossing.lat));
            current = 1 - current;
            parts[current].push(Coord::new(crossing.to_lon, crossing.lat));
            crossings.push(crossing);
        }
    }
    trace!(crossings = crossings.len(), vertices = ring.len(), "split ring on dateline");

    let [first, second] = parts;
    match (crossings.first(), crossings.last()) {
        (Some(first_crossing), Some(last_crossing)) if crossings.len() % 2 == 1 => {
            // Pole cap: only one side of the seam closes, through the pole.
            let pole_lat = match projection.pole() {
                Some(pole) => pole.latitude(),
                None if mean_latitude(&ring) >= 0.0 => Pole::North.latitude(),
                None => Pole::South.latitude(),
            };
            let mut merged = first;
            merged.push(Coord::new(last_crossing.from_lon, pole_lat));
            merged.push(Coord::new(first_crossing.to_lon, pole_lat));
            merged.extend(second);
            vec![dedupe_ring(merged)]
        }
        (Some(_), Some(_)) => {
            let rings: Vec<Ring> = [dedupe_ring(first), dedupe_ring(second)]
                .into_iter()
                .filter(|r| r.len() >= 3)
                .collect();
            if rings.is_empty() {
                vec![ring]
            } else {
                rings
            }
        }
        _ => vec![first],
    }
}

/// A ring that already runs along the seam at a pole (0 -> 360 or back) is
/// the output of an earlier split.
fn is_already_split(ring: &[Coord]) -> bool {
    edges(ring, true).any(|(a, b)| {
        let same_pole = (a.y == 90.0 && b.y == 90.0) || (a.y == -90.0 && b.y == -90.0);
        same_pole
            && ((approx_eq(a.x, 0.0) && approx_eq(b.x, 360.0))
                || (approx_eq(a.x, 360.0) && approx_eq(b.x, 0.0)))
    })
}

fn split_line(line: &[Coord], projection: Projection) -> Vec<Vec<Coord>> {
    let Some(first) = line.first() else {
        return vec![Vec::new()];
    };

    // Longitude-extended copy: consecutive vertices never jump more than 180.
    let mut extended = Vec::with_capacity(line.len());
    extended.push(Coord::new(undangle_longitude(first.x), first.y));
    for c in &line[1..] {
        let prev = extended[extended.len() - 1].x;
        let mut lon = undangle_longitude(c.x);
        while lon - prev > CROSSING_DELTA_DEG {
            lon -= 360.0;
        }
        while lon - prev < -CROSSING_DELTA_DEG {
            lon += 360.0;
        }
        extended.push(Coord::new(lon, c.y));
    }

    let mut parts: Vec<Vec<Coord>> = Vec::new();
    let mut current: Vec<Coord> = Vec::new();
    for (i, &b) in extended.iter().enumerate() {
        if let Some(&a) = i.checked_sub(1).and_then(|prev| extended.get(prev)) {
            let lo = a.x.min(b.x);
            let hi = a.x.max(b.x);
            let seam = (hi / 360.0).floor() * 360.0;
            if seam > lo && seam < hi && !approx_eq(seam, lo) && !approx_eq(seam, hi) {
                let lat = projection
                    .pole()
                    .and_then(|pole| polar_crossing_latitude(a, b, pole))
                    .unwrap_or_else(|| linear_crossing_latitude(a, b.y, b.x, seam));
                current.push(Coord::new(seam, lat));
                parts.push(std::mem::take(&mut current));
                current.push(Coord::new(seam, lat));
            }
        }
        match seam_vertex_cut(&extended, i) {
            Some(seam) => {
                let cut = Coord::new(seam, b.y);
                current.push(cut);
                parts.push(std::mem::take(&mut current));
                current.push(cut);
            }
            None => current.push(b),
        }
    }
    if parts.len() > 1 {
        parts.retain(|part| part.len() >= 2);
    }
    trace!(parts = parts.len(), "split line on dateline");

    parts.into_iter().map(rebase_part).collect()
}

/// Seam longitude to cut an extended line at, when vertex `i` sits on a
/// multiple of 360 and the line goes on to the other side of it. Only the last
/// vertex of a run along the seam cuts.
fn seam_vertex_cut(line: &[Coord], i: usize) -> Option<f64> {
    let v = line[i];
    let seam = (v.x / 360.0).round() * 360.0;
    if !approx_eq(v.x, seam) {
        return None;
    }
    let off = |c: &Coord| !approx_eq(c.x, seam);
    let after = line.get(i + 1).filter(|&c| off(c))?;
    let before = line[..i].iter().rev().find(|&c| off(c))?;
    ((before.x - seam) * (after.x - seam) < 0.0).then_some(seam)
}

/// Moves a piece of an extended line back into the `[0, 360]` domain.
fn rebase_part(part: Vec<Coord>) -> Vec<Coord> {
    let sample = match part.as_slice() {
        [a, b, ..] => (a.x + b.x) * 0.5,
        [a] => a.x,
        [] => return part,
    };
    let offset = (sample / 360.0).floor() * 360.0;
    if offset == 0.0 {
        return part;
    }
    part.into_iter()
        .map(|c| Coord::new(c.x - offset, c.y))
        .collect()
}

fn dedupe_ring(ring: Ring) -> Ring {
    let mut out: Ring = Vec::with_capacity(ring.len());
    for c in ring {
        if out.last().is_some_and(|last| last.approx_eq(&c)) {
            continue;
        }
        out.push(c);
    }
    while out.len() > 1 && out[0].approx_eq(&out[out.len() - 1]) {
        out.pop();
    }
    out
}

fn mean_latitude(coords: &[Coord]) -> f64 {
    if coords.is_empty() {
        return 0.0;
    }
    coords.iter().map(|c| c.y).sum::<f64>() / coords.len() as f64
}

fn longitude_range(coords: &[Coord]) -> Option<(f64, f64)> {
    let first = coords.first()?;
    Some(
        coords
            .iter()
            .fold((first.x, first.x), |(lo, hi), c| (lo.min(c.x), hi.max(c.x))),
    )
}

/// Consecutive vertex pairs; `closed` adds the edge back to the first vertex.
fn edges(coords: &[Coord], closed: bool) -> impl Iterator<Item = (Coord, Coord)> + '_ {
    let n = coords.len();
    let count = match (closed, n) {
        (_, 0 | 1) => 0,
        (true, _) => n,
        (false, _) => n - 1,
    };
    (0..count).map(move |i| (coords[i], coords[(i + 1) % n]))
}

#[cfg(test)]
mod tests {
    use super::{
        crosses_antimeridian, dateline_shift, is_seam_longitude, join_across_seam,
        split_on_dateline, strip_dateline_shift, undangle,
    };
    use foundation::bounds::Aabb2;
    use foundation::math::Projection;
    use formats::geometry::{Coord, Geometry};
    use formats::wkt::parse;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn wkt(text: &str) -> Geometry {
        parse(text).unwrap()
    }

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn points_never_cross() {
        for p in Projection::ALL {
            assert!(!crosses_antimeridian(&wkt("POINT(359.9 10)"), p));
            assert!(!crosses_antimeridian(&wkt("MULTIPOINT((350 10),(10 10))"), p));
        }
    }

    #[test]
    fn dangling_extent_crosses() {
        let cyl = Projection::Cylindrical;
        assert!(crosses_antimeridian(&wkt("POLYGON((-10 0,10 0,10 10,-10 10))"), cyl));
        assert!(crosses_antimeridian(&wkt("POLYGON((350 0,370 0,370 10,350 10))"), cyl));
        assert!(!crosses_antimeridian(&wkt("POLYGON((10 0,50 0,50 10,10 10))"), cyl));
        assert!(!crosses_antimeridian(&wkt("POLYGON((-50 0,-10 0,-10 10,-50 10))"), cyl));
    }

    #[test]
    fn canonical_wrapping_edge_crosses() {
        let cyl = Projection::Cylindrical;
        assert!(crosses_antimeridian(&wkt("LINESTRING(350 10,10 20)"), cyl));
        assert!(crosses_antimeridian(&wkt("POLYGON((350 0,10 0,10 10,350 10))"), cyl));
    }

    #[test]
    fn clean_split_multipolygon_is_recognized() {
        let g = wkt("MULTIPOLYGON(((350 0,360 0,360 10,350 10)),((0 0,10 0,10 10,0 10)))");
        assert!(crosses_antimeridian(&g, Projection::Cylindrical));
        let g = wkt("MULTIPOLYGON(((20 0,30 0,30 10,20 10)),((40 0,50 0,50 10,40 10)))");
        assert!(!crosses_antimeridian(&g, Projection::Cylindrical));
    }

    #[test]
    fn polar_crossing_uses_projected_extent() {
        let north = Projection::NorthPolarStereographic;
        assert!(crosses_antimeridian(&wkt("POLYGON((350 70,10 70,10 80,350 80))"), north));
        assert!(!crosses_antimeridian(&wkt("POLYGON((80 70,100 70,100 80,80 80))"), north));
        // Straddles lon 180, which is not the seam.
        assert!(!crosses_antimeridian(&wkt("POLYGON((170 70,190 70,190 80,170 80))"), north));
        let south = Projection::SouthPolarStereographic;
        assert!(crosses_antimeridian(&wkt("LINESTRING(355 -75,5 -75)"), south));
        assert!(!crosses_antimeridian(&wkt("LINESTRING(175 -75,185 -75)"), south));
    }

    #[test]
    fn splits_linestring_at_interpolated_latitude() {
        let split = split_on_dateline(&wkt("LINESTRING(350 10,10 20)"), Projection::Cylindrical);
        let Geometry::MultiLineString(lines) = split else {
            panic!("expected multilinestring");
        };
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0], c(350.0, 10.0));
        assert_eq!(lines[0][1].x, 360.0);
        assert_close(lines[0][1].y, 15.0, 1e-9);
        assert_eq!(lines[1][0].x, 0.0);
        assert_close(lines[1][0].y, 15.0, 1e-9);
        assert_eq!(lines[1][1], c(10.0, 20.0));
    }

    #[test]
    fn splits_dangling_linestring() {
        let split = split_on_dateline(&wkt("LINESTRING(-20 0,20 40)"), Projection::Cylindrical);
        assert_eq!(
            split,
            Geometry::MultiLineString(vec![
                vec![c(340.0, 0.0), c(360.0, 20.0)],
                vec![c(0.0, 20.0), c(20.0, 40.0)],
            ])
        );
    }

    #[test]
    fn splits_crossing_polygon_into_two_rings() {
        let split = split_on_dateline(
            &wkt("POLYGON((350 40,10 40,10 -10,350 -10))"),
            Projection::Cylindrical,
        );
        assert_eq!(
            split,
            Geometry::MultiPolygon(vec![
                vec![c(350.0, 40.0), c(360.0, 40.0), c(360.0, -10.0), c(350.0, -10.0)],
                vec![c(0.0, 40.0), c(10.0, 40.0), c(10.0, -10.0), c(0.0, -10.0)],
            ])
        );
    }

    #[test]
    fn single_crossing_closes_through_the_pole() {
        let split = split_on_dateline(
            &wkt("POLYGON((0 70,90 70,180 70,270 70))"),
            Projection::Cylindrical,
        );
        assert_eq!(
            split,
            Geometry::MultiPolygon(vec![vec![
                c(0.0, 70.0),
                c(90.0, 70.0),
                c(180.0, 70.0),
                c(270.0, 70.0),
                c(360.0, 70.0),
                c(360.0, 90.0),
                c(0.0, 90.0),
            ]])
        );

        let south = split_on_dateline(
            &wkt("POLYGON((0 -70,90 -70,180 -70,270 -70))"),
            Projection::Cylindrical,
        );
        let Geometry::MultiPolygon(rings) = south else {
            panic!("expected multipolygon");
        };
        assert!(rings[0].contains(&c(360.0, -90.0)));
        assert!(rings[0].contains(&c(0.0, -90.0)));
    }

    #[test]
    fn already_split_pole_cap_is_left_alone() {
        let cap = wkt("POLYGON((0 70,90 70,180 70,270 70,360 70,360 90,0 90))");
        let split = split_on_dateline(&cap, Projection::Cylindrical);
        assert_eq!(split, cap.clone().into_multi());
        let again = split_on_dateline(&split, Projection::Cylindrical);
        assert_eq!(again, split);
    }

    #[test]
    fn non_crossing_input_is_wrapped_unchanged() {
        for text in [
            "POLYGON((10 0,50 0,50 10,10 10))",
            "LINESTRING(10 0,50 10,80 -5)",
            "POLYGON((350 0,360 0,360 10,350 10))",
        ] {
            let g = wkt(text);
            assert!(!crosses_antimeridian(&g, Projection::Cylindrical), "{text}");
            assert_eq!(split_on_dateline(&g, Projection::Cylindrical), g.clone().into_multi());
        }
    }

    #[test]
    fn clean_split_is_not_split_again() {
        let g = wkt("MULTIPOLYGON(((350 0,360 0,360 10,350 10)),((0 0,10 0,10 10,0 10)))");
        assert!(crosses_antimeridian(&g, Projection::Cylindrical));
        assert_eq!(split_on_dateline(&g, Projection::Cylindrical), g);
    }

    #[test]
    fn line_through_a_seam_vertex_is_cut_there() {
        let expected = Geometry::MultiLineString(vec![
            vec![c(350.0, 10.0), c(360.0, 15.0)],
            vec![c(0.0, 15.0), c(10.0, 20.0)],
        ]);
        for text in ["LINESTRING(350 10,0 15,10 20)", "LINESTRING(350 10,360 15,10 20)"] {
            let g = wkt(text);
            assert!(crosses_antimeridian(&g, Projection::Cylindrical), "{text}");
            assert_eq!(split_on_dateline(&g, Projection::Cylindrical), expected, "{text}");
        }

        let reverse = split_on_dateline(&wkt("LINESTRING(10 20,0 15,350 10)"), Projection::Cylindrical);
        assert_eq!(
            reverse,
            Geometry::MultiLineString(vec![
                vec![c(10.0, 20.0), c(0.0, 15.0)],
                vec![c(360.0, 15.0), c(350.0, 10.0)],
            ])
        );
    }

    #[test]
    fn line_touching_the_seam_stays_whole() {
        let g = wkt("LINESTRING(350 10,0 15,340 20)");
        assert!(!crosses_antimeridian(&g, Projection::Cylindrical));
        assert_eq!(undangle(&g), wkt("LINESTRING(350 10,360 15,340 20)"));
        assert_eq!(
            split_on_dateline(&g, Projection::Cylindrical),
            wkt("MULTILINESTRING((350 10,360 15,340 20))")
        );
    }

    #[test]
    fn box_ending_on_the_seam_does_not_cross() {
        let g = wkt("POLYGON((-10 0,0 0,0 10,-10 10))");
        assert!(!crosses_antimeridian(&g, Projection::Cylindrical));
        assert_eq!(undangle(&g), wkt("POLYGON((350 0,360 0,360 10,350 10))"));
        assert_eq!(
            split_on_dateline(&g, Projection::Cylindrical),
            wkt("MULTIPOLYGON(((350 0,360 0,360 10,350 10)))")
        );
    }

    #[test]
    fn box_starting_on_360_sits_east_of_the_seam() {
        let g = wkt("POLYGON((360 0,10 0,10 10,360 10))");
        assert!(!crosses_antimeridian(&g, Projection::Cylindrical));
        assert_eq!(undangle(&g), wkt("POLYGON((0 0,10 0,10 10,0 10))"));
    }

    #[test]
    fn ring_crossing_at_seam_vertices_splits_without_slivers() {
        let g = wkt("POLYGON((350 0,0 0,10 0,10 10,0 10,350 10))");
        assert!(crosses_antimeridian(&g, Projection::Cylindrical));
        assert_eq!(
            split_on_dateline(&g, Projection::Cylindrical),
            wkt("MULTIPOLYGON(((350 0,360 0,360 10,350 10)),((0 0,10 0,10 10,0 10)))")
        );
    }

    #[test]
    fn joined_parts_span_one_range_past_360() {
        let split = split_on_dateline(&wkt("POLYGON((359 0,1 0,1 1,359 1))"), Projection::Cylindrical);
        assert_eq!(split.extent().map(|e| (e.min[0], e.max[0])), Some((0.0, 360.0)));

        let joined = join_across_seam(&split);
        assert_eq!(joined.extent(), Some(Aabb2::new([359.0, 0.0], [361.0, 1.0])));

        let cap = wkt("MULTIPOLYGON(((0 70,90 70,180 70,270 70,360 70,360 90,0 90)))");
        assert_eq!(join_across_seam(&cap), cap);
    }

    #[test]
    fn polar_split_interpolates_in_projected_space() {
        let g = wkt("LINESTRING(350 70,10 70)");
        let Geometry::MultiLineString(lines) =
            split_on_dateline(&g, Projection::NorthPolarStereographic)
        else {
            panic!("expected multilinestring");
        };
        // The straight projected chord bulges towards the pole.
        let seam_lat = lines[0][1].y;
        assert_eq!(lines[0][1].x, 360.0);
        assert!(seam_lat > 70.0 && seam_lat < 71.0, "seam latitude {seam_lat}");
        assert_eq!(lines[1][0].x, 0.0);
        assert_close(lines[1][0].y, seam_lat, 1e-12);
    }

    #[test]
    fn undangle_is_idempotent() {
        let g = wkt("MULTIPOLYGON(((-10 0,10 0,10 10,-10 10)),((350 5,370 5,365 9,360 9)))");
        let once = undangle(&g);
        assert_eq!(undangle(&once), once);
        assert!(once.coords().all(|c| (0.0..=360.0).contains(&c.x)));
    }

    #[test]
    fn shift_emits_three_copies_per_part() {
        let split = wkt("MULTIPOLYGON(((350 0,360 0,360 10,350 10)),((0 0,10 0,10 10,0 10)))");
        let shifted = dateline_shift(&split);
        let Geometry::MultiPolygon(rings) = &shifted else {
            panic!("expected multipolygon");
        };
        assert_eq!(rings.len(), 6);
        assert_eq!(rings[0][0], c(350.0, 0.0));
        assert_eq!(rings[1][0], c(710.0, 0.0));
        assert_eq!(rings[2][0], c(-10.0, 0.0));

        assert_eq!(strip_dateline_shift(&shifted), split);

        let point = dateline_shift(&wkt("POINT(5 5)"));
        assert_eq!(
            point,
            Geometry::MultiPoint(vec![c(5.0, 5.0), c(365.0, 5.0), c(-355.0, 5.0)])
        );
    }

    #[test]
    fn seam_longitudes() {
        assert!(is_seam_longitude(0.0));
        assert!(is_seam_longitude(360.0));
        assert!(!is_seam_longitude(180.0));
    }
}
