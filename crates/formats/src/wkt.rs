//! WKT-like text codec for the six supported geometry types.
//!
//! Coordinates are `x y` pairs separated by commas; point, line and ring
//! lists are parenthesized. Polygons carry exactly one ring.

use foundation::math::canonical_f64;

use crate::geometry::{Coord, Geometry, GeometryKind, Ring};

#[derive(Debug, Clone, PartialEq)]
pub enum WktError {
    UnknownTag { tag: String },
    MissingOpenParen { offset: usize },
    UnbalancedParens { offset: usize },
    InvalidNumber { offset: usize, token: String },
    InvalidCoordinate { offset: usize, reason: String },
    /// A polygon (by index within the geometry) has interior rings.
    UnsupportedHole { polygon: usize },
    Empty { kind: GeometryKind },
    TrailingInput { offset: usize },
}

impl std::fmt::Display for WktError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WktError::UnknownTag { tag } => write!(f, "unknown geometry type tag: {tag:?}"),
            WktError::MissingOpenParen { offset } => {
                write!(f, "expected '(' at offset {offset}")
            }
            WktError::UnbalancedParens { offset } => {
                write!(f, "unbalanced parentheses at offset {offset}")
            }
            WktError::InvalidNumber { offset, token } => {
                write!(f, "invalid number {token:?} at offset {offset}")
            }
            WktError::InvalidCoordinate { offset, reason } => {
                write!(f, "invalid coordinate at offset {offset}: {reason}")
            }
            WktError::UnsupportedHole { polygon } => {
                write!(f, "polygon {polygon} has interior rings, which are not supported")
            }
            WktError::Empty { kind } => write!(f, "empty {kind} is not supported"),
            WktError::TrailingInput { offset } => {
                write!(f, "unexpected trailing input at offset {offset}")
            }
        }
    }
}

impl std::error::Error for WktError {}

/// Extracts the leading type keyword without parsing coordinates.
pub fn type_tag(text: &str) -> Result<GeometryKind, WktError> {
    let mut parser = Parser::new(text);
    let kind = parser.tag()?;
    parser.skip_ws();
    if parser.peek() != Some(b'(') {
        return Err(WktError::MissingOpenParen { offset: parser.pos });
    }
    Ok(kind)
}

pub fn parse(text: &str) -> Result<Geometry, WktError> {
    let mut parser = Parser::new(text);
    let kind = parser.tag()?;
    let geometry = match kind {
        GeometryKind::Point => {
            parser.open()?;
            let c = parser.coord()?;
            parser.close()?;
            Geometry::Point(c)
        }
        GeometryKind::MultiPoint => Geometry::MultiPoint(parser.multi_point()?),
        GeometryKind::LineString => Geometry::LineString(parser.coord_list()?),
        GeometryKind::MultiLineString => {
            Geometry::MultiLineString(parser.list(|p| p.coord_list())?)
        }
        GeometryKind::Polygon => Geometry::Polygon(single_ring(parser.polygon()?, 0)?),
        GeometryKind::MultiPolygon => {
            let polygons = parser.list(|p| p.polygon())?;
            let mut rings = Vec::with_capacity(polygons.len());
            for (index, polygon) in polygons.into_iter().enumerate() {
                rings.push(single_ring(polygon, index)?);
            }
            Geometry::MultiPolygon(rings)
        }
    };

    parser.skip_ws();
    if parser.pos < parser.bytes.len() {
        return Err(WktError::TrailingInput { offset: parser.pos });
    }
    if geometry.is_empty() {
        return Err(WktError::Empty { kind });
    }
    Ok(geometry)
}

/// Serializes `geometry`; with `precision`, coordinates are fixed-decimal.
///
/// Polygon rings are written closed (first vertex repeated).
pub fn to_wkt(geometry: &Geometry, precision: Option<usize>) -> String {
    let mut out = String::from(geometry.kind().tag());
    match geometry {
        Geometry::Point(c) => {
            out.push('(');
            write_coord(&mut out, c, precision);
            out.push(')');
        }
        Geometry::MultiPoint(ps) => {
            out.push('(');
            for (i, c) in ps.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('(');
                write_coord(&mut out, c, precision);
                out.push(')');
            }
            out.push(')');
        }
        Geometry::LineString(line) => write_coords(&mut out, line, false, precision),
        Geometry::MultiLineString(lines) => {
            out.push('(');
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_coords(&mut out, line, false, precision);
            }
            out.push(')');
        }
        Geometry::Polygon(ring) => {
            out.push('(');
            write_coords(&mut out, ring, true, precision);
            out.push(')');
        }
        Geometry::MultiPolygon(rings) => {
            out.push('(');
            for (i, ring) in rings.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('(');
                write_coords(&mut out, ring, true, precision);
                out.push(')');
            }
            out.push(')');
        }
    }
    out
}

fn write_coords(out: &mut String, coords: &[Coord], closed: bool, precision: Option<usize>) {
    out.push('(');
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_coord(out, c, precision);
    }
    if closed && let Some(first) = coords.first() {
        out.push(',');
        write_coord(out, first, precision);
    }
    out.push(')');
}

fn write_coord(out: &mut String, c: &Coord, precision: Option<usize>) {
    use std::fmt::Write as _;
    let x = canonical_f64(c.x);
    let y = canonical_f64(c.y);
    // Writing into a String cannot fail.
    let _ = match precision {
        Some(p) => write!(out, "{x:.p$} {y:.p$}"),
        None => write!(out, "{x} {y}"),
    };
}

fn single_ring(mut rings: Vec<Ring>, polygon: usize) -> Result<Ring, WktError> {
    if rings.len() > 1 {
        return Err(WktError::UnsupportedHole { polygon });
    }
    Ok(rings.pop().unwrap_or_default())
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn tag(&mut self) -> Result<GeometryKind, WktError> {
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let tag = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        let kind = GeometryKind::from_tag(&tag).ok_or(WktError::UnknownTag { tag })?;

        self.skip_ws();
        let word_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        if self.pos > word_start {
            let word = &self.bytes[word_start..self.pos];
            if word.eq_ignore_ascii_case(b"EMPTY") {
                return Err(WktError::Empty { kind });
            }
            return Err(WktError::MissingOpenParen { offset: word_start });
        }
        Ok(kind)
    }

    fn open(&mut self) -> Result<(), WktError> {
        self.skip_ws();
        if self.peek() != Some(b'(') {
            return Err(WktError::MissingOpenParen { offset: self.pos });
        }
        self.pos += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), WktError> {
        self.skip_ws();
        if self.peek() != Some(b')') {
            return Err(WktError::UnbalancedParens { offset: self.pos });
        }
        self.pos += 1;
        Ok(())
    }

    /// Consumes a comma if present; reports whether another item follows.
    fn separator(&mut self) -> bool {
        self.skip_ws();
        if self.peek() == Some(b',') {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Result<f64, WktError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        {
            self.pos += 1;
        }
        let token = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        if token.is_empty() {
            return Err(WktError::InvalidCoordinate {
                offset: start,
                reason: "expected a number".to_string(),
            });
        }
        token
            .parse::<f64>()
            .map_err(|_| WktError::InvalidNumber { offset: start, token })
    }

    fn coord(&mut self) -> Result<Coord, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        self.skip_ws();
        match self.peek() {
            Some(b',') | Some(b')') => Ok(Coord::new(x, y)),
            Some(_) => Err(WktError::InvalidCoordinate {
                offset: self.pos,
                reason: "coordinates must be 'x y' pairs".to_string(),
            }),
            None => Err(WktError::UnbalancedParens { offset: self.pos }),
        }
    }

    /// `( x y, x y, ... )`
    fn coord_list(&mut self) -> Result<Vec<Coord>, WktError> {
        self.open()?;
        let mut out = Vec::new();
        loop {
            out.push(self.coord()?);
            if !self.separator() {
                break;
            }
        }
        self.close()?;
        Ok(out)
    }

    /// `( item, item, ... )`
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T, WktError>) -> Result<Vec<T>, WktError> {
        self.open()?;
        let mut out = Vec::new();
        loop {
            out.push(item(self)?);
            if !self.separator() {
                break;
            }
        }
        self.close()?;
        Ok(out)
    }

    /// Both `((x y), (x y))` and `(x y, x y)` are accepted.
    fn multi_point(&mut self) -> Result<Vec<Coord>, WktError> {
        self.open()?;
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b'(') {
                self.pos += 1;
                out.push(self.coord()?);
                self.close()?;
            } else {
                out.push(self.coord()?);
            }
            if !self.separator() {
                break;
            }
        }
        self.close()?;
        Ok(out)
    }

    /// `((ring), (hole), ...)`; rings come back open.
    fn polygon(&mut self) -> Result<Vec<Ring>, WktError> {
        let rings = self.list(|p| p.coord_list())?;
        Ok(rings.into_iter().map(open_ring).collect())
    }
}

fn open_ring(mut ring: Ring) -> Ring {
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::{WktError, parse, to_wkt, type_tag};
    use crate::geometry::{Coord, Geometry, GeometryKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_linestring() {
        let g = parse("LINESTRING(350 10, 10 20)").unwrap();
        assert_eq!(
            g,
            Geometry::LineString(vec![Coord::new(350.0, 10.0), Coord::new(10.0, 20.0)])
        );
    }

    #[test]
    fn polygon_ring_is_stored_open_and_written_closed() {
        let g = parse("POLYGON ((10 40, 50 40, 50 -10, 10 -10, 10 40))").unwrap();
        let Geometry::Polygon(ring) = &g else {
            panic!("expected polygon, got {g:?}");
        };
        assert_eq!(ring.len(), 4);
        assert_eq!(to_wkt(&g, None), "POLYGON((10 40,50 40,50 -10,10 -10,10 40))");
    }

    #[test]
    fn round_trips_every_kind() {
        let cases = [
            "POINT(1.5 -2)",
            "MULTIPOINT((1 2),(3 4))",
            "LINESTRING(0 0,1 1,2 0)",
            "MULTILINESTRING((350 10,360 15),(0 15,10 20))",
            "POLYGON((0 0,10 0,10 10,0 0))",
            "MULTIPOLYGON(((350 0,360 0,360 10,350 0)),((0 0,10 0,10 10,0 0)))",
        ];
        for text in cases {
            let g = parse(text).unwrap();
            assert_eq!(to_wkt(&g, None), text);
            assert_eq!(parse(&to_wkt(&g, None)).unwrap(), g);
        }
    }

    #[test]
    fn bare_multipoint_coordinates_are_accepted() {
        let g = parse("multipoint (1 2, 3 4)").unwrap();
        assert_eq!(g, Geometry::MultiPoint(vec![Coord::new(1.0, 2.0), Coord::new(3.0, 4.0)]));
    }

    #[test]
    fn fixed_precision_output() {
        let g = Geometry::Point(Coord::new(12.345678, -0.0));
        assert_eq!(to_wkt(&g, Some(2)), "POINT(12.35 0.00)");
    }

    #[test]
    fn rejects_holes() {
        let err = parse("POLYGON((0 0,10 0,10 10,0 0),(1 1,2 1,2 2,1 1))").unwrap_err();
        assert_eq!(err, WktError::UnsupportedHole { polygon: 0 });
        let err = parse("MULTIPOLYGON(((0 0,1 0,1 1,0 0)),((0 0,9 0,9 9,0 0),(1 1,2 1,2 2,1 1)))")
            .unwrap_err();
        assert_eq!(err, WktError::UnsupportedHole { polygon: 1 });
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse("CIRCLE(0 0)"), Err(WktError::UnknownTag { .. })));
        assert!(matches!(parse("POINT 0 0"), Err(WktError::MissingOpenParen { .. })));
        assert!(matches!(parse("LINESTRING(0 0, 1 1"), Err(WktError::UnbalancedParens { .. })));
        assert!(matches!(parse("POINT(0 0))"), Err(WktError::TrailingInput { .. })));
        assert!(matches!(parse("POINT(0 0 0)"), Err(WktError::InvalidCoordinate { .. })));
        assert!(matches!(parse("POINT(a b)"), Err(WktError::InvalidCoordinate { .. })));
        assert!(matches!(parse("POINT(1-2 3)"), Err(WktError::InvalidNumber { .. })));
        assert!(matches!(parse("POINT EMPTY"), Err(WktError::Empty { .. })));
    }

    #[test]
    fn type_tag_needs_open_paren() {
        assert_eq!(type_tag("  multipolygon ((("), Ok(GeometryKind::MultiPolygon));
        assert_eq!(type_tag("POLYGON"), Err(WktError::MissingOpenParen { offset: 7 }));
        assert!(matches!(type_tag("BOX(1 2)"), Err(WktError::UnknownTag { .. })));
    }
}
