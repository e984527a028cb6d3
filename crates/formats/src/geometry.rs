use foundation::bounds::Aabb2;
use foundation::math::{Vec2, approx_eq};

/// A coordinate pair.
///
/// In geographic space `x` is longitude and `y` latitude, both in degrees.
/// Once a geometry has been projected for a polar map they are stereographic
/// easting/northing in meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn approx_eq(&self, other: &Coord) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Coord {
    fn from(v: Vec2) -> Self {
        Coord::new(v.x, v.y)
    }
}

/// Polygon boundary. Stored open: the closing edge back to the first vertex
/// is implied and the first vertex is not repeated at the end.
pub type Ring = Vec<Coord>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    pub fn tag(self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
        }
    }

    /// Case-insensitive lookup of a type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "POINT" => Some(GeometryKind::Point),
            "MULTIPOINT" => Some(GeometryKind::MultiPoint),
            "LINESTRING" => Some(GeometryKind::LineString),
            "MULTILINESTRING" => Some(GeometryKind::MultiLineString),
            "POLYGON" => Some(GeometryKind::Polygon),
            "MULTIPOLYGON" => Some(GeometryKind::MultiPolygon),
            _ => None,
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(
            self,
            GeometryKind::MultiPoint | GeometryKind::MultiLineString | GeometryKind::MultiPolygon
        )
    }

    /// The MULTI* variant of this kind's family.
    pub fn multi(self) -> Self {
        match self {
            GeometryKind::Point | GeometryKind::MultiPoint => GeometryKind::MultiPoint,
            GeometryKind::LineString | GeometryKind::MultiLineString => {
                GeometryKind::MultiLineString
            }
            GeometryKind::Polygon | GeometryKind::MultiPolygon => GeometryKind::MultiPolygon,
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    MultiPoint(Vec<Coord>),
    LineString(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    /// Outer ring only; interior rings are not supported.
    Polygon(Ring),
    MultiPolygon(Vec<Ring>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    pub fn is_point_like(&self) -> bool {
        matches!(self, Geometry::Point(_) | Geometry::MultiPoint(_))
    }

    /// Coordinate sequences of the geometry: one per point, line or ring.
    pub fn parts(&self) -> Vec<&[Coord]> {
        match self {
            Geometry::Point(p) => vec![std::slice::from_ref(p)],
            Geometry::MultiPoint(ps) => ps.iter().map(std::slice::from_ref).collect(),
            Geometry::LineString(line) | Geometry::Polygon(line) => vec![line.as_slice()],
            Geometry::MultiLineString(parts) | Geometry::MultiPolygon(parts) => {
                parts.iter().map(Vec::as_slice).collect()
            }
        }
    }

    pub fn coords(&self) -> impl Iterator<Item = &Coord> + '_ {
        self.parts().into_iter().flatten()
    }

    pub fn vertex_count(&self) -> usize {
        self.parts().iter().map(|p| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Axis-aligned extent of every coordinate; `None` for an empty geometry.
    pub fn extent(&self) -> Option<Aabb2> {
        Aabb2::from_points(self.coords().map(|c| c.to_vec2()))
    }

    /// Applies `f` to every coordinate, keeping the structure.
    pub fn map_coords(&self, f: impl Fn(Coord) -> Coord) -> Geometry {
        let line = |pts: &Vec<Coord>| pts.iter().map(|c| f(*c)).collect::<Vec<_>>();
        match self {
            Geometry::Point(p) => Geometry::Point(f(*p)),
            Geometry::MultiPoint(ps) => Geometry::MultiPoint(line(ps)),
            Geometry::LineString(ps) => Geometry::LineString(line(ps)),
            Geometry::MultiLineString(parts) => {
                Geometry::MultiLineString(parts.iter().map(line).collect())
            }
            Geometry::Polygon(ring) => Geometry::Polygon(line(ring)),
            Geometry::MultiPolygon(rings) => Geometry::MultiPolygon(rings.iter().map(line).collect()),
        }
    }

    /// Single-part children; a single-part geometry is its own only child.
    pub fn children(&self) -> Vec<Geometry> {
        match self {
            Geometry::MultiPoint(ps) => ps.iter().copied().map(Geometry::Point).collect(),
            Geometry::MultiLineString(parts) => {
                parts.iter().cloned().map(Geometry::LineString).collect()
            }
            Geometry::MultiPolygon(rings) => rings.iter().cloned().map(Geometry::Polygon).collect(),
            single => vec![single.clone()],
        }
    }

    /// Wraps a single-part geometry in its MULTI* variant; MULTI* is unchanged.
    pub fn into_multi(self) -> Geometry {
        match self {
            Geometry::Point(p) => Geometry::MultiPoint(vec![p]),
            Geometry::LineString(line) => Geometry::MultiLineString(vec![line]),
            Geometry::Polygon(ring) => Geometry::MultiPolygon(vec![ring]),
            multi => multi,
        }
    }

    /// Concatenates the parts of two geometries of the same family into one
    /// MULTI* geometry. `None` when the families differ.
    pub fn union(self, other: Geometry) -> Option<Geometry> {
        match (self.into_multi(), other.into_multi()) {
            (Geometry::MultiPoint(mut a), Geometry::MultiPoint(b)) => {
                a.extend(b);
                Some(Geometry::MultiPoint(a))
            }
            (Geometry::MultiLineString(mut a), Geometry::MultiLineString(b)) => {
                a.extend(b);
                Some(Geometry::MultiLineString(a))
            }
            (Geometry::MultiPolygon(mut a), Geometry::MultiPolygon(b)) => {
                a.extend(b);
                Some(Geometry::MultiPolygon(a))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::wkt::to_wkt(self, None))
    }
}
