//! Whole-geometry projection between lon/lat degrees and map-native units.

use foundation::math::{BodyRadii, Projection};
use formats::geometry::{Coord, Geometry};

/// Lon/lat degrees to the projection's native coordinates. Cylindrical is
/// the identity.
pub fn project_geometry(geometry: &Geometry, projection: Projection, radii: BodyRadii) -> Geometry {
    if !projection.is_polar() {
        return geometry.clone();
    }
    geometry.map_coords(|c| projection.forward(c.x, c.y, radii).into())
}

pub fn unproject_geometry(geometry: &Geometry, projection: Projection, radii: BodyRadii) -> Geometry {
    if !projection.is_polar() {
        return geometry.clone();
    }
    geometry.map_coords(|c| {
        let (lon, lat) = projection.inverse(c.to_vec2(), radii);
        Coord::new(lon, lat)
    })
}
