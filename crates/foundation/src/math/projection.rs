//! Map projections used by the planetary map.
//!
//! Cylindrical is the equirectangular lat/lon grid: its native coordinates
//! are the degrees themselves. The polar projections are spherical polar
//! stereographic on the body's polar radius, in meters.

use std::f64::consts::FRAC_PI_4;

use super::{BodyRadii, Vec2, normalize_longitude, LongitudeDomain};

/// Latitude (degrees) bounding the polar caps shown by the polar projections.
pub const POLAR_CAP_LATITUDE: f64 = 60.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Pole {
    North,
    South,
}

impl Pole {
    /// Latitude of the pole itself.
    pub fn latitude(self) -> f64 {
        match self {
            Pole::North => 90.0,
            Pole::South => -90.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Projection {
    #[default]
    Cylindrical,
    NorthPolarStereographic,
    SouthPolarStereographic,
}

impl Projection {
    pub const ALL: [Projection; 3] = [
        Projection::Cylindrical,
        Projection::NorthPolarStereographic,
        Projection::SouthPolarStereographic,
    ];

    pub fn pole(self) -> Option<Pole> {
        match self {
            Projection::Cylindrical => None,
            Projection::NorthPolarStereographic => Some(Pole::North),
            Projection::SouthPolarStereographic => Some(Pole::South),
        }
    }

    pub fn is_polar(self) -> bool {
        self.pole().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            Projection::Cylindrical => "cylindrical",
            Projection::NorthPolarStereographic => "north-polar",
            Projection::SouthPolarStereographic => "south-polar",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cylindrical" | "equirectangular" => Some(Projection::Cylindrical),
            "north-polar" | "north_polar" | "northpolar" | "north-polar-stereographic" => {
                Some(Projection::NorthPolarStereographic)
            }
            "south-polar" | "south_polar" | "southpolar" | "south-polar-stereographic" => {
                Some(Projection::SouthPolarStereographic)
            }
            _ => None,
        }
    }

    /// Longitude/latitude (degrees) to projection-native coordinates.
    pub fn forward(self, lon_deg: f64, lat_deg: f64, radii: BodyRadii) -> Vec2 {
        match self.pole() {
            None => Vec2::new(lon_deg, lat_deg),
            Some(pole) => to_polar_stereographic_m(lon_deg, lat_deg, pole, radii.polar_km),
        }
    }

    /// Projection-native coordinates back to (longitude, latitude) in degrees.
    pub fn inverse(self, native: Vec2, radii: BodyRadii) -> (f64, f64) {
        match self.pole() {
            None => (native.x, native.y),
            Some(pole) => from_polar_stereographic_m(native.x, native.y, pole, radii.polar_km),
        }
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Polar stereographic forward transform; result in meters.
///
/// Undefined at the pole opposite the projection center (the radius diverges).
pub fn to_polar_stereographic_m(lon_deg: f64, lat_deg: f64, pole: Pole, polar_radius_km: f64) -> Vec2 {
    let r2 = 2.0 * polar_radius_km * 1000.0;
    let lat = lat_deg.to_radians();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    match pole {
        Pole::North => {
            let rho = r2 * (FRAC_PI_4 - lat / 2.0).tan();
            Vec2::new(rho * sin_lon, -rho * cos_lon)
        }
        Pole::South => {
            let rho = r2 * (FRAC_PI_4 + lat / 2.0).tan();
            Vec2::new(rho * sin_lon, rho * cos_lon)
        }
    }
}

/// Inverse polar stereographic transform; longitude lands in `[0, 360)`.
pub fn from_polar_stereographic_m(x: f64, y: f64, pole: Pole, polar_radius_km: f64) -> (f64, f64) {
    let r2 = 2.0 * polar_radius_km * 1000.0;
    let rho = x.hypot(y);
    let colat = 2.0 * (rho / r2).atan();
    let (lon, lat) = match pole {
        Pole::North => (x.atan2(-y), 90.0 - colat.to_degrees()),
        Pole::South => (x.atan2(y), colat.to_degrees() - 90.0),
    };
    (
        normalize_longitude(lon.to_degrees(), LongitudeDomain::ZeroTo360),
        lat,
    )
}
