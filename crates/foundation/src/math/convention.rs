use super::{
    BodyRadii, LongitudeDomain, flip_longitude_direction, normalize_longitude,
    planetocentric_to_planetographic, planetographic_to_planetocentric, truncate_decimals,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum LongitudeDirection {
    #[default]
    PositiveEast,
    PositiveWest,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum LatitudeType {
    #[default]
    Planetocentric,
    Planetographic,
}

/// How coordinates are presented to (and read back from) a user.
///
/// Canonical coordinates are 0-360, positive east, planetocentric.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct DisplayConvention {
    pub domain: LongitudeDomain,
    pub direction: LongitudeDirection,
    pub latitude: LatitudeType,
    /// Decimal places kept on output; `None` keeps full precision.
    pub precision: Option<u32>,
}

impl DisplayConvention {
    pub fn to_display(&self, lon_deg: f64, lat_deg: f64, radii: BodyRadii) -> (f64, f64) {
        let mut lon = normalize_longitude(lon_deg, LongitudeDomain::ZeroTo360);
        if self.direction == LongitudeDirection::PositiveWest {
            lon = normalize_longitude(flip_longitude_direction(lon), LongitudeDomain::ZeroTo360);
        }
        lon = normalize_longitude(lon, self.domain);

        let lat = match self.latitude {
            LatitudeType::Planetocentric => lat_deg,
            LatitudeType::Planetographic => planetocentric_to_planetographic(lat_deg, radii),
        };

        match self.precision {
            Some(places) => (truncate_decimals(lon, places), truncate_decimals(lat, places)),
            None => (lon, lat),
        }
    }

    pub fn from_display(&self, lon_deg: f64, lat_deg: f64, radii: BodyRadii) -> (f64, f64) {
        let mut lon = normalize_longitude(lon_deg, LongitudeDomain::ZeroTo360);
        if self.direction == LongitudeDirection::PositiveWest {
            lon = normalize_longitude(flip_longitude_direction(lon), LongitudeDomain::ZeroTo360);
        }
        let lat = match self.latitude {
            LatitudeType::Planetocentric => lat_deg,
            LatitudeType::Planetographic => planetographic_to_planetocentric(lat_deg, radii),
        };
        (lon, lat)
    }
}
