/// Longitude domain a value is expressed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum LongitudeDomain {
    /// `[0, 360)`, the canonical working domain.
    #[default]
    ZeroTo360,
    /// `[-180, 180)`.
    Neg180To180,
}

/// Wraps `lon_deg` into `domain` with a single modulo operation.
///
/// Non-finite input yields NaN.
pub fn normalize_longitude(lon_deg: f64, domain: LongitudeDomain) -> f64 {
    match domain {
        LongitudeDomain::ZeroTo360 => {
            let v = lon_deg.rem_euclid(360.0);
            // rem_euclid can round up to the modulus for tiny negative inputs.
            if v >= 360.0 { 0.0 } else { v }
        }
        LongitudeDomain::Neg180To180 => {
            let v = (lon_deg + 180.0).rem_euclid(360.0);
            if v >= 360.0 { -180.0 } else { v - 180.0 }
        }
    }
}

/// Canonical undangle of a single longitude.
///
/// Everything lands in `[0, 360)` except an exact `360`, which is a seam
/// vertex emitted by the dateline splitter and is kept on its side of the seam.
pub fn undangle_longitude(lon_deg: f64) -> f64 {
    if lon_deg == 360.0 {
        lon_deg
    } else {
        normalize_longitude(lon_deg, LongitudeDomain::ZeroTo360)
    }
}

/// Positive-east <-> positive-west. Self-inverse.
pub fn flip_longitude_direction(lon_deg: f64) -> f64 {
    360.0 - lon_deg
}

/// Drops (does not round) digits beyond `places` decimals.
pub fn truncate_decimals(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).trunc() / scale
}
