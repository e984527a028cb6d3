/// Iteration budget for the Vincenty inverse solution.
pub const VINCENTY_MAX_ITERATIONS: usize = 100;
/// Convergence threshold on lambda (radians).
pub const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Radii of a planetary body (kilometers).
///
/// The body is modelled as an oblate spheroid: `equatorial_km` is the
/// semi-major axis `a`, `polar_km` the semi-minor axis `c`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BodyRadii {
    pub equatorial_km: f64,
    pub polar_km: f64,
}

impl BodyRadii {
    pub const fn new(equatorial_km: f64, polar_km: f64) -> Self {
        Self {
            equatorial_km,
            polar_km,
        }
    }

    pub const fn sphere(radius_km: f64) -> Self {
        Self::new(radius_km, radius_km)
    }

    /// Flattening `f = (a - c) / a`; zero for a sphere.
    pub fn flattening(&self) -> f64 {
        (self.equatorial_km - self.polar_km) / self.equatorial_km
    }
}

/// The Vincenty iteration ran out of budget (typically near-antipodal points).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NonConvergence {
    pub iterations: usize,
}

impl std::fmt::Display for NonConvergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "vincenty inverse formula did not converge after {} iterations",
            self.iterations
        )
    }
}

impl std::error::Error for NonConvergence {}

/// Converts a planetocentric latitude to planetographic (degrees).
pub fn planetocentric_to_planetographic(lat_deg: f64, radii: BodyRadii) -> f64 {
    let ratio = radii.equatorial_km / radii.polar_km;
    convert_latitude(lat_deg, ratio * ratio)
}

/// Converts a planetographic latitude to planetocentric (degrees).
pub fn planetographic_to_planetocentric(lat_deg: f64, radii: BodyRadii) -> f64 {
    let ratio = radii.polar_km / radii.equatorial_km;
    convert_latitude(lat_deg, ratio * ratio)
}

fn convert_latitude(lat_deg: f64, factor: f64) -> f64 {
    if lat_deg.abs() >= 90.0 {
        return lat_deg;
    }
    (lat_deg.to_radians().tan() * factor).atan().to_degrees()
}

/// Geodesic distance (km) between two points on the body, Vincenty inverse.
///
/// Returns `f64::NAN` when the iteration does not converge; use
/// [`vincenty_inverse`] for a typed error instead.
pub fn great_circle_distance_km(
    lat1_deg: f64,
    lon1_deg: f64,
    lat2_deg: f64,
    lon2_deg: f64,
    radii: BodyRadii,
) -> f64 {
    vincenty_inverse(lat1_deg, lon1_deg, lat2_deg, lon2_deg, radii).unwrap_or(f64::NAN)
}

pub fn vincenty_inverse(
    lat1_deg: f64,
    lon1_deg: f64,
    lat2_deg: f64,
    lon2_deg: f64,
    radii: BodyRadii,
) -> Result<f64, NonConvergence> {
    vincenty_inverse_with_budget(
        lat1_deg,
        lon1_deg,
        lat2_deg,
        lon2_deg,
        radii,
        VINCENTY_MAX_ITERATIONS,
    )
}

fn vincenty_inverse_with_budget(
    lat1_deg: f64,
    lon1_deg: f64,
    lat2_deg: f64,
    lon2_deg: f64,
    radii: BodyRadii,
    max_iterations: usize,
) -> Result<f64, NonConvergence> {
    let a = radii.equatorial_km;
    let b = radii.polar_km;
    let f = radii.flattening();

    let l = (lon2_deg - lon1_deg).to_radians();
    let u1 = ((1.0 - f) * lat1_deg.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * lat2_deg.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;

    let mut sin_sigma = 0.0;
    let mut cos_sigma = 1.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 1.0;
    let mut cos_2sigma_m = 0.0;

    for _ in 0..max_iterations {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let t1 = cos_u2 * sin_lambda;
        let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (t1 * t1 + t2 * t2).sqrt();
        if sin_sigma == 0.0 {
            // Coincident points.
            return Ok(0.0);
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial line: cos_sq_alpha == 0.
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(NonConvergence {
            iterations: max_iterations,
        });
    }

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    Ok(b * big_a * (sigma - delta_sigma))
}

#[cfg(test)]
mod tests {
    use super::{
        BodyRadii, great_circle_distance_km, planetocentric_to_planetographic,
        planetographic_to_planetocentric, vincenty_inverse_with_budget,
    };

    const MARS: BodyRadii = BodyRadii::new(3396.2, 3376.2);

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn one_degree_along_mars_equator() {
        let d = great_circle_distance_km(0.0, 0.0, 0.0, 1.0, MARS);
        assert_close(d, 59.27, 0.1);
    }

    #[test]
    fn sphere_distance_matches_arc_length() {
        let moon = BodyRadii::sphere(1737.4);
        let d = great_circle_distance_km(0.0, 0.0, 90.0, 0.0, moon);
        assert_close(d, 1737.4 * std::f64::consts::FRAC_PI_2, 1e-6);
    }

    #[test]
    fn coincident_points_are_zero_apart() {
        assert_eq!(great_circle_distance_km(12.0, 34.0, 12.0, 34.0, MARS), 0.0);
    }

    #[test]
    fn meridian_degree_is_shorter_than_equatorial_degree() {
        let meridian = great_circle_distance_km(0.0, 0.0, 1.0, 0.0, MARS);
        let equator = great_circle_distance_km(0.0, 0.0, 0.0, 1.0, MARS);
        assert!(meridian < equator);
    }

    #[test]
    fn exhausted_budget_reports_non_convergence() {
        let err = vincenty_inverse_with_budget(10.0, 0.0, 20.0, 30.0, MARS, 1).unwrap_err();
        assert_eq!(err.iterations, 1);
    }

    #[test]
    fn planetographic_round_trip() {
        for lat in [-89.0, -45.0, 0.0, 12.5, 60.0, 89.9] {
            let g = planetocentric_to_planetographic(lat, MARS);
            let c = planetographic_to_planetocentric(g, MARS);
            assert_close(c, lat, 1e-9);
        }
    }

    #[test]
    fn planetographic_is_poleward_on_oblate_body() {
        let g = planetocentric_to_planetographic(45.0, MARS);
        assert!(g > 45.0);
        assert_eq!(planetocentric_to_planetographic(90.0, MARS), 90.0);
        assert_eq!(planetocentric_to_planetographic(0.0, MARS), 0.0);
    }
}
