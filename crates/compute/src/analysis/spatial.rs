use foundation::bounds::Aabb2;
use foundation::math::{POLAR_CAP_LATITUDE, Pole, Projection};
use formats::geometry::Geometry;

pub struct SpatialAnalysis;

impl SpatialAnalysis {
    /// (min, max) latitude over every vertex.
    pub fn latitude_range(geometry: &Geometry) -> Option<(f64, f64)> {
        let extent = geometry.extent()?;
        Some((extent.min[1], extent.max[1]))
    }

    /// A polar map only shows its cap: the geometry must reach past 60
    /// degrees towards that pole. Everything is drawable on cylindrical.
    pub fn is_drawable(geometry: &Geometry, projection: Projection) -> bool {
        let Some(pole) = projection.pole() else {
            return true;
        };
        let Some((min_lat, max_lat)) = Self::latitude_range(geometry) else {
            return false;
        };
        match pole {
            Pole::North => max_lat > POLAR_CAP_LATITUDE,
            Pole::South => min_lat < -POLAR_CAP_LATITUDE,
        }
    }

    /// How many times `extent` fits across the viewport along its tighter
    /// axis. Infinite for a degenerate extent.
    pub fn zoom_ratio(viewport: &Aabb2, extent: &Aabb2) -> f64 {
        let wx = if extent.width() > 0.0 {
            viewport.width() / extent.width()
        } else {
            f64::INFINITY
        };
        let wy = if extent.height() > 0.0 {
            viewport.height() / extent.height()
        } else {
            f64::INFINITY
        };
        wx.min(wy)
    }
}
