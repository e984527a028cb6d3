use crate::math::Vec2;

/// Axis-aligned 2D extent.
///
/// Used both for longitude/latitude extents (degrees) and for projected
/// extents (meters); the caller knows which space it is in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Degenerate extent covering a single point.
    pub fn from_point(x: f64, y: f64) -> Self {
        Aabb2 {
            min: [x, y],
            max: [x, y],
        }
    }

    /// Extent of a point set, `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = Self::from_point(first.x, first.y);
        for p in iter {
            out.extend_point(p.x, p.y);
        }
        Some(out)
    }

    pub fn extend_point(&mut self, x: f64, y: f64) {
        self.min[0] = self.min[0].min(x);
        self.min[1] = self.min[1].min(y);
        self.max[0] = self.max[0].max(x);
        self.max[1] = self.max[1].max(y);
    }

    pub fn union(&self, other: &Self) -> Self {
        Aabb2 {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }

    /// True when `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        other.min[0] >= self.min[0]
            && other.max[0] <= self.max[0]
            && other.min[1] >= self.min[1]
            && other.max[1] <= self.max[1]
    }

    pub fn intersects(&self, other: &Self) -> bool {
        !(other.max[0] < self.min[0]
            || other.min[0] > self.max[0]
            || other.max[1] < self.min[1]
            || other.min[1] > self.max[1])
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn from_points_covers_all_points() {
        let ext = Aabb2::from_points([
            Vec2::new(10.0, 40.0),
            Vec2::new(50.0, -10.0),
            Vec2::new(30.0, 0.0),
        ])
        .unwrap();
        assert_eq!(ext, Aabb2::new([10.0, -10.0], [50.0, 40.0]));
        assert_eq!(ext.center(), Vec2::new(30.0, 15.0));
    }

    #[test]
    fn empty_point_set_has_no_extent() {
        assert!(Aabb2::from_points(Vec::<Vec2>::new()).is_none());
    }

    #[test]
    fn containment_and_intersection() {
        let outer = Aabb2::new([0.0, 0.0], [10.0, 10.0]);
        let inner = Aabb2::new([2.0, 2.0], [4.0, 4.0]);
        let straddling = Aabb2::new([8.0, 8.0], [12.0, 12.0]);
        assert!(outer.contains(&inner));
        assert!(!outer.contains(&straddling));
        assert!(outer.intersects(&straddling));
        assert!(!inner.intersects(&straddling));
    }
}
