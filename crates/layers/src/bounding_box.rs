//! Footprint boxes drawn from two corners.
//!
//! Corners follow the left-most/least convention: a top-left longitude
//! greater than the bottom-right one means the box wraps across the 0/360
//! seam.

use compute::{SpatialAnalysis, split_on_dateline};
use foundation::math::Projection;
use formats::MapConfig;
use formats::geometry::{Coord, Geometry};
use tracing::{debug, warn};

use crate::layer::{Layer, LayerId};
use crate::render::RenderLayer;
use crate::symbology::DEFAULT_FEATURE_COLOR;
use crate::vector::{FeatureIndex, FeatureState, NewFeature, VectorStore};

/// Corner inputs as they arrive from a form; any may be missing.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct BoxCorners {
    pub top_left_lon: Option<f64>,
    pub top_left_lat: Option<f64>,
    pub bottom_right_lon: Option<f64>,
    pub bottom_right_lat: Option<f64>,
}

impl BoxCorners {
    pub fn new(top_left_lon: f64, top_left_lat: f64, bottom_right_lon: f64, bottom_right_lat: f64) -> Self {
        Self {
            top_left_lon: Some(top_left_lon),
            top_left_lat: Some(top_left_lat),
            bottom_right_lon: Some(bottom_right_lon),
            bottom_right_lat: Some(bottom_right_lat),
        }
    }

    /// Blank or non-numeric fields count as missing.
    pub fn from_text(top_left_lon: &str, top_left_lat: &str, bottom_right_lon: &str, bottom_right_lat: &str) -> Self {
        let field = |s: &str| s.trim().parse::<f64>().ok();
        Self {
            top_left_lon: field(top_left_lon),
            top_left_lat: field(top_left_lat),
            bottom_right_lon: field(bottom_right_lon),
            bottom_right_lat: field(bottom_right_lat),
        }
    }

    fn complete(&self) -> Option<[f64; 4]> {
        Some([
            self.top_left_lon?,
            self.top_left_lat?,
            self.bottom_right_lon?,
            self.bottom_right_lat?,
        ])
    }
}

/// Box geometry for the given corners, `None` if any corner is missing.
///
/// - Normal box: six-vertex ring, with midpoints on the top and bottom edges.
/// - Wrapping box with an edge on a pole: five or six vertices in a longitude
///   domain extended past 360, with a seam vertex on each pole edge.
/// - Other wrapping boxes: the plain rectangle, already split on the seam.
pub fn build_from_corners(corners: BoxCorners, projection: Projection) -> Option<Geometry> {
    let [west, top, east, bottom] = corners.complete()?;

    if west > east {
        let on_pole = |lat: f64| lat.abs() == 90.0;
        if on_pole(top) || on_pole(bottom) {
            let east = east + 360.0;
            let mut ring = vec![Coord::new(west, top)];
            if on_pole(top) {
                ring.push(Coord::new(360.0, top));
            }
            ring.push(Coord::new(east, top));
            ring.push(Coord::new(east, bottom));
            if on_pole(bottom) {
                ring.push(Coord::new(360.0, bottom));
            }
            ring.push(Coord::new(west, bottom));
            return Some(Geometry::Polygon(ring));
        }

        let rectangle = Geometry::Polygon(vec![
            Coord::new(west, top),
            Coord::new(east, top),
            Coord::new(east, bottom),
            Coord::new(west, bottom),
        ]);
        return Some(split_on_dateline(&rectangle, projection));
    }

    let mid = (west + east) * 0.5;
    Some(Geometry::Polygon(vec![
        Coord::new(west, top),
        Coord::new(mid, top),
        Coord::new(east, top),
        Coord::new(east, bottom),
        Coord::new(mid, bottom),
        Coord::new(west, bottom),
    ]))
}

/// Keeps a single footprint on its own store: drawing a new box replaces
/// the previous one, or joins it when multi-box mode is on.
pub struct BoundingBoxBuilder<L> {
    store: VectorStore<L>,
    multi_box: bool,
    center_on_draw: bool,
    dateline_shift: bool,
    color: [f32; 4],
    current: Option<FeatureIndex>,
}

impl<L: RenderLayer> BoundingBoxBuilder<L> {
    pub fn new(store: VectorStore<L>) -> Self {
        Self {
            store,
            multi_box: false,
            center_on_draw: false,
            dateline_shift: false,
            color: DEFAULT_FEATURE_COLOR,
            current: None,
        }
    }

    pub fn from_config(store: VectorStore<L>, config: &MapConfig) -> Self {
        Self {
            multi_box: config.multi_box,
            center_on_draw: config.center_on_draw,
            dateline_shift: config.dateline_shift,
            ..Self::new(store)
        }
    }

    pub fn set_multi_box(&mut self, enabled: bool) {
        self.multi_box = enabled;
    }

    pub fn multi_box(&self) -> bool {
        self.multi_box
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    pub fn store(&self) -> &VectorStore<L> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut VectorStore<L> {
        &mut self.store
    }

    /// Builds, validates and stores a box. `None` when a corner is missing or
    /// the box cannot be seen under the current projection.
    pub fn draw_from_corners(&mut self, corners: BoxCorners) -> Option<FeatureIndex> {
        let projection = self.store.projection();
        let Some(geometry) = build_from_corners(corners, projection) else {
            debug!("bounding box corners incomplete");
            return None;
        };
        self.store_footprint(geometry)
    }

    /// Records the center as the footprint.
    // TODO: derive the footprint rectangle from `diameter_km`; only the center
    // point is stored for now.
    pub fn build_from_center_and_diameter(
        &mut self,
        center_lon: Option<f64>,
        center_lat: Option<f64>,
        diameter_km: Option<f64>,
    ) -> Option<FeatureIndex> {
        let center = Coord::new(center_lon?, center_lat?);
        debug!(?diameter_km, "center/diameter footprint stores the center only");
        self.store_footprint(Geometry::Point(center))
    }

    fn store_footprint(&mut self, geometry: Geometry) -> Option<FeatureIndex> {
        let projection = self.store.projection();
        if !SpatialAnalysis::is_drawable(&geometry, projection) {
            warn!(projection = %projection, "footprint outside the visible cap, not drawn");
            return None;
        }

        let previous = self.current.take().and_then(|index| self.store.remove(index));
        let geometry = match previous {
            Some(previous) if self.multi_box => previous
                .search_geometry
                .union(geometry.clone())
                .unwrap_or(geometry),
            _ => geometry,
        };

        let index = self.store.draw_and_store(NewFeature {
            color: self.color,
            center_on_draw: self.center_on_draw,
            dateline_shift: self.dateline_shift,
            ..NewFeature::new(geometry)
        });
        self.current = Some(index);
        Some(index)
    }

    pub fn current(&self) -> Option<&FeatureState> {
        self.store.get(self.current?)
    }

    pub fn footprint_wkt(&self) -> Option<String> {
        self.store.searchable_wkt(self.current?)
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.store.remove_and_unstore_all();
    }
}

impl<L> Layer for BoundingBoxBuilder<L> {
    fn id(&self) -> LayerId {
        self.store.id()
    }

    fn projection(&self) -> Projection {
        Layer::projection(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingBoxBuilder, BoxCorners, build_from_corners};
    use crate::render::RecordingLayer;
    use crate::vector::{FeatureIndex, VectorStore};
    use foundation::bounds::Aabb2;
    use foundation::math::{BodyRadii, Projection};
    use formats::MapConfig;
    use formats::geometry::{Coord, Geometry};
    use formats::wkt::{parse, to_wkt};
    use pretty_assertions::assert_eq;

    const MARS: BodyRadii = BodyRadii::new(3396.19, 3376.2);

    fn builder(projection: Projection) -> BoundingBoxBuilder<RecordingLayer> {
        BoundingBoxBuilder::new(VectorStore::new(2, RecordingLayer::default(), projection, MARS))
    }

    #[test]
    fn normal_box_has_midpoints() {
        let g = build_from_corners(BoxCorners::new(10.0, 40.0, 50.0, -10.0), Projection::Cylindrical)
            .unwrap();
        assert_eq!(g.vertex_count(), 6);
        assert_eq!(g.extent(), Some(Aabb2::new([10.0, -10.0], [50.0, 40.0])));
        assert_eq!(
            to_wkt(&g, None),
            "POLYGON((10 40,30 40,50 40,50 -10,30 -10,10 -10,10 40))"
        );
    }

    #[test]
    fn missing_corner_gives_nothing() {
        let corners = BoxCorners {
            bottom_right_lat: None,
            ..BoxCorners::new(10.0, 40.0, 50.0, -10.0)
        };
        assert_eq!(build_from_corners(corners, Projection::Cylindrical), None);

        let corners = BoxCorners::from_text("10", " 40 ", "", "-10");
        assert_eq!(corners.bottom_right_lon, None);
        assert_eq!(corners.top_left_lat, Some(40.0));
        let mut b = builder(Projection::Cylindrical);
        assert_eq!(b.draw_from_corners(corners), None);
        assert!(b.store().layer().is_empty());
    }

    #[test]
    fn wrapping_box_is_split() {
        let g = build_from_corners(BoxCorners::new(350.0, 40.0, 10.0, -10.0), Projection::Cylindrical)
            .unwrap();
        assert_eq!(
            g,
            parse("MULTIPOLYGON(((350 40,360 40,360 -10,350 -10)),((0 40,10 40,10 -10,0 -10)))")
                .unwrap()
        );
    }

    #[test]
    fn wrapping_box_on_a_pole_gets_a_seam_vertex() {
        let g = build_from_corners(BoxCorners::new(350.0, 90.0, 10.0, 70.0), Projection::Cylindrical)
            .unwrap();
        assert_eq!(
            g,
            Geometry::Polygon(vec![
                Coord::new(350.0, 90.0),
                Coord::new(360.0, 90.0),
                Coord::new(370.0, 90.0),
                Coord::new(370.0, 70.0),
                Coord::new(350.0, 70.0),
            ])
        );

        let mut b = builder(Projection::NorthPolarStereographic);
        b.draw_from_corners(BoxCorners::new(350.0, 90.0, 10.0, 70.0)).unwrap();
        let state = b.current().unwrap();
        assert!(state.crosses_dateline());
        let Some(Geometry::MultiPolygon(rings)) = &state.draw_geometry else {
            panic!("expected a projected multipolygon");
        };
        assert_eq!(rings.len(), 2);
    }

    #[test]
    fn new_box_replaces_the_previous_one() {
        let mut b = builder(Projection::Cylindrical);
        let first = b.draw_from_corners(BoxCorners::new(10.0, 40.0, 50.0, -10.0)).unwrap();
        let second = b.draw_from_corners(BoxCorners::new(20.0, 30.0, 40.0, 0.0)).unwrap();

        assert_eq!((first, second), (FeatureIndex(0), FeatureIndex(1)));
        assert!(b.store().is_tombstoned(first));
        assert_eq!(b.store().live_count(), 1);
        assert_eq!(b.store().layer().len(), 1);
        assert_eq!(
            b.footprint_wkt().as_deref(),
            Some("POLYGON((20 30,30 30,40 30,40 0,30 0,20 0,20 30))")
        );
    }

    #[test]
    fn multi_box_mode_unions_boxes() {
        let mut b = BoundingBoxBuilder::from_config(
            VectorStore::new(2, RecordingLayer::default(), Projection::Cylindrical, MARS),
            &MapConfig {
                multi_box: true,
                ..MapConfig::default()
            },
        );
        assert!(b.multi_box());
        b.draw_from_corners(BoxCorners::new(10.0, 40.0, 50.0, -10.0)).unwrap();
        b.draw_from_corners(BoxCorners::new(100.0, 40.0, 120.0, 20.0)).unwrap();

        let Geometry::MultiPolygon(rings) = &b.current().unwrap().search_geometry else {
            panic!("expected multipolygon");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(b.store().layer().len(), 1);

        b.set_multi_box(false);
        b.draw_from_corners(BoxCorners::new(0.0, 10.0, 5.0, 5.0)).unwrap();
        assert_eq!(b.current().unwrap().search_geometry.vertex_count(), 6);
    }

    #[test]
    fn box_outside_the_polar_cap_is_rejected() {
        let mut b = builder(Projection::NorthPolarStereographic);
        assert_eq!(b.draw_from_corners(BoxCorners::new(10.0, 40.0, 50.0, -10.0)), None);
        assert!(b.current().is_none());
        assert!(b.store().is_empty());
    }

    #[test]
    fn center_and_diameter_records_the_center() {
        let mut b = builder(Projection::Cylindrical);
        b.build_from_center_and_diameter(Some(137.4), Some(-4.6), Some(150.0))
            .unwrap();
        assert_eq!(b.footprint_wkt().as_deref(), Some("POINT(137.4 -4.6)"));
        assert_eq!(b.build_from_center_and_diameter(None, Some(1.0), Some(1.0)), None);

        b.clear();
        assert!(b.current().is_none());
        assert!(b.store().layer().is_empty());
    }
}
