//! The contract with the map widget that actually draws features.
//!
//! Geometries handed to a [`RenderLayer`] are always in the projection's
//! native units: degrees for cylindrical maps, stereographic meters for the
//! polar ones. The layer gets copies; nothing it does reaches stored state
//! except through [`crate::vector::VectorStore::on_feature_modified`].

use std::collections::BTreeMap;

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use formats::geometry::Geometry;

use crate::symbology::FeatureStyle;

/// Handle for one feature on a render layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderId(pub u64);

pub trait RenderLayer {
    fn add_renderable_feature(&mut self, geometry: &Geometry, style: &FeatureStyle) -> RenderId;

    /// Unknown ids are ignored.
    fn remove_renderable_feature(&mut self, id: RenderId);

    fn clear_layer(&mut self);

    fn set_feature_style(&mut self, id: RenderId, style: &FeatureStyle);

    /// Visible area in native units.
    fn viewport_extent(&self) -> Aabb2;

    /// Pan without changing zoom.
    fn request_center(&mut self, center: Vec2);

    /// Pan and zoom so `extent` fills the view, keeping `padding` pixels free.
    fn request_fit_to_extent(&mut self, extent: Aabb2, padding: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub geometry: Geometry,
    pub style: FeatureStyle,
}

/// Viewport request seen by a [`RecordingLayer`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportRequest {
    Center(Vec2),
    Fit { extent: Aabb2, padding: f64 },
}

/// Headless [`RenderLayer`] that keeps whatever it is asked to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingLayer {
    next_id: u64,
    features: BTreeMap<RenderId, RenderedFeature>,
    viewport: Aabb2,
    requests: Vec<ViewportRequest>,
}

impl RecordingLayer {
    pub fn new(viewport: Aabb2) -> Self {
        Self {
            next_id: 1,
            features: BTreeMap::new(),
            viewport,
            requests: Vec::new(),
        }
    }

    pub fn feature(&self, id: RenderId) -> Option<&RenderedFeature> {
        self.features.get(&id)
    }

    pub fn features(&self) -> impl Iterator<Item = (RenderId, &RenderedFeature)> + '_ {
        self.features.iter().map(|(id, f)| (*id, f))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn set_viewport(&mut self, viewport: Aabb2) {
        self.viewport = viewport;
    }

    pub fn viewport_requests(&self) -> &[ViewportRequest] {
        &self.requests
    }
}

impl Default for RecordingLayer {
    /// Whole-planet cylindrical view.
    fn default() -> Self {
        Self::new(Aabb2::new([0.0, -90.0], [360.0, 90.0]))
    }
}

impl RenderLayer for RecordingLayer {
    fn add_renderable_feature(&mut self, geometry: &Geometry, style: &FeatureStyle) -> RenderId {
        let id = RenderId(self.next_id);
        self.next_id += 1;
        self.features.insert(
            id,
            RenderedFeature {
                geometry: geometry.clone(),
                style: *style,
            },
        );
        id
    }

    fn remove_renderable_feature(&mut self, id: RenderId) {
        self.features.remove(&id);
    }

    fn clear_layer(&mut self) {
        self.features.clear();
    }

    fn set_feature_style(&mut self, id: RenderId, style: &FeatureStyle) {
        if let Some(feature) = self.features.get_mut(&id) {
            feature.style = *style;
        }
    }

    fn viewport_extent(&self) -> Aabb2 {
        self.viewport
    }

    fn request_center(&mut self, center: Vec2) {
        self.requests.push(ViewportRequest::Center(center));
    }

    fn request_fit_to_extent(&mut self, extent: Aabb2, padding: f64) {
        self.requests.push(ViewportRequest::Fit { extent, padding });
    }
}
