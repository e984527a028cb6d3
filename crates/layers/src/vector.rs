//! Drawn vector features and their derived geometry.
//!
//! Every stored feature keeps its canonical lat/lon form (`search_geometry`).
//! What is on the map (`draw_geometry`) is rebuilt from it whenever the
//! projection changes, so repeated switches never accumulate error.

use std::collections::BTreeMap;

use compute::{
    SpatialAnalysis, crosses_antimeridian, dateline_shift, densify, join_across_seam,
    project_geometry, split_on_dateline, strip_dateline_shift, undangle, unproject_geometry,
};
use foundation::bounds::Aabb2;
use foundation::math::{BodyRadii, Projection, Vec2};
use formats::geometry::Geometry;
use formats::wkt::to_wkt;
use formats::{BodyTable, ConfigError, MapConfig};
use tracing::{debug, warn};

use crate::layer::{Layer, LayerId};
use crate::render::{RenderId, RenderLayer};
use crate::symbology::{DEFAULT_FEATURE_COLOR, FeatureStyle};

/// A geometry this much smaller than the viewport (along its tighter axis)
/// is zoomed to instead of just panned to.
pub const MAX_CENTER_ZOOM_RATIO: f64 = 25.0;
/// Padding, in pixels, asked for around a fitted extent.
pub const FIT_PADDING_PX: f64 = 10.0;

pub type Attributes = BTreeMap<String, String>;

/// Insertion-order position of a feature. Stays valid until the store is
/// cleared; removing other features never moves it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureIndex(pub usize);

impl std::fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A draw request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeature {
    /// Lon/lat degrees, any longitude domain.
    pub geometry: Geometry,
    pub attributes: Attributes,
    pub color: [f32; 4],
    pub id: Option<String>,
    pub center_on_draw: bool,
    pub dateline_shift: bool,
}

impl NewFeature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attributes: Attributes::new(),
            color: DEFAULT_FEATURE_COLOR,
            id: None,
            center_on_draw: false,
            dateline_shift: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureState {
    pub index: FeatureIndex,
    /// Native-unit form handed to the render layer; `None` while the feature
    /// is not drawable under the current projection.
    pub draw_geometry: Option<Geometry>,
    /// Canonical lon/lat, always undangled.
    pub search_geometry: Geometry,
    /// MULTI* form when the feature crosses the dateline.
    pub split_geometry: Option<Geometry>,
    pub color: [f32; 4],
    pub id: Option<String>,
    pub attributes: Attributes,
    pub should_center_on_draw: bool,
    pub should_dateline_shift: bool,
    render_id: Option<RenderId>,
}

impl FeatureState {
    pub fn render_id(&self) -> Option<RenderId> {
        self.render_id
    }

    pub fn style(&self) -> FeatureStyle {
        FeatureStyle::from_color(self.color)
    }

    pub fn crosses_dateline(&self) -> bool {
        self.split_geometry.is_some()
    }
}

/// What [`VectorStore::center_on_geometry`] asked of the render layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportChange {
    /// Nothing to center on.
    Unchanged,
    /// Panned to the center, zoom kept.
    Centered(Vec2),
    Fitted(Aabb2),
}

/// The projection-dependent forms of one feature.
#[derive(Debug, Clone, PartialEq)]
struct DerivedGeometry {
    search: Geometry,
    split: Option<Geometry>,
    draw: Option<Geometry>,
}

fn derive_geometry(
    raw: &Geometry,
    projection: Projection,
    radii: BodyRadii,
    shift: bool,
) -> DerivedGeometry {
    let split = crosses_antimeridian(raw, projection).then(|| split_on_dateline(raw, projection));
    let search = undangle(raw);

    let draw = SpatialAnalysis::is_drawable(&search, projection).then(|| {
        let base = split.as_ref().unwrap_or(&search);
        if projection.is_polar() {
            project_geometry(&densify(base), projection, radii)
        } else if shift {
            dateline_shift(base)
        } else {
            base.clone()
        }
    });

    DerivedGeometry {
        search,
        split,
        draw,
    }
}

/// Ordered store of drawn features.
///
/// Removed features leave a tombstone so every other [`FeatureIndex`] keeps
/// resolving to the same feature.
pub struct VectorStore<L> {
    id: LayerId,
    projection: Projection,
    radii: BodyRadii,
    layer: L,
    features: Vec<Option<FeatureState>>,
}

impl<L: RenderLayer> VectorStore<L> {
    pub fn new(id: u64, layer: L, projection: Projection, radii: BodyRadii) -> Self {
        Self {
            id: LayerId(id),
            projection,
            radii,
            layer,
            features: Vec::new(),
        }
    }

    pub fn from_config(
        id: u64,
        layer: L,
        config: &MapConfig,
        bodies: &BodyTable,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(id, layer, config.projection()?, config.radii(bodies)?))
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn radii(&self) -> BodyRadii {
        self.radii
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    /// Runs the draw pipeline, hands the result to the render layer and
    /// appends the feature. A feature outside the current polar cap is stored
    /// but not drawn.
    pub fn draw_and_store(&mut self, feature: NewFeature) -> FeatureIndex {
        let index = FeatureIndex(self.features.len());
        let derived = derive_geometry(
            &feature.geometry,
            self.projection,
            self.radii,
            feature.dateline_shift,
        );

        let style = FeatureStyle::from_color(feature.color);
        let render_id = self.render(index, derived.draw.as_ref(), &style);
        debug!(
            index = index.0,
            projection = %self.projection,
            crosses = derived.split.is_some(),
            drawn = render_id.is_some(),
            "stored feature"
        );

        let state = FeatureState {
            index,
            draw_geometry: derived.draw,
            search_geometry: derived.search,
            split_geometry: derived.split,
            color: feature.color,
            id: feature.id,
            attributes: feature.attributes,
            should_center_on_draw: feature.center_on_draw,
            should_dateline_shift: feature.dateline_shift,
            render_id,
        };
        let center = state
            .should_center_on_draw
            .then(|| Self::centering_target(&state, self.projection));
        self.features.push(Some(state));

        if let Some(target) = center {
            self.center_on_geometry(&target, false);
        }
        index
    }

    fn render(
        &mut self,
        index: FeatureIndex,
        draw: Option<&Geometry>,
        style: &FeatureStyle,
    ) -> Option<RenderId> {
        match draw {
            Some(geometry) => Some(self.layer.add_renderable_feature(geometry, style)),
            None => {
                warn!(
                    index = index.0,
                    projection = %self.projection,
                    "feature outside the visible cap, not drawn"
                );
                None
            }
        }
    }

    /// A split feature is centered on its parts laid side by side across the
    /// seam; polar maps project it anyway, so the split form does.
    fn centering_target(state: &FeatureState, projection: Projection) -> Geometry {
        match &state.split_geometry {
            Some(split) if !projection.is_polar() => join_across_seam(split),
            Some(split) => split.clone(),
            None => state.search_geometry.clone(),
        }
    }

    /// Slot count, tombstones included.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.features.iter().flatten().count()
    }

    /// `None` for tombstones and out-of-range indices.
    pub fn get(&self, index: FeatureIndex) -> Option<&FeatureState> {
        self.features.get(index.0)?.as_ref()
    }

    pub fn is_tombstoned(&self, index: FeatureIndex) -> bool {
        matches!(self.features.get(index.0), Some(None))
    }

    pub fn iter_live(&self) -> impl Iterator<Item = &FeatureState> + '_ {
        self.features.iter().flatten()
    }

    pub fn find_by_attribute(&self, key: &str, value: &str) -> Vec<FeatureIndex> {
        self.iter_live()
            .filter(|f| f.attributes.get(key).is_some_and(|v| v == value))
            .map(|f| f.index)
            .collect()
    }

    pub fn first_by_attribute(&self, key: &str, value: &str) -> Option<&FeatureState> {
        self.iter_live()
            .find(|f| f.attributes.get(key).is_some_and(|v| v == value))
    }

    /// Canonical WKT of a live feature.
    pub fn searchable_wkt(&self, index: FeatureIndex) -> Option<String> {
        self.get(index).map(|f| to_wkt(&f.search_geometry, None))
    }

    pub fn set_projection(&mut self, projection: Projection) {
        if projection == self.projection {
            return;
        }
        self.projection = projection;
        self.redraw();
    }

    /// Rebuilds every live feature's draw form under the current projection.
    pub fn redraw(&mut self) {
        let projection = self.projection;
        let radii = self.radii;
        for slot in self.features.iter_mut() {
            let Some(state) = slot.as_mut() else {
                continue;
            };
            if let Some(id) = state.render_id.take() {
                self.layer.remove_renderable_feature(id);
            }
            let derived = derive_geometry(
                &state.search_geometry,
                projection,
                radii,
                state.should_dateline_shift,
            );
            state.split_geometry = derived.split;
            state.draw_geometry = derived.draw;
            state.render_id = match &state.draw_geometry {
                Some(geometry) => Some(self.layer.add_renderable_feature(geometry, &state.style())),
                None => {
                    debug!(index = state.index.0, projection = %projection, "skipped on redraw");
                    None
                }
            };
        }
        debug!(projection = %projection, live = self.live_count(), "redrew features");
    }

    /// Re-derives a feature from the geometry the render layer reports after
    /// an interactive edit. `rendered` is in native units and, for shifted
    /// features, still carries the shifted copies.
    pub fn on_feature_modified(
        &mut self,
        index: FeatureIndex,
        rendered: &Geometry,
    ) -> Option<&FeatureState> {
        let projection = self.projection;
        let radii = self.radii;
        let Some(state) = self.features.get_mut(index.0).and_then(Option::as_mut) else {
            warn!(index = index.0, "modify event for a removed feature");
            return None;
        };

        let mut edited = unproject_geometry(rendered, projection, radii);
        if state.should_dateline_shift && !projection.is_polar() {
            edited = strip_dateline_shift(&edited);
        }

        if let Some(id) = state.render_id.take() {
            self.layer.remove_renderable_feature(id);
        }
        let derived = derive_geometry(&edited, projection, radii, state.should_dateline_shift);
        state.search_geometry = derived.search;
        state.split_geometry = derived.split;
        state.draw_geometry = derived.draw;
        state.render_id = state
            .draw_geometry
            .as_ref()
            .map(|g| self.layer.add_renderable_feature(g, &state.style()));
        debug!(index = index.0, crosses = state.split_geometry.is_some(), "feature modified");
        Some(state)
    }

    pub fn highlight(&mut self, index: FeatureIndex) -> bool {
        self.restyle(index, |_| FeatureStyle::selected())
    }

    pub fn unhighlight(&mut self, index: FeatureIndex) -> bool {
        self.restyle(index, FeatureState::style)
    }

    fn restyle(&mut self, index: FeatureIndex, style: impl Fn(&FeatureState) -> FeatureStyle) -> bool {
        let Some(state) = self.features.get(index.0).and_then(Option::as_ref) else {
            return false;
        };
        let Some(id) = state.render_id else {
            return false;
        };
        self.layer.set_feature_style(id, &style(state));
        true
    }

    /// `None` when the index does not hold a live feature.
    pub fn center_on_feature(&mut self, index: FeatureIndex, force: bool) -> Option<ViewportChange> {
        let target = Self::centering_target(self.get(index)?, self.projection);
        Some(self.center_on_geometry(&target, force))
    }

    /// Brings a lon/lat geometry into view. If it already fits the viewport
    /// and is not tiny next to it, the map is only panned, unless `force`.
    pub fn center_on_geometry(&mut self, geometry: &Geometry, force: bool) -> ViewportChange {
        let native = if self.projection.is_polar() {
            project_geometry(&densify(geometry), self.projection, self.radii)
        } else {
            geometry.clone()
        };
        let Some(extent) = native.extent() else {
            return ViewportChange::Unchanged;
        };

        let viewport = self.layer.viewport_extent();
        let fits = extent.width() <= viewport.width() && extent.height() <= viewport.height();
        if fits && !force && SpatialAnalysis::zoom_ratio(&viewport, &extent) <= MAX_CENTER_ZOOM_RATIO {
            let center = extent.center();
            self.layer.request_center(center);
            return ViewportChange::Centered(center);
        }
        self.layer.request_fit_to_extent(extent, FIT_PADDING_PX);
        ViewportChange::Fitted(extent)
    }

    /// Tombstones the slot and takes the feature off the map.
    pub fn remove(&mut self, index: FeatureIndex) -> Option<FeatureState> {
        let state = self.features.get_mut(index.0)?.take()?;
        if let Some(id) = state.render_id {
            self.layer.remove_renderable_feature(id);
        }
        debug!(index = index.0, "removed feature");
        Some(state)
    }

    /// Drops every feature; indices start again from zero.
    pub fn remove_and_unstore_all(&mut self) {
        self.layer.clear_layer();
        self.features.clear();
        debug!(layer = %self.id, "cleared store");
    }
}

impl<L> Layer for VectorStore<L> {
    fn id(&self) -> LayerId {
        self.id
    }

    fn projection(&self) -> Projection {
        self.projection
    }
}
