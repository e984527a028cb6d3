pub mod bounding_box;
pub mod layer;
pub mod render;
pub mod symbology;
pub mod vector;

pub use bounding_box::{BoundingBoxBuilder, BoxCorners};
pub use layer::*;
pub use render::{RecordingLayer, RenderId, RenderLayer};
pub use symbology::FeatureStyle;
pub use vector::{FeatureIndex, FeatureState, NewFeature, VectorStore, ViewportChange};
