pub mod analysis;
pub mod dateline;
pub mod reproject;
pub mod warp;

pub use analysis::SpatialAnalysis;
pub use dateline::{
    crosses_antimeridian, dateline_shift, join_across_seam, split_on_dateline,
    strip_dateline_shift, undangle,
};
pub use reproject::{project_geometry, unproject_geometry};
pub use warp::densify;
