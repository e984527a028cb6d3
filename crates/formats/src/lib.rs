pub mod bodies;
pub mod config;
pub mod geometry;
pub mod wkt;

pub use bodies::*;
pub use config::*;
pub use geometry::*;
pub use wkt::WktError;
