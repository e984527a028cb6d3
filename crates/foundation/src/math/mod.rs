pub mod convention;
pub mod geodesy;
pub mod longitude;
pub mod precision;
pub mod projection;
pub mod vec;

pub use convention::*;
pub use geodesy::*;
pub use longitude::*;
pub use precision::*;
pub use projection::*;
pub use vec::*;
