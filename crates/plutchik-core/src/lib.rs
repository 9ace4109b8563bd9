pub mod classify;
pub mod error;
pub mod geometry;
pub mod registry;
pub mod score;

pub use classify::*;
pub use error::*;
pub use geometry::*;
pub use registry::*;
pub use score::*;
