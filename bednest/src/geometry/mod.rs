pub mod convex_hull;
pub mod geo_traits;
pub mod offset;
pub mod primitives;

#[doc(inline)]
pub use geo_traits::{CollidesWith, Shape};
