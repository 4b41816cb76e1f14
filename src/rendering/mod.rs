// src/rendering/mod.rs
pub mod atoms;
pub mod bonds;
pub mod images;
pub mod legend;
pub mod polyhedra;
pub mod primitives;
pub mod radius;
pub mod scene;
pub mod scene_cache;
pub mod unit_cell;

// Re-export the types most callers need
pub use images::DisplayWindow;
pub use legend::{ColorScheme, Legend};
pub use polyhedra::PolyhedraSummary;
pub use primitives::Primitive;
pub use radius::RadiusStrategy;
pub use scene::{Scene, SceneNode};
pub use scene_cache::{CacheStats, SceneCache};
