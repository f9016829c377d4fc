mod builder;
mod compositor;
mod timeline;
mod types;

pub use builder::AtlasBuilder;
pub use compositor::{CompositeReport, HALO_ALPHA, canvas_depth, composite};
pub use timeline::{TimelineOptions, extend_timeline, source_indices};
pub use types::{AtlasEntry, AtlasSettings, CompositedAtlas, PackedAtlas};
