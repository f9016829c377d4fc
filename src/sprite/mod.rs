mod loader;
mod sprite;
mod trimmer;

pub use loader::{collect_image_paths, load_sprites};
pub use sprite::{SourceSprite, TrimInfo};
pub use trimmer::trim_sprite;
