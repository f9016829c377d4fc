pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod sprite;
pub mod surface;

pub use atlas::{AtlasBuilder, AtlasEntry, AtlasSettings, TimelineOptions};
pub use cli::{CliArgs, Command, LoopMode, PackArgs, PreloadVersion};
pub use error::PackError;
pub use output::{FrameRecord, Preload};
pub use sprite::{SourceSprite, TrimInfo};
pub use surface::{ColourDepth, Surface};
