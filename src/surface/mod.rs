mod depth;
mod surface;

pub use depth::ColourDepth;
pub use surface::{Origin, Surface, SurfaceHeader};
