mod preload;

pub use preload::{
    FILE_FORMAT_JPEG, FILE_FORMAT_TGA, FrameRecord, PRELOAD_SUFFIX, Preload, preload_path,
};
