use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No sprites were submitted for packing")]
    EmptyInput,

    #[error(
        "No feasible atlas size for {entries} sprite(s) within {max_dimension}x{max_dimension}"
    )]
    SizeSearchExhausted { entries: usize, max_dimension: u32 },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read preload file '{path}': {source}")]
    PreloadRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed preload data: {0}")]
    InvalidPreload(String),

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
