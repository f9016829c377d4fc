use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::warn;

use crate::cli::PreloadVersion;
use crate::error::PackError;

/// `file_format` value for TGA atlases
pub const FILE_FORMAT_TGA: u32 = 0xCCCC_CC01;
/// `file_format` value for JPEG atlases; recognised when reading only
pub const FILE_FORMAT_JPEG: u32 = 0xCCCC_CC00;

/// Appended to the atlas path to name its metadata file
pub const PRELOAD_SUFFIX: &str = ".ini.preload";

const HEADER_LEN: usize = 20;

/// One frame of the animation: its rectangle in the atlas and the offset of
/// its centre from the centre of the untrimmed source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameRecord {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub x_offset: f32,
    pub y_offset: f32,
}

/// Contents of an `.ini.preload` file.
///
/// Layout, all little-endian: `version: i32`, `width: i32`, `height: i32`,
/// `file_format: u32`, `frame_count: i32`, then per frame `x, y, w, h` as
/// `i32` followed by the two offsets, `f32` for the float version and `i32`
/// (truncated toward zero) for the int version.
#[derive(Debug, Clone, PartialEq)]
pub struct Preload {
    pub version: PreloadVersion,
    pub width: i32,
    pub height: i32,
    pub file_format: u32,
    frames: Vec<FrameRecord>,
}

impl Preload {
    pub fn new(version: PreloadVersion, width: i32, height: i32) -> Self {
        Self {
            version,
            width,
            height,
            file_format: FILE_FORMAT_TGA,
            frames: Vec::new(),
        }
    }

    pub fn append_frame(&mut self, frame: FrameRecord) {
        self.frames.push(frame);
    }

    pub fn frame(&self, index: usize) -> Option<&FrameRecord> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether frame rows count from the bottom of the atlas
    pub fn is_flipped(&self) -> bool {
        self.version.is_flipped()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.frames.len() * 24);
        let frame_count = i32::try_from(self.frames.len()).unwrap_or(i32::MAX);

        bytes.extend_from_slice(&self.version.code().to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.file_format.to_le_bytes());
        bytes.extend_from_slice(&frame_count.to_le_bytes());

        for frame in &self.frames {
            for value in [frame.x, frame.y, frame.width, frame.height] {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            match self.version {
                PreloadVersion::Float => {
                    bytes.extend_from_slice(&frame.x_offset.to_le_bytes());
                    bytes.extend_from_slice(&frame.y_offset.to_le_bytes());
                }
                PreloadVersion::Int => {
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "int preloads store offsets truncated toward zero"
                    )]
                    let offsets = [frame.x_offset as i32, frame.y_offset as i32];
                    for value in offsets {
                        bytes.extend_from_slice(&value.to_le_bytes());
                    }
                }
            }
        }

        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        let mut reader = bytes;

        let code = read_i32(&mut reader, "version")?;
        let version = PreloadVersion::from_code(code)
            .ok_or_else(|| PackError::InvalidPreload(format!("unknown version {code}")))?;
        let width = read_i32(&mut reader, "width")?;
        let height = read_i32(&mut reader, "height")?;
        let file_format = u32::from_le_bytes(read_word(&mut reader, "file format")?);
        if file_format != FILE_FORMAT_TGA && file_format != FILE_FORMAT_JPEG {
            warn!("Unrecognised preload file format {file_format:#010X}");
        }
        let declared = read_i32(&mut reader, "frame count")?;
        let frame_count = usize::try_from(declared)
            .ok()
            .ok_or_else(|| PackError::InvalidPreload(format!("negative frame count {declared}")))?;

        let mut preload = Self {
            version,
            width,
            height,
            file_format,
            frames: Vec::with_capacity(frame_count.min(reader.len() / 24)),
        };

        for _ in 0..frame_count {
            let x = read_i32(&mut reader, "frame x")?;
            let y = read_i32(&mut reader, "frame y")?;
            let w = read_i32(&mut reader, "frame width")?;
            let h = read_i32(&mut reader, "frame height")?;
            let (x_offset, y_offset) = match version {
                PreloadVersion::Float => (
                    f32::from_le_bytes(read_word(&mut reader, "x offset")?),
                    f32::from_le_bytes(read_word(&mut reader, "y offset")?),
                ),
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "offsets are bounded by the atlas dimensions"
                )]
                PreloadVersion::Int => (
                    read_i32(&mut reader, "x offset")? as f32,
                    read_i32(&mut reader, "y offset")? as f32,
                ),
            };

            preload.append_frame(FrameRecord {
                x,
                y,
                width: w,
                height: h,
                x_offset,
                y_offset,
            });
        }

        Ok(preload)
    }

    pub fn save(&self, path: &Path) -> Result<(), PackError> {
        fs::write(path, self.to_bytes()).map_err(|e| PackError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn open(path: &Path) -> Result<Self, PackError> {
        let bytes = fs::read(path).map_err(|e| PackError::PreloadRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(&bytes)
    }
}

/// Metadata path for an atlas image: the image path with `.ini.preload`
/// appended.
pub fn preload_path(image_path: &Path) -> PathBuf {
    let mut path = image_path.as_os_str().to_owned();
    path.push(PRELOAD_SUFFIX);
    PathBuf::from(path)
}

fn read_word(reader: &mut &[u8], field: &str) -> Result<[u8; 4], PackError> {
    let mut word = [0u8; 4];
    reader
        .read_exact(&mut word)
        .map_err(|e| PackError::InvalidPreload(format!("truncated before {field}: {e}")))?;
    Ok(word)
}

fn read_i32(reader: &mut &[u8], field: &str) -> Result<i32, PackError> {
    read_word(reader, field).map(i32::from_le_bytes)
}
