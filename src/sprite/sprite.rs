use std::path::PathBuf;

use crate::packing::Rect;
use crate::surface::Surface;

/// Where the visible part of a frame sits inside its source image
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrimInfo {
    /// Pixels trimmed from left edge
    pub offset_x: u32,
    /// Pixels trimmed from top edge
    pub offset_y: u32,
    /// Original width before trimming
    pub source_width: u32,
    /// Original height before trimming
    pub source_height: u32,
    /// Trimmed width
    pub trimmed_width: u32,
    /// Trimmed height
    pub trimmed_height: u32,
    /// Horizontal distance from the source centre to the trimmed centre
    pub pivot_x: f32,
    /// Vertical distance from the source centre to the trimmed centre
    pub pivot_y: f32,
}

impl TrimInfo {
    /// Create TrimInfo for an untrimmed sprite
    pub fn untrimmed(width: u32, height: u32) -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            source_width: width,
            source_height: height,
            trimmed_width: width,
            trimmed_height: height,
            pivot_x: 0.0,
            pivot_y: 0.0,
        }
    }

    /// Returns true if the sprite was actually trimmed
    pub fn was_trimmed(&self) -> bool {
        self.trimmed_width != self.source_width || self.trimmed_height != self.source_height
    }

    /// Unplaced rectangle with the trimmed dimensions
    pub fn trimmed_rect(&self) -> Rect {
        Rect::new(
            0,
            0,
            i32::try_from(self.trimmed_width).unwrap_or(i32::MAX),
            i32::try_from(self.trimmed_height).unwrap_or(i32::MAX),
        )
    }
}

/// A decoded animation frame and its trim metadata
#[derive(Debug, Clone)]
pub struct SourceSprite {
    /// Original file path
    pub path: PathBuf,
    /// File name, used in log output
    pub name: String,
    /// Untrimmed pixels
    pub surface: Surface,
    pub trim_info: TrimInfo,
}

impl SourceSprite {
    /// Width of the sprite (after trimming)
    pub fn width(&self) -> u32 {
        self.trim_info.trimmed_width
    }

    /// Height of the sprite (after trimming)
    pub fn height(&self) -> u32 {
        self.trim_info.trimmed_height
    }
}
