use crate::cli::PreloadVersion;
use crate::output::FrameRecord;
use crate::packing::{Rect, Size};
use crate::sprite::SourceSprite;
use crate::surface::{ColourDepth, Surface};

use super::CompositeReport;

/// Spacing and sizing rules shared by every packing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasSettings {
    /// Fully transparent gap between frames
    pub pixel_padding: u32,
    /// Width of the semi-transparent halo drawn around 32-bit frames
    pub colour_padding: u32,
    /// Restrict canvas dimensions to powers of two, then steps of 508
    pub power_of_two: bool,
    /// Write an 8-bit canvas from each pixel's red channel
    pub greyscale: bool,
}

impl Default for AtlasSettings {
    fn default() -> Self {
        Self {
            pixel_padding: 0,
            colour_padding: 2,
            power_of_two: true,
            greyscale: false,
        }
    }
}

impl AtlasSettings {
    /// Space reserved on each side of a frame. Halos double the colour
    /// padding. Saturates at `u32::MAX`.
    pub fn total_padding(&self, needs_halo: bool) -> u32 {
        let halo = if needs_halo { 2 } else { 1 };
        self.pixel_padding
            .saturating_add(self.colour_padding.saturating_mul(halo))
    }
}

/// A frame waiting to be packed: its source pixels, where the visible part
/// starts, and the rectangle the allocator fills in.
#[derive(Debug, Clone)]
pub struct AtlasEntry<'a> {
    pub source: &'a Surface,
    /// Placement in the atlas; only the size is meaningful before packing
    pub rect: Rect,
    /// Top-left corner of the visible region inside `source`
    pub data_start: (u32, u32),
    pub pivot_offset: (f32, f32),
}

impl<'a> AtlasEntry<'a> {
    pub fn from_sprite(sprite: &'a SourceSprite) -> Self {
        let trim = &sprite.trim_info;
        Self {
            source: &sprite.surface,
            rect: trim.trimmed_rect(),
            data_start: (trim.offset_x, trim.offset_y),
            pivot_offset: (trim.pivot_x, trim.pivot_y),
        }
    }

    pub fn frame_record(&self) -> FrameRecord {
        FrameRecord {
            x: self.rect.x,
            y: self.rect.y,
            width: self.rect.width,
            height: self.rect.height,
            x_offset: self.pivot_offset.0,
            y_offset: self.pivot_offset.1,
        }
    }
}

impl AsRef<Rect> for AtlasEntry<'_> {
    fn as_ref(&self) -> &Rect {
        &self.rect
    }
}

impl AsMut<Rect> for AtlasEntry<'_> {
    fn as_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

/// Every entry has a position inside a canvas of `size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedAtlas {
    pub size: Size,
    pub canvas_depth: ColourDepth,
    pub settings: AtlasSettings,
}

/// Canvas drawn and real frames recorded, ready to save
#[derive(Debug)]
pub struct CompositedAtlas {
    pub canvas: Surface,
    pub version: PreloadVersion,
    /// One record per packed entry, in input order
    pub frames: Vec<FrameRecord>,
    pub report: CompositeReport,
}
