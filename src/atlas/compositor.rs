use log::debug;

use super::{AtlasEntry, AtlasSettings};
use crate::packing::Size;
use crate::surface::{ColourDepth, Origin, Surface};

/// Alpha given to every halo pixel
pub const HALO_ALPHA: u8 = 127;

/// Pixel write counts from a compositing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeReport {
    pub halo_pixels: usize,
    pub sprite_pixels: usize,
}

/// Depth of the canvas for a set of entries: the deepest source, or 8-bit
/// when greyscale output is forced.
pub fn canvas_depth(entries: &[AtlasEntry<'_>], greyscale: bool) -> ColourDepth {
    if greyscale {
        return ColourDepth::Grey8;
    }
    entries
        .iter()
        .map(|e| e.source.depth())
        .max()
        .unwrap_or(ColourDepth::Rgba32)
}

/// Draw every placed entry onto a fresh canvas.
///
/// 32-bit frames on a 32-bit canvas first get a halo: shifted copies at
/// half alpha, from the outermost ring inwards. The frame itself is drawn
/// last so it always covers its own halo.
pub fn composite(
    entries: &[AtlasEntry<'_>],
    size: Size,
    depth: ColourDepth,
    settings: &AtlasSettings,
    origin: Origin,
) -> (Surface, CompositeReport) {
    let mut canvas = Surface::new(size.width, size.height, depth);
    let mut report = CompositeReport::default();

    for (index, entry) in entries.iter().enumerate() {
        let rect = entry.rect;
        let region = entry.source.region(
            entry.data_start.0,
            entry.data_start.1,
            u32::try_from(rect.width).unwrap_or(0),
            u32::try_from(rect.height).unwrap_or(0),
        );
        let source_depth = entry.source.depth();
        let (x, y) = (i64::from(rect.x), i64::from(rect.y));

        if source_depth == ColourDepth::Rgba32 && depth == ColourDepth::Rgba32 {
            for ring in (1..=i64::from(settings.colour_padding)).rev() {
                for (dx, dy) in [(0, -ring), (0, ring), (-ring, 0), (ring, 0)] {
                    report.halo_pixels += canvas.blit_transparent(
                        &region,
                        source_depth,
                        x + dx,
                        y + dy,
                        origin,
                        Some(HALO_ALPHA),
                    );
                }
            }
        }

        report.sprite_pixels +=
            canvas.blit_transparent(&region, source_depth, x, y, origin, None);

        debug!(
            "Frame {} drawn at ({}, {}) {}x{}",
            index, rect.x, rect.y, rect.width, rect.height
        );
    }

    (canvas, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::Rect;
    use image::Rgba;

    fn square(size: u32, depth: ColourDepth, px: [u8; 4]) -> Surface {
        let mut surface = Surface::new(size, size, depth);
        for y in 0..size {
            for x in 0..size {
                surface.set_pixel(i64::from(x), i64::from(y), Rgba(px), Origin::TopLeft);
            }
        }
        surface
    }

    fn placed(source: &Surface, x: i32, y: i32) -> AtlasEntry<'_> {
        AtlasEntry {
            source,
            rect: Rect::new(x, y, 2, 2),
            data_start: (0, 0),
            pivot_offset: (0.0, 0.0),
        }
    }

    #[test]
    fn test_halo_around_rgba_frame() {
        let source = square(2, ColourDepth::Rgba32, [200, 10, 10, 255]);
        let entries = [placed(&source, 4, 4)];
        let settings = AtlasSettings::default();

        let (canvas, report) = composite(
            &entries,
            Size::new(10, 10),
            ColourDepth::Rgba32,
            &settings,
            Origin::TopLeft,
        );

        assert_eq!(report.sprite_pixels, 4);
        assert_eq!(report.halo_pixels, 2 * 4 * 4);
        assert_eq!(
            canvas.get_pixel(4, 4, Origin::TopLeft),
            Some(Rgba([200, 10, 10, 255]))
        );
        assert_eq!(
            canvas.get_pixel(2, 4, Origin::TopLeft),
            Some(Rgba([200, 10, 10, HALO_ALPHA]))
        );
        assert_eq!(
            canvas.get_pixel(3, 3, Origin::TopLeft),
            Some(Rgba([0, 0, 0, 0]))
        );
    }

    #[test]
    fn test_no_halo_for_opaque_or_grey_sources() {
        let rgb = square(2, ColourDepth::Rgb24, [1, 2, 3, 255]);
        let grey = square(2, ColourDepth::Grey8, [9, 0, 0, 255]);
        let entries = [placed(&rgb, 0, 0), placed(&grey, 4, 4)];

        let (_, report) = composite(
            &entries,
            Size::new(8, 8),
            ColourDepth::Rgba32,
            &AtlasSettings::default(),
            Origin::TopLeft,
        );

        assert_eq!(report.halo_pixels, 0);
        assert_eq!(report.sprite_pixels, 8);
    }

    #[test]
    fn test_greyscale_canvas_reduces_and_skips_halo() {
        let source = square(2, ColourDepth::Rgba32, [150, 20, 30, 255]);
        let entries = [placed(&source, 3, 3)];
        let settings = AtlasSettings {
            greyscale: true,
            ..AtlasSettings::default()
        };

        let depth = canvas_depth(&entries, settings.greyscale);
        let (canvas, report) =
            composite(&entries, Size::new(8, 8), depth, &settings, Origin::TopLeft);

        assert_eq!(depth, ColourDepth::Grey8);
        assert_eq!(report.halo_pixels, 0);
        assert_eq!(canvas.header().image_type, 3);
        assert!(
            canvas
                .pixels()
                .pixels()
                .all(|px| px[0] == px[1] && px[1] == px[2])
        );
        assert_eq!(canvas.get_pixel(3, 3, Origin::TopLeft).map(|p| p[0]), Some(150));
    }

    #[test]
    fn test_canvas_depth_uses_deepest_source() {
        let rgb = square(1, ColourDepth::Rgb24, [1, 1, 1, 255]);
        let grey = square(1, ColourDepth::Grey8, [1, 1, 1, 255]);
        let entries = [placed(&grey, 0, 0), placed(&rgb, 0, 0)];
        assert_eq!(canvas_depth(&entries, false), ColourDepth::Rgb24);
        assert_eq!(canvas_depth(&entries[..1], false), ColourDepth::Grey8);
    }

    #[test]
    fn test_bottom_left_origin_places_from_last_row() {
        let mut source = Surface::new(2, 2, ColourDepth::Rgba32);
        source.set_pixel(0, 0, Rgba([7, 0, 0, 255]), Origin::TopLeft);
        let entries = [placed(&source, 0, 0)];
        let settings = AtlasSettings {
            colour_padding: 0,
            ..AtlasSettings::default()
        };

        let (canvas, _) = composite(
            &entries,
            Size::new(4, 4),
            ColourDepth::Rgba32,
            &settings,
            Origin::BottomLeft,
        );

        assert_eq!(canvas.pixels().get_pixel(0, 3)[0], 7);
    }
}
