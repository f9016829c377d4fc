use super::TrimInfo;
use crate::surface::Surface;

/// Bounding box of the non-empty pixels of a frame.
///
/// What counts as empty depends on the surface depth; with `alpha_only` off a
/// 32-bit pixel must be zero in every channel. A frame with nothing visible
/// becomes a single pixel at the origin with no pivot offset.
pub fn trim_sprite(surface: &Surface, alpha_only: bool) -> TrimInfo {
    let (width, height) = (surface.width(), surface.height());
    let depth = surface.depth();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in surface.pixels().enumerate_pixels() {
        if !depth.is_transparent(*pixel, alpha_only) {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    // Nothing visible, including zero-sized images
    if max_x < min_x || max_y < min_y {
        return TrimInfo {
            source_width: width,
            source_height: height,
            ..TrimInfo::untrimmed(1, 1)
        };
    }

    let trimmed_width = max_x - min_x + 1;
    let trimmed_height = max_y - min_y + 1;

    TrimInfo {
        offset_x: min_x,
        offset_y: min_y,
        source_width: width,
        source_height: height,
        trimmed_width,
        trimmed_height,
        pivot_x: pivot_offset(min_x, trimmed_width, width),
        pivot_y: pivot_offset(min_y, trimmed_height, height),
    }
}

/// Offset of the trimmed centre from the source centre along one axis
#[expect(
    clippy::cast_precision_loss,
    reason = "frame dimensions are far below f32 precision limits"
)]
fn pivot_offset(start: u32, trimmed: u32, source: u32) -> f32 {
    (trimmed as f32 / 2.0 + start as f32) - source as f32 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ColourDepth, Origin};
    use image::Rgba;

    fn filled(width: u32, height: u32, depth: ColourDepth, px: [u8; 4]) -> Surface {
        let mut surface = Surface::new(width, height, depth);
        for y in 0..height {
            for x in 0..width {
                surface.set_pixel(i64::from(x), i64::from(y), Rgba(px), Origin::TopLeft);
            }
        }
        surface
    }

    #[test]
    fn test_trim_fully_opaque() {
        let surface = filled(10, 10, ColourDepth::Rgba32, [255, 0, 0, 255]);
        let info = trim_sprite(&surface, true);

        assert_eq!((info.trimmed_width, info.trimmed_height), (10, 10));
        assert_eq!((info.offset_x, info.offset_y), (0, 0));
        assert_eq!((info.pivot_x, info.pivot_y), (0.0, 0.0));
        assert!(!info.was_trimmed());
    }

    #[test]
    fn test_trim_with_transparent_border() {
        let mut surface = Surface::new(10, 10, ColourDepth::Rgba32);
        for y in 3..7 {
            for x in 2..6 {
                surface.set_pixel(x, y, Rgba([255, 0, 0, 255]), Origin::TopLeft);
            }
        }

        let info = trim_sprite(&surface, true);

        assert_eq!((info.trimmed_width, info.trimmed_height), (4, 4));
        assert_eq!((info.offset_x, info.offset_y), (2, 3));
        assert_eq!((info.source_width, info.source_height), (10, 10));
        assert_eq!(info.pivot_x, -1.0);
        assert_eq!(info.pivot_y, 0.0);
        assert!(info.was_trimmed());
    }

    #[test]
    fn test_odd_trim_gives_half_pixel_pivot() {
        let mut surface = Surface::new(4, 4, ColourDepth::Rgba32);
        surface.set_pixel(3, 0, Rgba([1, 1, 1, 255]), Origin::TopLeft);

        let info = trim_sprite(&surface, true);
        assert_eq!(info.pivot_x, 1.5);
        assert_eq!(info.pivot_y, -1.5);
    }

    #[test]
    fn test_trim_fully_transparent() {
        let surface = Surface::new(10, 10, ColourDepth::Rgba32);
        let info = trim_sprite(&surface, true);

        assert_eq!((info.trimmed_width, info.trimmed_height), (1, 1));
        assert_eq!((info.offset_x, info.offset_y), (0, 0));
        assert_eq!((info.pivot_x, info.pivot_y), (0.0, 0.0));
        assert_eq!(info.source_width, 10);
    }

    #[test]
    fn test_alpha_only_toggle() {
        // Colour in a zero-alpha pixel only counts when alpha_only is off
        let mut surface = Surface::new(6, 6, ColourDepth::Rgba32);
        surface.set_pixel(1, 1, Rgba([40, 0, 0, 0]), Origin::TopLeft);
        surface.set_pixel(4, 4, Rgba([40, 0, 0, 255]), Origin::TopLeft);

        let alpha = trim_sprite(&surface, true);
        assert_eq!((alpha.offset_x, alpha.trimmed_width), (4, 1));

        let colour = trim_sprite(&surface, false);
        assert_eq!((colour.offset_x, colour.trimmed_width), (1, 4));
    }

    #[test]
    fn test_greyscale_trims_black() {
        let mut surface = Surface::new(5, 5, ColourDepth::Grey8);
        surface.set_pixel(2, 2, Rgba([90, 0, 0, 255]), Origin::TopLeft);

        let info = trim_sprite(&surface, true);
        assert_eq!((info.offset_x, info.offset_y), (2, 2));
        assert_eq!((info.trimmed_width, info.trimmed_height), (1, 1));
    }

    #[test]
    fn test_rgb_is_never_trimmed() {
        let surface = Surface::new(3, 2, ColourDepth::Rgb24);
        let info = trim_sprite(&surface, true);
        assert!(!info.was_trimmed());
    }
}
