use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::tga::TgaEncoder;
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, Rgba, RgbaImage,
};

use super::ColourDepth;
use crate::error::PackError;

/// Which row a y coordinate counts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    TopLeft,
    BottomLeft,
}

/// Header fields of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceHeader {
    pub width: u32,
    pub height: u32,
    pub depth: ColourDepth,
    pub image_type: u8,
}

/// Addressable pixel buffer with a colour depth.
///
/// Pixels are kept as RGBA in top-down row order whatever the depth; writes
/// are reduced to what the depth can hold, so an 8-bit surface only ever
/// contains grey values.
#[derive(Debug, Clone)]
pub struct Surface {
    depth: ColourDepth,
    pixels: RgbaImage,
}

impl Surface {
    /// Blank surface, every pixel zero
    pub fn new(width: u32, height: u32, depth: ColourDepth) -> Self {
        Self {
            depth,
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: DynamicImage) -> Self {
        let colour = image.color();
        let depth = if colour.has_color() {
            if colour.has_alpha() {
                ColourDepth::Rgba32
            } else {
                ColourDepth::Rgb24
            }
        } else if colour.has_alpha() {
            ColourDepth::Rgba32
        } else {
            ColourDepth::Grey8
        };

        Self {
            depth,
            pixels: image.into_rgba8(),
        }
    }

    /// Decode an image file
    pub fn open(path: &Path) -> Result<Self, PackError> {
        let image = ImageReader::open(path)
            .map_err(|e| PackError::ImageLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?
            .decode()
            .map_err(|e| PackError::ImageLoad {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self::from_image(image))
    }

    pub fn header(&self) -> SurfaceHeader {
        SurfaceHeader {
            width: self.width(),
            height: self.height(),
            depth: self.depth,
            image_type: self.depth.tga_image_type(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn depth(&self) -> ColourDepth {
        self.depth
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn get_pixel(&self, x: u32, y: u32, origin: Origin) -> Option<Rgba<u8>> {
        let row = self.row(i64::from(y), origin)?;
        if x >= self.width() {
            return None;
        }
        Some(*self.pixels.get_pixel(x, row))
    }

    /// Write a pixel, reduced to this surface's depth.
    /// Returns false when the coordinate is outside the surface.
    pub fn set_pixel(&mut self, x: i64, y: i64, px: Rgba<u8>, origin: Origin) -> bool {
        let Some(row) = self.row(y, origin) else {
            return false;
        };
        let Some(column) = u32::try_from(x).ok().filter(|&c| c < self.width()) else {
            return false;
        };

        self.pixels.put_pixel(column, row, self.depth.normalize(px));
        true
    }

    /// Copy of a rectangular region in top-down order, clipped to the surface
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
        image::imageops::crop_imm(&self.pixels, x, y, width, height).to_image()
    }

    /// Draw `region` with its top-left row at `(x, y)`.
    ///
    /// Pixels that are empty for `source_depth` are skipped. With
    /// `Origin::BottomLeft`, `y` counts from the bottom row and successive
    /// region rows move upwards. `alpha` replaces the alpha of every drawn
    /// pixel when set. Pixels falling outside the surface are dropped.
    pub fn blit_transparent(
        &mut self,
        region: &RgbaImage,
        source_depth: ColourDepth,
        x: i64,
        y: i64,
        origin: Origin,
        alpha: Option<u8>,
    ) -> usize {
        let mut written = 0;

        for (rx, ry, px) in region.enumerate_pixels() {
            if source_depth.is_transparent(*px, true) {
                continue;
            }

            let mut px = *px;
            if let Some(a) = alpha {
                px[3] = a;
            }

            if self.set_pixel(x + i64::from(rx), y + i64::from(ry), px, origin) {
                written += 1;
            }
        }

        written
    }

    /// Encode the surface at `path`. TGA files are written uncompressed with
    /// a channel layout matching the depth; other extensions go through the
    /// format the extension names.
    pub fn save(&self, path: &Path) -> Result<(), PackError> {
        let (bytes, colour) = match self.depth {
            ColourDepth::Grey8 => (
                self.pixels.pixels().map(|px| px[0]).collect::<Vec<_>>(),
                ExtendedColorType::L8,
            ),
            ColourDepth::Rgb24 => (
                self.pixels
                    .pixels()
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect(),
                ExtendedColorType::Rgb8,
            ),
            ColourDepth::Rgba32 => (self.pixels.as_raw().clone(), ExtendedColorType::Rgba8),
        };

        let save_error = |source| PackError::ImageSave {
            path: path.to_path_buf(),
            source,
        };

        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Tga) | Err(_) => {
                let file = File::create(path).map_err(|e| PackError::OutputWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                TgaEncoder::new(BufWriter::new(file))
                    .disable_rle()
                    .write_image(&bytes, self.width(), self.height(), colour)
                    .map_err(save_error)
            }
            Ok(format) => image::save_buffer_with_format(
                path,
                &bytes,
                self.width(),
                self.height(),
                colour,
                format,
            )
            .map_err(save_error),
        }
    }

    fn row(&self, y: i64, origin: Origin) -> Option<u32> {
        let y = u32::try_from(y).ok().filter(|&y| y < self.height())?;
        Some(match origin {
            Origin::TopLeft => y,
            Origin::BottomLeft => self.height() - 1 - y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    fn opaque_square(size: u32, colour: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba(colour))
    }

    #[test]
    fn test_depth_from_decoded_image() {
        let grey = Surface::from_image(DynamicImage::ImageLuma8(GrayImage::new(2, 2)));
        let rgb = Surface::from_image(DynamicImage::ImageRgb8(RgbImage::new(2, 2)));
        let rgba = Surface::from_image(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));

        assert_eq!(grey.depth(), ColourDepth::Grey8);
        assert_eq!(rgb.depth(), ColourDepth::Rgb24);
        assert_eq!(rgba.depth(), ColourDepth::Rgba32);
        assert_eq!(rgba.header().image_type, 2);
        assert_eq!(grey.header().image_type, 3);
    }

    #[test]
    fn test_origin_flips_rows() {
        let mut surface = Surface::new(3, 4, ColourDepth::Rgba32);
        assert!(surface.set_pixel(1, 0, Rgba([9, 9, 9, 255]), Origin::BottomLeft));

        assert_eq!(
            surface.get_pixel(1, 3, Origin::TopLeft),
            Some(Rgba([9, 9, 9, 255]))
        );
        assert_eq!(
            surface.get_pixel(1, 0, Origin::BottomLeft),
            Some(Rgba([9, 9, 9, 255]))
        );
        assert_eq!(surface.get_pixel(3, 0, Origin::TopLeft), None);
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut surface = Surface::new(2, 2, ColourDepth::Rgba32);
        assert!(!surface.set_pixel(-1, 0, Rgba([1, 1, 1, 1]), Origin::TopLeft));
        assert!(!surface.set_pixel(0, 2, Rgba([1, 1, 1, 1]), Origin::TopLeft));
    }

    #[test]
    fn test_greyscale_surface_reduces_writes() {
        let mut surface = Surface::new(1, 1, ColourDepth::Grey8);
        surface.set_pixel(0, 0, Rgba([120, 5, 6, 7]), Origin::TopLeft);
        assert_eq!(
            surface.get_pixel(0, 0, Origin::TopLeft),
            Some(Rgba([120, 120, 120, 255]))
        );
    }

    #[test]
    fn test_blit_skips_transparent_and_overrides_alpha() {
        let mut region = opaque_square(2, [255, 0, 0, 200]);
        region.put_pixel(1, 1, Rgba([255, 255, 255, 0]));

        let mut canvas = Surface::new(4, 4, ColourDepth::Rgba32);
        let written = canvas.blit_transparent(
            &region,
            ColourDepth::Rgba32,
            1,
            1,
            Origin::TopLeft,
            Some(127),
        );

        assert_eq!(written, 3);
        assert_eq!(*canvas.pixels().get_pixel(1, 1), Rgba([255, 0, 0, 127]));
        assert_eq!(*canvas.pixels().get_pixel(2, 2), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_blit_bottom_left_writes_rows_upwards() {
        let mut region = RgbaImage::new(1, 2);
        region.put_pixel(0, 0, Rgba([1, 0, 0, 255]));
        region.put_pixel(0, 1, Rgba([2, 0, 0, 255]));

        let mut canvas = Surface::new(1, 4, ColourDepth::Rgba32);
        canvas.blit_transparent(&region, ColourDepth::Rgba32, 0, 0, Origin::BottomLeft, None);

        assert_eq!(canvas.pixels().get_pixel(0, 3)[0], 1);
        assert_eq!(canvas.pixels().get_pixel(0, 2)[0], 2);
    }

    #[test]
    fn test_blit_clips_to_canvas() {
        let region = opaque_square(3, [5, 5, 5, 255]);
        let mut canvas = Surface::new(2, 2, ColourDepth::Rgba32);
        let written =
            canvas.blit_transparent(&region, ColourDepth::Rgba32, -1, -1, Origin::TopLeft, None);
        assert_eq!(written, 4);
    }

    #[test]
    fn test_region_is_clipped() {
        let surface = Surface::from_image(DynamicImage::ImageRgba8(opaque_square(4, [1; 4])));
        let region = surface.region(2, 2, 5, 5);
        assert_eq!(region.dimensions(), (2, 2));
    }

    #[test]
    fn test_save_and_reopen_tga() {
        let mut surface = Surface::new(3, 2, ColourDepth::Grey8);
        surface.set_pixel(2, 1, Rgba([77, 0, 0, 255]), Origin::TopLeft);

        let path = std::env::temp_dir().join(format!(
            "preload_packer_surface_{}.tga",
            std::process::id()
        ));
        surface.save(&path).unwrap();

        let reopened = Surface::open(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reopened.depth(), ColourDepth::Grey8);
        assert_eq!((reopened.width(), reopened.height()), (3, 2));
        assert_eq!(
            reopened.get_pixel(2, 1, Origin::TopLeft),
            Some(Rgba([77, 77, 77, 255]))
        );
        assert_eq!(
            reopened.get_pixel(0, 0, Origin::TopLeft),
            Some(Rgba([0, 0, 0, 255]))
        );
    }

    #[test]
    fn test_open_missing_file() {
        let result = Surface::open(Path::new("/definitely/not/here.tga"));
        assert!(matches!(result, Err(PackError::ImageLoad { .. })));
    }
}
