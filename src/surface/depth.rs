use image::Rgba;

/// Bits per pixel of a surface, as stored in the TGA header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColourDepth {
    /// Single channel greyscale
    Grey8,
    /// True colour without alpha
    Rgb24,
    /// True colour with alpha
    Rgba32,
}

impl ColourDepth {
    pub fn bits(self) -> u8 {
        match self {
            ColourDepth::Grey8 => 8,
            ColourDepth::Rgb24 => 24,
            ColourDepth::Rgba32 => 32,
        }
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(ColourDepth::Grey8),
            24 => Some(ColourDepth::Rgb24),
            32 => Some(ColourDepth::Rgba32),
            _ => None,
        }
    }

    /// TGA image type: 3 is uncompressed greyscale, 2 uncompressed true colour
    pub fn tga_image_type(self) -> u8 {
        match self {
            ColourDepth::Grey8 => 3,
            ColourDepth::Rgb24 | ColourDepth::Rgba32 => 2,
        }
    }

    /// Whether a pixel of this depth counts as empty.
    ///
    /// 32-bit pixels are empty when their alpha is zero, or when every
    /// channel is zero if `alpha_only` is off. 8-bit pixels are empty when
    /// the grey value is zero. 24-bit pixels are never empty.
    pub fn is_transparent(self, px: Rgba<u8>, alpha_only: bool) -> bool {
        match self {
            ColourDepth::Rgba32 if alpha_only => px[3] == 0,
            ColourDepth::Rgba32 => px.0 == [0, 0, 0, 0],
            ColourDepth::Rgb24 => false,
            ColourDepth::Grey8 => px[0] == 0,
        }
    }

    /// Reduce a pixel to what a surface of this depth can hold.
    /// Greyscale keeps the red channel.
    pub fn normalize(self, px: Rgba<u8>) -> Rgba<u8> {
        match self {
            ColourDepth::Rgba32 => px,
            ColourDepth::Rgb24 => Rgba([px[0], px[1], px[2], 255]),
            ColourDepth::Grey8 => Rgba([px[0], px[0], px[0], 255]),
        }
    }
}
