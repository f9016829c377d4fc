use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::surface::Origin;

/// Paddings wider than the largest atlas can never fit a frame
const MAX_PADDING: i64 = 8128;

#[derive(Parser, Debug)]
#[command(name = "preload-packer")]
#[command(version, about = "Sprite atlas packer for .ini.preload animations", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack frames into a TGA atlas and write its .ini.preload metadata
    Pack(PackArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Input frames (TGA or PNG files, or directories), in animation order
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output atlas path [default: atl_<first input> next to the first input]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preload format: int (top-down, integer offsets) or float (bottom-up, float offsets) [default: float]
    #[arg(long, value_enum)]
    pub preload: Option<PreloadVersion>,

    /// Total animation frames; 0 uses the number of inputs [default: 0]
    #[arg(long)]
    pub frames: Option<usize>,

    /// How to fill frames past the last input [default: last]
    #[arg(long = "loop", value_enum)]
    pub loop_mode: Option<LoopMode>,

    /// Transparent pixels between frames in the atlas [default: 0]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(..=MAX_PADDING))]
    pub padding: Option<u32>,

    /// Semi-transparent bleed pixels drawn around each 32-bit frame [default: 2]
    #[arg(long, alias = "color-padding", value_parser = clap::value_parser!(u32).range(..=MAX_PADDING))]
    pub colour_padding: Option<u32>,

    /// Restrict atlas dimensions to powers of two (then steps of 508) [default: true]
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub power_of_two: Option<bool>,

    /// Write an 8-bit greyscale atlas using each pixel's red channel
    #[arg(long, alias = "grayscale")]
    pub greyscale: bool,

    /// Only treat fully transparent alpha as empty when trimming [default: true]
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub alpha_trim: Option<bool>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Layout of the .ini.preload metadata
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PreloadVersion {
    /// Integer offsets, frames addressed from the top row
    #[value(name = "int")]
    Int,
    /// Float offsets, frames addressed from the bottom row
    #[default]
    #[value(name = "float")]
    Float,
}

impl PreloadVersion {
    pub fn code(self) -> i32 {
        match self {
            PreloadVersion::Int => 1,
            PreloadVersion::Float => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(PreloadVersion::Int),
            2 => Some(PreloadVersion::Float),
            _ => None,
        }
    }

    /// Float preloads address rows from the bottom of the atlas
    pub fn is_flipped(self) -> bool {
        self == PreloadVersion::Float
    }

    pub fn origin(self) -> Origin {
        if self.is_flipped() {
            Origin::BottomLeft
        } else {
            Origin::TopLeft
        }
    }
}

/// Repetition policy for frames past the last input
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Start over from the first frame
    #[value(name = "cycle")]
    Loop,
    /// Play backwards, bouncing between the first and last frame
    #[value(name = "reverse")]
    Reverse,
    /// Hold the last frame
    #[default]
    #[value(name = "last")]
    LastFrame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pack_args() {
        let cli = CliArgs::try_parse_from([
            "preload-packer",
            "pack",
            "a.tga",
            "b.tga",
            "--preload",
            "int",
            "--loop",
            "reverse",
            "--frames",
            "12",
            "--color-padding",
            "3",
            "--power-of-two",
            "false",
            "--grayscale",
            "--alpha-trim",
            "0",
        ])
        .unwrap();

        let Command::Pack(args) = cli.command;
        assert_eq!(args.input.len(), 2);
        assert_eq!(args.preload, Some(PreloadVersion::Int));
        assert_eq!(args.loop_mode, Some(LoopMode::Reverse));
        assert_eq!(args.frames, Some(12));
        assert_eq!(args.colour_padding, Some(3));
        assert_eq!(args.power_of_two, Some(false));
        assert!(args.greyscale);
        assert_eq!(args.alpha_trim, Some(false));
        assert_eq!(args.padding, None);
    }

    #[test]
    fn test_inputs_required_without_config() {
        assert!(CliArgs::try_parse_from(["preload-packer", "pack"]).is_err());
        assert!(CliArgs::try_parse_from(["preload-packer", "pack", "-c", "atlas.json"]).is_ok());
    }

    #[test]
    fn test_padding_is_bounded_by_atlas_size() {
        let parse = |flag: &str, value: &str| {
            CliArgs::try_parse_from(["preload-packer", "pack", "a.tga", flag, value])
        };

        assert_eq!(MAX_PADDING, i64::from(crate::packing::MAX_ATLAS_DIMENSION));
        assert!(parse("--padding", "8128").is_ok());
        assert!(parse("--padding", "9000").is_err());
        assert!(parse("--padding", "3000000000").is_err());
        assert!(parse("--colour-padding", "2147483648").is_err());
    }

    #[test]
    fn test_preload_version_codes() {
        assert_eq!(PreloadVersion::from_code(PreloadVersion::Int.code()), Some(PreloadVersion::Int));
        assert_eq!(PreloadVersion::from_code(7), None);
        assert_eq!(PreloadVersion::Float.origin(), Origin::BottomLeft);
        assert_eq!(PreloadVersion::Int.origin(), Origin::TopLeft);
    }
}
