use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use preload_packer::atlas::{AtlasBuilder, AtlasEntry, TimelineOptions};
use preload_packer::cli::{CliArgs, Command, LoopMode, PackArgs, PreloadVersion};
use preload_packer::config::LoadedConfig;
use preload_packer::sprite::load_sprites;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Logger may not be initialized yet when config loading fails
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();
    let Command::Pack(args) = &cli.command;

    let merged = merge_config_with_args(args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Preload packer v{}", env!("CARGO_PKG_VERSION"));

    let sprites = load_sprites(&merged.input, merged.alpha_trim)?;
    info!("Loaded {} frames", sprites.len());

    let output = merged
        .output
        .or_else(|| sprites.first().map(|s| default_output_path(&s.path)))
        .context("no output path")?;
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut entries: Vec<_> = sprites.iter().map(AtlasEntry::from_sprite).collect();
    let atlas = AtlasBuilder::new()
        .padding(merged.padding)
        .colour_padding(merged.colour_padding)
        .power_of_two(merged.power_of_two)
        .greyscale(merged.greyscale)
        .build(&mut entries, merged.preload)?;

    let timeline = TimelineOptions::new(merged.frames, merged.loop_mode);
    atlas
        .save(&output, &timeline)
        .with_context(|| format!("failed to write atlas {}", output.display()))?;

    info!("Done!");

    Ok(())
}

/// `atl_<first frame>` next to the first frame, always as TGA
fn default_output_path(first: &Path) -> PathBuf {
    let name = first
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "atlas".to_string());
    first
        .with_file_name(format!("atl_{}", name))
        .with_extension("tga")
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: Option<PathBuf>,
    preload: PreloadVersion,
    frames: Option<usize>,
    loop_mode: LoopMode,
    padding: u32,
    colour_padding: u32,
    power_of_two: bool,
    greyscale: bool,
    alpha_trim: bool,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &PackArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine input files: CLI args override config
    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        Vec::new()
    };

    let output = args
        .output
        .clone()
        .or_else(|| loaded_config.as_ref().and_then(LoadedConfig::resolve_output));

    let preload = if let Some(p) = args.preload {
        p
    } else if let Some(ref lc) = loaded_config {
        PreloadVersion::from_str(&lc.config.preload, true).map_err(|e| {
            anyhow::anyhow!(
                "unknown preload '{}' in config file ({}). Valid values: int, float",
                lc.config.preload,
                e
            )
        })?
    } else {
        PreloadVersion::default()
    };

    let loop_mode = if let Some(m) = args.loop_mode {
        m
    } else if let Some(ref lc) = loaded_config {
        LoopMode::from_str(&lc.config.loop_mode, true).map_err(|e| {
            anyhow::anyhow!(
                "unknown loop '{}' in config file ({}). Valid values: cycle, reverse, last",
                lc.config.loop_mode,
                e
            )
        })?
    } else {
        LoopMode::default()
    };

    // For numeric fields: CLI > config > default
    let frames = args
        .frames
        .or_else(|| loaded_config.as_ref().map(|lc| lc.config.frames))
        .filter(|&n| n > 0);

    let padding = args.padding.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.padding)
            .unwrap_or(0)
    });

    let colour_padding = args.colour_padding.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.colour_padding)
            .unwrap_or(2)
    });

    let power_of_two = args.power_of_two.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.power_of_two)
            .unwrap_or(true)
    });

    let alpha_trim = args.alpha_trim.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.alpha_trim)
            .unwrap_or(true)
    });

    // Greyscale flag: CLI presence sets it, otherwise use config
    let greyscale = if args.greyscale {
        true
    } else if let Some(ref lc) = loaded_config {
        lc.config.greyscale
    } else {
        false
    };

    // Verbose is CLI-only
    let verbose = args.verbose;

    Ok(MergedConfig {
        input,
        output,
        preload,
        frames,
        loop_mode,
        padding,
        colour_padding,
        power_of_two,
        greyscale,
        alpha_trim,
        verbose,
    })
}
