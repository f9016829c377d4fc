use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;

use super::{SourceSprite, trim_sprite};
use crate::error::PackError;
use crate::surface::Surface;

const SUPPORTED_EXTENSIONS: &[&str] = &["tga", "png"];

/// Load animation frames from input paths (files or directories).
///
/// Frames keep the order of `inputs`; files inside a directory are taken in
/// file name order. Decoding and trimming run in parallel.
pub fn load_sprites(inputs: &[impl AsRef<Path>], alpha_only: bool) -> Result<Vec<SourceSprite>> {
    let image_paths = collect_image_paths(inputs)?;

    if image_paths.is_empty() {
        return Err(PackError::EmptyInput.into());
    }

    info!("Loading {} frames...", image_paths.len());

    image_paths
        .par_iter()
        .map(|path| load_single_sprite(path, alpha_only))
        .collect()
}

/// Expand inputs into the image files they name, in frame order
pub fn collect_image_paths(inputs: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(PackError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(path.to_path_buf());
            } else {
                debug!("Skipping unsupported file {}", path.display());
            }
        } else if path.is_dir() {
            collect_from_directory(path, &mut paths)?;
        }
    }

    Ok(paths)
}

fn collect_from_directory(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_file() && is_supported_image(&path) {
            paths.push(path);
        } else if path.is_dir() {
            collect_from_directory(&path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_single_sprite(path: &Path, alpha_only: bool) -> Result<SourceSprite> {
    let surface = Surface::open(path)?;
    let trim_info = trim_sprite(&surface, alpha_only);

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    if trim_info.was_trimmed() {
        debug!(
            "{}: {}x{} {}-bit, trimmed to {}x{} at ({}, {})",
            name,
            surface.width(),
            surface.height(),
            surface.depth().bits(),
            trim_info.trimmed_width,
            trim_info.trimmed_height,
            trim_info.offset_x,
            trim_info.offset_y
        );
    } else {
        debug!(
            "{}: {}x{} {}-bit, untrimmed",
            name,
            surface.width(),
            surface.height(),
            surface.depth().bits()
        );
    }

    Ok(SourceSprite {
        path: path.to_path_buf(),
        name,
        surface,
        trim_info,
    })
}
