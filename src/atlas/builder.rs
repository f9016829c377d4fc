use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use super::{
    AtlasEntry, AtlasSettings, CompositedAtlas, PackedAtlas, TimelineOptions, canvas_depth,
    composite, extend_timeline,
};
use crate::cli::PreloadVersion;
use crate::error::PackError;
use crate::output::{Preload, preload_path};
use crate::packing::find_packing_size;
use crate::surface::ColourDepth;

/// Configuration for atlas building
#[derive(Debug, Clone, Default)]
pub struct AtlasBuilder {
    pub settings: AtlasSettings,
}

impl AtlasBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.settings.pixel_padding = padding;
        self
    }

    pub fn colour_padding(mut self, padding: u32) -> Self {
        self.settings.colour_padding = padding;
        self
    }

    pub fn power_of_two(mut self, pot: bool) -> Self {
        self.settings.power_of_two = pot;
        self
    }

    pub fn greyscale(mut self, greyscale: bool) -> Self {
        self.settings.greyscale = greyscale;
        self
    }

    /// Find the smallest canvas for `entries` and write each placement into
    /// its entry.
    pub fn pack(&self, entries: &mut [AtlasEntry<'_>]) -> Result<PackedAtlas> {
        if entries.is_empty() {
            return Err(PackError::EmptyInput.into());
        }

        let depth = canvas_depth(entries, self.settings.greyscale);
        let needs_halo = depth == ColourDepth::Rgba32;
        let size = find_packing_size(entries, &self.settings, needs_halo)?;

        let used: u64 = entries
            .iter()
            .map(|e| u64::from(e.rect.width.unsigned_abs()) * u64::from(e.rect.height.unsigned_abs()))
            .sum();
        #[expect(clippy::cast_precision_loss, reason = "ratio for log output only")]
        let occupancy = used as f64 / size.area().max(1) as f64;

        info!(
            "Atlas: {}x{} {}-bit with {} frames ({:.1}% efficiency)",
            size.width,
            size.height,
            depth.bits(),
            entries.len(),
            occupancy * 100.0,
        );

        Ok(PackedAtlas {
            size,
            canvas_depth: depth,
            settings: self.settings,
        })
    }

    /// Pack and draw in one go
    pub fn build(
        &self,
        entries: &mut [AtlasEntry<'_>],
        version: PreloadVersion,
    ) -> Result<CompositedAtlas> {
        let packed = self.pack(entries)?;
        Ok(packed.composite(entries, version))
    }
}

impl PackedAtlas {
    /// Draw the packed entries. Rows are addressed the way `version` expects.
    pub fn composite(&self, entries: &[AtlasEntry<'_>], version: PreloadVersion) -> CompositedAtlas {
        let (canvas, report) = composite(
            entries,
            self.size,
            self.canvas_depth,
            &self.settings,
            version.origin(),
        );

        CompositedAtlas {
            canvas,
            version,
            frames: entries.iter().map(AtlasEntry::frame_record).collect(),
            report,
        }
    }
}

impl CompositedAtlas {
    /// Metadata for the full timeline
    pub fn preload(&self, timeline: &TimelineOptions) -> Preload {
        let mut preload = Preload::new(
            self.version,
            i32::try_from(self.canvas.width()).unwrap_or(i32::MAX),
            i32::try_from(self.canvas.height()).unwrap_or(i32::MAX),
        );
        for frame in extend_timeline(&self.frames, timeline) {
            preload.append_frame(frame);
        }
        preload
    }

    /// Write the canvas to `path` and its metadata next to it. Returns the
    /// metadata path.
    pub fn save(&self, path: &Path, timeline: &TimelineOptions) -> Result<PathBuf> {
        self.canvas.save(path)?;
        info!("Saved {}", path.display());

        let preload = self.preload(timeline);
        let meta_path = preload_path(path);
        preload.save(&meta_path)?;
        info!(
            "Saved {} ({} frames, {} packed)",
            meta_path.display(),
            preload.frame_count(),
            self.frames.len()
        );

        Ok(meta_path)
    }
}
