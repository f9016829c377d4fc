use crate::cli::LoopMode;
use crate::output::FrameRecord;

/// How many frames the animation runs for and how to fill the tail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineOptions {
    total_frames: Option<usize>,
    loop_mode: LoopMode,
}

impl TimelineOptions {
    pub fn new(total_frames: Option<usize>, loop_mode: LoopMode) -> Self {
        Self {
            total_frames: total_frames.filter(|&n| n > 0),
            loop_mode,
        }
    }

    /// Total frame count; `None` plays each real frame once
    pub fn total_frames(&self) -> Option<usize> {
        self.total_frames.filter(|&n| n > 0)
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }
}

/// Source frame index for every slot of the timeline.
///
/// The first `real` slots map to themselves. Later slots follow the loop
/// mode: `Loop` wraps around, `LastFrame` holds the final frame and
/// `Reverse` bounces back from the final frame toward the first and forward
/// again. Reverse needs at least two frames and falls back to holding the
/// last frame otherwise. When fewer slots than real frames are requested
/// the timeline is cut short.
pub fn source_indices(real: usize, options: &TimelineOptions) -> Vec<usize> {
    if real == 0 {
        return Vec::new();
    }

    let total = options.total_frames().unwrap_or(real);
    let mode = match options.loop_mode() {
        LoopMode::Reverse if real < 2 => LoopMode::LastFrame,
        mode => mode,
    };

    let mut indices: Vec<usize> = (0..real.min(total)).collect();
    let mut current = real - 1;
    let mut backwards = true;

    for slot in real..total {
        let index = match mode {
            LoopMode::Loop => slot % real,
            LoopMode::LastFrame => real - 1,
            LoopMode::Reverse => {
                if backwards {
                    current -= 1;
                    if current == 0 {
                        backwards = false;
                    }
                } else {
                    current += 1;
                    if current == real - 1 {
                        backwards = true;
                    }
                }
                current
            }
        };
        indices.push(index);
    }

    indices
}

/// Expand the packed frames into the full timeline
pub fn extend_timeline(frames: &[FrameRecord], options: &TimelineOptions) -> Vec<FrameRecord> {
    source_indices(frames.len(), options)
        .into_iter()
        .map(|i| frames[i])
        .collect()
}
