use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use log::debug;

use super::{FreeSpaceAllocator, Rect, Size};
use crate::atlas::AtlasSettings;
use crate::error::PackError;

/// Hard ceiling for either atlas dimension
pub const MAX_ATLAS_DIMENSION: u32 = 8128;

/// Power-of-two sizes stop doubling at 512 and then grow by this step
const LINEAR_STEP: u32 = 508;
const POWER_OF_TWO_LIMIT: u32 = 512;
/// Growth step when power-of-two sizing is disabled
const FREE_STEP: u32 = 8;

/// A canvas size waiting to be tried, ordered by area (smallest first once
/// wrapped in `Reverse`). Equal areas prefer the narrower canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeCandidate(pub Size);

impl Ord for SizeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .area()
            .cmp(&other.0.area())
            .then(self.0.width.cmp(&other.0.width))
            .then(self.0.height.cmp(&other.0.height))
    }
}

impl PartialOrd for SizeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of canvas sizes. Precomputed candidates and the width-growth
/// fallback go through the same `push`.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    heap: BinaryHeap<Reverse<SizeCandidate>>,
}

impl CandidateQueue {
    pub fn push(&mut self, size: Size) {
        self.heap.push(Reverse(SizeCandidate(size)));
    }

    /// Remove and return the smallest remaining size
    pub fn pop(&mut self) -> Option<Size> {
        self.heap.pop().map(|Reverse(SizeCandidate(size))| size)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Area and dimension limits derived from the sprite set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    pub total_area: u64,
    pub min_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl SearchBounds {
    pub fn measure<T: AsRef<Rect>>(items: &[T], total_padding: u32, power_of_two: bool) -> Self {
        let mut total_area = 0u64;
        let mut min_width = 0u32;
        let mut min_height = 0u32;
        let mut max_height = 0u64;

        for item in items {
            let rect = item.as_ref();
            let w = dimension(rect.width);
            let h = dimension(rect.height);

            let both_sides = total_padding.saturating_mul(2);
            let area = u64::from(w.saturating_add(total_padding))
                .saturating_mul(u64::from(h.saturating_add(total_padding)));
            total_area = total_area.saturating_add(area);
            min_width = min_width.max(w.saturating_add(both_sides));
            min_height = min_height.max(h.saturating_add(both_sides));
            max_height = max_height.saturating_add(u64::from(h.saturating_add(both_sides)));
        }

        let rounded = round_up_height(max_height, power_of_two);
        let max_height = u32::try_from(rounded.min(u64::from(MAX_ATLAS_DIMENSION)))
            .unwrap_or(MAX_ATLAS_DIMENSION);

        Self {
            total_area,
            min_width,
            min_height,
            max_height,
        }
    }
}

/// Enumerate every admissible canvas size for the given bounds.
pub fn candidate_sizes(bounds: &SearchBounds, power_of_two: bool) -> CandidateQueue {
    let mut queue = CandidateQueue::default();
    let start_width = if power_of_two {
        1
    } else {
        u32::try_from(bounds.total_area / u64::from(bounds.max_height.max(1))).unwrap_or(u32::MAX)
    };

    let mut height = if power_of_two { 1 } else { bounds.min_height };
    while height <= bounds.max_height {
        let mut width = start_width;
        while (u64::from(width) * u64::from(height) < bounds.total_area
            || width < bounds.min_width)
            && width <= MAX_ATLAS_DIMENSION
        {
            width = next_dimension(width, power_of_two);
        }

        if width <= MAX_ATLAS_DIMENSION && height >= bounds.min_height {
            queue.push(Size::new(width, height));
        }

        height = next_dimension(height, power_of_two);
    }

    queue
}

/// Indices ordered by descending height; equal heights keep input order.
pub fn sorted_by_height<T: AsRef<Rect>>(items: &[T]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    indices.sort_by(|&a, &b| items[b].as_ref().height.cmp(&items[a].as_ref().height));
    indices
}

/// Find the smallest canvas that holds every item and leave each item's
/// position set to its placement in that canvas.
pub fn find_packing_size<T>(
    items: &mut [T],
    settings: &AtlasSettings,
    needs_halo: bool,
) -> Result<Size, PackError>
where
    T: AsRef<Rect> + AsMut<Rect>,
{
    if items.is_empty() {
        return Err(PackError::EmptyInput);
    }

    let total_padding = settings.total_padding(needs_halo);
    let bounds = SearchBounds::measure(items, total_padding, settings.power_of_two);
    let mut queue = candidate_sizes(&bounds, settings.power_of_two);
    debug!(
        "Size search: area {}, min {}x{}, max height {}, {} candidates",
        bounds.total_area,
        bounds.min_width,
        bounds.min_height,
        bounds.max_height,
        queue.len()
    );

    let order = sorted_by_height(items);
    let mut tried = HashSet::new();

    while let Some(size) = queue.pop() {
        if !tried.insert(size) {
            continue;
        }

        let mut allocator =
            FreeSpaceAllocator::new(size, settings.pixel_padding, settings.colour_padding);
        if allocator.try_place_all(items, &order) {
            debug!("Size search: {}x{} fits", size.width, size.height);
            return Ok(size);
        }

        debug!("Size search: {}x{} does not fit", size.width, size.height);

        if !settings.power_of_two {
            let grown = Size::new(size.width + 1, size.height);
            if grown.width <= MAX_ATLAS_DIMENSION {
                queue.push(grown);
            }
        }
    }

    Err(PackError::SizeSearchExhausted {
        entries: items.len(),
        max_dimension: MAX_ATLAS_DIMENSION,
    })
}

/// Next size in the enumeration: doubling up to 512, then 1016 and +508
/// steps, or +8 steps without power-of-two sizing.
fn next_dimension(value: u32, power_of_two: bool) -> u32 {
    if !power_of_two {
        return value.saturating_add(FREE_STEP);
    }

    match value {
        0 => 1,
        v if v < POWER_OF_TWO_LIMIT => v << 1,
        POWER_OF_TWO_LIMIT => LINEAR_STEP * 2,
        v => v.saturating_add(LINEAR_STEP),
    }
}

fn round_up_height(height: u64, power_of_two: bool) -> u64 {
    if power_of_two {
        if height <= u64::from(POWER_OF_TWO_LIMIT) {
            height.max(1).next_power_of_two()
        } else {
            height.div_ceil(u64::from(LINEAR_STEP)) * u64::from(LINEAR_STEP)
        }
    } else {
        height.div_ceil(u64::from(FREE_STEP)) * u64::from(FREE_STEP)
    }
}

fn dimension(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
