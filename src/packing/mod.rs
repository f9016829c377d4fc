mod free_space;
mod rect;
mod size_search;

pub use free_space::FreeSpaceAllocator;
pub use rect::{Rect, Size};
pub use size_search::{
    CandidateQueue, MAX_ATLAS_DIMENSION, SearchBounds, SizeCandidate, candidate_sizes,
    find_packing_size, sorted_by_height,
};
