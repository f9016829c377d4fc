use super::{Rect, Size};

/// Free-space allocator for a single fixed-size canvas.
///
/// Keeps a working set of possibly overlapping free rectangles (MaxRects
/// style) and places each incoming rectangle with the best short side fit
/// heuristic. Every placed rectangle keeps `pixel_padding + 2 * colour_padding`
/// pixels of clearance from its neighbours, and the canvas border keeps
/// `pixel_padding + colour_padding`.
pub struct FreeSpaceAllocator {
    split_margin: i32,
    free_rects: Vec<Rect>,
}

impl FreeSpaceAllocator {
    pub fn new(canvas: Size, pixel_padding: u32, colour_padding: u32) -> Self {
        let border = to_i32(pixel_padding).saturating_add(to_i32(colour_padding));
        let inset = border.saturating_mul(2);
        let interior = Rect::new(
            border,
            border,
            to_i32(canvas.width).saturating_sub(inset),
            to_i32(canvas.height).saturating_sub(inset),
        );

        let free_rects = if interior.is_degenerate() {
            Vec::new()
        } else {
            vec![interior]
        };

        Self {
            split_margin: to_i32(pixel_padding)
                .saturating_add(to_i32(colour_padding).saturating_mul(2)),
            free_rects,
        }
    }

    /// Currently unused regions of the canvas
    pub fn free_rects(&self) -> &[Rect] {
        &self.free_rects
    }

    /// Place every rectangle in `order`, writing the chosen position into it.
    ///
    /// Stops at the first rectangle that has nowhere to go and returns false;
    /// rectangles placed before that point keep their new positions.
    pub fn try_place_all<T: AsMut<Rect>>(&mut self, items: &mut [T], order: &[usize]) -> bool {
        for &index in order {
            if self.free_rects.is_empty() {
                return false;
            }

            let rect = items[index].as_mut();
            match self.insert(rect.width, rect.height) {
                Some(placed) => {
                    rect.x = placed.x;
                    rect.y = placed.y;
                }
                None => return false,
            }
        }

        true
    }

    /// Try to insert a rectangle with the given dimensions
    /// Returns the placed rectangle if successful
    pub fn insert(&mut self, width: i32, height: i32) -> Option<Rect> {
        let best_rect = self.find_position(width, height)?;
        self.place_rect(best_rect);
        Some(best_rect)
    }

    /// Best short side fit. Ties keep the first free rectangle encountered.
    fn find_position(&self, width: i32, height: i32) -> Option<Rect> {
        let mut best: Option<(i32, Rect)> = None;

        for free_rect in &self.free_rects {
            let leftover_w = free_rect.width - width;
            let leftover_h = free_rect.height - height;
            if leftover_w < 0 || leftover_h < 0 {
                continue;
            }

            let short_side = leftover_w.min(leftover_h);
            if best.is_none_or(|(score, _)| short_side < score) {
                best = Some((
                    short_side,
                    Rect::new(free_rect.x, free_rect.y, width, height),
                ));
            }
        }

        best.map(|(_, rect)| rect)
    }

    fn place_rect(&mut self, rect: Rect) {
        let keep_out = rect.inflate(self.split_margin);
        let mut new_rects = Vec::new();

        self.free_rects.retain(|free_rect| {
            if !keep_out.intersects(free_rect) {
                return true;
            }

            split_around(free_rect, &keep_out, &mut new_rects);
            false
        });

        self.free_rects.extend(new_rects);
        self.prune_free_rects();
    }

    /// Remove rectangles that are fully contained within others.
    ///
    /// Each rectangle is checked against the whole remaining set, so a removal
    /// never hides a pair from the comparison. Of two identical rectangles the
    /// first one survives.
    fn prune_free_rects(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let candidate = self.free_rects[i];
            let enclosed = self.free_rects.iter().enumerate().any(|(j, other)| {
                j != i && other.contains(&candidate) && (*other != candidate || j < i)
            });

            if enclosed {
                self.free_rects.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// Emit the strips of `free_rect` left uncovered by `keep_out`: above, below,
/// left and right. Strips with no area are dropped.
fn split_around(free_rect: &Rect, keep_out: &Rect, out: &mut Vec<Rect>) {
    let strips = [
        // Top
        Rect::new(
            free_rect.x,
            free_rect.y,
            free_rect.width,
            keep_out.y - free_rect.y,
        ),
        // Bottom
        Rect::new(
            free_rect.x,
            keep_out.bottom(),
            free_rect.width,
            free_rect.bottom() - keep_out.bottom(),
        ),
        // Left
        Rect::new(
            free_rect.x,
            free_rect.y,
            keep_out.x - free_rect.x,
            free_rect.height,
        ),
        // Right
        Rect::new(
            keep_out.right(),
            free_rect.y,
            free_rect.right() - keep_out.right(),
            free_rect.height,
        ),
    ];

    out.extend(strips.into_iter().filter(|strip| !strip.is_degenerate()));
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl AsMut<Rect> for Rect {
    fn as_mut(&mut self) -> &mut Rect {
        self
    }
}

impl AsRef<Rect> for Rect {
    fn as_ref(&self) -> &Rect {
        self
    }
}
