//! Placement search minimizing the mismatch between a new patch and existing content
//!
//! The next patch always lands up and to the left of the anchor pixel. Every
//! offset inside a small window is scored by the squared difference between
//! the patch and the filled canvas pixels it would cover, and the cheapest
//! one wins.

use std::ops::RangeInclusive;

use rayon::prelude::*;
use tracing::debug;

use crate::io::configuration::MAX_OFFSET_HEURISTIC;
use crate::spatial::{EdgeMode, FillGrid, Raster};

/// Distances, in pixels, between the anchor and the patch origin that the search may use
///
/// Values are magnitudes; the actual offsets are their negations. `near`
/// derives from the overlap, `far` from [`MAX_OFFSET_HEURISTIC`], and either
/// may be the larger of the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetBounds {
    /// Overlap-derived horizontal distance
    pub x_near: usize,
    /// Overlap-derived vertical distance
    pub y_near: usize,
    /// Heuristic horizontal distance
    pub x_far: usize,
    /// Heuristic vertical distance
    pub y_far: usize,
}

impl OffsetBounds {
    /// Derive the search window from the overlap and the source patch size
    pub const fn from_overlap(overlap: usize, patch_width: usize, patch_height: usize) -> Self {
        let (x_near, x_far) = axis_bounds(overlap, patch_width);
        let (y_near, y_far) = axis_bounds(overlap, patch_height);
        Self {
            x_near,
            y_near,
            x_far,
            y_far,
        }
    }

    /// Horizontal offsets considered, most negative first
    pub fn x_offsets(&self) -> RangeInclusive<i32> {
        axis_offsets(self.x_near, self.x_far)
    }

    /// Vertical offsets considered, most negative first
    pub fn y_offsets(&self) -> RangeInclusive<i32> {
        axis_offsets(self.y_near, self.y_far)
    }

    /// Whether `(0, 0)` is the only candidate, as for a one-pixel patch
    pub const fn is_pinned(&self) -> bool {
        self.x_near == 0 && self.x_far == 0 && self.y_near == 0 && self.y_far == 0
    }

    /// All candidate offsets `[dx, dy]` in scan order (rows of `dy`, then `dx`)
    pub fn candidates(&self) -> Vec<[i32; 2]> {
        self.y_offsets()
            .flat_map(|dy| self.x_offsets().map(move |dx| [dx, dy]))
            .collect()
    }
}

// near = min(overlap, dim - 1), far = clamp(20, near / 3, dim - 1)
const fn axis_bounds(overlap: usize, dim: usize) -> (usize, usize) {
    let limit = dim.saturating_sub(1);
    let near = if overlap < limit { overlap } else { limit };
    let floor = near / 3;
    let far = if MAX_OFFSET_HEURISTIC > limit {
        limit
    } else if MAX_OFFSET_HEURISTIC < floor {
        floor
    } else {
        MAX_OFFSET_HEURISTIC
    };
    (near, far)
}

fn axis_offsets(a: usize, b: usize) -> RangeInclusive<i32> {
    -(a.max(b) as i32)..=-(a.min(b) as i32)
}

/// Where the next patch goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Unfilled pixel `[x, y]` the placement was chosen for
    pub anchor: [usize; 2],
    /// Non-positive offset `[dx, dy]` from the anchor to the patch origin
    pub offset: [i32; 2],
    /// Overlap error of the chosen offset (`None` for the fallback placement)
    pub error: Option<u64>,
}

impl Placement {
    /// Placement used when no candidate overlaps filled content
    pub const fn fallback(anchor: [usize; 2]) -> Self {
        Self {
            anchor,
            offset: [0, 0],
            error: None,
        }
    }

    /// Canvas coordinate of the patch's top-left corner (may be negative)
    pub const fn origin(&self) -> [i32; 2] {
        [
            self.anchor[0] as i32 + self.offset[0],
            self.anchor[1] as i32 + self.offset[1],
        ]
    }

    /// Number of patch columns left of the anchor
    pub const fn west_extent(&self) -> usize {
        self.offset[0].unsigned_abs() as usize
    }

    /// Number of patch rows above the anchor
    pub const fn north_extent(&self) -> usize {
        self.offset[1].unsigned_abs() as usize
    }
}

/// Squared error between the patch placed at `origin` and the filled pixels it covers
///
/// Unfilled pixels are skipped, as are off-canvas pixels under [`EdgeMode::Clip`].
/// Returns `None` if the patch covers no filled pixel at all.
pub fn overlap_error(
    canvas: &Raster,
    fill: &FillGrid,
    source: &Raster,
    origin: [i32; 2],
    edges: EdgeMode,
) -> Option<u64> {
    let mut total = 0u64;
    let mut overlapped = false;

    for sy in 0..source.height() {
        for sx in 0..source.width() {
            let target = [origin[0] + sx as i32, origin[1] + sy as i32];
            let Some(pos) = edges.resolve(target, canvas.width(), canvas.height()) else {
                continue;
            };
            if !fill.is_filled(pos) {
                continue;
            }
            overlapped = true;
            total += source.squared_difference([sx, sy], canvas, pos);
        }
    }

    overlapped.then_some(total)
}

/// Pick the offset whose overlap with filled content has the least error
///
/// Candidates are scored in parallel; ties go to the candidate that comes
/// first in [`OffsetBounds::candidates`] order, so the result matches a
/// sequential scan.
pub fn find_best_offset(
    canvas: &Raster,
    fill: &FillGrid,
    source: &Raster,
    anchor: [usize; 2],
    bounds: &OffsetBounds,
    edges: EdgeMode,
) -> Placement {
    let candidates = bounds.candidates();

    let best = candidates
        .par_iter()
        .enumerate()
        .filter_map(|(index, &offset)| {
            let origin = [anchor[0] as i32 + offset[0], anchor[1] as i32 + offset[1]];
            overlap_error(canvas, fill, source, origin, edges).map(|error| (error, index, offset))
        })
        .min_by_key(|&(error, index, _)| (error, index));

    best.map_or_else(
        || {
            if !bounds.is_pinned() {
                debug!(
                    x = anchor[0],
                    y = anchor[1],
                    candidates = candidates.len(),
                    "no candidate offset overlaps filled pixels, pasting at the anchor"
                );
            }
            Placement::fallback(anchor)
        },
        |(error, _, offset)| Placement {
            anchor,
            offset,
            error: Some(error),
        },
    )
}
