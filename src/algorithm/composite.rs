//! Writing a placed patch into the canvas along its cuts
//!
//! The two cuts of a placement are combined into a per-pixel plan over the
//! patch footprint: which pixels take the patch, and which of those sit on a
//! seam. Where the west and north bands intersect, a pixel takes the patch
//! only if both cuts put it on the patch side.

use bitvec::prelude::*;

use crate::algorithm::search::Placement;
use crate::algorithm::seam::Cuts;
use crate::spatial::{EdgeMode, FillGrid, FillState, Raster, SeamMemory, SeamSide};

/// Per-pixel compositing decisions over a patch footprint
#[derive(Clone, Debug)]
pub struct CompositePlan {
    width: usize,
    height: usize,
    incoming: BitVec,
    north_cuts: BitVec,
    west_cuts: BitVec,
}

impl CompositePlan {
    /// Combine the cuts of a placement over a `width` x `height` footprint
    pub fn new(width: usize, height: usize, cuts: &Cuts) -> Self {
        let len = width * height;
        let mut incoming = bitvec![0; len];
        let mut north_cuts = bitvec![0; len];
        let mut west_cuts = bitvec![0; len];

        for y in 0..height {
            for x in 0..width {
                let cell = [x, y];
                let west_admits = cuts.west.as_ref().is_none_or(|seam| seam.admits(cell));
                let north_admits = cuts.north.as_ref().is_none_or(|seam| seam.admits(cell));
                if !(west_admits && north_admits) {
                    continue;
                }

                let index = y * width + x;
                incoming.set(index, true);
                if cuts
                    .west
                    .as_ref()
                    .is_some_and(|seam| seam.passes_through(cell))
                {
                    west_cuts.set(index, true);
                }
                if cuts
                    .north
                    .as_ref()
                    .is_some_and(|seam| seam.passes_through(cell))
                {
                    north_cuts.set(index, true);
                }
            }
        }

        Self {
            width,
            height,
            incoming,
            north_cuts,
            west_cuts,
        }
    }

    /// Footprint width
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Footprint height
    pub const fn height(&self) -> usize {
        self.height
    }

    fn bit(bits: &BitVec, index: Option<usize>) -> bool {
        index.and_then(|i| bits.get(i).as_deref().copied()) == Some(true)
    }

    fn index(&self, cell: [usize; 2]) -> Option<usize> {
        (cell[0] < self.width && cell[1] < self.height).then(|| cell[1] * self.width + cell[0])
    }

    /// Whether a patch-relative pixel replaces existing content
    pub fn takes_patch(&self, cell: [usize; 2]) -> bool {
        Self::bit(&self.incoming, self.index(cell))
    }

    /// Fill state recorded for a patch-relative pixel that takes the patch
    pub fn state(&self, cell: [usize; 2]) -> FillState {
        let index = self.index(cell);
        FillState::with_cuts(
            Self::bit(&self.north_cuts, index),
            Self::bit(&self.west_cuts, index),
        )
    }

    /// Number of footprint pixels that take the patch
    pub fn incoming_count(&self) -> usize {
        self.incoming.count_ones()
    }
}

/// Write the patch into the canvas and update the fill grid
///
/// Unfilled canvas pixels always take the patch, with no seams recorded.
/// Filled pixels take it only where the plan says so; for those on a cut, the
/// samples the seam hides are kept in `seams` first. Off-canvas footprint
/// pixels are skipped under [`EdgeMode::Clip`]. Returns the number of pixels
/// that were unfilled before and are filled now.
pub fn composite(
    canvas: &mut Raster,
    fill: &mut FillGrid,
    seams: &mut SeamMemory,
    source: &Raster,
    placement: &Placement,
    plan: &CompositePlan,
    edges: EdgeMode,
) -> usize {
    let origin = placement.origin();
    let before = fill.filled_count();

    for sy in 0..source.height() {
        for sx in 0..source.width() {
            let target = [origin[0] + sx as i32, origin[1] + sy as i32];
            let Some(pos) = edges.resolve(target, canvas.width(), canvas.height()) else {
                continue;
            };

            let cell = [sx, sy];
            let state = if fill.is_filled(pos) {
                if !plan.takes_patch(cell) {
                    continue;
                }
                plan.state(cell)
            } else {
                FillState::FILLED
            };

            for side in [SeamSide::North, SeamSide::West] {
                if state.has_cut(side) {
                    let (across, across_pos) =
                        across_sample(canvas, source, side, cell, target, edges);
                    seams.record(side, pos, canvas, across, across_pos);
                }
            }

            canvas.copy_pixel(pos, source, cell);
            fill.fill(pos, state);
        }
    }

    fill.filled_count() - before
}

// The patch's own sample one step back across the seam; a seam on the patch
// border has none, so the neighbour that keeps its content stands in
fn across_sample<'a>(
    canvas: &'a Raster,
    source: &'a Raster,
    side: SeamSide,
    cell: [usize; 2],
    target: [i32; 2],
    edges: EdgeMode,
) -> (&'a Raster, [usize; 2]) {
    if let Some(back) = side.step_back(cell) {
        return (source, back);
    }
    let [dx, dy] = side.offset();
    edges
        .resolve(
            [target[0] + dx, target[1] + dy],
            canvas.width(),
            canvas.height(),
        )
        .map_or((source, cell), |neighbour| (canvas, neighbour))
}
