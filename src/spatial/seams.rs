//! Samples hidden by earlier cuts
//!
//! When a filled pixel takes a new patch along a cut, two samples stop being
//! visible: the pixel's previous content, and the new patch's own sample for
//! the neighbour on the far side of the seam (which kept the old content).
//! Both are kept per pixel and per seam side, so a later cut that crosses the
//! old seam is priced against the samples that originally met there rather
//! than against the composited result.

use crate::spatial::Raster;

/// Edge of a pixel a seam runs along
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeamSide {
    /// Seam between the pixel and the one above it
    North,
    /// Seam between the pixel and the one to its left
    West,
}

impl SeamSide {
    /// Canvas displacement from a pixel to its neighbour across this side
    pub const fn offset(self) -> [i32; 2] {
        match self {
            Self::North => [0, -1],
            Self::West => [-1, 0],
        }
    }

    /// The neighbouring position across this side, if it has non-negative coordinates
    pub const fn step_back(self, pos: [usize; 2]) -> Option<[usize; 2]> {
        match self {
            Self::North => match pos[1].checked_sub(1) {
                Some(y) => Some([pos[0], y]),
                None => None,
            },
            Self::West => match pos[0].checked_sub(1) {
                Some(x) => Some([x, pos[1]]),
                None => None,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SidePair {
    displaced: Raster,
    across: Raster,
}

/// Per-pixel samples displaced by cuts, with the canvas footprint
///
/// Entries are only meaningful where the fill grid carries the matching cut
/// bit; a pixel that later takes a patch without a cut simply stops being read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeamMemory {
    north: SidePair,
    west: SidePair,
}

impl SeamMemory {
    /// Empty memory for a `width` x `height` canvas with `channels` samples per pixel
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        let pair = || SidePair {
            displaced: Raster::blank(width, height, channels),
            across: Raster::blank(width, height, channels),
        };
        Self {
            north: pair(),
            west: pair(),
        }
    }

    const fn pair(&self, side: SeamSide) -> &SidePair {
        match side {
            SeamSide::North => &self.north,
            SeamSide::West => &self.west,
        }
    }

    const fn pair_mut(&mut self, side: SeamSide) -> &mut SidePair {
        match side {
            SeamSide::North => &mut self.north,
            SeamSide::West => &mut self.west,
        }
    }

    /// Remember a seam on `side` of canvas pixel `pos`
    ///
    /// Must be called before the pixel is overwritten: `canvas` at `pos`
    /// still holds the content being displaced. `across` is the incoming
    /// content's sample for the neighbour across the seam.
    pub fn record(
        &mut self,
        side: SeamSide,
        pos: [usize; 2],
        canvas: &Raster,
        across: &Raster,
        across_pos: [usize; 2],
    ) {
        let pair = self.pair_mut(side);
        pair.displaced.copy_pixel(pos, canvas, pos);
        pair.across.copy_pixel(pos, across, across_pos);
    }

    /// Content each pixel showed before the cut on `side` replaced it
    pub const fn displaced(&self, side: SeamSide) -> &Raster {
        &self.pair(side).displaced
    }

    /// What the replacing content had for the neighbour across `side`
    pub const fn across(&self, side: SeamSide) -> &Raster {
        &self.pair(side).across
    }

    /// Mismatch of placing patch pixel `cell` on canvas pixel `pos` across its recorded seam
    ///
    /// Compares the patch against the displaced sample at `pos` and, when the
    /// patch has a pixel one step back across the seam, that pixel against the
    /// recorded sample for the neighbour.
    pub fn crossing_cost(
        &self,
        side: SeamSide,
        pos: [usize; 2],
        patch: &Raster,
        cell: [usize; 2],
    ) -> u64 {
        let here = patch.squared_difference(cell, self.displaced(side), pos);
        let across = side
            .step_back(cell)
            .map_or(0, |back| patch.squared_difference(back, self.across(side), pos));
        here + across
    }
}
