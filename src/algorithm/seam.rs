//! Minimum-error cuts through the overlap between a new patch and the canvas
//!
//! A placement overlaps existing content in two bands: the patch's leftmost
//! columns (west band) and its topmost rows (north band). Each band is a grid
//! of per-cell mismatch costs, and the cut is the cheapest monotone path from
//! one end of the band to the other, found by dynamic programming.

use ndarray::Array2;
use tracing::trace;

use crate::algorithm::search::Placement;
use crate::spatial::{EdgeMode, FillGrid, Raster, SeamMemory, SeamSide};

/// Which side of the patch a band lies on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandAxis {
    /// Leftmost patch columns; the cut runs top to bottom
    West,
    /// Topmost patch rows; the cut runs left to right
    North,
}

impl BandAxis {
    /// Patch-relative pixel `[x, y]` of a band cell
    ///
    /// `step` advances along the cut, `across` moves across the band.
    pub const fn cell(self, step: usize, across: usize) -> [usize; 2] {
        match self {
            Self::West => [across, step],
            Self::North => [step, across],
        }
    }

    /// Pixel edge a cut through this band runs along
    pub const fn side(self) -> SeamSide {
        match self {
            Self::West => SeamSide::West,
            Self::North => SeamSide::North,
        }
    }
}

/// Per-cell mismatch costs of one overlap band, indexed `[step, across]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlapBand {
    axis: BandAxis,
    costs: Array2<u64>,
}

impl OverlapBand {
    /// Wrap a precomputed cost grid
    pub const fn new(axis: BandAxis, costs: Array2<u64>) -> Self {
        Self { axis, costs }
    }

    /// Build the band of a placement, or `None` if the patch has no extent on that side
    ///
    /// A cell costs the squared difference between canvas and patch where
    /// the canvas pixel is filled, and nothing where it is unfilled or off-canvas.
    /// A filled pixel that already has a seam on this band's side is instead
    /// priced against the samples recorded when that seam was cut.
    pub fn extract(
        axis: BandAxis,
        canvas: &Raster,
        fill: &FillGrid,
        seams: &SeamMemory,
        source: &Raster,
        placement: &Placement,
        edges: EdgeMode,
    ) -> Option<Self> {
        let (steps, breadth) = match axis {
            BandAxis::West => (
                source.height(),
                placement.west_extent().min(source.width()),
            ),
            BandAxis::North => (
                source.width(),
                placement.north_extent().min(source.height()),
            ),
        };
        if steps == 0 || breadth == 0 {
            return None;
        }

        let origin = placement.origin();
        let side = axis.side();
        let costs = Array2::from_shape_fn((steps, breadth), |(step, across)| {
            let [sx, sy] = axis.cell(step, across);
            let target = [origin[0] + sx as i32, origin[1] + sy as i32];
            edges
                .resolve(target, canvas.width(), canvas.height())
                .map_or(0, |pos| {
                    let state = fill.state(pos);
                    if state.has_cut(side) {
                        seams.crossing_cost(side, pos, source, [sx, sy])
                    } else if state.is_filled() {
                        source.squared_difference([sx, sy], canvas, pos)
                    } else {
                        0
                    }
                })
        });

        Some(Self { axis, costs })
    }

    /// Side of the patch this band covers
    pub const fn axis(&self) -> BandAxis {
        self.axis
    }

    /// Length of the band along the cut
    pub fn steps(&self) -> usize {
        self.costs.dim().0
    }

    /// Width of the band across the cut
    pub fn breadth(&self) -> usize {
        self.costs.dim().1
    }

    /// Cost of one cell (zero outside the band)
    pub fn cost(&self, step: usize, across: usize) -> u64 {
        self.costs.get([step, across]).copied().unwrap_or(0)
    }

    /// Total cost of a path given as one `across` position per step
    pub fn path_cost(&self, positions: &[usize]) -> u64 {
        positions
            .iter()
            .enumerate()
            .map(|(step, &across)| self.cost(step, across))
            .sum()
    }

    /// Cost of the unoptimized cut that stays at `across` for the whole band
    pub fn straight_cut_cost(&self, across: usize) -> u64 {
        (0..self.steps()).map(|step| self.cost(step, across)).sum()
    }

    /// Cheapest path through the band
    ///
    /// Each step may move at most one cell across. Ties prefer the lowest
    /// `across` index, both between predecessors and for the end cell.
    pub fn min_cut(&self) -> Seam {
        let (steps, breadth) = self.costs.dim();
        if steps == 0 || breadth == 0 {
            return Seam {
                axis: self.axis,
                positions: Vec::new(),
                cost: 0,
            };
        }

        let mut table: Array2<CostAndParent> = Array2::default((steps, breadth));
        for across in 0..breadth {
            if let Some(cell) = table.get_mut([0, across]) {
                cell.cost = self.cost(0, across);
            }
        }

        let cumulative = |table: &Array2<CostAndParent>, step: usize, across: usize| {
            table.get([step, across]).map_or(u64::MAX, |cell| cell.cost)
        };

        for step in 1..steps {
            for across in 0..breadth {
                let lowest = across.saturating_sub(1);
                let highest = (across + 1).min(breadth - 1);
                let parent = (lowest..=highest)
                    .min_by_key(|&p| cumulative(&table, step - 1, p))
                    .unwrap_or(across);
                let cost = self.cost(step, across) + cumulative(&table, step - 1, parent);
                if let Some(cell) = table.get_mut([step, across]) {
                    *cell = CostAndParent { cost, parent };
                }
            }
        }

        // Find the cheapest end cell, then walk the parents back to the first step
        let last = steps - 1;
        let mut across = (0..breadth)
            .min_by_key(|&a| cumulative(&table, last, a))
            .unwrap_or(0);
        let cost = cumulative(&table, last, across);

        let mut positions = vec![0; steps];
        for step in (0..steps).rev() {
            if let Some(slot) = positions.get_mut(step) {
                *slot = across;
            }
            across = table.get([step, across]).map_or(across, |cell| cell.parent);
        }

        Seam {
            axis: self.axis,
            positions,
            cost,
        }
    }
}

#[derive(Default, Debug, Copy, Clone)]
struct CostAndParent {
    cost: u64,
    parent: usize,
}

/// A cut through an overlap band
///
/// Within the band, cells before the cut (`across < position`) keep the
/// existing canvas content; the cut cell and everything after it take the patch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seam {
    axis: BandAxis,
    positions: Vec<usize>,
    cost: u64,
}

impl Seam {
    /// Band the cut runs through
    pub const fn axis(&self) -> BandAxis {
        self.axis
    }

    /// Cut position at a step
    pub fn position(&self, step: usize) -> Option<usize> {
        self.positions.get(step).copied()
    }

    /// Cut positions, one per step
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Cumulative cost of the cut
    pub const fn cost(&self) -> u64 {
        self.cost
    }

    /// Whether a patch-relative pixel `[x, y]` lies on the patch side of the cut
    pub fn admits(&self, cell: [usize; 2]) -> bool {
        let (step, across) = match self.axis {
            BandAxis::West => (cell[1], cell[0]),
            BandAxis::North => (cell[0], cell[1]),
        };
        self.position(step).is_none_or(|position| across >= position)
    }

    /// Whether a patch-relative pixel `[x, y]` is the cut cell of its step
    pub fn passes_through(&self, cell: [usize; 2]) -> bool {
        let (step, across) = match self.axis {
            BandAxis::West => (cell[1], cell[0]),
            BandAxis::North => (cell[0], cell[1]),
        };
        self.position(step) == Some(across)
    }
}

/// The west and north cuts of one placement
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cuts {
    /// Cut through the west band, if the patch extends left of the anchor
    pub west: Option<Seam>,
    /// Cut through the north band, if the patch extends above the anchor
    pub north: Option<Seam>,
}

/// Carve both overlap bands of a placement
///
/// The two bands are independent, so they are carved concurrently.
pub fn carve(
    canvas: &Raster,
    fill: &FillGrid,
    seams: &SeamMemory,
    source: &Raster,
    placement: &Placement,
    edges: EdgeMode,
) -> Cuts {
    let carve_band = |axis: BandAxis| {
        OverlapBand::extract(axis, canvas, fill, seams, source, placement, edges).map(|band| {
            let seam = band.min_cut();
            trace!(
                axis = ?axis,
                breadth = band.breadth(),
                cost = seam.cost(),
                "carved overlap band"
            );
            seam
        })
    };

    let (west, north) = rayon::join(|| carve_band(BandAxis::West), || carve_band(BandAxis::North));
    Cuts { west, north }
}
