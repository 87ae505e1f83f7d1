//! Per-pixel coverage and seam bookkeeping for the output canvas
//!
//! Every canvas pixel carries a three-bit [`FillState`]: whether it has been
//! written, and whether a seam runs along its north or west edge. Coverage is
//! monotonic: once a pixel is filled it stays filled, even when a later patch
//! overwrites its color.

use ndarray::Array2;

use crate::io::error::{Result, invariant_violation};
use crate::spatial::seams::SeamSide;

/// Fill and seam status of a single canvas pixel
///
/// Cut bits can only be set together with the filled bit, so an unfilled
/// state always has a zero code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FillState(u8);

impl FillState {
    const FILLED_BIT: u8 = 0b001;
    const CUT_NORTH_BIT: u8 = 0b010;
    const CUT_WEST_BIT: u8 = 0b100;

    /// Not yet written
    pub const EMPTY: Self = Self(0);
    /// Written, no seams
    pub const FILLED: Self = Self(Self::FILLED_BIT);

    /// Filled state with the given seams
    pub const fn with_cuts(north: bool, west: bool) -> Self {
        let mut code = Self::FILLED_BIT;
        if north {
            code |= Self::CUT_NORTH_BIT;
        }
        if west {
            code |= Self::CUT_WEST_BIT;
        }
        Self(code)
    }

    /// Decode a raw status code
    ///
    /// Returns `None` for codes above 7 and for cut bits without the filled bit.
    pub const fn from_code(code: u8) -> Option<Self> {
        if code > 0b111 || (code != 0 && code & Self::FILLED_BIT == 0) {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Raw status code (0, 1, 3, 5 or 7)
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Whether the pixel has been written
    pub const fn is_filled(self) -> bool {
        self.0 & Self::FILLED_BIT != 0
    }

    /// Whether a seam runs along the pixel's north edge
    pub const fn has_cut_north(self) -> bool {
        self.0 & Self::CUT_NORTH_BIT != 0
    }

    /// Whether a seam runs along the pixel's west edge
    pub const fn has_cut_west(self) -> bool {
        self.0 & Self::CUT_WEST_BIT != 0
    }

    /// Whether a seam runs along the given edge
    pub const fn has_cut(self, side: SeamSide) -> bool {
        match side {
            SeamSide::North => self.has_cut_north(),
            SeamSide::West => self.has_cut_west(),
        }
    }
}

/// Coverage grid with the same footprint as the canvas
#[derive(Debug, Clone)]
pub struct FillGrid {
    states: Array2<FillState>,
    filled: usize,
}

impl FillGrid {
    /// Create an all-unfilled grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            states: Array2::from_elem((height, width), FillState::EMPTY),
            filled: 0,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.states.dim().1
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.states.dim().0
    }

    /// Number of pixels tracked
    pub fn area(&self) -> usize {
        self.states.len()
    }

    /// Status of a pixel (`EMPTY` outside the grid)
    pub fn state(&self, pos: [usize; 2]) -> FillState {
        self.states
            .get([pos[1], pos[0]])
            .copied()
            .unwrap_or(FillState::EMPTY)
    }

    /// Whether a pixel has been written
    pub fn is_filled(&self, pos: [usize; 2]) -> bool {
        self.state(pos).is_filled()
    }

    /// Record a pixel as filled with the given seams
    ///
    /// Unfilled states are ignored, so coverage never regresses.
    pub fn fill(&mut self, pos: [usize; 2], state: FillState) {
        if !state.is_filled() {
            return;
        }
        if let Some(cell) = self.states.get_mut([pos[1], pos[0]]) {
            if !cell.is_filled() {
                self.filled += 1;
            }
            *cell = state;
        }
    }

    /// Mark a rectangle as filled without seams, clipped to the grid
    pub fn fill_rect(&mut self, origin: [usize; 2], width: usize, height: usize) {
        for y in origin[1]..origin[1] + height {
            for x in origin[0]..origin[0] + width {
                self.fill([x, y], FillState::FILLED);
            }
        }
    }

    /// Incrementally maintained number of filled pixels
    pub const fn filled_count(&self) -> usize {
        self.filled
    }

    /// Count filled pixels by scanning the whole grid
    pub fn count_filled(&self) -> usize {
        self.states.iter().filter(|state| state.is_filled()).count()
    }

    /// Whether every pixel has been written
    pub fn is_full(&self) -> bool {
        self.filled >= self.area()
    }

    /// Fraction of the canvas covered, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.area() == 0 {
            return 1.0;
        }
        self.filled as f64 / self.area() as f64
    }

    /// First unfilled pixel in row-major order
    ///
    /// Every pixel before the returned one (all rows above, and everything to
    /// its left in the same row) is filled.
    pub fn first_unfilled(&self) -> Option<[usize; 2]> {
        self.states
            .indexed_iter()
            .find(|(_, state)| !state.is_filled())
            .map(|((y, x), _)| [x, y])
    }

    /// Next anchor for a patch placement
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the grid is already full; the
    /// synthesis loop must stop before asking.
    pub fn next_unfilled(&self) -> Result<[usize; 2]> {
        self.first_unfilled().ok_or_else(|| {
            invariant_violation(
                "next_unfilled",
                &format!(
                    "no unfilled pixel left on the {}x{} canvas",
                    self.width(),
                    self.height()
                ),
            )
        })
    }

    /// Whether every unfilled pixel has zero cut bits and the count is accurate
    pub fn is_consistent(&self) -> bool {
        self.states
            .iter()
            .all(|state| state.is_filled() || state.code() == 0)
            && self.count_filled() == self.filled
    }

    /// Borrow the underlying state array (indexed `[y, x]`)
    pub const fn states(&self) -> &Array2<FillState> {
        &self.states
    }
}
