//! Synthesis constants, runtime configuration and defaults

use crate::io::error::{Result, invalid_parameter};

// Offset search heuristic
/// Preferred distance between the anchor and the far edge of the offset search window
pub const MAX_OFFSET_HEURISTIC: usize = 20;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed canvas dimension
pub const MAX_CANVAS_DIMENSION: usize = 10_000;

// Default values for configurable parameters
/// Default overlap between a new patch and existing content
pub const DEFAULT_OVERLAP: usize = 100;

/// Output size multiplier when no explicit dimensions are given
pub const DEFAULT_SCALE_FACTOR: usize = 2;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Output settings
/// Suffix added to synthesized texture filenames
pub const OUTPUT_SUFFIX: &str = "_texture";
/// Suffix added to cut map filenames
pub const CUT_MAP_SUFFIX: &str = "_cuts";

// Cut map palette
/// Cut map color of pixels never written
pub const CUT_MAP_UNFILLED: [u8; 3] = [128, 128, 128];
/// Cut map color of filled pixels without any seam
pub const CUT_MAP_FILLED: [u8; 3] = [255, 255, 255];
/// Cut map color of pixels with a seam on their north edge
pub const CUT_MAP_NORTH: [u8; 3] = [220, 40, 40];
/// Cut map color of pixels with a seam on their west edge
pub const CUT_MAP_WEST: [u8; 3] = [40, 40, 220];
/// Cut map color of pixels with seams on both edges
pub const CUT_MAP_BOTH: [u8; 3] = [200, 40, 200];

/// Runtime parameters of a synthesis run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Output canvas width in pixels
    pub width: usize,
    /// Output canvas height in pixels
    pub height: usize,
    /// How much existing context a new patch reuses when choosing its placement
    pub overlap: usize,
    /// Whether canvas addressing wraps around so the output tiles seamlessly
    pub tileable: bool,
}

impl SynthesisConfig {
    /// Configuration for a `width` x `height` canvas with the default overlap
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            overlap: DEFAULT_OVERLAP,
            tileable: false,
        }
    }

    /// Replace the overlap
    #[must_use]
    pub const fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Replace the tileable flag
    #[must_use]
    pub const fn with_tileable(mut self, tileable: bool) -> Self {
        self.tileable = tileable;
        self
    }

    /// Number of pixels on the canvas
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Check the configuration against the dimensions of the source patch
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The overlap is zero
    /// - A canvas dimension is zero or exceeds [`MAX_CANVAS_DIMENSION`]
    /// - The canvas is smaller than the source patch in either direction
    pub fn validate(&self, patch_width: usize, patch_height: usize) -> Result<()> {
        if self.overlap == 0 {
            return Err(invalid_parameter(
                "overlap",
                &self.overlap,
                &"must be at least 1",
            ));
        }

        for (parameter, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 {
                return Err(invalid_parameter(parameter, &value, &"must be positive"));
            }
            if value > MAX_CANVAS_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must not exceed {MAX_CANVAS_DIMENSION}"),
                ));
            }
        }

        if self.width < patch_width {
            return Err(invalid_parameter(
                "width",
                &self.width,
                &format!("must be at least the source width {patch_width}"),
            ));
        }
        if self.height < patch_height {
            return Err(invalid_parameter(
                "height",
                &self.height,
                &format!("must be at least the source height {patch_height}"),
            ));
        }

        Ok(())
    }
}
