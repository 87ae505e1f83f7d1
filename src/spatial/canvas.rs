//! Dense sample storage for source patches and the output canvas
//!
//! Samples live in a single `(rows, cols, channels)` array so that a pixel's
//! channels are contiguous. All coordinates in this module are `[x, y]`
//! (column, row); the array itself is indexed `[y, x, channel]`.

use ndarray::Array3;

use crate::io::error::{Result, SynthesisError};

/// How canvas coordinates outside `0..width` / `0..height` are treated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeMode {
    /// Coordinates outside the canvas are dropped
    Clip,
    /// Coordinates wrap around the canvas (toroidal addressing)
    Wrap,
}

impl EdgeMode {
    /// Edge mode matching the tileable flag of a configuration
    pub const fn from_tileable(tileable: bool) -> Self {
        if tileable { Self::Wrap } else { Self::Clip }
    }

    /// Map a signed canvas coordinate to a pixel, if it addresses one
    pub const fn resolve(self, pos: [i32; 2], width: usize, height: usize) -> Option<[usize; 2]> {
        match self {
            Self::Clip => {
                if pos[0] < 0 || pos[1] < 0 {
                    return None;
                }
                let (x, y) = (pos[0] as usize, pos[1] as usize);
                if x < width && y < height {
                    Some([x, y])
                } else {
                    None
                }
            }
            Self::Wrap => {
                if width == 0 || height == 0 {
                    return None;
                }
                Some([wrap(pos[0], width), wrap(pos[1], height)])
            }
        }
    }
}

/// Toroidal coordinate wrap
///
/// Unlike a plain remainder, negative coordinates land on the far side of the
/// canvas: `wrap(-1, w) == w - 1`.
pub const fn wrap(coord: i32, extent: usize) -> usize {
    if extent == 0 {
        return 0;
    }
    (coord as i64).rem_euclid(extent as i64) as usize
}

/// A `width` x `height` image of `channels` 8-bit samples per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    samples: Array3<u8>,
}

impl Raster {
    /// Create a zeroed raster
    pub fn blank(width: usize, height: usize, channels: usize) -> Self {
        Self {
            samples: Array3::zeros((height, width, channels)),
        }
    }

    /// Wrap an interleaved, row-major sample buffer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any dimension or the channel count is zero
    /// - The buffer length doesn't equal `width * height * channels`
    pub fn from_samples(
        width: usize,
        height: usize,
        channels: usize,
        samples: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(SynthesisError::InvalidSourceData {
                reason: format!(
                    "raster dimensions must be positive (got {width}x{height}x{channels})"
                ),
            });
        }

        let len = samples.len();
        let samples = Array3::from_shape_vec((height, width, channels), samples).map_err(|e| {
            SynthesisError::InvalidSourceData {
                reason: format!(
                    "expected {} samples for {width}x{height}x{channels}, got {len}: {e}",
                    width * height * channels
                ),
            }
        })?;

        Ok(Self { samples })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.samples.dim().1
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.samples.dim().0
    }

    /// Samples per pixel
    pub fn channels(&self) -> usize {
        self.samples.dim().2
    }

    /// Read one sample
    pub fn sample(&self, pos: [usize; 2], channel: usize) -> Option<u8> {
        self.samples.get([pos[1], pos[0], channel]).copied()
    }

    /// All channels of one pixel, or `None` outside the raster
    pub fn pixel(&self, pos: [usize; 2]) -> Option<Vec<u8>> {
        if pos[0] >= self.width() || pos[1] >= self.height() {
            return None;
        }
        Some(
            (0..self.channels())
                .filter_map(|c| self.sample(pos, c))
                .collect(),
        )
    }

    /// Total squared per-channel difference between a pixel of `self` and a pixel of `other`
    ///
    /// Channels missing on either side contribute nothing.
    pub fn squared_difference(&self, pos: [usize; 2], other: &Self, other_pos: [usize; 2]) -> u64 {
        (0..self.channels())
            .map(|c| {
                match (self.sample(pos, c), other.sample(other_pos, c)) {
                    (Some(a), Some(b)) => {
                        let d = u64::from(a.abs_diff(b));
                        d * d
                    }
                    _ => 0,
                }
            })
            .sum()
    }

    /// Overwrite a pixel of `self` with a pixel of `source`
    pub fn copy_pixel(&mut self, pos: [usize; 2], source: &Self, source_pos: [usize; 2]) {
        for c in 0..self.channels() {
            if let (Some(dst), Some(value)) = (
                self.samples.get_mut([pos[1], pos[0], c]),
                source.sample(source_pos, c),
            ) {
                *dst = value;
            }
        }
    }

    /// Copy all of `source` with its top-left corner at `origin`, clipped to `self`
    pub fn paste(&mut self, source: &Self, origin: [usize; 2]) {
        for y in 0..source.height() {
            for x in 0..source.width() {
                self.copy_pixel([origin[0] + x, origin[1] + y], source, [x, y]);
            }
        }
    }

    /// Borrow the underlying array (indexed `[y, x, channel]`)
    pub const fn samples(&self) -> &Array3<u8> {
        &self.samples
    }

    /// Consume the raster, returning the interleaved row-major sample buffer
    pub fn into_samples(self) -> Vec<u8> {
        let (samples, _offset) = self.samples.into_raw_vec_and_offset();
        samples
    }
}
