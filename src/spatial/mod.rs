//! Spatial data structures for the output canvas
//!
//! This module contains spatial-related functionality including:
//! - Dense sample storage and edge addressing
//! - Per-pixel fill and seam state tracking
//! - Samples displaced by earlier cuts

/// Sample storage for source patches and the canvas
pub mod canvas;
/// Fill-state grid and next-anchor selection
pub mod fill;
/// Samples hidden behind recorded seams
pub mod seams;

pub use canvas::{EdgeMode, Raster};
pub use fill::{FillGrid, FillState};
pub use seams::{SeamMemory, SeamSide};
