//! Cut map rendering for inspecting where seams fell

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::io::configuration::{
    CUT_MAP_BOTH, CUT_MAP_FILLED, CUT_MAP_NORTH, CUT_MAP_UNFILLED, CUT_MAP_WEST,
};
use crate::io::error::{Result, SynthesisError};
use crate::spatial::{FillGrid, FillState};

/// Cut map color of one fill state
pub const fn cut_map_color(state: FillState) -> [u8; 3] {
    match (
        state.is_filled(),
        state.has_cut_north(),
        state.has_cut_west(),
    ) {
        (false, _, _) => CUT_MAP_UNFILLED,
        (true, true, true) => CUT_MAP_BOTH,
        (true, true, false) => CUT_MAP_NORTH,
        (true, false, true) => CUT_MAP_WEST,
        (true, false, false) => CUT_MAP_FILLED,
    }
}

/// Render the fill grid as an image, one pixel per canvas pixel
pub fn render_cut_map(fill: &FillGrid) -> RgbImage {
    RgbImage::from_fn(fill.width() as u32, fill.height() as u32, |x, y| {
        Rgb(cut_map_color(fill.state([x as usize, y as usize])))
    })
}

/// Save the cut map of a fill grid as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_cut_map(fill: &FillGrid, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SynthesisError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    render_cut_map(fill)
        .save(output_path)
        .map_err(|e| SynthesisError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
