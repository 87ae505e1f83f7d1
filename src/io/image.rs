//! PNG loading with color-mode validation, and raster export

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::io::error::{Result, SynthesisError};
use crate::spatial::Raster;

/// Convert a decoded image into a source raster
///
/// Grayscale images become one-channel rasters and RGB images three-channel
/// rasters. Deeper sample formats are reduced to 8 bits.
///
/// # Errors
///
/// Returns [`SynthesisError::UnsupportedColorMode`] if the image carries an
/// alpha channel.
pub fn raster_from_image(image: DynamicImage) -> Result<Raster> {
    let color = image.color();
    if color.has_alpha() {
        return Err(SynthesisError::UnsupportedColorMode {
            color: format!("{color:?}"),
            reason: "images with an alpha (transparency) channel are not supported, \
                     flatten the image first"
                .to_string(),
        });
    }

    let (width, height) = (image.width() as usize, image.height() as usize);
    match image {
        DynamicImage::ImageLuma8(gray) => Raster::from_samples(width, height, 1, gray.into_raw()),
        DynamicImage::ImageRgb8(rgb) => Raster::from_samples(width, height, 3, rgb.into_raw()),
        other if other.color().has_color() => {
            debug!(color = ?color, "reducing source to 8-bit RGB");
            Raster::from_samples(width, height, 3, other.to_rgb8().into_raw())
        }
        other => {
            debug!(color = ?color, "reducing source to 8-bit grayscale");
            Raster::from_samples(width, height, 1, other.to_luma8().into_raw())
        }
    }
}

/// Load a source texture from disk
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - The image carries an alpha channel
pub fn load_source(path: &Path) -> Result<Raster> {
    let image = image::open(path).map_err(|e| SynthesisError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    raster_from_image(image)
}

/// Convert a raster back into a decoded image
///
/// # Errors
///
/// Returns an error if the raster has neither one nor three channels.
pub fn image_from_raster(raster: &Raster) -> Result<DynamicImage> {
    let (width, height, channels) = (raster.width(), raster.height(), raster.channels());
    let samples = raster.clone().into_samples();
    let invalid = || SynthesisError::InvalidSourceData {
        reason: format!("cannot encode a {width}x{height} raster with {channels} channels"),
    };

    match channels {
        1 => GrayImage::from_raw(width as u32, height as u32, samples)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(invalid),
        3 => RgbImage::from_raw(width as u32, height as u32, samples)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Save a raster as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The raster has neither one nor three channels
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_raster_as_png(raster: &Raster, output_path: &Path) -> Result<()> {
    let image = image_from_raster(raster)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SynthesisError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image
        .save(output_path)
        .map_err(|e| SynthesisError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
