//! Cropping patches out of a target region and compositing them back
//!
//! A crop is persisted as a small JSON record holding the window it was cut
//! from, `{"crop_coords": [x_start, y_start, x_end, y_end]}`, so a refined
//! patch can later be pasted back at the same place.

use crate::io::error::{CrackError, Result};
use crate::spatial::PixelBox;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A patch cut from an image together with its mask and window
#[derive(Debug, Clone)]
pub struct CropResult {
    /// Cropped color image
    pub image: DynamicImage,
    /// Cropped region mask
    pub mask: GrayImage,
    /// Window the patch was cut from, in full-image coordinates
    pub window: PixelBox,
}

/// Persisted crop window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRecord {
    /// Window as `[x_start, y_start, x_end, y_end]`
    pub crop_coords: PixelBox,
}

impl CropRecord {
    /// Read a record from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid record
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CrackError::FileSystem {
            path: path.to_path_buf(),
            operation: "read crop record",
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| CrackError::CoordinateRecord {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the record as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written
    pub fn write(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string(self).map_err(|e| CrackError::CoordinateRecord {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, text).map_err(|e| CrackError::FileSystem {
            path: path.to_path_buf(),
            operation: "write crop record",
            source: e,
        })
    }
}

/// Cut a patch out of the region marked by `mask`
///
/// The window is the bounding box of the non-zero mask pixels, narrowed to a
/// random `crop_size x crop_size` sub-window when the box is larger than that
/// along both axes.
///
/// # Errors
///
/// Returns an error if:
/// - The image and mask dimensions differ
/// - The mask has no non-zero pixel
pub fn random_crop_from_mask<R: Rng>(
    image: &DynamicImage,
    mask: &GrayImage,
    crop_size: u32,
    rng: &mut R,
) -> Result<CropResult> {
    if image.width() != mask.width() || image.height() != mask.height() {
        return Err(CrackError::InvalidSourceData {
            reason: format!(
                "mask is {}x{} but image is {}x{}",
                mask.width(),
                mask.height(),
                image.width(),
                image.height()
            ),
        });
    }

    let region = PixelBox::enclosing(mask.width(), mask.height(), |x, y| {
        mask.get_pixel(x, y).0[0] > 0
    })
    .ok_or_else(|| CrackError::InvalidSourceData {
        reason: "No target region found in mask".to_string(),
    })?;

    let window = region.crop_window(crop_size, rng);
    let cropped_image = image.crop_imm(
        window.x_start,
        window.y_start,
        window.width(),
        window.height(),
    );
    let cropped_mask = imageops::crop_imm(
        mask,
        window.x_start,
        window.y_start,
        window.width(),
        window.height(),
    )
    .to_image();

    Ok(CropResult {
        image: cropped_image,
        mask: cropped_mask,
        window,
    })
}

fn check_window(window: &PixelBox, width: u32, height: u32) -> Result<()> {
    if window.width() == 0 || window.height() == 0 || !window.fits_within(width, height) {
        return Err(CrackError::InvalidSourceData {
            reason: format!(
                "crop window {:?} does not fit a {width}x{height} image",
                <[u32; 4]>::from(*window)
            ),
        });
    }
    Ok(())
}

/// Paste `patch` into a copy of `original` at `window`
///
/// A patch whose size differs from the window is resized to fit first.
///
/// # Errors
///
/// Returns an error if the window is empty or extends past `original`
pub fn paste_patch(
    original: &DynamicImage,
    patch: &DynamicImage,
    window: &PixelBox,
) -> Result<DynamicImage> {
    check_window(window, original.width(), original.height())?;

    let fitted = if patch.width() == window.width() && patch.height() == window.height() {
        patch.clone()
    } else {
        log::warn!(
            "Patch size ({}x{}) doesn't match coordinate region ({}x{}), resizing patch",
            patch.width(),
            patch.height(),
            window.width(),
            window.height()
        );
        patch.resize_exact(window.width(), window.height(), FilterType::Lanczos3)
    };

    let mut composited = original.clone();
    imageops::replace(
        &mut composited,
        &fitted,
        i64::from(window.x_start),
        i64::from(window.y_start),
    );
    Ok(composited)
}

/// Place a patch-local stencil onto a zero canvas of the full image size
///
/// A stencil whose size differs from the window is resized to fit first.
///
/// # Errors
///
/// Returns an error if the window is empty or extends past the canvas
pub fn reproject_stencil(
    patch_stencil: &GrayImage,
    window: &PixelBox,
    width: u32,
    height: u32,
) -> Result<GrayImage> {
    check_window(window, width, height)?;

    let fitted = if patch_stencil.width() == window.width()
        && patch_stencil.height() == window.height()
    {
        patch_stencil.clone()
    } else {
        log::warn!(
            "Stencil size ({}x{}) doesn't match coordinate region ({}x{}), resizing stencil",
            patch_stencil.width(),
            patch_stencil.height(),
            window.width(),
            window.height()
        );
        imageops::resize(
            patch_stencil,
            window.width(),
            window.height(),
            FilterType::Lanczos3,
        )
    };

    let mut canvas = GrayImage::new(width, height);
    imageops::replace(
        &mut canvas,
        &fitted,
        i64::from(window.x_start),
        i64::from(window.y_start),
    );
    Ok(canvas)
}
