//! Loading and saving masks, stencils and color images
//!
//! Color images are handled as RGBA throughout; masks and stencils are
//! single-channel intensity buffers, converted only here.

use crate::io::error::{CrackError, Result};
use crate::spatial::{RegionMask, Stencil};
use image::{DynamicImage, GrayImage};
use std::path::Path;

/// Open any supported image file
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be decoded
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(CrackError::FileSystem {
            path: path.to_path_buf(),
            operation: "open image",
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }

    image::open(path).map_err(|e| CrackError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Open an image as a single-channel intensity buffer
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be decoded
pub fn load_gray(path: &Path) -> Result<GrayImage> {
    Ok(load_image(path)?.to_luma8())
}

/// Load and binarize a region mask at the default threshold
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be decoded
pub fn load_region_mask(path: &Path) -> Result<RegionMask> {
    let gray = load_gray(path)?;
    Ok(RegionMask::from_gray_default(&gray))
}

/// Save any image, creating the parent directory if needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| CrackError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    image.save(path).map_err(|e| CrackError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a single-channel intensity image
///
/// # Errors
///
/// Returns an error if the image cannot be written
pub fn save_gray(image: &GrayImage, path: &Path) -> Result<()> {
    save_image(&DynamicImage::ImageLuma8(image.clone()), path)
}

/// Save a stencil as a 0/255 intensity image
///
/// # Errors
///
/// Returns an error if the image cannot be written
pub fn save_stencil(stencil: &Stencil, path: &Path) -> Result<()> {
    save_gray(stencil.as_image(), path)
}
