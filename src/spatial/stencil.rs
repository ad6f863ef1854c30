//! Output stencil that accumulates stamped crack pixels

use crate::io::configuration::STENCIL_VALUE;
use crate::spatial::bounds::PixelBox;
use crate::spatial::region::RegionMask;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

/// Single-channel intensity field marking crack pixels
///
/// Starts all-zero. Stamping sets pixels to [`STENCIL_VALUE`], so repeated
/// and overlapping stamps are idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stencil {
    image: GrayImage,
}

impl Stencil {
    /// Create an all-zero stencil
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Create an all-zero stencil matching a region's dimensions
    pub fn for_region(region: &RegionMask) -> Self {
        Self::new(region.width(), region.height())
    }

    /// Wrap an existing intensity image
    pub const fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Intensity at `(x, y)`, zero outside the frame
    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel_checked(x, y).map_or(0, |pixel| pixel.0[0])
    }

    /// Stamp a filled disc centred on `(x, y)`; parts outside the frame are dropped
    pub fn stamp_disc(&mut self, x: u32, y: u32, radius: u32) {
        draw_filled_circle_mut(
            &mut self.image,
            (x as i32, y as i32),
            radius as i32,
            Luma([STENCIL_VALUE]),
        );
    }

    /// Clear every pixel that lies outside `region`
    pub fn confine_to(&mut self, region: &RegionMask) {
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            if !region.contains(x, y) {
                pixel.0[0] = 0;
            }
        }
    }

    /// Merge another stencil of the same size by per-pixel maximum
    ///
    /// Pixels beyond the overlap of the two frames are left untouched.
    pub fn merge(&mut self, other: &Self) {
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            pixel.0[0] = pixel.0[0].max(other.value(x, y));
        }
    }

    /// Number of non-zero pixels
    pub fn stamped_pixels(&self) -> usize {
        self.image.pixels().filter(|pixel| pixel.0[0] > 0).count()
    }

    /// Whether nothing has been stamped
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|pixel| pixel.0[0] == 0)
    }

    /// Bounding box of all non-zero pixels
    pub fn stamped_bounds(&self) -> Option<PixelBox> {
        PixelBox::enclosing(self.width(), self.height(), |x, y| self.value(x, y) > 0)
    }

    /// Borrow the intensity image
    pub const fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Consume the stencil and return its intensity image
    pub fn into_image(self) -> GrayImage {
        self.image
    }
}
