//! Binary region masks that confine crack growth
//!
//! A region is read-only during synthesis. Cells are stored row-major as
//! `[row, col]`, i.e. `[y, x]`, while the public API speaks in image
//! coordinates `(x, y)`.

use crate::io::configuration::{MASK_THRESHOLD, STENCIL_VALUE};
use image::{GrayImage, Luma};
use ndarray::Array2;

/// Boolean field marking where strokes may grow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    cells: Array2<bool>,
}

impl RegionMask {
    /// Create a region where every pixel has the same membership
    pub fn filled(width: u32, height: u32, inside: bool) -> Self {
        Self {
            cells: Array2::from_elem((height as usize, width as usize), inside),
        }
    }

    /// Create a region from a predicate over `(x, y)`
    pub fn from_fn(width: u32, height: u32, mut inside: impl FnMut(u32, u32) -> bool) -> Self {
        Self {
            cells: Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
                inside(col as u32, row as u32)
            }),
        }
    }

    /// Binarize a single-channel intensity image
    ///
    /// Pixels strictly brighter than `threshold` are inside.
    pub fn from_gray(image: &GrayImage, threshold: u8) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| {
            image.get_pixel(x, y).0[0] > threshold
        })
    }

    /// Binarize with the default cut value
    pub fn from_gray_default(image: &GrayImage) -> Self {
        Self::from_gray(image, MASK_THRESHOLD)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.cells.ncols() as u32
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.cells.nrows() as u32
    }

    /// Whether the frame has zero area
    pub fn is_degenerate(&self) -> bool {
        self.cells.is_empty()
    }

    /// Membership test, false for coordinates outside the frame
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.cells
            .get([y as usize, x as usize])
            .copied()
            .unwrap_or(false)
    }

    /// Number of inside pixels
    pub fn area(&self) -> usize {
        self.cells.iter().filter(|&&inside| inside).count()
    }

    /// Inside pixels that touch an outside pixel through a 4-neighbour
    ///
    /// This is where the mask intensity transitions. Neighbours beyond the
    /// frame don't count as outside, so a region that fills the whole frame
    /// has no boundary. Points are listed row by row.
    pub fn boundary_points(&self) -> Vec<(u32, u32)> {
        let (rows, cols) = self.cells.dim();
        let mut points = Vec::new();

        for row in 0..rows {
            for col in 0..cols {
                if !self.cells.get([row, col]).copied().unwrap_or(false) {
                    continue;
                }
                let x = col as u32;
                let y = row as u32;
                let transitions = (col > 0 && !self.contains(x - 1, y))
                    || (col + 1 < cols && !self.contains(x + 1, y))
                    || (row > 0 && !self.contains(x, y - 1))
                    || (row + 1 < rows && !self.contains(x, y + 1));
                if transitions {
                    points.push((x, y));
                }
            }
        }

        points
    }

    /// Every pixel on the outer edge of the frame
    ///
    /// Top and bottom rows are interleaved column by column, followed by the
    /// left and right columns row by row. Corners appear twice.
    pub fn border_points(&self) -> Vec<(u32, u32)> {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let mut points = Vec::with_capacity(2 * (width + height) as usize);
        for x in 0..width {
            points.push((x, 0));
            points.push((x, height - 1));
        }
        for y in 0..height {
            points.push((0, y));
            points.push((width - 1, y));
        }
        points
    }

    /// Render as a 0/255 intensity image
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([if self.contains(x, y) { STENCIL_VALUE } else { 0 }])
        })
    }
}
